//! Property insurance coefficient profile and property categories

use serde::{Deserialize, Serialize};

/// Insured property category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Flat,
    Garage,
}

impl PropertyType {
    /// Map a request selector to a category.
    ///
    /// Only `house` and `flat` are recognised (ignoring case and surrounding
    /// whitespace); every other selector prices as a garage.
    pub fn from_selector(selector: &str) -> Self {
        let normalized = selector.trim().to_lowercase();
        match normalized.as_str() {
            "house" => PropertyType::House,
            "flat" => PropertyType::Flat,
            _ => PropertyType::Garage,
        }
    }
}

/// Per-square-meter rates for a property insurance product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInsuranceProfile {
    pub product_id: String,
    pub name: String,

    // Property rates by category
    pub house_per_m2: f64,
    pub flat_per_m2: f64,
    pub garage_per_m2: f64,

    /// Household equipment rate (same for every category)
    pub equipment_per_m2: f64,
    /// Liability rate (same for every category)
    pub liability_per_m2: f64,
}

impl PropertyInsuranceProfile {
    /// Property rate for the given category
    pub fn rate_for(&self, property_type: PropertyType) -> f64 {
        match property_type {
            PropertyType::House => self.house_per_m2,
            PropertyType::Flat => self.flat_per_m2,
            PropertyType::Garage => self.garage_per_m2,
        }
    }
}
