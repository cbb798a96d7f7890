//! Property insurance premium calculation

use serde::{Deserialize, Serialize};

use super::{check_contact, check_product_id, ensure_finite};
use crate::error::QuoteError;
use crate::products::{PropertyInsuranceProfile, PropertyType};

/// Property insurance quote request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyQuoteRequest {
    pub product_id: String,
    #[serde(default)]
    pub email: Option<String>,

    /// `house`, `flat`; anything else is priced as a garage
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub square_meters: i64,

    // Coverage toggles
    #[serde(default)]
    pub include_property: bool,
    #[serde(default)]
    pub include_equipment: bool,
    #[serde(default)]
    pub include_liability: bool,
}

impl PropertyQuoteRequest {
    pub fn property_type(&self) -> PropertyType {
        PropertyType::from_selector(&self.property_type)
    }

    pub fn validate(&self) -> Result<(), QuoteError> {
        check_product_id(&self.product_id)?;
        check_contact(&self.email)?;

        if self.square_meters < 1 {
            return Err(QuoteError::invalid(format!(
                "square meters must be at least 1, got {}",
                self.square_meters
            )));
        }
        if !self.include_property && !self.include_equipment && !self.include_liability {
            return Err(QuoteError::invalid(
                "at least one of property, equipment or liability coverage must be selected",
            ));
        }
        Ok(())
    }
}

/// Price per coverage component; disabled components are explicitly zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBreakdown {
    pub property: f64,
    pub equipment: f64,
    pub liability: f64,
    pub total: f64,
}

/// Result of a property insurance quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyQuote {
    pub property_type: PropertyType,
    /// Rates for a single square meter. `total` is the sum of all three rates
    /// regardless of the toggles, for comparing products.
    pub per_square_meter: PropertyBreakdown,
    /// Premium for the whole area; `total` covers the enabled components only
    pub total: PropertyBreakdown,
}

/// Price a property for the selected components
pub fn quote_property(
    profile: &PropertyInsuranceProfile,
    request: &PropertyQuoteRequest,
) -> Result<PropertyQuote, QuoteError> {
    let property_type = request.property_type();
    let property_rate = profile.rate_for(property_type);
    let area = request.square_meters as f64;

    let gate = |enabled: bool, value: f64| if enabled { value } else { 0.0 };

    let per_square_meter = PropertyBreakdown {
        property: gate(request.include_property, property_rate),
        equipment: gate(request.include_equipment, profile.equipment_per_m2),
        liability: gate(request.include_liability, profile.liability_per_m2),
        total: property_rate + profile.equipment_per_m2 + profile.liability_per_m2,
    };

    let property = gate(request.include_property, property_rate * area);
    let equipment = gate(request.include_equipment, profile.equipment_per_m2 * area);
    let liability = gate(request.include_liability, profile.liability_per_m2 * area);
    let total = PropertyBreakdown {
        property,
        equipment,
        liability,
        total: property + equipment + liability,
    };

    ensure_finite("property premium", total.total)?;
    ensure_finite("per square meter rate", per_square_meter.total)?;

    log::debug!(
        "{:?} {} m2: property={} equipment={} liability={} total={}",
        property_type,
        request.square_meters,
        total.property,
        total.equipment,
        total.liability,
        total.total
    );

    Ok(PropertyQuote {
        property_type,
        per_square_meter,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> PropertyInsuranceProfile {
        PropertyInsuranceProfile {
            product_id: "PROP-T".to_string(),
            name: "Test home".to_string(),
            house_per_m2: 120.0,
            flat_per_m2: 90.0,
            garage_per_m2: 40.0,
            equipment_per_m2: 30.0,
            liability_per_m2: 10.0,
        }
    }

    fn request(property_type: &str, square_meters: i64) -> PropertyQuoteRequest {
        PropertyQuoteRequest {
            product_id: "PROP-T".to_string(),
            email: None,
            property_type: property_type.to_string(),
            square_meters,
            include_property: true,
            include_equipment: true,
            include_liability: true,
        }
    }

    #[test]
    fn test_house_all_components() {
        let quote = quote_property(&profile(), &request("house", 80)).unwrap();

        assert_eq!(quote.property_type, PropertyType::House);
        assert_eq!(quote.total.property, 9600.0);
        assert_eq!(quote.total.equipment, 2400.0);
        assert_eq!(quote.total.liability, 800.0);
        assert_eq!(quote.total.total, 12800.0);

        assert_eq!(quote.per_square_meter.property, 120.0);
        assert_eq!(quote.per_square_meter.equipment, 30.0);
        assert_eq!(quote.per_square_meter.liability, 10.0);
        assert_eq!(quote.per_square_meter.total, 160.0);
    }

    #[test]
    fn test_disabled_toggles_are_zero() {
        let mut req = request("flat", 50);
        req.include_equipment = false;

        let quote = quote_property(&profile(), &req).unwrap();
        assert_eq!(quote.total.equipment, 0.0);
        assert_eq!(quote.per_square_meter.equipment, 0.0);
        assert_eq!(quote.total.total, quote.total.property + quote.total.liability);
        assert_eq!(quote.total.total, 90.0 * 50.0 + 10.0 * 50.0);

        // Reference total ignores the toggles
        assert_eq!(quote.per_square_meter.total, 90.0 + 30.0 + 10.0);
    }

    #[test]
    fn test_every_toggle_combination() {
        for mask in 0..8u8 {
            let mut req = request("house", 12);
            req.include_property = mask & 1 != 0;
            req.include_equipment = mask & 2 != 0;
            req.include_liability = mask & 4 != 0;

            let quote = quote_property(&profile(), &req).unwrap();
            let t = quote.total;
            assert_eq!(t.total, t.property + t.equipment + t.liability);
            if !req.include_property {
                assert_eq!(t.property, 0.0);
                assert_eq!(quote.per_square_meter.property, 0.0);
            }
            if !req.include_equipment {
                assert_eq!(t.equipment, 0.0);
                assert_eq!(quote.per_square_meter.equipment, 0.0);
            }
            if !req.include_liability {
                assert_eq!(t.liability, 0.0);
                assert_eq!(quote.per_square_meter.liability, 0.0);
            }
        }
    }

    #[test]
    fn test_unknown_type_priced_as_garage() {
        let quote = quote_property(&profile(), &request("barn", 20)).unwrap();
        assert_eq!(quote.property_type, PropertyType::Garage);
        assert_eq!(quote.total.property, 800.0);
    }

    #[test]
    fn test_validate() {
        assert!(request("house", 1).validate().is_ok());
        assert!(matches!(request("house", 0).validate(), Err(QuoteError::InvalidInput(_))));

        let mut req = request("house", 10);
        req.include_property = false;
        req.include_equipment = false;
        req.include_liability = false;
        assert!(matches!(req.validate(), Err(QuoteError::InvalidInput(_))));
    }
}
