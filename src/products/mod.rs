//! Product coefficient profiles, the in-memory catalog and the store interface

mod life;
mod property;
mod pension;
pub mod loader;

pub use life::LifeInsuranceProfile;
pub use property::{PropertyInsuranceProfile, PropertyType};
pub use pension::{PensionProfile, PensionStrategy};
pub use loader::{load_catalog, load_default_catalog, CsvStore};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{QuoteError, StoreError};
use crate::tiers::TierSchedule;

/// Product line a coefficient profile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductLine {
    LifeInsurance,
    PropertyInsurance,
    Pension,
}

impl fmt::Display for ProductLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProductLine::LifeInsurance => "life insurance",
            ProductLine::PropertyInsurance => "property insurance",
            ProductLine::Pension => "pension",
        };
        f.write_str(name)
    }
}

/// Read access to coefficient profiles and the contribution schedule.
///
/// `Ok(None)` means the record is absent; `Err` means the data could not be read.
pub trait ProfileStore: Send + Sync {
    fn life_profile(&self, product_id: &str) -> Result<Option<LifeInsuranceProfile>, StoreError>;

    fn property_profile(&self, product_id: &str) -> Result<Option<PropertyInsuranceProfile>, StoreError>;

    fn pension_profile(&self, product_id: &str) -> Result<Option<PensionProfile>, StoreError>;

    fn contribution_schedule(&self) -> Result<Option<TierSchedule>, StoreError>;
}

/// In-memory product catalog, keyed by product id within each product line
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    life: BTreeMap<String, LifeInsuranceProfile>,
    property: BTreeMap<String, PropertyInsuranceProfile>,
    pension: BTreeMap<String, PensionProfile>,
    schedule: Option<TierSchedule>,
}

/// Insert a profile unless its id is blank or already taken
fn register<T>(
    map: &mut BTreeMap<String, T>,
    line: ProductLine,
    product_id: &str,
    profile: T,
) -> Result<(), QuoteError> {
    if product_id.trim().is_empty() {
        return Err(QuoteError::invalid(format!("{} product id cannot be empty", line)));
    }
    if map.contains_key(product_id) {
        return Err(QuoteError::invalid(format!(
            "{} product {} is already registered",
            line, product_id
        )));
    }
    map.insert(product_id.to_string(), profile);
    Ok(())
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_life(&mut self, profile: LifeInsuranceProfile) -> Result<(), QuoteError> {
        let id = profile.product_id.clone();
        register(&mut self.life, ProductLine::LifeInsurance, &id, profile)
    }

    pub fn register_property(&mut self, profile: PropertyInsuranceProfile) -> Result<(), QuoteError> {
        let id = profile.product_id.clone();
        register(&mut self.property, ProductLine::PropertyInsurance, &id, profile)
    }

    pub fn register_pension(&mut self, profile: PensionProfile) -> Result<(), QuoteError> {
        let id = profile.product_id.clone();
        register(&mut self.pension, ProductLine::Pension, &id, profile)
    }

    /// Remove a life product, returning its profile if it was registered
    pub fn remove_life(&mut self, product_id: &str) -> Option<LifeInsuranceProfile> {
        self.life.remove(product_id)
    }

    pub fn remove_property(&mut self, product_id: &str) -> Option<PropertyInsuranceProfile> {
        self.property.remove(product_id)
    }

    pub fn remove_pension(&mut self, product_id: &str) -> Option<PensionProfile> {
        self.pension.remove(product_id)
    }

    /// Replace the state contribution schedule
    pub fn set_schedule(&mut self, schedule: TierSchedule) {
        self.schedule = Some(schedule);
    }

    /// Life products ordered by product id
    pub fn life_products(&self) -> Vec<&LifeInsuranceProfile> {
        self.life.values().collect()
    }

    pub fn property_products(&self) -> Vec<&PropertyInsuranceProfile> {
        self.property.values().collect()
    }

    pub fn pension_products(&self) -> Vec<&PensionProfile> {
        self.pension.values().collect()
    }

    pub fn schedule(&self) -> Option<&TierSchedule> {
        self.schedule.as_ref()
    }
}

impl ProfileStore for Catalog {
    fn life_profile(&self, product_id: &str) -> Result<Option<LifeInsuranceProfile>, StoreError> {
        Ok(self.life.get(product_id).cloned())
    }

    fn property_profile(&self, product_id: &str) -> Result<Option<PropertyInsuranceProfile>, StoreError> {
        Ok(self.property.get(product_id).cloned())
    }

    fn pension_profile(&self, product_id: &str) -> Result<Option<PensionProfile>, StoreError> {
        Ok(self.pension.get(product_id).cloned())
    }

    fn contribution_schedule(&self) -> Result<Option<TierSchedule>, StoreError> {
        Ok(self.schedule.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pension(id: &str) -> PensionProfile {
        PensionProfile {
            product_id: id.to_string(),
            name: format!("Scheme {}", id),
            dynamic_pct: 6.0,
            conservative_pct: 2.0,
            balanced_pct: 4.0,
        }
    }

    #[test]
    fn test_register_and_fetch() {
        let mut catalog = Catalog::new();
        catalog.register_pension(pension("PEN-B")).unwrap();
        catalog.register_pension(pension("PEN-A")).unwrap();

        let ids: Vec<&str> = catalog.pension_products().iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["PEN-A", "PEN-B"]);

        assert!(catalog.pension_profile("PEN-A").unwrap().is_some());
        assert!(catalog.pension_profile("PEN-C").unwrap().is_none());
        assert!(catalog.life_profile("PEN-A").unwrap().is_none());
    }

    #[test]
    fn test_register_rejects_duplicates_and_blank_ids() {
        let mut catalog = Catalog::new();
        catalog.register_pension(pension("PEN-A")).unwrap();

        assert!(matches!(
            catalog.register_pension(pension("PEN-A")),
            Err(QuoteError::InvalidInput(_))
        ));
        assert!(matches!(
            catalog.register_pension(pension("  ")),
            Err(QuoteError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_remove_frees_product_id() {
        let mut catalog = Catalog::new();
        catalog.register_pension(pension("PEN-A")).unwrap();
        catalog.register_pension(pension("PEN-B")).unwrap();

        let removed = catalog.remove_pension("PEN-A").unwrap();
        assert_eq!(removed.product_id, "PEN-A");
        assert!(catalog.pension_profile("PEN-A").unwrap().is_none());
        assert_eq!(catalog.pension_products().len(), 1);

        assert!(catalog.remove_pension("PEN-A").is_none());
        assert!(catalog.remove_life("PEN-B").is_none());
        assert!(catalog.remove_property("PEN-B").is_none());

        // The id can be registered again once removed
        catalog.register_pension(pension("PEN-A")).unwrap();
        assert_eq!(catalog.pension_products().len(), 2);
    }

    #[test]
    fn test_schedule_absent_until_set() {
        let mut catalog = Catalog::new();
        assert!(catalog.contribution_schedule().unwrap().is_none());

        catalog.set_schedule(TierSchedule::from_pairs(&[(0, 0), (100, 20)]));
        assert_eq!(catalog.contribution_schedule().unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_product_line_display() {
        assert_eq!(ProductLine::LifeInsurance.to_string(), "life insurance");
        assert_eq!(ProductLine::PropertyInsurance.to_string(), "property insurance");
        assert_eq!(ProductLine::Pension.to_string(), "pension");
    }
}
