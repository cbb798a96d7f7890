//! Life insurance coefficient profile

use serde::{Deserialize, Serialize};

use crate::quote::BenefitKind;

/// Per-product multipliers for the six life insurance benefits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeInsuranceProfile {
    /// Public product identifier (distinct from any storage key)
    pub product_id: String,
    pub name: String,

    // Benefit coefficients
    pub death: f64,
    pub injuries: f64,
    pub diseases: f64,
    pub work_incapacity: f64,
    pub hospitalization: f64,
    pub invalidity: f64,

    /// Smoker surcharge in percent of the benefit base
    pub smoker_pct: f64,
    /// Sport adjustment in percent of the benefit base (usually negative)
    pub sport_pct: f64,
}

impl LifeInsuranceProfile {
    /// Coefficient applied to the normalized amount of a benefit
    pub fn coefficient(&self, kind: BenefitKind) -> f64 {
        match kind {
            BenefitKind::Death => self.death,
            BenefitKind::Injuries => self.injuries,
            BenefitKind::Diseases => self.diseases,
            BenefitKind::WorkIncapacity => self.work_incapacity,
            BenefitKind::Hospitalization => self.hospitalization,
            BenefitKind::Invalidity => self.invalidity,
        }
    }
}
