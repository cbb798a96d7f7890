//! Pension scheme profile and investment strategies

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QuoteError;

/// Investment strategy of a pension scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PensionStrategy {
    Dynamic,
    Conservative,
    Balanced,
}

impl PensionStrategy {
    /// Literal strategy names as offered to customers
    pub const DYNAMIC: &'static str = "Dynamická";
    pub const CONSERVATIVE: &'static str = "Konzervativní";
    pub const BALANCED: &'static str = "Vyvážená";

    /// Parse a strategy selector, ignoring case.
    ///
    /// Accepts the three customer-facing names plus their English equivalents.
    pub fn parse(selector: &str) -> Result<Self, QuoteError> {
        let normalized = selector.trim().to_lowercase();

        if normalized == Self::DYNAMIC.to_lowercase() || normalized == "dynamic" {
            Ok(PensionStrategy::Dynamic)
        } else if normalized == Self::CONSERVATIVE.to_lowercase() || normalized == "conservative" {
            Ok(PensionStrategy::Conservative)
        } else if normalized == Self::BALANCED.to_lowercase() || normalized == "balanced" {
            Ok(PensionStrategy::Balanced)
        } else {
            Err(QuoteError::invalid(format!("unknown pension strategy: {:?}", selector)))
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PensionStrategy::Dynamic => Self::DYNAMIC,
            PensionStrategy::Conservative => Self::CONSERVATIVE,
            PensionStrategy::Balanced => Self::BALANCED,
        }
    }
}

impl fmt::Display for PensionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Growth percentages of a pension scheme, one per strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionProfile {
    pub product_id: String,
    pub name: String,
    /// Annual growth in percent
    pub dynamic_pct: f64,
    pub conservative_pct: f64,
    pub balanced_pct: f64,
}

impl PensionProfile {
    /// Annual growth percentage for a strategy
    pub fn rate_for(&self, strategy: PensionStrategy) -> f64 {
        match strategy {
            PensionStrategy::Dynamic => self.dynamic_pct,
            PensionStrategy::Conservative => self.conservative_pct,
            PensionStrategy::Balanced => self.balanced_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_case_insensitive() {
        assert_eq!(PensionStrategy::parse("Dynamická").unwrap(), PensionStrategy::Dynamic);
        assert_eq!(PensionStrategy::parse("DYNAMICKÁ").unwrap(), PensionStrategy::Dynamic);
        assert_eq!(PensionStrategy::parse("konzervativní").unwrap(), PensionStrategy::Conservative);
        assert_eq!(PensionStrategy::parse(" Vyvážená ").unwrap(), PensionStrategy::Balanced);
        assert_eq!(PensionStrategy::parse("Balanced").unwrap(), PensionStrategy::Balanced);
    }

    #[test]
    fn test_parse_unknown_strategy() {
        match PensionStrategy::parse("aggressive") {
            Err(QuoteError::InvalidInput(msg)) => assert!(msg.contains("aggressive")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rate_for() {
        let profile = PensionProfile {
            product_id: "PEN-1".to_string(),
            name: "State pension".to_string(),
            dynamic_pct: 7.0,
            conservative_pct: 2.0,
            balanced_pct: 4.5,
        };

        assert_eq!(profile.rate_for(PensionStrategy::Dynamic), 7.0);
        assert_eq!(profile.rate_for(PensionStrategy::Conservative), 2.0);
        assert_eq!(profile.rate_for(PensionStrategy::Balanced), 4.5);
    }
}
