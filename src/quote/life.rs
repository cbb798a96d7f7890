//! Life insurance premium calculation
//!
//! Each benefit is priced from the same base routine:
//!
//! 1. One-time payout benefits are priced per 1000 of coverage (integer
//!    division), recurring benefits per unit
//! 2. `base = normalized amount * benefit coefficient`
//! 3. Smoker and sport surcharges are percentages of that same base and are
//!    added, never compounded
//! 4. The yearly premium is truncated toward zero and then multiplied by the
//!    benefit's integer step multiplier (invalidity level, hospitalization length)
//! 5. Monthly premium is `yearly / 12`, truncated

use serde::{Deserialize, Serialize};

use super::{check_contact, check_product_id, ensure_finite};
use crate::error::QuoteError;
use crate::products::LifeInsuranceProfile;

/// Coverage unit for one-time payout benefits
pub const PAYOUT_UNIT: i64 = 1000;

/// Hospitalization length covered by each multiplier step
const HOSPITALIZATION_STEP: i64 = 1000;

/// The six life insurance benefits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitKind {
    Death,
    Injuries,
    Diseases,
    WorkIncapacity,
    Hospitalization,
    Invalidity,
}

impl BenefitKind {
    pub const ALL: [BenefitKind; 6] = [
        BenefitKind::Death,
        BenefitKind::Injuries,
        BenefitKind::Diseases,
        BenefitKind::WorkIncapacity,
        BenefitKind::Hospitalization,
        BenefitKind::Invalidity,
    ];

    /// One-time payouts are priced per `PAYOUT_UNIT`; recurring benefits per unit
    pub fn is_one_time_payout(&self) -> bool {
        match self {
            BenefitKind::Death
            | BenefitKind::Injuries
            | BenefitKind::Diseases
            | BenefitKind::Invalidity => true,
            BenefitKind::WorkIncapacity | BenefitKind::Hospitalization => false,
        }
    }

    /// Integer step multiplier applied to the truncated yearly premium,
    /// `None` when it does not fit in an `i64`
    pub fn post_multiplier(&self, request: &LifeQuoteRequest) -> Option<i64> {
        match self {
            // Levels 0-4 -> 1, 5-9 -> 2, ...
            BenefitKind::Invalidity => request.invalidity_level.checked_mul(2).and_then(|l| (l / 10).checked_add(1)),
            BenefitKind::Hospitalization => (request.hospitalization_length / HOSPITALIZATION_STEP).checked_add(1),
            _ => Some(1),
        }
    }
}

/// Life insurance quote request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeQuoteRequest {
    pub product_id: String,
    /// Address to send the quote to
    #[serde(default)]
    pub email: Option<String>,

    // Requested coverage per benefit; absent means no coverage
    #[serde(default)]
    pub death_insurance: i64,
    #[serde(default)]
    pub injuries_insurance: i64,
    #[serde(default)]
    pub diseases_insurance: i64,
    #[serde(default)]
    pub work_incapacity_insurance: i64,
    #[serde(default)]
    pub hospitalization_insurance: i64,
    #[serde(default)]
    pub invalidity_insurance: i64,

    #[serde(default)]
    pub hospitalization_length: i64,
    /// Ordinal invalidity severity
    #[serde(default)]
    pub invalidity_level: i64,

    #[serde(default)]
    pub is_smoker: bool,
    #[serde(default)]
    pub does_sport: bool,
}

impl LifeQuoteRequest {
    /// Requested coverage for a benefit
    pub fn amount(&self, kind: BenefitKind) -> i64 {
        match kind {
            BenefitKind::Death => self.death_insurance,
            BenefitKind::Injuries => self.injuries_insurance,
            BenefitKind::Diseases => self.diseases_insurance,
            BenefitKind::WorkIncapacity => self.work_incapacity_insurance,
            BenefitKind::Hospitalization => self.hospitalization_insurance,
            BenefitKind::Invalidity => self.invalidity_insurance,
        }
    }

    pub fn validate(&self) -> Result<(), QuoteError> {
        check_product_id(&self.product_id)?;
        check_contact(&self.email)?;

        for kind in BenefitKind::ALL {
            if self.amount(kind) < 0 {
                return Err(QuoteError::invalid(format!("{:?} coverage cannot be negative", kind)));
            }
        }
        if self.invalidity_level < 0 {
            return Err(QuoteError::invalid("invalidity level cannot be negative"));
        }
        if self.hospitalization_length < 0 {
            return Err(QuoteError::invalid("hospitalization length cannot be negative"));
        }
        if self.hospitalization_insurance > 0 && self.hospitalization_length < 1 {
            return Err(QuoteError::invalid(
                "hospitalization coverage requires a hospitalization length of at least 1",
            ));
        }
        Ok(())
    }
}

/// Yearly and monthly premium of one benefit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitPrice {
    pub yearly: i64,
    pub monthly: i64,
}

/// Premium per benefit plus the total, for one period (year or month)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePrice {
    pub death: i64,
    pub injuries: i64,
    pub diseases: i64,
    pub work_incapacity: i64,
    pub hospitalization: i64,
    pub invalidity: i64,
    pub total: i64,
}

impl InsurancePrice {
    pub fn get(&self, kind: BenefitKind) -> i64 {
        match kind {
            BenefitKind::Death => self.death,
            BenefitKind::Injuries => self.injuries,
            BenefitKind::Diseases => self.diseases,
            BenefitKind::WorkIncapacity => self.work_incapacity,
            BenefitKind::Hospitalization => self.hospitalization,
            BenefitKind::Invalidity => self.invalidity,
        }
    }

    fn slot(&mut self, kind: BenefitKind) -> &mut i64 {
        match kind {
            BenefitKind::Death => &mut self.death,
            BenefitKind::Injuries => &mut self.injuries,
            BenefitKind::Diseases => &mut self.diseases,
            BenefitKind::WorkIncapacity => &mut self.work_incapacity,
            BenefitKind::Hospitalization => &mut self.hospitalization,
            BenefitKind::Invalidity => &mut self.invalidity,
        }
    }
}

/// Result of a life insurance quote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeQuote {
    pub yearly: InsurancePrice,
    pub monthly: InsurancePrice,
}

/// Yearly premium before truncation, including additive surcharges
fn surcharged_base(
    kind: BenefitKind,
    profile: &LifeInsuranceProfile,
    request: &LifeQuoteRequest,
) -> f64 {
    let amount = request.amount(kind);
    let normalized = if kind.is_one_time_payout() {
        amount / PAYOUT_UNIT
    } else {
        amount
    };

    let base = normalized as f64 * profile.coefficient(kind);

    let mut surcharge = 0.0;
    if request.is_smoker {
        surcharge += base * (profile.smoker_pct / 100.0);
    }
    if request.does_sport {
        surcharge += base * (profile.sport_pct / 100.0);
    }

    base + surcharge
}

/// Price a single benefit
pub fn price_benefit(
    kind: BenefitKind,
    profile: &LifeInsuranceProfile,
    request: &LifeQuoteRequest,
) -> Result<BenefitPrice, QuoteError> {
    let base = ensure_finite(&format!("{:?} premium", kind), surcharged_base(kind, profile, request))?;

    // Truncate toward zero, not round
    let truncated = base.trunc();
    if truncated.abs() >= i64::MAX as f64 {
        return Err(QuoteError::internal(format!("{:?} premium {} out of range", kind, base)));
    }

    let yearly = if truncated == 0.0 {
        0
    } else {
        kind.post_multiplier(request)
            .and_then(|m| (truncated as i64).checked_mul(m))
            .ok_or_else(|| QuoteError::internal(format!("{:?} premium overflowed", kind)))?
    };

    Ok(BenefitPrice {
        yearly,
        monthly: yearly / 12,
    })
}

/// Price all six benefits and their totals
pub fn quote_life(profile: &LifeInsuranceProfile, request: &LifeQuoteRequest) -> Result<LifeQuote, QuoteError> {
    let mut quote = LifeQuote::default();

    for kind in BenefitKind::ALL {
        let price = price_benefit(kind, profile, request)?;
        log::debug!("{:?}: yearly={} monthly={}", kind, price.yearly, price.monthly);

        *quote.yearly.slot(kind) = price.yearly;
        *quote.monthly.slot(kind) = price.monthly;
        quote.yearly.total = quote
            .yearly
            .total
            .checked_add(price.yearly)
            .ok_or_else(|| QuoteError::internal("yearly total overflowed"))?;
        quote.monthly.total = quote
            .monthly
            .total
            .checked_add(price.monthly)
            .ok_or_else(|| QuoteError::internal("monthly total overflowed"))?;
    }

    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> LifeInsuranceProfile {
        LifeInsuranceProfile {
            product_id: "LIFE-T".to_string(),
            name: "Test life".to_string(),
            death: 5.0,
            injuries: 2.0,
            diseases: 3.0,
            work_incapacity: 0.5,
            hospitalization: 0.25,
            invalidity: 4.0,
            smoker_pct: 10.0,
            sport_pct: -5.0,
        }
    }

    fn request() -> LifeQuoteRequest {
        LifeQuoteRequest {
            product_id: "LIFE-T".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_smoker_death_scenario() {
        let req = LifeQuoteRequest {
            death_insurance: 100_000,
            is_smoker: true,
            ..request()
        };

        let price = price_benefit(BenefitKind::Death, &profile(), &req).unwrap();
        // (100000 / 1000) * 5.0 = 500, +10% = 550
        assert_eq!(price.yearly, 550);
        assert_eq!(price.monthly, 45);

        let quote = quote_life(&profile(), &req).unwrap();
        assert_eq!(quote.yearly.death, 550);
        assert_eq!(quote.yearly.total, 550);
        assert_eq!(quote.monthly.total, 45);
    }

    #[test]
    fn test_surcharges_are_additive() {
        let req = LifeQuoteRequest {
            death_insurance: 200_000,
            is_smoker: true,
            does_sport: true,
            ..request()
        };

        // base 1000; +100 smoker, -50 sport, both from the same base
        let price = price_benefit(BenefitKind::Death, &profile(), &req).unwrap();
        assert_eq!(price.yearly, 1050);
    }

    #[test]
    fn test_one_time_payout_uses_integer_units() {
        let req = LifeQuoteRequest {
            injuries_insurance: 1_999,
            ..request()
        };

        // 1999 / 1000 = 1 unit
        let price = price_benefit(BenefitKind::Injuries, &profile(), &req).unwrap();
        assert_eq!(price.yearly, 2);
        assert_eq!(price.monthly, 0);
    }

    #[test]
    fn test_recurring_benefit_uses_raw_amount() {
        let req = LifeQuoteRequest {
            work_incapacity_insurance: 1_001,
            ..request()
        };

        // 1001 * 0.5 = 500.5 -> 500
        let price = price_benefit(BenefitKind::WorkIncapacity, &profile(), &req).unwrap();
        assert_eq!(price.yearly, 500);
        assert_eq!(price.monthly, 41);
    }

    #[test]
    fn test_yearly_premium_truncates() {
        let mut p = profile();
        p.diseases = 3.99;
        let req = LifeQuoteRequest {
            diseases_insurance: 1_000,
            ..request()
        };

        let price = price_benefit(BenefitKind::Diseases, &p, &req).unwrap();
        assert_eq!(price.yearly, 3);
    }

    #[test]
    fn test_invalidity_step_multiplier() {
        let base_req = LifeQuoteRequest {
            invalidity_insurance: 100_000,
            ..request()
        };

        for (level, expected) in [(0, 400), (3, 400), (4, 400), (5, 800), (9, 800), (10, 1200)] {
            let req = LifeQuoteRequest {
                invalidity_level: level,
                ..base_req.clone()
            };
            let price = price_benefit(BenefitKind::Invalidity, &profile(), &req).unwrap();
            assert_eq!(price.yearly, expected, "level {}", level);
        }
    }

    #[test]
    fn test_hospitalization_length_multiplier() {
        let base_req = LifeQuoteRequest {
            hospitalization_insurance: 1_000,
            ..request()
        };

        // base 1000 * 0.25 = 250
        for (length, expected) in [(1, 250), (999, 250), (1_000, 500), (2_500, 750)] {
            let req = LifeQuoteRequest {
                hospitalization_length: length,
                ..base_req.clone()
            };
            let price = price_benefit(BenefitKind::Hospitalization, &profile(), &req).unwrap();
            assert_eq!(price.yearly, expected, "length {}", length);
        }
    }

    #[test]
    fn test_multiplier_applies_after_truncation() {
        let mut p = profile();
        p.invalidity = 2.75;
        let req = LifeQuoteRequest {
            invalidity_insurance: 1_000,
            invalidity_level: 5,
            ..request()
        };

        // trunc(2.75) * 2 = 4
        let price = price_benefit(BenefitKind::Invalidity, &p, &req).unwrap();
        assert_eq!(price.yearly, 4);
    }

    #[test]
    fn test_totals_and_truncation_bound() {
        let req = LifeQuoteRequest {
            death_insurance: 1_234_567,
            injuries_insurance: 87_000,
            diseases_insurance: 450_000,
            work_incapacity_insurance: 15_333,
            hospitalization_insurance: 777,
            hospitalization_length: 1_500,
            invalidity_insurance: 310_000,
            invalidity_level: 7,
            is_smoker: true,
            does_sport: true,
            ..request()
        };

        let quote = quote_life(&profile(), &req).unwrap();

        let yearly_sum: i64 = BenefitKind::ALL.iter().map(|&k| quote.yearly.get(k)).sum();
        let monthly_sum: i64 = BenefitKind::ALL.iter().map(|&k| quote.monthly.get(k)).sum();
        assert_eq!(quote.yearly.total, yearly_sum);
        assert_eq!(quote.monthly.total, monthly_sum);

        for kind in BenefitKind::ALL {
            let y = quote.yearly.get(kind);
            let m = quote.monthly.get(kind);
            assert!(y - 11 <= m * 12 && m * 12 <= y, "{:?}: yearly {} monthly {}", kind, y, m);
        }
    }

    #[test]
    fn test_no_coverage_prices_zero() {
        let quote = quote_life(&profile(), &request()).unwrap();
        assert_eq!(quote, LifeQuote::default());
    }

    #[test]
    fn test_deterministic() {
        let req = LifeQuoteRequest {
            death_insurance: 500_000,
            diseases_insurance: 120_000,
            is_smoker: true,
            ..request()
        };
        assert_eq!(quote_life(&profile(), &req).unwrap(), quote_life(&profile(), &req).unwrap());
    }

    #[test]
    fn test_nan_coefficient_is_internal_error() {
        let mut p = profile();
        p.death = f64::NAN;
        let req = LifeQuoteRequest {
            death_insurance: 10_000,
            ..request()
        };
        assert!(matches!(quote_life(&p, &req), Err(QuoteError::Internal(_))));
    }

    #[test]
    fn test_validate() {
        assert!(request().validate().is_ok());

        let req = LifeQuoteRequest {
            hospitalization_insurance: 500,
            hospitalization_length: 0,
            ..request()
        };
        assert!(matches!(req.validate(), Err(QuoteError::InvalidInput(_))));

        let req = LifeQuoteRequest {
            death_insurance: -1,
            ..request()
        };
        assert!(matches!(req.validate(), Err(QuoteError::InvalidInput(_))));

        let req = LifeQuoteRequest {
            product_id: String::new(),
            ..request()
        };
        assert!(matches!(req.validate(), Err(QuoteError::InvalidInput(_))));
    }

    #[test]
    fn test_huge_invalidity_level_is_internal_error() {
        let req = LifeQuoteRequest {
            invalidity_insurance: 1000,
            invalidity_level: i64::MAX / 2 + 1,
            ..request()
        };
        assert!(req.validate().is_ok());
        assert!(matches!(quote_life(&profile(), &req), Err(QuoteError::Internal(_))));

        // Without invalidity coverage the multiplier is never needed
        let req = LifeQuoteRequest {
            death_insurance: 100_000,
            invalidity_level: i64::MAX,
            ..request()
        };
        assert_eq!(quote_life(&profile(), &req).unwrap().yearly.total, 500);
    }

    #[test]
    fn test_total_overflow_is_internal_error() {
        let mut p = profile();
        p.death = 600.0;
        p.injuries = 600.0;
        let req = LifeQuoteRequest {
            death_insurance: i64::MAX,
            injuries_insurance: i64::MAX,
            ..request()
        };
        assert!(req.validate().is_ok());
        assert!(matches!(quote_life(&p, &req), Err(QuoteError::Internal(_))));
    }
}
