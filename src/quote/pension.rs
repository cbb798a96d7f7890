//! Pension savings projection
//!
//! Simulates yearly compounding until retirement: each year the combined
//! monthly contributions (user + employer + state) are added twelve times,
//! then the balance grows by the strategy's annual percentage.

use serde::{Deserialize, Serialize};

use super::{check_contact, check_product_id, ensure_finite};
use crate::error::QuoteError;
use crate::products::{PensionProfile, PensionStrategy};
use crate::tiers::TierSchedule;

/// Age at which contributions stop
pub const RETIREMENT_AGE: i32 = 65;

/// Pension projection request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PensionRequest {
    pub product_id: String,
    #[serde(default)]
    pub email: Option<String>,

    pub current_age: i32,
    #[serde(default)]
    pub current_savings: f64,
    /// Monthly contributions
    #[serde(default)]
    pub user_contribution: f64,
    #[serde(default)]
    pub employer_contribution: f64,

    /// Strategy name, matched case-insensitively
    pub strategy: String,
}

impl PensionRequest {
    /// Validate the request and resolve its strategy
    pub fn validate(&self) -> Result<PensionStrategy, QuoteError> {
        check_product_id(&self.product_id)?;
        check_contact(&self.email)?;

        if self.current_age < 0 {
            return Err(QuoteError::invalid(format!("age cannot be negative, got {}", self.current_age)));
        }
        let strategy = PensionStrategy::parse(&self.strategy)?;
        if self.user_contribution == 0.0 {
            return Err(QuoteError::invalid("user contribution cannot be 0"));
        }
        Ok(strategy)
    }

    /// Years of contributions left; never negative
    pub fn years_to_retirement(&self) -> u32 {
        RETIREMENT_AGE.saturating_sub(self.current_age).max(0) as u32
    }
}

/// One simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PensionYear {
    /// 1-indexed year of the projection
    pub year: u32,
    /// Age at the end of the year
    pub age: i32,
    pub contributions: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

/// Result of a pension projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionProjection {
    pub strategy: PensionStrategy,
    /// Annual growth in percent
    pub growth_rate_pct: f64,
    pub years_to_retirement: u32,

    /// Monthly state contribution matched to the user contribution
    pub state_contribution: i64,
    pub state_contribution_total: i64,

    /// Projected balance at retirement
    pub total_savings: f64,
    /// Growth above everything paid in
    pub valorization: f64,

    /// Year-by-year trajectory, filled only for detailed projections
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub yearly: Vec<PensionYear>,
}

/// Project savings at retirement
pub fn project_pension(
    profile: &PensionProfile,
    schedule: &TierSchedule,
    request: &PensionRequest,
    strategy: PensionStrategy,
    detailed: bool,
) -> Result<PensionProjection, QuoteError> {
    let years = request.years_to_retirement();
    let state_contribution = schedule.resolve(request.user_contribution);
    let growth_rate_pct = profile.rate_for(strategy);

    let monthly_contribution =
        request.user_contribution + request.employer_contribution + state_contribution as f64;
    let yearly_contribution = 12.0 * monthly_contribution;
    let growth = 1.0 + growth_rate_pct / 100.0;

    log::debug!(
        "Projecting {} years: state contribution {}, {} at {}%",
        years,
        state_contribution,
        strategy,
        growth_rate_pct
    );

    let mut balance = request.current_savings;
    let mut trajectory = Vec::with_capacity(if detailed { years as usize } else { 0 });

    for year in 1..=years {
        balance += yearly_contribution;
        let before_interest = balance;
        balance *= growth;

        if detailed {
            trajectory.push(PensionYear {
                year,
                age: request.current_age.saturating_add(year as i32),
                contributions: yearly_contribution,
                interest: balance - before_interest,
                closing_balance: balance,
            });
        }
    }

    let total_savings = ensure_finite("projected savings", balance)?;
    let principal = request.current_savings + years as f64 * 12.0 * monthly_contribution;
    let valorization = ensure_finite("valorization", total_savings - principal)?;

    let state_contribution_total = state_contribution
        .checked_mul(12 * years as i64)
        .ok_or_else(|| QuoteError::internal("state contribution total overflowed"))?;

    Ok(PensionProjection {
        strategy,
        growth_rate_pct,
        years_to_retirement: years,
        state_contribution,
        state_contribution_total,
        total_savings,
        valorization,
        yearly: trajectory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn profile() -> PensionProfile {
        PensionProfile {
            product_id: "PEN-T".to_string(),
            name: "Test scheme".to_string(),
            dynamic_pct: 5.0,
            conservative_pct: 1.0,
            balanced_pct: 3.0,
        }
    }

    fn schedule() -> TierSchedule {
        TierSchedule::from_pairs(&[(0, 0), (100, 20)])
    }

    fn request(age: i32) -> PensionRequest {
        PensionRequest {
            product_id: "PEN-T".to_string(),
            email: None,
            current_age: age,
            current_savings: 0.0,
            user_contribution: 100.0,
            employer_contribution: 50.0,
            strategy: "Dynamická".to_string(),
        }
    }

    #[test]
    fn test_twenty_year_projection() {
        let result = project_pension(&profile(), &schedule(), &request(45), PensionStrategy::Dynamic, false).unwrap();

        assert_eq!(result.years_to_retirement, 20);
        assert_eq!(result.state_contribution, 20);
        assert_eq!(result.state_contribution_total, 4800);

        // Annuity-due future value: 2040 * sum(1.05^k, k = 1..=20)
        let expected = 2040.0 * 1.05 * (1.05_f64.powi(20) - 1.0) / 0.05;
        assert_relative_eq!(result.total_savings, expected, max_relative = 1e-9);
        assert_relative_eq!(result.valorization, expected - 20.0 * 2040.0, max_relative = 1e-9);
        assert!(result.yearly.is_empty());
    }

    #[test]
    fn test_retired_projection_is_flat() {
        for age in [65, 66, 80] {
            let mut req = request(age);
            req.current_savings = 123_456.78;

            let result = project_pension(&profile(), &schedule(), &req, PensionStrategy::Dynamic, true).unwrap();
            assert_eq!(result.years_to_retirement, 0);
            assert_eq!(result.total_savings, 123_456.78);
            assert_eq!(result.valorization, 0.0);
            assert_eq!(result.state_contribution_total, 0);
            assert!(result.yearly.is_empty());
        }
    }

    #[test]
    fn test_existing_savings_compound() {
        let mut req = request(63);
        req.current_savings = 10_000.0;

        let result = project_pension(&profile(), &schedule(), &req, PensionStrategy::Conservative, false).unwrap();
        let expected = ((10_000.0 + 2040.0) * 1.01 + 2040.0) * 1.01;
        assert_relative_eq!(result.total_savings, expected, max_relative = 1e-12);
        assert_relative_eq!(result.valorization, expected - (10_000.0 + 2.0 * 2040.0), max_relative = 1e-9);
    }

    #[test]
    fn test_strategy_selects_rate() {
        let req = request(55);
        let dynamic = project_pension(&profile(), &schedule(), &req, PensionStrategy::Dynamic, false).unwrap();
        let balanced = project_pension(&profile(), &schedule(), &req, PensionStrategy::Balanced, false).unwrap();
        let conservative = project_pension(&profile(), &schedule(), &req, PensionStrategy::Conservative, false).unwrap();

        assert_eq!(balanced.growth_rate_pct, 3.0);
        assert!(dynamic.total_savings > balanced.total_savings);
        assert!(balanced.total_savings > conservative.total_savings);
    }

    #[test]
    fn test_detailed_trajectory() {
        let result = project_pension(&profile(), &schedule(), &request(60), PensionStrategy::Dynamic, true).unwrap();

        assert_eq!(result.yearly.len(), 5);
        assert_eq!(result.yearly[0].year, 1);
        assert_eq!(result.yearly[0].age, 61);
        assert_eq!(result.yearly[4].age, 65);
        assert_eq!(result.yearly[4].closing_balance, result.total_savings);

        let interest: f64 = result.yearly.iter().map(|y| y.interest).sum();
        assert_relative_eq!(interest, result.valorization, max_relative = 1e-9);
    }

    #[test]
    fn test_contribution_below_first_tier() {
        let mut req = request(45);
        req.user_contribution = 99.5;

        let result = project_pension(&profile(), &schedule(), &req, PensionStrategy::Dynamic, false).unwrap();
        assert_eq!(result.state_contribution, 0);
        assert_eq!(result.state_contribution_total, 0);
    }

    #[test]
    fn test_deterministic() {
        let req = request(30);
        let a = project_pension(&profile(), &schedule(), &req, PensionStrategy::Balanced, true).unwrap();
        let b = project_pension(&profile(), &schedule(), &req, PensionStrategy::Balanced, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate() {
        assert_eq!(request(40).validate().unwrap(), PensionStrategy::Dynamic);

        let mut req = request(40);
        req.strategy = "yolo".to_string();
        assert!(matches!(req.validate(), Err(QuoteError::InvalidInput(_))));

        let mut req = request(40);
        req.user_contribution = 0.0;
        assert!(matches!(req.validate(), Err(QuoteError::InvalidInput(_))));
    }

    #[test]
    fn test_extreme_ages() {
        let mut req = request(0);
        req.current_age = i32::MIN;
        assert!(matches!(req.validate(), Err(QuoteError::InvalidInput(_))));
        assert_eq!(req.years_to_retirement(), i32::MAX as u32);

        req.current_age = i32::MAX;
        assert_eq!(req.years_to_retirement(), 0);

        assert_eq!(request(0).years_to_retirement(), 65);
        assert!(request(0).validate().is_ok());
    }
}
