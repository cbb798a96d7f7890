//! Premium and projection calculators for the three product lines
//!
//! Every calculator is a pure function of a coefficient profile and a request.
//! Request validation lives here too, so the engine can reject input before any
//! store access.

mod life;
mod property;
mod pension;

pub use life::{quote_life, BenefitKind, BenefitPrice, InsurancePrice, LifeQuote, LifeQuoteRequest, PAYOUT_UNIT};
pub use property::{quote_property, PropertyBreakdown, PropertyQuote, PropertyQuoteRequest};
pub use pension::{project_pension, PensionProjection, PensionRequest, PensionYear, RETIREMENT_AGE};

use crate::error::QuoteError;

/// Reject blank product identifiers
pub(crate) fn check_product_id(product_id: &str) -> Result<(), QuoteError> {
    if product_id.trim().is_empty() {
        return Err(QuoteError::invalid("product id cannot be empty"));
    }
    Ok(())
}

/// Contact address to notify, if one was supplied. Blank counts as absent.
pub(crate) fn contact_address(email: &Option<String>) -> Option<&str> {
    email.as_deref().map(str::trim).filter(|e| !e.is_empty())
}

pub(crate) fn check_contact(email: &Option<String>) -> Result<(), QuoteError> {
    match contact_address(email) {
        Some(address) if !address.contains('@') => Err(QuoteError::invalid(format!(
            "contact address {:?} is not an email address",
            address
        ))),
        _ => Ok(()),
    }
}

/// Fail with an internal error when a computed amount is NaN or infinite
pub(crate) fn ensure_finite(label: &str, value: f64) -> Result<f64, QuoteError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(QuoteError::internal(format!("{} evaluated to {}", label, value)))
    }
}
