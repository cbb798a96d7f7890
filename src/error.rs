//! Error types for quoting, product stores and notification delivery

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::products::ProductLine;

/// What was missing when a quote reported `NotFound`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Missing {
    /// No coefficient profile registered under this product id
    Product { line: ProductLine, product_id: String },
    /// The state contribution schedule could not be read
    ContributionSchedule,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Product { line, product_id } => {
                write!(f, "could not find the {} product by id {}", line, product_id)
            }
            Missing::ContributionSchedule => {
                write!(f, "could not retrieve the state contribution values")
            }
        }
    }
}

/// Outcome of a quote that did not produce a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// Requested product, profile or schedule is absent
    #[error("not found: {0}")]
    NotFound(Missing),

    /// Caller-supplied values a calculator cannot process
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected fault while reading external data or computing
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuoteError {
    pub fn invalid(message: impl Into<String>) -> Self {
        QuoteError::InvalidInput(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        QuoteError::Internal(message.into())
    }
}

impl From<StoreError> for QuoteError {
    fn from(err: StoreError) -> Self {
        QuoteError::Internal(format!("product store failure: {}", err))
    }
}

/// Failure reading coefficient profiles or the contribution schedule
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Row parsed but holds a value the catalog cannot accept
    #[error("invalid record in {file}: {message}")]
    Parse { file: String, message: String },
}

/// Failure delivering a notification
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport refused the message
    #[error("message rejected: {0}")]
    Rejected(String),
}
