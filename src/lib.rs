//! Premium Engine - Insurance premium quoting and pension savings projection
//!
//! This library provides:
//! - Life insurance pricing per benefit, with smoker and sport surcharges
//! - Property insurance pricing per square meter and coverage component
//! - Pension savings projection with tiered state contributions
//! - A product catalog loaded from CSV coefficient tables
//! - Quote notifications through a pluggable notifier

pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod products;
pub mod quote;
pub mod tiers;

// Re-export commonly used types
pub use config::{EngineConfig, NotificationConfig};
pub use engine::{QuoteEngine, QuoteOutcome, QuoteRequest, QuoteResponse, Quoted, ResponseStatus};
pub use error::{Missing, NotifyError, QuoteError, StoreError};
pub use notify::{LogNotifier, Notification, NotificationStatus, Notifier, OutboxNotifier};
pub use products::{
    Catalog, CsvStore, LifeInsuranceProfile, PensionProfile, PensionStrategy, ProductLine, ProfileStore,
    PropertyInsuranceProfile, PropertyType,
};
pub use quote::{
    LifeQuote, LifeQuoteRequest, PensionProjection, PensionRequest, PropertyQuote, PropertyQuoteRequest,
};
pub use tiers::{Tier, TierSchedule};
