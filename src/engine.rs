//! Quote engine: fetch the coefficient profile, run the calculator, notify
//!
//! The engine holds no mutable state of its own, so one instance can serve
//! concurrent requests (see `quote_batch`).

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Missing, QuoteError};
use crate::notify::{self, LogNotifier, MessageContent, Notification, NotificationStatus, Notifier, OutboxNotifier};
use crate::products::{self, Catalog, ProductLine, ProfileStore};
use crate::quote::{
    self, contact_address, LifeQuote, LifeQuoteRequest, PensionProjection, PensionRequest, PropertyQuote,
    PropertyQuoteRequest,
};

/// A computed result together with the product it was priced for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quoted<T> {
    pub product_id: String,
    pub product_name: String,
    pub result: T,
    pub notification: NotificationStatus,
}

/// Any quote request, tagged by product line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "product_line", rename_all = "snake_case")]
pub enum QuoteRequest {
    LifeInsurance(LifeQuoteRequest),
    PropertyInsurance(PropertyQuoteRequest),
    Pension(PensionRequest),
}

impl QuoteRequest {
    pub fn product_line(&self) -> ProductLine {
        match self {
            QuoteRequest::LifeInsurance(_) => ProductLine::LifeInsurance,
            QuoteRequest::PropertyInsurance(_) => ProductLine::PropertyInsurance,
            QuoteRequest::Pension(_) => ProductLine::Pension,
        }
    }
}

/// Result of a tagged quote request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "product_line", rename_all = "snake_case")]
pub enum QuoteOutcome {
    LifeInsurance(Quoted<LifeQuote>),
    PropertyInsurance(Quoted<PropertyQuote>),
    Pension(Quoted<PensionProjection>),
}

impl QuoteOutcome {
    pub fn notification(&self) -> &NotificationStatus {
        match self {
            QuoteOutcome::LifeInsurance(q) => &q.notification,
            QuoteOutcome::PropertyInsurance(q) => &q.notification,
            QuoteOutcome::Pension(q) => &q.notification,
        }
    }
}

/// Response status carried in the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    NotFound,
    InvalidInput,
    InternalError,
}

/// Serializable response envelope for callers across a process boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<QuoteOutcome>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Missing>,
}

impl QuoteResponse {
    pub fn from_result(result: Result<QuoteOutcome, QuoteError>) -> Self {
        match result {
            Ok(outcome) => Self {
                status: ResponseStatus::Ok,
                data: Some(outcome),
                message: String::new(),
                missing: None,
            },
            Err(err) => {
                let (status, missing) = match &err {
                    QuoteError::NotFound(missing) => (ResponseStatus::NotFound, Some(missing.clone())),
                    QuoteError::InvalidInput(_) => (ResponseStatus::InvalidInput, None),
                    QuoteError::Internal(_) => (ResponseStatus::InternalError, None),
                };
                Self {
                    status,
                    data: None,
                    message: err.to_string(),
                    missing,
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }
}

/// Log failed operations once, at the engine boundary
fn log_failure<T>(operation: &str, result: Result<T, QuoteError>) -> Result<T, QuoteError> {
    if let Err(err) = &result {
        match err {
            QuoteError::InvalidInput(_) => log::warn!("{} - {}", operation, err),
            _ => log::error!("{} - {}", operation, err),
        }
    }
    result
}

fn product_missing(line: ProductLine, product_id: &str) -> QuoteError {
    QuoteError::NotFound(Missing::Product {
        line,
        product_id: product_id.to_string(),
    })
}

/// Quote engine over a profile store and a notifier
pub struct QuoteEngine<S: ProfileStore> {
    store: S,
    notifier: Box<dyn Notifier>,
    config: EngineConfig,
}

impl QuoteEngine<Catalog> {
    /// Build an engine from configuration: load the catalog from `data_dir`
    /// and pick the outbox notifier when one is configured
    pub fn from_config(config: EngineConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let catalog = products::load_catalog(&config.data_dir)?;
        let notifier: Box<dyn Notifier> = match &config.notifications.outbox {
            Some(path) => Box::new(OutboxNotifier::open(path)?),
            None => Box::new(LogNotifier),
        };
        Ok(Self::new(catalog, notifier, config))
    }
}

impl<S: ProfileStore> QuoteEngine<S> {
    pub fn new(store: S, notifier: Box<dyn Notifier>, config: EngineConfig) -> Self {
        Self { store, notifier, config }
    }

    /// Engine with the default configuration, logging notifications only
    pub fn with_store(store: S) -> Self {
        Self::new(store, Box::new(LogNotifier), EngineConfig::default())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Price a life insurance request
    pub fn quote_life(&self, request: &LifeQuoteRequest) -> Result<Quoted<LifeQuote>, QuoteError> {
        log::info!("quote_life - Start, product {}", request.product_id);
        let result = log_failure("quote_life", self.try_quote_life(request));
        log::info!("quote_life - End");
        result
    }

    fn try_quote_life(&self, request: &LifeQuoteRequest) -> Result<Quoted<LifeQuote>, QuoteError> {
        request.validate()?;

        let profile = self
            .store
            .life_profile(&request.product_id)?
            .ok_or_else(|| product_missing(ProductLine::LifeInsurance, &request.product_id))?;

        let result = quote::quote_life(&profile, request)?;
        log::info!(
            "quote_life - {} priced at {} yearly, {} monthly",
            profile.product_id,
            result.yearly.total,
            result.monthly.total
        );

        let notification = self.notify(&request.email, || notify::life_message(&profile.name, &result));

        Ok(Quoted {
            product_id: profile.product_id,
            product_name: profile.name,
            result,
            notification,
        })
    }

    /// Price a property insurance request
    pub fn quote_property(&self, request: &PropertyQuoteRequest) -> Result<Quoted<PropertyQuote>, QuoteError> {
        log::info!("quote_property - Start, product {}", request.product_id);
        let result = log_failure("quote_property", self.try_quote_property(request));
        log::info!("quote_property - End");
        result
    }

    fn try_quote_property(&self, request: &PropertyQuoteRequest) -> Result<Quoted<PropertyQuote>, QuoteError> {
        request.validate()?;

        let profile = self
            .store
            .property_profile(&request.product_id)?
            .ok_or_else(|| product_missing(ProductLine::PropertyInsurance, &request.product_id))?;

        let result = quote::quote_property(&profile, request)?;
        log::info!(
            "quote_property - {} priced at {:.2} for {} m2",
            profile.product_id,
            result.total.total,
            request.square_meters
        );

        let notification = self.notify(&request.email, || notify::property_message(&profile.name, &result));

        Ok(Quoted {
            product_id: profile.product_id,
            product_name: profile.name,
            result,
            notification,
        })
    }

    /// Project a pension request
    pub fn quote_pension(&self, request: &PensionRequest) -> Result<Quoted<PensionProjection>, QuoteError> {
        log::info!("quote_pension - Start, product {}", request.product_id);
        let result = log_failure("quote_pension", self.try_quote_pension(request));
        log::info!("quote_pension - End");
        result
    }

    fn try_quote_pension(&self, request: &PensionRequest) -> Result<Quoted<PensionProjection>, QuoteError> {
        let strategy = request.validate()?;

        let profile = self
            .store
            .pension_profile(&request.product_id)?
            .ok_or_else(|| product_missing(ProductLine::Pension, &request.product_id))?;
        let schedule = self
            .store
            .contribution_schedule()?
            .ok_or(QuoteError::NotFound(Missing::ContributionSchedule))?;

        let result = quote::project_pension(&profile, &schedule, request, strategy, self.config.detailed_pension)?;
        log::info!(
            "quote_pension - {} projected {:.2} after {} years",
            profile.product_id,
            result.total_savings,
            result.years_to_retirement
        );

        let notification = self.notify(&request.email, || notify::pension_message(&profile.name, &result));

        Ok(Quoted {
            product_id: profile.product_id,
            product_name: profile.name,
            result,
            notification,
        })
    }

    /// Dispatch a tagged request
    pub fn quote(&self, request: &QuoteRequest) -> Result<QuoteOutcome, QuoteError> {
        match request {
            QuoteRequest::LifeInsurance(r) => self.quote_life(r).map(QuoteOutcome::LifeInsurance),
            QuoteRequest::PropertyInsurance(r) => self.quote_property(r).map(QuoteOutcome::PropertyInsurance),
            QuoteRequest::Pension(r) => self.quote_pension(r).map(QuoteOutcome::Pension),
        }
    }

    /// Dispatch a tagged request and wrap the outcome in a response envelope
    pub fn respond(&self, request: &QuoteRequest) -> QuoteResponse {
        QuoteResponse::from_result(self.quote(request))
    }

    /// Quote many requests in parallel; responses keep the input order
    pub fn quote_batch(&self, requests: &[QuoteRequest]) -> Vec<QuoteResponse> {
        requests.par_iter().map(|request| self.respond(request)).collect()
    }

    /// Send the quote to the request's contact address, if any.
    ///
    /// Runs after the result is computed; a delivery failure is reported in the
    /// returned status and logged, never propagated.
    fn notify<F>(&self, email: &Option<String>, content: F) -> NotificationStatus
    where
        F: FnOnce() -> MessageContent,
    {
        let to = match contact_address(email) {
            Some(to) => to.to_string(),
            None => {
                log::info!("Email address is missing, not sending an email");
                return NotificationStatus::Skipped;
            }
        };
        if !self.config.notifications.enabled {
            log::debug!("Notifications disabled, not sending to {}", to);
            return NotificationStatus::Skipped;
        }

        let MessageContent { subject, body } = content();
        let notification = Notification {
            from: self.config.notifications.sender.clone(),
            to: to.clone(),
            subject,
            body,
            created_at: Utc::now(),
        };

        match self.notifier.send(&notification) {
            Ok(()) => {
                log::info!("Notification sent to {}", to);
                NotificationStatus::Sent { to }
            }
            Err(err) => {
                log::warn!("Notification to {} could not be sent: {}", to, err);
                NotificationStatus::Failed {
                    to,
                    reason: "notification could not be delivered".to_string(),
                }
            }
        }
    }
}
