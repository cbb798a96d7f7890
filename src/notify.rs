//! Quote notifications
//!
//! The engine hands a finished quote to a `Notifier`. Delivery happens after the
//! result is computed and its outcome is reported next to the result; it never
//! turns a successful quote into an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::NotifyError;
use crate::quote::{LifeQuote, PensionProjection, PropertyQuote};

/// A message ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Delivery capability injected into the engine
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log instead of delivering them
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        log::info!(
            "Notification to {}: {} ({} bytes)",
            notification.to,
            notification.subject,
            notification.body.len()
        );
        log::debug!("{}", notification.body);
        Ok(())
    }
}

/// Appends each notification as one JSON line to a spool file for a mail relay
#[derive(Debug)]
pub struct OutboxNotifier {
    path: PathBuf,
    file: Mutex<File>,
}

impl OutboxNotifier {
    /// Open (or create) the outbox file in append mode
    pub fn open(path: impl AsRef<Path>) -> Result<Self, NotifyError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut line = serde_json::to_string(notification)?;
        line.push('\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| NotifyError::Rejected("outbox lock poisoned".to_string()))?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// What happened to the notification of a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// No contact address, or notifications disabled
    Skipped,
    Sent { to: String },
    /// Delivery failed; details are logged, not returned
    Failed { to: String, reason: String },
}

impl NotificationStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, NotificationStatus::Failed { .. })
    }
}

/// Subject and body of a quote message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageContent {
    pub subject: String,
    pub body: String,
}

pub fn life_message(product_name: &str, quote: &LifeQuote) -> MessageContent {
    let y = &quote.yearly;
    let m = &quote.monthly;
    let body = format!(
        "<h2>Life insurance calculation: {name}</h2>\n\
         <table>\n\
         <tr><th>Benefit</th><th>Yearly</th><th>Monthly</th></tr>\n\
         <tr><td>Death</td><td>{} Kč</td><td>{} Kč</td></tr>\n\
         <tr><td>Injuries</td><td>{} Kč</td><td>{} Kč</td></tr>\n\
         <tr><td>Diseases</td><td>{} Kč</td><td>{} Kč</td></tr>\n\
         <tr><td>Work incapacity</td><td>{} Kč</td><td>{} Kč</td></tr>\n\
         <tr><td>Hospitalization</td><td>{} Kč</td><td>{} Kč</td></tr>\n\
         <tr><td>Invalidity</td><td>{} Kč</td><td>{} Kč</td></tr>\n\
         <tr><td><b>Total</b></td><td><b>{} Kč</b></td><td><b>{} Kč</b></td></tr>\n\
         </table>",
        y.death,
        m.death,
        y.injuries,
        m.injuries,
        y.diseases,
        m.diseases,
        y.work_incapacity,
        m.work_incapacity,
        y.hospitalization,
        m.hospitalization,
        y.invalidity,
        m.invalidity,
        y.total,
        m.total,
        name = product_name,
    );

    MessageContent {
        subject: format!("Life insurance calculation - {}", product_name),
        body,
    }
}

pub fn property_message(product_name: &str, quote: &PropertyQuote) -> MessageContent {
    let t = &quote.total;
    let body = format!(
        "<h2>Property insurance calculation: {}</h2>\n\
         <p>Property: {:.2} Kč</p>\n\
         <p>Equipment: {:.2} Kč</p>\n\
         <p>Liability: {:.2} Kč</p>\n\
         <p><b>Total: {:.2} Kč</b></p>",
        product_name, t.property, t.equipment, t.liability, t.total,
    );

    MessageContent {
        subject: format!("Property insurance calculation - {}", product_name),
        body,
    }
}

pub fn pension_message(product_name: &str, projection: &PensionProjection) -> MessageContent {
    let body = format!(
        "<h2>Pension projection: {}</h2>\n\
         <p>Strategy: {}</p>\n\
         <p>Years to retirement: {}</p>\n\
         <p>Projected savings: {:.2} Kč</p>\n\
         <p>Valorization: {:.2} Kč</p>\n\
         <p>State contribution: {} Kč monthly, {} Kč in total</p>",
        product_name,
        projection.strategy,
        projection.years_to_retirement,
        projection.total_savings,
        projection.valorization,
        projection.state_contribution,
        projection.state_contribution_total,
    );

    MessageContent {
        subject: format!("Pension projection - {}", product_name),
        body,
    }
}
