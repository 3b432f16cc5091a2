//! Alert types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::monitor::PriceObservation;

/// Kinds of feed disagreement the monitor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    /// Company feed did not match a bank update within the throttle
    CompanyUpdateIsSlow,
    /// Company feed disagrees with the bank, repeats itself, or has no bank reference
    CompanyUpdateIsInvalid,
}

impl AlertKind {
    /// Message prefix; alert messages always start with this
    pub fn headline(&self) -> &'static str {
        match self {
            AlertKind::CompanyUpdateIsSlow => "**** Company update is slow ****.",
            AlertKind::CompanyUpdateIsInvalid => "**** Company update is invalid ****.",
        }
    }

    /// Metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::CompanyUpdateIsSlow => "company_update_is_slow",
            AlertKind::CompanyUpdateIsInvalid => "company_update_is_invalid",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::CompanyUpdateIsSlow => write!(f, "COMPANY_UPDATE_IS_SLOW"),
            AlertKind::CompanyUpdateIsInvalid => write!(f, "COMPANY_UPDATE_IS_INVALID"),
        }
    }
}

/// A raised alert with both sides of the comparison attached
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub symbol: String,
    pub bank: Option<PriceObservation>,
    pub company: Option<PriceObservation>,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(
        kind: AlertKind,
        symbol: impl Into<String>,
        bank: Option<PriceObservation>,
        company: Option<PriceObservation>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            symbol: symbol.into(),
            bank,
            company,
            raised_at: Utc::now(),
        }
    }

    /// Human-readable message handed to the alert sink
    pub fn message(&self) -> String {
        format!(
            "{} Bank [{}] vs Company [{}].",
            self.kind.headline(),
            render(self.bank.as_ref()),
            render(self.company.as_ref())
        )
    }
}

fn render(observation: Option<&PriceObservation>) -> String {
    match observation {
        Some(obs) => obs.to_string(),
        None => "absent".to_string(),
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
