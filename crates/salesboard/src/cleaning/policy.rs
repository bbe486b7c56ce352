//! Configurable cleaning rules.

use serde::{Deserialize, Serialize};

use crate::input::Value;

/// Decides whether an invoice number marks a cancelled transaction.
pub trait CancellationRule: Send + Sync {
    fn is_cancelled(&self, invoice_no: &Value) -> bool;
}

impl<F> CancellationRule for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn is_cancelled(&self, invoice_no: &Value) -> bool {
        self(invoice_no)
    }
}

/// Serializable cancellation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// The invoice number's text starts with `prefix`.
    Prefix {
        prefix: String,
        #[serde(default = "default_true")]
        case_insensitive: bool,
    },
    /// Nothing counts as cancelled.
    Disabled,
}

fn default_true() -> bool {
    true
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        CancellationPolicy::Prefix {
            prefix: "C".to_string(),
            case_insensitive: true,
        }
    }
}

impl CancellationRule for CancellationPolicy {
    fn is_cancelled(&self, invoice_no: &Value) -> bool {
        match self {
            CancellationPolicy::Disabled => false,
            // an empty prefix would flag every row
            CancellationPolicy::Prefix { prefix, .. } if prefix.is_empty() => false,
            CancellationPolicy::Prefix {
                prefix,
                case_insensitive,
            } => {
                let text = invoice_no.to_string();
                if *case_insensitive {
                    text.to_uppercase().starts_with(&prefix.to_uppercase())
                } else {
                    text.starts_with(prefix.as_str())
                }
            }
        }
    }
}

/// Values written into missing optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillDefaults {
    pub customer_id: String,
    pub description: String,
    pub country: String,
}

impl Default for FillDefaults {
    fn default() -> Self {
        Self {
            customer_id: "Unknown".to_string(),
            description: "Unknown Product".to_string(),
            country: "Unknown".to_string(),
        }
    }
}

/// Configuration for [`DataCleaner`](super::DataCleaner).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub fill_defaults: FillDefaults,
    pub cancellation: CancellationPolicy,
    /// Extra `chrono` formats tried after the built-in date formats.
    pub date_formats: Vec<String>,
}
