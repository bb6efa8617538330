use exif::Error as ExifError;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use thiserror::Error;

use crate::location::Provider;

/// Why a positioning provider refused a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionReason {
    PermissionDenied,
    ProviderNotFound,
}

impl fmt::Display for SubscriptionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionReason::PermissionDenied => write!(f, "permission denied"),
            SubscriptionReason::ProviderNotFound => write!(f, "provider not found"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("EXIF error: {0}")]
    Exif(#[from] ExifError),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),

    #[error("Cannot parse {tag} value {value:?}")]
    Parse { tag: &'static str, value: String },

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Subscription to {provider} failed: {reason}")]
    Subscription {
        provider: Provider,
        reason: SubscriptionReason,
    },

    #[error("Attribute store is read-only")]
    ReadOnly,
}

impl AppError {
    /// True for failures of the underlying attribute store rather than of the data itself.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            AppError::Io(_) | AppError::Exif(_) | AppError::Json(_) | AppError::ReadOnly
        )
    }
}
