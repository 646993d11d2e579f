//! Notifier trait definition and shared error types.

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery rejected with status {status}: {description}")]
    Rejected { status: u16, description: String },

    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl NotifyError {
    /// Whether resending the same message can never succeed.
    ///
    /// Client errors (4xx) other than rate limiting are permanent; transport
    /// failures, 5xx responses and 429s may succeed on a later attempt.
    pub fn is_permanent(&self) -> bool {
        match self {
            NotifyError::Rejected { status, .. } => {
                (400..500).contains(status) && *status != 429
            }
            NotifyError::Config(_) => true,
            NotifyError::Http(_) | NotifyError::RateLimited { .. } => false,
        }
    }
}

/// A messaging channel that accepts one rendered text message at a time.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` and return the HTTP status code reported by the channel.
    async fn send(&self, text: &str) -> Result<u16, NotifyError>;

    /// Human-readable name for this channel (e.g., "telegram").
    fn channel_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16) -> NotifyError {
        NotifyError::Rejected {
            status,
            description: "Bad Request: can't parse entities".to_string(),
        }
    }

    #[test]
    fn test_client_errors_are_permanent() {
        assert!(rejected(400).is_permanent());
        assert!(rejected(403).is_permanent());
    }

    #[test]
    fn test_retryable_errors_are_not_permanent() {
        assert!(!rejected(429).is_permanent());
        assert!(!rejected(500).is_permanent());
        assert!(!rejected(502).is_permanent());
        assert!(!NotifyError::RateLimited { retry_after_secs: 5 }.is_permanent());
    }
}
