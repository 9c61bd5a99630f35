use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Every way a scan can fail. The UI shows the `Display` text as-is.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("nothing to analyze: input is empty")]
    EmptyInput,

    #[error("missing api key: set model.api_key, API_KEY or GEMINI_API_KEY")]
    MissingApiKey,

    #[error("no response from the model")]
    EmptyResponse,

    #[error("could not parse model response: {0}")]
    Parse(String),

    #[error("{}", upstream_message(.status, .message))]
    Upstream {
        status: Option<u16>,
        message: String,
    },
}

impl ScanError {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        ScanError::Upstream {
            status,
            message: message.into(),
        }
    }
}

fn upstream_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code @ (401 | 403)) => {
            format!("model api rejected the api key (status={code}): {message}")
        }
        Some(code) => format!("model request failed status={code}: {message}"),
        None => format!("model request failed: {message}"),
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::upstream(err.status().map(|status| status.as_u16()), err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_mentions_status() {
        let err = ScanError::upstream(Some(500), "boom");
        assert_eq!(err.to_string(), "model request failed status=500: boom");
        let err = ScanError::upstream(None, "connection refused");
        assert_eq!(err.to_string(), "model request failed: connection refused");
    }

    #[test]
    fn auth_failures_are_called_out() {
        let err = ScanError::upstream(Some(403), "API key not valid");
        assert!(err.to_string().contains("rejected the api key"));
    }
}
