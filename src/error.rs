use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildLensError {
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Build {record_id}: unsupported provider `{provider}`")]
    UnsupportedProvider { record_id: u64, provider: String },

    #[error("{}: malformed payload ({reason})", record_label(.record_id))]
    MalformedPayload {
        record_id: Option<u64>,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildLensError {
    /// Whether the error came from the HTTP layer rather than from the data.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Network(_))
    }

    pub(crate) fn malformed(record_id: u64, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            record_id: Some(record_id),
            reason: reason.into(),
        }
    }
}

fn record_label(record_id: &Option<u64>) -> String {
    match record_id {
        Some(id) => format!("Build {id}"),
        None => "Build record".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, BuildLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let api = BuildLensError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(api.is_transport());

        let unsupported = BuildLensError::UnsupportedProvider {
            record_id: 7,
            provider: "gogs".to_string(),
        };
        assert!(!unsupported.is_transport());
        assert!(!BuildLensError::malformed(7, "missing jobs").is_transport());
    }

    #[test]
    fn test_error_messages_name_the_record() {
        let err = BuildLensError::malformed(42, "missing jobs array");
        assert_eq!(
            err.to_string(),
            "Build 42: malformed payload (missing jobs array)"
        );

        let err = BuildLensError::UnsupportedProvider {
            record_id: 3,
            provider: "gitlab".to_string(),
        };
        assert_eq!(err.to_string(), "Build 3: unsupported provider `gitlab`");

        let err = BuildLensError::MalformedPayload {
            record_id: None,
            reason: "missing id".to_string(),
        };
        assert_eq!(err.to_string(), "Build record: malformed payload (missing id)");
    }
}
