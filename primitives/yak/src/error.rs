use std::path::PathBuf;
use thiserror::Error;

/// Everything that stops a message from being posted.
///
/// The `Display` output is exactly what the user sees on stdout before the
/// process exits with status 1.
#[derive(Debug, Error)]
pub enum YakError {
    #[error("Error: must provide a domain")]
    MissingDomain,

    #[error("Error: must provide a token")]
    MissingToken,

    #[error("Error while reading config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Error while marshaling body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Error while submitting message: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Error while writing response: {0}")]
    Output(#[from] std::io::Error),
}

impl YakError {
    pub(crate) fn config(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        YakError::Config {
            path: path.into(),
            message: cause.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, YakError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_messages() {
        assert_eq!(
            YakError::MissingDomain.to_string(),
            "Error: must provide a domain"
        );
        assert_eq!(
            YakError::MissingToken.to_string(),
            "Error: must provide a token"
        );
    }

    #[test]
    fn test_config_error_names_the_file() {
        let err = YakError::config("/tmp/yak.conf", "unknown field `tokn`");
        assert_eq!(
            err.to_string(),
            "Error while reading config file /tmp/yak.conf: unknown field `tokn`"
        );
    }
}
