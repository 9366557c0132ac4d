use thiserror::Error;

use ridgeline::{LoggingError, PositionParseError, SnapConfigError};

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("layout parse error: {0}")]
    Layout(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snap config: {0}")]
    Config(#[from] SnapConfigError),

    #[error("logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("section {section:?}: {source}")]
    Position {
        section: String,
        #[source]
        source: PositionParseError,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } | Self::Layout(_) | Self::Position { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DemoError;

    #[test]
    fn invalid_arguments_exit_with_usage_code() {
        let error = DemoError::invalid("viewport must be positive");
        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.to_string(),
            "invalid argument: viewport must be positive"
        );
    }

    #[test]
    fn io_errors_exit_with_one() {
        let error = DemoError::from(std::io::Error::other("disk"));
        assert_eq!(error.exit_code(), 1);
    }
}
