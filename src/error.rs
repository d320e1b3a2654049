use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Failure kinds surfaced by the read, match, dedup and write stages.
#[derive(Debug, Error)]
pub enum NicheError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("read failure: {0}")]
    ReadFailure(String),
    #[error("compute failure: {0}")]
    ComputeFailure(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("write failure: {0}")]
    WriteFailure(String),
}

impl NicheError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ReadFailure(_) => "read_failure",
            Self::ComputeFailure(_) => "compute_failure",
            Self::NotFound(_) => "not_found",
            Self::WriteFailure(_) => "write_failure",
        }
    }

    /// Process exit code used by the CLI for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => 2,
            Self::NotFound(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_exit_codes() {
        let e = NicheError::NotFound("compare_product_id_vs_title.xlsx".into());
        assert_eq!(e.kind(), "not_found");
        assert_eq!(e.exit_code(), 3);
        assert_eq!(NicheError::InvalidInput("x".into()).exit_code(), 2);
        assert_eq!(NicheError::WriteFailure("x".into()).exit_code(), 1);
    }

    #[test]
    fn display_carries_message() {
        let e = NicheError::ComputeFailure("missing column 'Product Title'".into());
        assert_eq!(
            e.to_string(),
            "compute failure: missing column 'Product Title'"
        );
    }
}
