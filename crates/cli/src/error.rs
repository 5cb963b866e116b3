//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: generation error (bad config values, failed fit, order mismatch)
//! - 12: input error (unknown noise/sort/curve name, bad JSON params)
//! - 13: serialization error

use fluidity_core::FluidityError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// The pipeline rejected the config or failed while building.
    Generation(FluidityError),
    /// A user input error (unknown option name, bad JSON params).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Generation(_) => 10,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Generation(e) => write!(f, "{e}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<FluidityError> for CliError {
    fn from(e: FluidityError) -> Self {
        match e {
            e @ FluidityError::UnknownVariant { .. } => CliError::Input(e.to_string()),
            other => CliError::Generation(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_exit_code_is_10() {
        let err = CliError::Generation(FluidityError::InvalidConfiguration("npoints".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = CliError::Input("bad params".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn serialization_error_exit_code_is_13() {
        let err = CliError::Serialization("json fail".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn unknown_name_routes_to_input() {
        let cli_err = CliError::from(FluidityError::UnknownVariant {
            kind: "sort policy",
            name: "random".into(),
        });
        assert_eq!(cli_err.exit_code(), 12);
        assert!(cli_err.to_string().contains("random"));
    }

    #[test]
    fn fit_failure_routes_to_generation() {
        let cli_err = CliError::from(FluidityError::InsufficientPoints { got: 2, min: 3 });
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("got 2"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
