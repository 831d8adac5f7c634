use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, MlpError>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlpError {
    /// A batch or parameter tensor does not have the dimensions its consumer needs.
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// A non-finite value showed up during the named stage of a step.
    NumericInstability { stage: &'static str },
    /// A batch without samples reached gradient averaging.
    EmptyBatch,
    InvalidConfig(String),
    Dataset(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for MlpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlpError::ShapeMismatch { what, expected, got } => write!(
                f,
                "shape mismatch in {what}: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            MlpError::NumericInstability { stage } => {
                write!(f, "non-finite values produced by {stage}")
            }
            MlpError::EmptyBatch => write!(f, "batch contains no samples"),
            MlpError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            MlpError::Dataset(msg) => write!(f, "dataset error: {msg}"),
            MlpError::Io(e) => write!(f, "io error: {e}"),
            MlpError::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for MlpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlpError::Io(e) => Some(e),
            MlpError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlpError {
    fn from(e: io::Error) -> Self {
        MlpError::Io(e)
    }
}

impl From<serde_json::Error> for MlpError {
    fn from(e: serde_json::Error) -> Self {
        MlpError::Json(e)
    }
}

/// Fails with `ShapeMismatch` unless `got == expected`.
pub(crate) fn ensure_shape(
    what: &'static str,
    expected: (usize, usize),
    got: (usize, usize),
) -> Result<()> {
    if expected != got {
        return Err(MlpError::ShapeMismatch { what, expected, got });
    }
    Ok(())
}
