use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("{what} {value} out of range [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Check `value` against an inclusive range, producing `OutOfRange` on failure.
pub(crate) fn check_range(what: &'static str, value: i64, min: i64, max: i64) -> LayoutResult<()> {
    if value < min || value > max {
        return Err(LayoutError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(())
}
