use thiserror::Error;

/// Top-level error type for path sampling.
#[derive(Debug, Error)]
pub enum PathError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors related to segment construction and queries.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

impl GeometryError {
    /// Fails with [`GeometryError::ParameterOutOfRange`] unless `min <= value <= max`.
    ///
    /// NaN is always rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` lies outside the closed range.
    pub fn check_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
        if value >= min && value <= max {
            Ok(())
        } else {
            Err(Self::ParameterOutOfRange {
                parameter,
                value,
                min,
                max,
            }
            .into())
        }
    }
}

/// Convenience type alias for results using [`PathError`].
pub type Result<T> = std::result::Result<T, PathError>;
