//! Error type shared by every distribution function.
//!
//! Only invalid input is an error. Results that underflow or overflow
//! saturate to `0.0`/`1.0`, and an inversion that hits its iteration cap
//! returns its best estimate (see [`crate::inverse::InverseConfig`]).

use thiserror::Error;

/// Invalid input to a distribution function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// A parameter lies outside its mathematical domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A target probability lies outside `[0, 1]`.
    #[error("invalid probability {0}: must be in [0, 1]")]
    InvalidProbability(f64),

    /// Tail selector other than `"right"` or `"left"`.
    #[error("unknown tail side {0:?}: expected \"right\" or \"left\"")]
    UnknownSide(String),

    /// Distribution name with no quantile function.
    #[error("unknown distribution {0:?}: expected one of uniform, normal, chisq, t")]
    UnknownDistribution(String),

    /// A distribution that needs a parameter was requested without it.
    #[error("distribution `{distribution}` requires parameter `{name}`")]
    MissingParameter {
        distribution: &'static str,
        name: &'static str,
    },
}

impl DistributionError {
    /// Whether the error reports input outside the valid domain.
    ///
    /// Currently every variant does. New variants must be classified here.
    pub fn is_domain_error(&self) -> bool {
        match self {
            Self::InvalidParameter { .. }
            | Self::InvalidProbability(_)
            | Self::UnknownSide(_)
            | Self::UnknownDistribution(_)
            | Self::MissingParameter { .. } => true,
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, DistributionError>;

/// Rejects NaN and values `<= 0`.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() || value <= 0.0 {
        return Err(DistributionError::InvalidParameter {
            name,
            value,
            reason: "must be > 0",
        });
    }
    Ok(value)
}

/// Rejects NaN and values `< 0`.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() || value < 0.0 {
        return Err(DistributionError::InvalidParameter {
            name,
            value,
            reason: "must be >= 0",
        });
    }
    Ok(value)
}

/// Rejects NaN only.
pub(crate) fn ensure_not_nan(name: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() {
        return Err(DistributionError::InvalidParameter {
            name,
            value,
            reason: "must not be NaN",
        });
    }
    Ok(value)
}

/// Rejects anything outside `[0, 1]`, NaN included.
pub(crate) fn ensure_probability(value: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DistributionError::InvalidProbability(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_check() {
        assert_eq!(ensure_positive("df", 2.5), Ok(2.5));
        assert!(ensure_positive("df", 0.0).is_err());
        assert!(ensure_positive("df", -1.0).is_err());
        assert!(ensure_positive("df", f64::NAN).is_err());
    }

    #[test]
    fn test_non_negative_check() {
        assert_eq!(ensure_non_negative("k", 0.0), Ok(0.0));
        assert!(ensure_non_negative("k", -1e-300).is_err());
    }

    #[test]
    fn test_probability_check() {
        assert_eq!(ensure_probability(0.0), Ok(0.0));
        assert_eq!(ensure_probability(1.0), Ok(1.0));
        assert!(ensure_probability(1.0 + 1e-12).is_err());
        assert!(ensure_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_display_names_the_parameter() {
        let err = ensure_positive("shape", -2.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid parameter `shape` = -2: must be > 0");
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_every_variant_is_domain_error() {
        let errors = [
            DistributionError::InvalidParameter {
                name: "df",
                value: -1.0,
                reason: "must be > 0",
            },
            DistributionError::InvalidProbability(1.5),
            DistributionError::UnknownSide("up".to_string()),
            DistributionError::UnknownDistribution("cauchy".to_string()),
            DistributionError::MissingParameter {
                distribution: "t",
                name: "df",
            },
        ];
        for err in &errors {
            assert!(err.is_domain_error(), "{err}");
        }
    }
}
