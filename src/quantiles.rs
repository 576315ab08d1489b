//! Plotting positions and theoretical quantiles for QQ plots.

use crate::error::{DistributionError, Result};
use crate::inverse::{chdtri, ndtri, stdtri};

/// Plotting positions `(i − a) / (n + 1 − 2a)` for `i = 1..=n`.
///
/// `a = 3/8` (Blom) when `n ≤ 10`, `a = 1/2` otherwise. The points are
/// strictly increasing, lie in `(0, 1)` and are symmetric about 1/2.
///
/// # Examples
/// ```
/// use u_distfn::quantiles::probability_points;
/// let points = probability_points(5);
/// assert_eq!(points.len(), 5);
/// assert!((points[0] - 0.11904761904761905).abs() < 1e-15);
/// assert!((points[2] - 0.5).abs() < 1e-15);
/// assert!(probability_points(0).is_empty());
/// ```
pub fn probability_points(n: usize) -> Vec<f64> {
    let a = if n <= 10 { 3.0 / 8.0 } else { 0.5 };
    let denom = n as f64 + 1.0 - 2.0 * a;
    (1..=n).map(|i| (i as f64 - a) / denom).collect()
}

/// Reference distribution for [`theoretical_quantiles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantileDistribution {
    /// Identity map: the plotting positions themselves.
    Uniform,
    /// Standard normal, via [`ndtri`].
    Normal,
    /// χ² upper-tail quantiles via [`chdtri`], so the output descends.
    ChiSquared(f64),
    /// Student's t via [`stdtri`].
    StudentT(f64),
}

impl QuantileDistribution {
    /// Resolves a distribution by name: `uniform`, `normal`, `chisq` or `t`.
    ///
    /// # Errors
    /// [`DistributionError::UnknownDistribution`] for any other name and
    /// [`DistributionError::MissingParameter`] when `chisq` or `t` is
    /// requested without `df`.
    ///
    /// # Examples
    /// ```
    /// use u_distfn::quantiles::QuantileDistribution;
    /// assert_eq!(
    ///     QuantileDistribution::from_name("t", Some(4.0)).unwrap(),
    ///     QuantileDistribution::StudentT(4.0)
    /// );
    /// assert!(QuantileDistribution::from_name("chisq", None).is_err());
    /// assert!(QuantileDistribution::from_name("cauchy", None).is_err());
    /// ```
    pub fn from_name(name: &str, df: Option<f64>) -> Result<Self> {
        match name {
            "uniform" => Ok(Self::Uniform),
            "normal" => Ok(Self::Normal),
            "chisq" => df
                .map(Self::ChiSquared)
                .ok_or(DistributionError::MissingParameter {
                    distribution: "chisq",
                    name: "df",
                }),
            "t" => df
                .map(Self::StudentT)
                .ok_or(DistributionError::MissingParameter {
                    distribution: "t",
                    name: "df",
                }),
            other => Err(DistributionError::UnknownDistribution(other.to_string())),
        }
    }

    /// Quantile at plotting position `p`.
    fn quantile(&self, p: f64) -> Result<f64> {
        match *self {
            Self::Uniform => Ok(p),
            Self::Normal => ndtri(p),
            Self::ChiSquared(df) => chdtri(df, p),
            Self::StudentT(df) => stdtri(df, p),
        }
    }
}

/// Theoretical quantiles of `dist` at [`probability_points(n)`](probability_points).
///
/// # Errors
/// Invalid degrees of freedom for `ChiSquared` or `StudentT`.
///
/// # Examples
/// ```
/// use u_distfn::quantiles::{theoretical_quantiles, QuantileDistribution};
/// let q = theoretical_quantiles(4, QuantileDistribution::Normal).unwrap();
/// assert!((q[0] + 1.049131397963971).abs() < 1e-7);
/// assert!((q[0] + q[3]).abs() < 1e-9);
/// ```
pub fn theoretical_quantiles(n: usize, dist: QuantileDistribution) -> Result<Vec<f64>> {
    probability_points(n)
        .into_iter()
        .map(|p| dist.quantile(p))
        .collect()
}

/// [`theoretical_quantiles`] with the distribution given by name.
///
/// # Errors
/// Unknown name, missing `df` for `chisq`/`t`, or invalid `df`.
///
/// # Examples
/// ```
/// use u_distfn::quantiles::theoretical_quantiles_by_name;
/// let q = theoretical_quantiles_by_name(4, "chisq", Some(2.0)).unwrap();
/// assert!(q[0] > q[3]);
/// assert!(theoretical_quantiles_by_name(4, "weibull", None).is_err());
/// ```
pub fn theoretical_quantiles_by_name(n: usize, dist: &str, df: Option<f64>) -> Result<Vec<f64>> {
    theoretical_quantiles(n, QuantileDistribution::from_name(dist, df)?)
}
