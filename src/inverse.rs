//! Inverse distribution functions.
//!
//! Every quantile here is found by one engine, [`solve_tail`], which
//! drives a monotone tail probability to a target value. The engine
//! always works on the smaller of the two tails, so a request such as
//! `fdtri(1, 1, 1e-50)` is solved against the target `1e-50` itself
//! rather than against `1 − 1e-50`, which rounds to `1.0`.
//!
//! # Algorithm
//! Newton's method in `u = ln x` on
//! ```text
//! g(u) = ln tail(eᵘ) − ln target
//! ```
//! guarded by a bracket `[lo, hi]` that starts at the full positive
//! float range and shrinks with every evaluation. A Newton step that
//! leaves the bracket, is not finite, or fails to halve the residual is
//! replaced by a bisection of the bracket (a geometric midpoint in `x`).
//!
//! Working in log space on both axes makes the far tails, where the tail
//! behaves like a power or an exponential of `x`, almost linear for Newton.

use crate::continuous::{f_lower_tail, f_upper_tail, ln_f_density, ln_t_density, t_upper_tail};
use crate::error::{
    ensure_non_negative, ensure_positive, ensure_probability, DistributionError, Result,
};
use crate::special::{
    incomplete_beta, ln_beta_density, ln_gamma, ln_gamma_density, lower_gamma,
    normal_quantile_estimate, standard_normal_cdf, upper_gamma,
};

/// ln of the smallest positive normal `f64`.
const LN_MIN_VARIATE: f64 = -708.396_418_532_264_1;

/// ln of `f64::MAX`.
const LN_MAX_VARIATE: f64 = 709.782_712_893_384;

/// Relative step in `u` below which the iterate is considered fixed.
const STEP_EPS: f64 = 4.0 * f64::EPSILON;

/// ln √(2π).
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

// ============================================================================
// Solver Configuration
// ============================================================================

/// Stopping rules for [`solve_tail`].
///
/// # Examples
/// ```
/// use u_distfn::inverse::InverseConfig;
/// let config = InverseConfig::default().with_max_iterations(50).with_tolerance(1e-12);
/// assert_eq!(config.max_iterations, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseConfig {
    /// Evaluations of the tail before the best estimate is returned.
    pub max_iterations: usize,
    /// Accepted relative error in the tail probability.
    pub tolerance: f64,
}

impl Default for InverseConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-10,
        }
    }
}

impl InverseConfig {
    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the accepted relative error in the tail probability.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

// ============================================================================
// Monotone Tail Abstraction
// ============================================================================

/// How a tail probability moves as the variate grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailDirection {
    /// Lower tails: P(X ≤ x).
    Increasing,
    /// Upper tails: P(X > x).
    Decreasing,
}

/// A tail probability that is monotone in a positive variate `x`.
///
/// Implementors supply the tail itself and the log of its derivative
/// magnitude (the density); [`solve_tail`] does the rest.
pub trait MonotoneTail {
    /// Tail probability at `x`, for `0 < x < upper_bound()`.
    fn tail(&self, x: f64) -> f64;

    /// ln |d tail / dx| at `x`.
    fn ln_density(&self, x: f64) -> f64;

    /// Whether the tail grows or shrinks with `x`.
    fn direction(&self) -> TailDirection;

    /// Exclusive upper end of the support.
    fn upper_bound(&self) -> f64 {
        f64::INFINITY
    }
}

/// Finds `x > 0` with `tail(x) = target`.
///
/// `guess` seeds the iteration; a guess outside the support is replaced
/// by the midpoint of the search range (logged at debug level). When the
/// iteration cap in `config` is reached, the best estimate seen so far is
/// returned and a warning is logged.
///
/// # Errors
/// `target` outside the open interval `(0, 1)`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::{solve_tail, InverseConfig, MonotoneTail, TailDirection};
///
/// struct Exponential;
///
/// impl MonotoneTail for Exponential {
///     fn tail(&self, x: f64) -> f64 { (-x).exp() }
///     fn ln_density(&self, x: f64) -> f64 { -x }
///     fn direction(&self) -> TailDirection { TailDirection::Decreasing }
/// }
///
/// let x = solve_tail(&Exponential, 1e-5, 1.0, &InverseConfig::default()).unwrap();
/// assert!((x - 1e5_f64.ln()).abs() < 1e-8);
/// ```
pub fn solve_tail<T: MonotoneTail + ?Sized>(
    tail: &T,
    target: f64,
    guess: f64,
    config: &InverseConfig,
) -> Result<f64> {
    if !(target > 0.0 && target < 1.0) {
        return Err(DistributionError::InvalidProbability(target));
    }
    let ln_target = target.ln();
    let sign = match tail.direction() {
        TailDirection::Increasing => 1.0,
        TailDirection::Decreasing => -1.0,
    };

    let mut lo = LN_MIN_VARIATE;
    let mut hi = tail.upper_bound().ln().min(LN_MAX_VARIATE);

    let mut u = guess.ln();
    if !(u > lo && u < hi) {
        let restart = 0.5 * (lo + hi);
        log::debug!(
            "initial guess {guess} outside the support, restarting from {}",
            restart.exp()
        );
        u = restart;
    }

    let mut best_err = f64::INFINITY;
    let mut best_u = u;
    let mut prev_err = f64::INFINITY;
    let mut newton_last = false;

    for _ in 0..config.max_iterations {
        let x = u.exp();
        let ln_tail = tail.tail(x).ln();
        let g = ln_tail - ln_target;
        if g.is_nan() {
            log::warn!("tail probability is undefined at x = {x}, returning best estimate");
            return Ok(best_u.exp());
        }

        let err = g.abs();
        if err < best_err {
            best_err = err;
            best_u = u;
        }
        if err <= config.tolerance {
            return Ok(x);
        }

        // tail too large on an increasing tail means the root is below u
        if (g > 0.0) == (sign > 0.0) {
            hi = u;
        } else {
            lo = u;
        }

        let slope = sign * (u + tail.ln_density(x) - ln_tail).exp();
        let newton = u - g / slope;
        let stalled = newton_last && err > 0.5 * prev_err;
        let next = if newton.is_finite() && newton > lo && newton < hi && !stalled {
            newton_last = true;
            newton
        } else {
            newton_last = false;
            0.5 * (lo + hi)
        };
        prev_err = err;

        if (next - u).abs() <= STEP_EPS * u.abs().max(1.0) {
            return Ok(next.exp());
        }
        u = next;
    }

    log::warn!(
        "inversion stopped after {} iterations with relative error {best_err:e}",
        config.max_iterations
    );
    Ok(best_u.exp())
}

// ============================================================================
// Tails Used by the Inverse Functions
// ============================================================================

struct NormalUpper;

impl MonotoneTail for NormalUpper {
    fn tail(&self, z: f64) -> f64 {
        standard_normal_cdf(-z)
    }
    fn ln_density(&self, z: f64) -> f64 {
        -0.5 * z * z - LN_SQRT_2PI
    }
    fn direction(&self) -> TailDirection {
        TailDirection::Decreasing
    }
}

struct StudentUpper {
    df: f64,
}

impl MonotoneTail for StudentUpper {
    fn tail(&self, t: f64) -> f64 {
        t_upper_tail(self.df, t)
    }
    fn ln_density(&self, t: f64) -> f64 {
        ln_t_density(self.df, t)
    }
    fn direction(&self) -> TailDirection {
        TailDirection::Decreasing
    }
}

/// P(shape, x) or Q(shape, x).
struct GammaTail {
    shape: f64,
    direction: TailDirection,
}

impl MonotoneTail for GammaTail {
    fn tail(&self, x: f64) -> f64 {
        match self.direction {
            TailDirection::Increasing => lower_gamma(self.shape, x),
            TailDirection::Decreasing => upper_gamma(self.shape, x),
        }
    }
    fn ln_density(&self, x: f64) -> f64 {
        ln_gamma_density(self.shape, x)
    }
    fn direction(&self) -> TailDirection {
        self.direction
    }
}

/// I_x(a, b) or its complement I_{1−x}(b, a).
struct BetaTail {
    a: f64,
    b: f64,
    direction: TailDirection,
}

impl MonotoneTail for BetaTail {
    fn tail(&self, x: f64) -> f64 {
        match self.direction {
            TailDirection::Increasing => incomplete_beta(self.a, self.b, x, 1.0 - x),
            TailDirection::Decreasing => incomplete_beta(self.b, self.a, 1.0 - x, x),
        }
    }
    fn ln_density(&self, x: f64) -> f64 {
        ln_beta_density(self.a, self.b, x, 1.0 - x)
    }
    fn direction(&self) -> TailDirection {
        self.direction
    }
    fn upper_bound(&self) -> f64 {
        1.0
    }
}

struct FisherTail {
    dfn: f64,
    dfd: f64,
    direction: TailDirection,
}

impl MonotoneTail for FisherTail {
    fn tail(&self, x: f64) -> f64 {
        match self.direction {
            TailDirection::Increasing => f_lower_tail(self.dfn, self.dfd, x),
            TailDirection::Decreasing => f_upper_tail(self.dfn, self.dfd, x),
        }
    }
    fn ln_density(&self, x: f64) -> f64 {
        ln_f_density(self.dfn, self.dfd, x)
    }
    fn direction(&self) -> TailDirection {
        self.direction
    }
}

/// Picks the smaller of `lower` and `upper = 1 − lower` as the target.
fn smaller_tail(lower: f64, upper: f64) -> (TailDirection, f64) {
    if lower <= upper {
        (TailDirection::Increasing, lower)
    } else {
        (TailDirection::Decreasing, upper)
    }
}

/// Solves P(shape, x) = lower, equivalently Q(shape, x) = upper.
fn invert_gamma(shape: f64, lower: f64, upper: f64) -> Result<f64> {
    let (direction, target) = smaller_tail(lower, upper);
    let guess = gamma_quantile_guess(shape, lower, upper);
    solve_tail(
        &GammaTail { shape, direction },
        target,
        guess,
        &InverseConfig::default(),
    )
}

/// Wilson–Hilferty approximation, falling back to the small-x series
/// `P(a, x) ≈ xᵃ / Γ(a + 1)` when the cube goes non-positive.
fn gamma_quantile_guess(shape: f64, lower: f64, upper: f64) -> f64 {
    let z = if lower <= upper {
        normal_quantile_estimate(lower)
    } else {
        -normal_quantile_estimate(upper)
    };
    let c = 1.0 / (9.0 * shape);
    let w = 1.0 - c + z * c.sqrt();
    if w > 0.0 {
        shape * w * w * w
    } else {
        ((lower.ln() + ln_gamma(shape + 1.0)) / shape).exp()
    }
}

/// Solves I_x(a, b) = lower, equivalently I_{1−x}(b, a) = upper.
fn invert_beta(a: f64, b: f64, lower: f64, upper: f64) -> Result<f64> {
    let (direction, target) = smaller_tail(lower, upper);
    solve_tail(
        &BetaTail { a, b, direction },
        target,
        a / (a + b),
        &InverseConfig::default(),
    )
}

// ============================================================================
// Normal and Incomplete Beta Inverses
// ============================================================================

/// Inverse of the standard normal CDF (probit).
///
/// `ndtri(0) = −∞`, `ndtri(1) = +∞`.
///
/// # Errors
/// `p ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::ndtri;
/// assert!((ndtri(0.975).unwrap() - 1.959963984540054).abs() < 1e-9);
/// assert_eq!(ndtri(0.5).unwrap(), 0.0);
/// assert_eq!(ndtri(0.0).unwrap(), f64::NEG_INFINITY);
/// ```
pub fn ndtri(p: f64) -> Result<f64> {
    let p = ensure_probability(p)?;
    if p == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    if p == 1.0 {
        return Ok(f64::INFINITY);
    }
    if p == 0.5 {
        return Ok(0.0);
    }
    let q = p.min(1.0 - p);
    let guess = normal_quantile_estimate(q).abs();
    let z = solve_tail(&NormalUpper, q, guess, &InverseConfig::default())?;
    Ok(if p < 0.5 { -z } else { z })
}

/// Inverse of the regularized incomplete beta: `x` with `I_x(a, b) = y`.
///
/// # Errors
/// `a <= 0`, `b <= 0` or `y ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::incbi;
/// // I_x(1, 1) = x
/// assert!((incbi(1.0, 1.0, 0.3).unwrap() - 0.3).abs() < 1e-9);
/// assert_eq!(incbi(2.0, 3.0, 1.0).unwrap(), 1.0);
/// ```
pub fn incbi(a: f64, b: f64, y: f64) -> Result<f64> {
    let a = ensure_positive("a", a)?;
    let b = ensure_positive("b", b)?;
    let y = ensure_probability(y)?;
    if y == 0.0 {
        return Ok(0.0);
    }
    if y == 1.0 {
        return Ok(1.0);
    }
    invert_beta(a, b, y, 1.0 - y)
}

// ============================================================================
// Student's t
// ============================================================================

/// Inverse of [`stdtr`](crate::continuous::stdtr): `t` with P(T ≤ t | df) = p.
///
/// `p = 0` gives `−∞`, `p = 1` gives `+∞`. The sign is applied after
/// solving the symmetric upper tail, so `stdtri(df, p) = −stdtri(df, 1 − p)`.
///
/// # Errors
/// `df <= 0` or `p ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::stdtri;
/// // df = 1 is Cauchy: quantile tan(π(p − 1/2))
/// assert!((stdtri(1.0, 0.8).unwrap() - 1.37638192049).abs() < 1e-8);
/// assert_eq!(stdtri(4.0, 0.5).unwrap(), 0.0);
/// ```
pub fn stdtri(df: f64, p: f64) -> Result<f64> {
    let df = ensure_positive("df", df)?;
    let p = ensure_probability(p)?;
    if p == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    if p == 1.0 {
        return Ok(f64::INFINITY);
    }
    if p == 0.5 {
        return Ok(0.0);
    }
    let q = p.min(1.0 - p);
    let guess = normal_quantile_estimate(q).abs();
    let t = solve_tail(&StudentUpper { df }, q, guess, &InverseConfig::default())?;
    Ok(if p < 0.5 { -t } else { t })
}

// ============================================================================
// Poisson and Binomial
// ============================================================================

/// Poisson mean `m` with `pdtr(k, m) = y`.
///
/// `k` is floored. `y = 1` gives `m = 0`; `y = 0` gives `+∞`.
///
/// # Errors
/// `k < 0` or `y ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::pdtri;
/// // P(X ≤ 0 | m) = e^-m
/// assert!((pdtri(0.0, 0.5).unwrap() - 2.0_f64.ln()).abs() < 1e-9);
/// ```
pub fn pdtri(k: f64, y: f64) -> Result<f64> {
    let k = ensure_non_negative("k", k)?.floor();
    let y = ensure_probability(y)?;
    if y == 1.0 {
        return Ok(0.0);
    }
    if y == 0.0 {
        return Ok(f64::INFINITY);
    }
    // pdtr(k, m) = Q(k + 1, m)
    invert_gamma(k + 1.0, 1.0 - y, y)
}

/// Success probability `p` with `bdtr(k, n, p) = y`.
///
/// `k` and `n` are floored. `y = 1` gives `p = 0`; `y = 0` gives `p = 1`.
/// For `k = 0` the closed form `p = 1 − y^(1/n)` is used.
///
/// # Errors
/// `k < 0`, `n <= k` or `y ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::bdtri;
/// assert!((bdtri(0.0, 5.0, 1e-10).unwrap() - 0.99).abs() < 1e-12);
/// assert!((bdtri(2.0, 5.0, 0.5).unwrap() - 0.5).abs() < 1e-9);
/// ```
pub fn bdtri(k: f64, n: f64, y: f64) -> Result<f64> {
    let k = ensure_non_negative("k", k)?.floor();
    let n = ensure_non_negative("n", n)?.floor();
    if n <= k {
        return Err(DistributionError::InvalidParameter {
            name: "n",
            value: n,
            reason: "must exceed k",
        });
    }
    let y = ensure_probability(y)?;
    if y == 1.0 {
        return Ok(0.0);
    }
    if y == 0.0 {
        return Ok(1.0);
    }

    let dn = n - k;
    if k == 0.0 {
        // (1 − p)ⁿ = y
        let p = if y > 0.8 {
            -((y - 1.0).ln_1p() / dn).exp_m1()
        } else {
            1.0 - y.powf(1.0 / dn)
        };
        return Ok(p);
    }

    // bdtr(k, n, p) = I_{1−p}(n − k, k + 1) = 1 − I_p(k + 1, n − k)
    invert_beta(k + 1.0, dn, 1.0 - y, y)
}

// ============================================================================
// Gamma, F and Chi-Squared
// ============================================================================

/// Inverse of [`gdtr`](crate::continuous::gdtr): `x` with
/// `P(b, a·x) = y` for rate `a` and shape `b`.
///
/// # Errors
/// `a <= 0`, `b <= 0` or `y ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::gdtri;
/// // shape 1: exponential median ln 2 / a
/// assert!((gdtri(2.0, 1.0, 0.5).unwrap() - 0.5 * 2.0_f64.ln()).abs() < 1e-9);
/// ```
pub fn gdtri(a: f64, b: f64, y: f64) -> Result<f64> {
    let a = ensure_positive("a", a)?;
    let b = ensure_positive("b", b)?;
    let y = ensure_probability(y)?;
    if y == 0.0 {
        return Ok(0.0);
    }
    if y == 1.0 {
        return Ok(f64::INFINITY);
    }
    Ok(invert_gamma(b, y, 1.0 - y)? / a)
}

/// Inverse of [`fdtr`](crate::continuous::fdtr): `x` with
/// P(X ≤ x | dfn, dfd) = y.
///
/// Tiny `y` is solved on the lower tail directly, so
/// `fdtri(1, 1, 1e-50) ≈ 2.47e-100` rather than `0`.
///
/// # Errors
/// `dfn <= 0`, `dfd <= 0` or `y ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::fdtri;
/// // F(2, 2): CDF = x/(1+x)
/// assert!((fdtri(2.0, 2.0, 0.8).unwrap() - 4.0).abs() < 1e-8);
/// assert!(fdtri(1.0, 1.0, 1e-50).unwrap() > 0.0);
/// ```
pub fn fdtri(dfn: f64, dfd: f64, y: f64) -> Result<f64> {
    let dfn = ensure_positive("dfn", dfn)?;
    let dfd = ensure_positive("dfd", dfd)?;
    let y = ensure_probability(y)?;
    if y == 0.0 {
        return Ok(0.0);
    }
    if y == 1.0 {
        return Ok(f64::INFINITY);
    }
    let (direction, target) = smaller_tail(y, 1.0 - y);
    solve_tail(
        &FisherTail {
            dfn,
            dfd,
            direction,
        },
        target,
        1.0,
        &InverseConfig::default(),
    )
}

/// Inverse of the χ² upper tail: `x` with P(X > x | df) = y.
///
/// # Errors
/// `df <= 0` or `y ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::inverse::chdtri;
/// assert!((chdtri(1.0, 0.05).unwrap() - 3.841458820694124).abs() < 1e-8);
/// assert_eq!(chdtri(3.0, 1.0).unwrap(), 0.0);
/// ```
pub fn chdtri(df: f64, y: f64) -> Result<f64> {
    let df = ensure_positive("df", df)?;
    let y = ensure_probability(y)?;
    if y == 1.0 {
        return Ok(0.0);
    }
    if y == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(2.0 * invert_gamma(0.5 * df, 1.0 - y, y)?)
}
