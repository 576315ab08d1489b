//! Binomial and Poisson distributions.
//!
//! Cumulative probabilities go through the incomplete beta and gamma
//! functions; point probabilities go through a log-gamma expression.
//! The two paths are independent.
//!
//! # Identities
//!
//! | Function | Meaning | Evaluated as |
//! |---|---|---|
//! | [`bdtr`] | P(X ≤ k), X ~ Bin(n, p) | I_{1−p}(n−k, k+1) |
//! | [`bdtrc`] | P(X > k) | I_p(k+1, n−k) |
//! | [`pdtr`] | P(X ≤ k), X ~ Poisson(m) | Q(k+1, m) |
//! | [`pdtrc`] | P(X > k) | P(k+1, m) |
//!
//! A fractional `k` is floored in the cumulative functions. The exact
//! point probabilities ([`binomial_exact`], [`poisson_exact`]) instead
//! extend the factorials through Γ and accept fractional counts as is.

use crate::error::{
    ensure_non_negative, ensure_not_nan, ensure_probability, DistributionError, Result,
};
use crate::special::{incomplete_beta, ln_gamma, lower_gamma, upper_gamma};

fn validate_count(name: &'static str, k: f64) -> Result<f64> {
    ensure_not_nan(name, k)?;
    ensure_non_negative(name, k)
}

// ============================================================================
// Binomial CDF
// ============================================================================

/// Binomial CDF: P(X ≤ k) for X ~ Binomial(n, p).
///
/// # Algorithm
/// `I_{1−p}(n−k, k+1)`, with `k = 0` evaluated as `(1−p)ⁿ` through
/// `exp(n · ln(1−p))`. No binomial coefficients are summed, so large `n`
/// is no harder than small `n`.
///
/// # Errors
/// `k < 0`, `n < 0` or `p ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::discrete::bdtr;
/// assert!((bdtr(2.0, 10.0, 0.5).unwrap() - 0.0546875).abs() < 1e-15);
/// // k ≥ n covers all the mass
/// assert_eq!(bdtr(10.0, 10.0, 0.3).unwrap(), 1.0);
/// ```
pub fn bdtr(k: f64, n: f64, p: f64) -> Result<f64> {
    let (k, n, p) = binomial_args(k, n, p)?;
    if k >= n {
        return Ok(1.0);
    }
    let dn = n - k;
    if k == 0.0 {
        return Ok((dn * (-p).ln_1p()).exp());
    }
    Ok(incomplete_beta(dn, k + 1.0, 1.0 - p, p))
}

/// Complemented binomial CDF: P(X > k) for X ~ Binomial(n, p).
///
/// Evaluated directly as `I_p(k+1, n−k)` rather than `1 − bdtr`, so an
/// upper tail of 1e-30 is returned as such.
///
/// # Errors
/// `k < 0`, `n < 0` or `p ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::discrete::bdtrc;
/// // P(X > 0) = 1 − (1−p)ⁿ, tiny for tiny p
/// let q = bdtrc(0.0, 5.0, 1e-10).unwrap();
/// assert!((q / 4.999999999e-10 - 1.0).abs() < 1e-12);
/// ```
pub fn bdtrc(k: f64, n: f64, p: f64) -> Result<f64> {
    let (k, n, p) = binomial_args(k, n, p)?;
    if k >= n {
        return Ok(0.0);
    }
    let dn = n - k;
    if k == 0.0 {
        return Ok(-(dn * (-p).ln_1p()).exp_m1());
    }
    Ok(incomplete_beta(k + 1.0, dn, p, 1.0 - p))
}

/// Validates and floors the count.
fn binomial_args(k: f64, n: f64, p: f64) -> Result<(f64, f64, f64)> {
    let k = validate_count("k", k)?;
    let n = validate_count("n", n)?;
    let p = ensure_probability(p)?;
    Ok((k.floor(), n, p))
}

/// Left binomial tail P(X ≤ successes); same as [`bdtr`].
pub fn binomial_low(successes: f64, trials: f64, prob: f64) -> Result<f64> {
    bdtr(successes, trials, prob)
}

/// Right binomial tail P(X > successes); same as [`bdtrc`].
///
/// `successes ∈ [−1, 0)` is accepted and gives `1.0`, so P(X ≥ 0) can be
/// written as `binomial_high(-1, ..)`.
pub fn binomial_high(successes: f64, trials: f64, prob: f64) -> Result<f64> {
    if (-1.0..0.0).contains(&successes) {
        validate_count("trials", trials)?;
        ensure_probability(prob)?;
        return Ok(1.0);
    }
    bdtrc(successes, trials, prob)
}

// ============================================================================
// Poisson CDF
// ============================================================================

/// Poisson CDF: P(X ≤ k) for X ~ Poisson(m), via Q(k+1, m).
///
/// A zero mean puts all mass at 0, so `pdtr(k, 0) = 1`.
///
/// # Errors
/// `k < 0` or `m < 0`.
///
/// # Examples
/// ```
/// use u_distfn::discrete::pdtr;
/// // P(X = 0) = e⁻¹ for m = 1
/// assert!((pdtr(0.0, 1.0).unwrap() - (-1.0_f64).exp()).abs() < 1e-14);
/// ```
pub fn pdtr(k: f64, m: f64) -> Result<f64> {
    let (k, m) = poisson_args(k, m)?;
    if m == 0.0 {
        return Ok(1.0);
    }
    Ok(upper_gamma(k + 1.0, m))
}

/// Complemented Poisson CDF: P(X > k), via P(k+1, m).
///
/// # Errors
/// `k < 0` or `m < 0`.
///
/// # Examples
/// ```
/// use u_distfn::discrete::pdtrc;
/// // P(X > 10) for a mean of 1e-9 is about m¹¹/11!
/// let q = pdtrc(10.0, 1e-9).unwrap();
/// assert!((q / 2.50521083625e-107 - 1.0).abs() < 1e-9);
/// ```
pub fn pdtrc(k: f64, m: f64) -> Result<f64> {
    let (k, m) = poisson_args(k, m)?;
    if m == 0.0 {
        return Ok(0.0);
    }
    Ok(lower_gamma(k + 1.0, m))
}

fn poisson_args(k: f64, m: f64) -> Result<(f64, f64)> {
    let k = validate_count("k", k)?;
    let m = validate_count("m", m)?;
    Ok((k.floor(), m))
}

/// Left Poisson tail P(X ≤ successes); same as [`pdtr`].
///
/// `poisson_low(s, m) + poisson_high(s, m) == 1` for every valid pair.
pub fn poisson_low(successes: f64, mean: f64) -> Result<f64> {
    pdtr(successes, mean)
}

/// Right Poisson tail P(X > successes); same as [`pdtrc`].
pub fn poisson_high(successes: f64, mean: f64) -> Result<f64> {
    pdtrc(successes, mean)
}

// ============================================================================
// Exact Point Probabilities
// ============================================================================

/// Poisson point probability P(X = successes) = mᵏ e⁻ᵐ / Γ(k+1).
///
/// Evaluated in log-space; fractional `successes` use Γ in place of the
/// factorial.
///
/// # Errors
/// `successes < 0` or `mean < 0`.
///
/// # Examples
/// ```
/// use u_distfn::discrete::poisson_exact;
/// assert!((poisson_exact(2.0, 3.0).unwrap() - 0.2240418076).abs() < 1e-9);
/// assert_eq!(poisson_exact(0.0, 0.0).unwrap(), 1.0);
/// ```
pub fn poisson_exact(successes: f64, mean: f64) -> Result<f64> {
    let k = validate_count("successes", successes)?;
    let m = validate_count("mean", mean)?;
    if m == 0.0 {
        return Ok(if k == 0.0 { 1.0 } else { 0.0 });
    }
    let ln_p = k * m.ln() - m - ln_gamma(k + 1.0);
    Ok(ln_p.exp())
}

/// Binomial point probability P(X = successes) for X ~ Binomial(trials, prob).
///
/// # Algorithm
/// ```text
/// ln P = ln Γ(n+1) − ln Γ(k+1) − ln Γ(n−k+1) + k·ln p + (n−k)·ln(1−p)
/// ```
/// exponentiated once at the end, so `trials` in the thousands and
/// results near 1e-300 stay accurate. Fractional `successes`/`trials`
/// follow the gamma-function extension of the binomial coefficient.
///
/// # Errors
/// `successes < 0`, `successes > trials` or `prob ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use u_distfn::discrete::binomial_exact;
/// assert!((binomial_exact(0.0, 1.0, 0.5).unwrap() - 0.5).abs() < 1e-15);
/// assert!((binomial_exact(3.0, 5.0, 0.75).unwrap() - 0.2636719).abs() < 1e-7);
/// assert!(binomial_exact(10.2, 5.0, 0.33).is_err());
/// ```
pub fn binomial_exact(successes: f64, trials: f64, prob: f64) -> Result<f64> {
    let k = validate_count("successes", successes)?;
    let n = validate_count("trials", trials)?;
    if k > n {
        return Err(DistributionError::InvalidParameter {
            name: "successes",
            value: k,
            reason: "must not exceed trials",
        });
    }
    let p = ensure_probability(prob)?;

    if p == 0.0 {
        return Ok(if k == 0.0 { 1.0 } else { 0.0 });
    }
    if p == 1.0 {
        return Ok(if k == n { 1.0 } else { 0.0 });
    }

    let ln_choose = ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0);
    let ln_p = ln_choose + k * p.ln() + (n - k) * (-p).ln_1p();
    Ok(ln_p.exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const K_S: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 5.0];
    const N_S: [f64; 3] = [5.0, 10.0, 1000.0];
    const P_S: [f64; 5] = [1e-10, 0.1, 0.5, 0.9, 0.999999];

    #[rustfmt::skip]
    const BDTR_EXPECTED: [f64; 75] = [
        0.9999999995, 0.59049, 0.03125, 1e-05, 1.00000000014e-30,
        0.999999999, 0.3486784401, 0.0009765625, 1e-10, 1.00000000029e-60,
        0.9999999, 1.74787125172e-46, 9.33263618503e-302, 0.0, 0.0,
        1.0, 0.91854, 0.1875, 0.00046, 4.99999600058e-24,
        1.0, 0.7360989291, 0.0107421875, 9.1e-09, 9.99999100259e-54,
        1.0, 1.9595578811e-44, 9.34196882121e-299, 0.0, 0.0,
        1.0, 0.99144, 0.5, 0.00856, 9.99998500087e-18,
        1.0, 0.9298091736, 0.0546875, 3.736e-07, 4.49999200104e-47,
        1.0, 1.09744951737e-42, 4.67099374325e-296, 0.0, 0.0,
        1.0, 0.99954, 0.8125, 0.08146, 9.99998000059e-12,
        1.0, 0.9872048016, 0.171875, 9.1216e-06, 1.19999685024e-40,
        1.0, 4.09381247279e-41, 1.5554471507e-293, 0.0, 0.0,
        1.0, 1.0, 1.0, 1.0, 1.0,
        1.0, 0.9998530974, 0.623046875, 0.0016349374, 2.51998950038e-28,
        1.0, 2.55654569306e-38, 7.7385053063e-289, 0.0, 0.0,
    ];

    #[rustfmt::skip]
    const BDTRC_EXPECTED: [f64; 75] = [
        4.999999999e-10, 0.40951, 0.96875, 0.99999, 1.0,
        9.9999999955e-10, 0.6513215599, 0.9990234375, 0.9999999999, 1.0,
        9.9999995005e-08, 1.0, 1.0, 1.0, 1.0,
        9.999999998e-20, 0.08146, 0.8125, 0.99954, 1.0,
        4.4999999976e-19, 0.2639010709, 0.9892578125, 0.9999999909, 1.0,
        4.99499966766e-15, 1.0, 1.0, 1.0, 1.0,
        9.9999999985e-30, 0.00856, 0.5, 0.99144, 1.0,
        1.19999999937e-28, 0.0701908264, 0.9453125, 0.9999996264, 1.0,
        1.66166987575e-22, 1.0, 1.0, 1.0, 1.0,
        4.9999999996e-40, 0.00046, 0.1875, 0.91854, 0.99999999999,
        2.09999999899e-38, 0.0127951984, 0.828125, 0.9999908784, 1.0,
        4.14171214499e-30, 1.0, 1.0, 1.0, 1.0,
        0.0, 0.0, 0.0, 0.0, 0.0,
        2.09999999928e-58, 0.0001469026, 0.376953125, 0.9983650626, 1.0,
        1.36817318242e-45, 1.0, 1.0, 1.0, 1.0,
    ];

    fn binomial_grid() -> impl Iterator<Item = (f64, f64, f64)> {
        K_S.into_iter().flat_map(|k| {
            N_S.into_iter()
                .flat_map(move |n| P_S.into_iter().map(move |p| (k, n, p)))
        })
    }

    #[test]
    fn test_bdtr_reference_table() {
        for ((k, n, p), expected) in binomial_grid().zip(BDTR_EXPECTED) {
            let got = bdtr(k, n, p).unwrap();
            assert_relative_eq!(got, expected, epsilon = 0.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_bdtrc_reference_table() {
        for ((k, n, p), expected) in binomial_grid().zip(BDTRC_EXPECTED) {
            let got = bdtrc(k, n, p).unwrap();
            assert_relative_eq!(got, expected, epsilon = 0.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_bdtr_floors_fractional_k() {
        assert_eq!(bdtr(2.7, 10.0, 0.5).unwrap(), bdtr(2.0, 10.0, 0.5).unwrap());
        assert_eq!(bdtrc(2.7, 10.0, 0.5).unwrap(), bdtrc(2.0, 10.0, 0.5).unwrap());
    }

    #[test]
    fn test_bdtr_edge_probabilities() {
        assert_eq!(bdtr(3.0, 10.0, 0.0).unwrap(), 1.0);
        assert_eq!(bdtr(3.0, 10.0, 1.0).unwrap(), 0.0);
        assert_eq!(bdtr(0.0, 10.0, 1.0).unwrap(), 0.0);
        assert_eq!(bdtrc(0.0, 10.0, 1.0).unwrap(), 1.0);
        assert_eq!(bdtrc(3.0, 10.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_bdtr_domain_errors() {
        assert!(bdtr(-1.0, 10.0, 0.5).is_err());
        assert!(bdtr(1.0, -10.0, 0.5).is_err());
        assert!(bdtr(1.0, 10.0, 1.5).is_err());
        assert!(bdtrc(1.0, 10.0, -0.5).is_err());
        assert!(bdtrc(f64::NAN, 10.0, 0.5).is_err());
    }

    #[test]
    fn test_binomial_tail_aliases() {
        assert_eq!(binomial_low(3.0, 10.0, 0.3).unwrap(), bdtr(3.0, 10.0, 0.3).unwrap());
        assert_eq!(binomial_high(3.0, 10.0, 0.3).unwrap(), bdtrc(3.0, 10.0, 0.3).unwrap());
        assert_eq!(binomial_high(-1.0, 10.0, 0.3).unwrap(), 1.0);
        assert!(binomial_high(-1.0, 10.0, 1.3).is_err());
        assert!(binomial_low(-1.0, 10.0, 0.3).is_err());
    }

    const POISSON_K: [f64; 5] = [0.0, 1.0, 2.0, 5.0, 10.0];
    const POISSON_M: [f64; 6] = [1e-9, 0.1, 0.5, 1.0, 2.0, 31.0];

    #[rustfmt::skip]
    const PDTR_EXPECTED: [f64; 30] = [
        0.999999999, 0.904837418036, 0.606530659713, 0.367879441171, 0.135335283237, 3.44247710847e-14,
        1.0, 0.99532115984, 0.909795989569, 0.735758882343, 0.40600584971, 1.10159267471e-12,
        1.0, 0.99984534693, 0.985612322033, 0.919698602929, 0.676676416183, 1.76426951809e-11,
        1.0, 0.999999998725, 0.999985835063, 0.999405815182, 0.983436391519, 9.72616712615e-09,
        1.0, 1.0, 0.999999999992, 0.999999989952, 0.999991691776, 1.12519146046e-05,
    ];

    #[rustfmt::skip]
    const PDTRC_EXPECTED: [f64; 30] = [
        9.999999995e-10, 0.095162581964, 0.393469340287, 0.632120558829, 0.864664716763, 1.0,
        4.99999999667e-19, 0.00467884016044, 0.090204010431, 0.264241117657, 0.59399415029, 0.999999999999,
        1.66666666542e-28, 0.000154653070265, 0.014387677967, 0.0803013970714, 0.323323583817, 0.999999999982,
        1.3888888877e-57, 1.27489869223e-09, 1.41649373223e-05, 0.000594184817582, 0.0165636084806, 0.999999990274,
        2.50521083625e-107, 2.28584493079e-19, 7.74084073923e-12, 1.00477663757e-08, 8.30822436848e-06, 0.999988748085,
    ];

    fn poisson_grid() -> impl Iterator<Item = (f64, f64)> {
        POISSON_K
            .into_iter()
            .flat_map(|k| POISSON_M.into_iter().map(move |m| (k, m)))
    }

    #[test]
    fn test_pdtr_reference_table() {
        for ((k, m), expected) in poisson_grid().zip(PDTR_EXPECTED) {
            let got = pdtr(k, m).unwrap();
            assert_relative_eq!(got, expected, epsilon = 0.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_pdtrc_reference_table() {
        for ((k, m), expected) in poisson_grid().zip(PDTRC_EXPECTED) {
            let got = pdtrc(k, m).unwrap();
            assert_relative_eq!(got, expected, epsilon = 0.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_poisson_low_matches_r() {
        let cases = [
            ((0.0, 0.0), 1.0),
            ((0.0, 0.75), 0.4723666),
            ((0.0, 1.0), 0.3678794),
            ((0.0, 5.0), 0.006737947),
            ((0.0, 113.7), 4.175586e-50),
            ((2.0, 0.0), 1.0),
            ((2.0, 3.0), 0.4231901),
            ((2.0, 17.8), 3.296636e-06),
            ((17.0, 29.6), 0.008753318),
            ((180.0, 0.0), 1.0),
            ((180.0, 137.4), 0.999784),
            ((180.0, 318.0), 2.436995e-17),
            ((180.0, 1024.0), 8.266457e-233),
        ];
        for ((k, m), expected) in cases {
            assert_relative_eq!(poisson_low(k, m).unwrap(), expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_poisson_high_matches_r() {
        let cases = [
            ((0.0, 0.0), 0.0),
            ((0.0, 0.75), 0.5276334),
            ((0.0, 1.0), 0.6321206),
            ((0.0, 5.0), 0.993262),
            ((0.0, 113.7), 1.0),
            ((2.0, 0.0), 0.0),
            ((2.0, 3.0), 0.5768099),
            ((2.0, 17.8), 0.9999967),
            ((17.0, 29.6), 0.9912467),
            ((180.0, 0.0), 0.0),
            ((180.0, 137.4), 0.0002159856),
            ((180.0, 318.0), 1.0),
            ((180.0, 1024.0), 1.0),
        ];
        for ((k, m), expected) in cases {
            assert_relative_eq!(poisson_high(k, m).unwrap(), expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_poisson_tails_sum_to_one() {
        for (k, m) in [(0.0, 0.0), (0.0, 1.0), (4.0, 4.0), (180.0, 137.4), (17.0, 29.6)] {
            let total = poisson_low(k, m).unwrap() + poisson_high(k, m).unwrap();
            assert!((total - 1.0).abs() < 1e-14, "low + high = {total} at ({k}, {m})");
        }
    }

    #[test]
    fn test_poisson_domain_errors() {
        assert!(pdtr(-1.0, 2.0).is_err());
        assert!(pdtr(1.0, -2.0).is_err());
        assert!(pdtrc(1.0, f64::NAN).is_err());
        assert!(poisson_exact(-1.0, 2.0).is_err());
        assert!(poisson_exact(1.0, -2.0).is_err());
    }

    #[test]
    fn test_poisson_exact_matches_r() {
        let cases = [
            ((0.0, 0.0), 1.0),
            ((0.0, 0.75), 0.4723666),
            ((0.0, 1.0), 0.3678794),
            ((0.0, 5.0), 0.006737947),
            ((0.0, 113.7), 4.175586e-50),
            ((2.0, 0.0), 0.0),
            ((2.0, 3.0), 0.2240418),
            ((2.0, 17.8), 2.946919e-06),
            ((17.0, 29.6), 0.004034353),
            ((180.0, 0.0), 0.0),
            ((180.0, 137.4), 7.287501e-05),
            ((180.0, 318.0), 1.067247e-17),
            ((180.0, 1024.0), 6.815085e-233),
        ];
        for ((k, m), expected) in cases {
            assert_relative_eq!(poisson_exact(k, m).unwrap(), expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_binomial_series() {
        let expected = [
            0.0282475249,
            0.1210608210,
            0.2334744405,
            0.2668279320,
            0.2001209490,
            0.1029193452,
            0.0367569090,
            0.0090016920,
            0.0014467005,
            0.0001377810,
            0.0000059049,
        ];
        for (i, &e) in expected.iter().enumerate() {
            assert_relative_eq!(binomial_exact(i as f64, 10.0, 0.3).unwrap(), e, max_relative = 1e-7);
        }
    }

    #[test]
    fn test_binomial_exact_matches_r() {
        let cases = [
            ((0.0, 1.0, 0.5), 0.5),
            ((1.0, 1.0, 0.5), 0.5),
            ((1.0, 1.0, 0.0000001), 1e-07),
            ((1.0, 1.0, 0.9999999), 0.9999999),
            ((3.0, 5.0, 0.75), 0.2636719),
            ((0.0, 60.0, 0.5), 8.673617e-19),
            ((129.0, 130.0, 0.5), 9.550892e-38),
            ((299.0, 300.0, 0.099), 1.338965e-298),
            ((9.0, 27.0, 0.0003), 9.175389e-26),
            ((1032.0, 2050.0, 0.5), 0.01679804),
        ];
        for ((k, n, p), expected) in cases {
            assert_relative_eq!(binomial_exact(k, n, p).unwrap(), expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_binomial_exact_fractional_bounds() {
        let cases = [
            ((18.3, 100.0, 0.2), (0.09089812, 0.09807429)),
            ((2.7, 1050.0, 0.006), (0.03615498, 0.07623827)),
            ((2.7, 1050.0, 0.06), (1.365299e-25, 3.044327e-24)),
            ((2.0, 100.5, 0.6), (7.303533e-37, 1.789727e-36)),
            ((10.0, 100.5, 0.5), (7.578011e-18, 1.365543e-17)),
            ((0.2, 60.0, 0.5), (8.673617e-19, 5.20417e-17)),
            ((0.5, 5.0, 0.3), (0.16807, 0.36015)),
        ];
        for ((k, n, p), (lo, hi)) in cases {
            let got = binomial_exact(k, n, p).unwrap();
            assert!(lo < got && got < hi, "binomial_exact({k}, {n}, {p}) = {got}");
        }
    }

    #[test]
    fn test_binomial_exact_errors() {
        assert!(binomial_exact(10.2, 5.0, 0.33).is_err());
        assert!(binomial_exact(-2.0, 5.0, 0.33).is_err());
        assert!(binomial_exact(10.0, 50.0, -2.0).is_err());
        assert!(binomial_exact(10.0, 50.0, 3.0).is_err());
        let err = binomial_exact(10.2, 5.0, 0.33).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_binomial_exact_degenerate_probabilities() {
        assert_eq!(binomial_exact(0.0, 7.0, 0.0).unwrap(), 1.0);
        assert_eq!(binomial_exact(2.0, 7.0, 0.0).unwrap(), 0.0);
        assert_eq!(binomial_exact(7.0, 7.0, 1.0).unwrap(), 1.0);
        assert_eq!(binomial_exact(6.0, 7.0, 1.0).unwrap(), 0.0);
    }
}
