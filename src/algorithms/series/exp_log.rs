use tracing::instrument;

use super::*;
use crate::algorithms::poly_mul::poly_mullow;
use crate::rings::poly::*;

fn exp_constant<R>(ring: R, f: &GrPoly<El<R>>) -> (El<R>, Status)
    where R: RingStore
{
    match f.coefficient_at(0) {
        None => (ring.one(), Status::Success),
        Some(c) if ring.is_zero(c).is_true() => (ring.one(), Status::Success),
        Some(c) => {
            let mut result = ring.zero();
            let status = ring.exp(&mut result, c);
            (result, status)
        }
    }
}

///
/// Computes `exp(f) mod x^n` using the recurrence `k g_k = sum_(j <= k) j f_j g_(k - j)`,
/// which comes from `g' = f' g`.
///
/// This requires dividing by `1, ..., n - 1`, so it fails with [`Status::DomainError`]
/// in characteristic `p < n` or over rings like the integers.
///
#[instrument(skip_all, level = "trace")]
pub fn exp_series_basecase<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let (g0, mut status) = exp_constant(ring, f);
    if !status.is_success() {
        *res = GrPoly::constant(ring, g0);
        return status;
    }
    let mut derivative = Vec::with_capacity(f.len());
    for j in 0..f.len() {
        let mut c = ring.zero();
        status |= ring.mul_si(&mut c, &f.coeffs()[j], j as i64);
        derivative.push(c);
    }
    let mut result = Vec::with_capacity(n);
    result.push(g0);
    for k in 1..n {
        let mut sum = ring.zero();
        for j in 1..=k.min(f.len().saturating_sub(1)) {
            status |= ring.addmul(&mut sum, &derivative[j], &result[k - j]);
        }
        let mut k_el = ring.zero();
        status |= ring.set_si(&mut k_el, k as i64);
        let mut c = ring.zero();
        status |= ring.div(&mut c, &sum, &k_el);
        result.push(c);
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(ring);
    return status;
}

///
/// Computes `exp(f) mod x^n` by Newton iteration `g -> g (1 + f - log(g))`.
///
#[instrument(skip_all, level = "trace")]
pub fn exp_series_newton<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let (g0, mut status) = exp_constant(ring, f);
    if !status.is_success() {
        *res = GrPoly::constant(ring, g0);
        return status;
    }
    let mut current = GrPoly::constant(ring, g0);
    let mut log = GrPoly::new();
    let mut factor = GrPoly::new();
    let mut tmp = GrPoly::new();
    for m in newton_precisions(n).into_iter().skip(1) {
        let log_status = log_series(ring, &mut log, &current, m);
        if !log_status.is_success() {
            status |= log_status;
            break;
        }
        let mut f_trunc = f.clone();
        f_trunc.truncate(m, ring);
        status |= poly_sub(ring, &mut tmp, &f_trunc, &log);
        status |= poly_add(ring, &mut factor, &tmp, &GrPoly::constant(ring, ring.one()));
        status |= poly_mullow(ring, &mut tmp, &current, &factor, m);
        current.swap(&mut tmp);
    }
    *res = current;
    return status;
}

///
/// Computes `exp(f) mod x^n`.
///
/// If the constant coefficient of `f` is not zero, the ring must support
/// [`RingStore::exp()`] for it.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::rational::QQ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::series::*;
/// let f = GrPoly::from_ints(&QQ, &[1, 2, 3]);
/// let mut log = GrPoly::new();
/// let mut exp = GrPoly::new();
/// log_series(&QQ, &mut log, &f, 6).must_succeed();
/// exp_series(&QQ, &mut exp, &log, 6).must_succeed();
/// assert!(poly_equal(&QQ, &f, &exp).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn exp_series<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if f.len() <= 1 {
        tracing::debug!(op = "exp_series", strategy = "scalar", len = n);
        let (g0, status) = exp_constant(ring, f);
        *res = if n == 0 { GrPoly::new() } else { GrPoly::constant(ring, g0) };
        return status;
    }
    if n >= ring.cutoffs().exp_series_newton {
        tracing::debug!(op = "exp_series", strategy = "newton", len = n);
        let status = exp_series_newton(ring, res, f, n);
        if status.is_success() {
            return status;
        }
        tracing::debug!(op = "exp_series", strategy = "basecase", len = n, reason = "newton failed", status = ?status);
    } else {
        tracing::debug!(op = "exp_series", strategy = "basecase", len = n);
    }
    return exp_series_basecase(ring, res, f, n);
}

///
/// Computes `log(f) mod x^n` as `log(f_0) + integral(f' / f)`.
///
/// Fails with [`Status::DomainError`] if the constant coefficient of `f` is zero.
/// Otherwise, the ring must support [`RingStore::log()`] for it, which is always the
/// case if it is one.
///
#[instrument(skip_all, level = "trace")]
pub fn log_series<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = require_nonzero_constant(ring, f) {
        *res = GrPoly::new();
        return status;
    }
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut log_f0 = ring.zero();
    let mut status = ring.log(&mut log_f0, &f.coeffs()[0]);
    let mut derivative = GrPoly::new();
    status |= poly_derivative(ring, &mut derivative, f);
    let mut quotient = GrPoly::new();
    status |= div_series(ring, &mut quotient, &derivative, f, n - 1);
    let mut result = GrPoly::new();
    status |= poly_integral(ring, &mut result, &quotient);
    if !ring.is_zero(&log_f0).is_true() {
        result.set_length(result.len().max(1), ring);
        status |= ring.add_assign(&mut result.coeffs_mut()[0], &log_f0);
        result.normalize(ring);
    }
    *res = result;
    return status;
}

pub fn exp_series_inplace<R>(ring: R, f: &mut GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut result = GrPoly::new();
    let status = exp_series(ring, &mut result, f, n);
    if status.is_success() {
        f.swap(&mut result);
    }
    return status;
}

pub fn log_series_inplace<R>(ring: R, f: &mut GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut result = GrPoly::new();
    let status = log_series(ring, &mut result, f, n);
    if status.is_success() {
        f.swap(&mut result);
    }
    return status;
}

#[cfg(test)]
use crate::rings::rational::{QQ, Rational};
#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::zn::*;
#[cfg(test)]
use crate::rings::ball::RealBallField;
#[cfg(test)]
use crate::tuning::Cutoffs;
#[cfg(test)]
use crate::tracing::SelectionRecorder;
#[cfg(test)]
use crate::ring::RingValue;

#[cfg(test)]
fn rational_poly(coeffs: &[(i64, i64)]) -> GrPoly<Rational> {
    GrPoly::from_coeffs(coeffs.iter().map(|(num, den)| QQ.get_ring().from_fraction(*num, *den)).collect())
}

#[test]
fn test_exp_series_rational() {
    let f = GrPoly::gen(&QQ);
    let expected = rational_poly(&[(1, 1), (1, 1), (1, 2), (1, 6), (1, 24)]);
    let mut g = GrPoly::new();
    exp_series_basecase(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());
    exp_series_newton(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());
    exp_series(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());
}

#[test]
fn test_log_series_rational() {
    let f = GrPoly::from_ints(&QQ, &[1, 1]);
    let expected = rational_poly(&[(0, 1), (1, 1), (-1, 2), (1, 3), (-1, 4)]);
    let mut g = GrPoly::new();
    log_series(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());

    let before = g.clone();
    assert_eq!(Status::DomainError, log_series_inplace(&QQ, &mut g, 5));
    assert_eq!(before, g);
}

#[test]
fn test_exp_log_inverse() {
    let f = GrPoly::from_ints(&QQ, &[1, 2, 3, -1]);
    let mut log = GrPoly::new();
    let mut exp = GrPoly::new();
    log_series(&QQ, &mut log, &f, 10).must_succeed();
    exp_series_basecase(&QQ, &mut exp, &log, 10).must_succeed();
    assert!(poly_equal(&QQ, &f, &exp).is_true());
    exp_series_newton(&QQ, &mut exp, &log, 10).must_succeed();
    assert!(poly_equal(&QQ, &f, &exp).is_true());
}

#[test]
fn test_exp_log_domain_errors() {
    let mut g = GrPoly::new();
    assert_eq!(Status::DomainError, exp_series(&ZZ, &mut g, &GrPoly::gen(&ZZ), 4));
    assert_eq!(Status::DomainError, log_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[2, 1]), 4));
    assert_eq!(Status::DomainError, log_series(&QQ, &mut GrPoly::new(), &GrPoly::gen(&QQ), 4));

    let F7 = Zn::new(7);
    let mut h = GrPoly::new();
    exp_series(&F7, &mut h, &GrPoly::gen(&F7), 7).must_succeed();
    assert_eq!(7, h.len());
    assert_eq!(Status::DomainError, exp_series(&F7, &mut h, &GrPoly::gen(&F7), 8));
}

#[test]
fn test_failed_exp_overwrites_result() {
    let F5 = Zn::new(5);
    let stale = GrPoly::from_ints(&F5, &[3, 3, 3, 3, 3, 3, 3, 3]);
    let mut g = stale.clone();
    assert_eq!(Status::DomainError, exp_series_basecase(&F5, &mut g, &GrPoly::gen(&F5), 7));
    // 1/5! does not exist, so coefficients from x^5 on are placeholders
    assert!(g.len() <= 7);
    assert!(poly_equal(&F5, &stale, &g).is_false());
    for (i, c) in [1, 1, 3, 1, 4].into_iter().enumerate() {
        assert_el_eq!(F5, F5.int(c), g.coeffs()[i]);
    }

    let mut g = stale.clone();
    assert_eq!(Status::DomainError, log_series(&F5, &mut g, &GrPoly::gen(&F5), 7));
    assert!(g.is_empty());
}

#[test]
fn test_exp_series_ball() {
    let RR = RealBallField::new();
    let mut g = GrPoly::new();
    exp_series(&RR, &mut g, &GrPoly::gen(&RR), 6).must_succeed();
    let expected = [1., 1., 0.5, 1. / 6., 1. / 24., 1. / 120.];
    for (i, e) in expected.iter().enumerate() {
        assert!(g.coeffs()[i].contains(*e));
    }
}

#[test]
fn test_exp_series_selection() {
    let F101 = RingValue::from(ZnBase::new(101).with_cutoffs(Cutoffs::fast_always()));
    let f = GrPoly::from_ints(&F101, &[0, 3, 1, 4]);
    let mut newton = GrPoly::new();
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || exp_series(&F101, &mut newton, &f, 20)).must_succeed();
    assert_eq!(Some("newton".to_owned()), recorder.strategy_for("exp_series"));
    let mut basecase = GrPoly::new();
    exp_series_basecase(&F101, &mut basecase, &f, 20).must_succeed();
    assert!(poly_equal(&F101, &basecase, &newton).is_true());

    recorder.clear();
    let F7 = RingValue::from(ZnBase::new(7).with_cutoffs(Cutoffs::fast_always()));
    let f = GrPoly::gen(&F7);
    let status = tracing::subscriber::with_default(recorder.clone(), || exp_series(&F7, &mut GrPoly::new(), &f, 10));
    assert_eq!(Status::DomainError, status);
    assert!(recorder.decisions().iter().any(|(op, strategy)| op == "exp_series" && strategy == "basecase"));
}
