use tracing::instrument;

use super::*;
use crate::algorithms::poly_mul::poly_mullow;
use crate::rings::poly::*;

///
/// Computes the square root `res` of `f` modulo `x^n` using the classical recurrence
/// `2 g_0 g_k = f_k - sum_{0 < j < k} g_j g_(k - j)`.
///
/// The constant coefficient of `f` must have a square root in the ring, and all
/// divisions by `2 g_0` must be exact.
///
#[instrument(skip_all, level = "trace")]
pub fn sqrt_series_basecase<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut g0 = ring.zero();
    let status = ring.sqrt(&mut g0, &f.coeff(0, ring));
    if !status.is_success() {
        *res = GrPoly::new();
        return status;
    }
    let mut two_g0 = ring.zero();
    let mut status = ring.add(&mut two_g0, &g0, &g0);
    let divisor = ScalarDivisor::new(ring, &two_g0);
    let mut result = Vec::with_capacity(n);
    result.push(g0.clone());
    for k in 1..n {
        let mut current = f.coeff(k, ring);
        for j in 1..k {
            status |= ring.submul(&mut current, &result[j], &result[k - j]);
        }
        let mut c = ring.zero();
        status |= divisor.divide(&mut c, &current);
        result.push(c);
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(ring);
    return status;
}

///
/// Computes the reciprocal square root `res` of `f` modulo `x^n`, i.e. `res^2 f = 1`,
/// by Newton iteration `r -> r + r (1 - f r^2) / 2`.
///
/// This requires `2` and the square root of the constant coefficient of `f` to be
/// invertible.
///
#[instrument(skip_all, level = "trace")]
pub fn rsqrt_series_newton<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut half = ring.zero();
    let status = ring.inv(&mut half, &ring.int(2));
    if !status.is_success() {
        *res = GrPoly::new();
        return status;
    }
    let mut root = ring.zero();
    let status = ring.sqrt(&mut root, &f.coeff(0, ring));
    if !status.is_success() {
        *res = GrPoly::new();
        return status;
    }
    let mut r0 = ring.zero();
    let mut status = ring.inv(&mut r0, &root);
    if !status.is_success() {
        *res = GrPoly::new();
        return status;
    }
    let mut current = GrPoly::constant(ring, r0);
    let mut square = GrPoly::new();
    let mut tmp = GrPoly::new();
    let mut error = GrPoly::new();
    let mut correction = GrPoly::new();
    for m in newton_precisions(n).into_iter().skip(1) {
        status |= poly_mullow(ring, &mut square, &current, &current, m);
        status |= poly_mullow(ring, &mut tmp, f, &square, m);
        status |= one_minus(ring, &mut error, &tmp);
        status |= poly_mullow(ring, &mut correction, &current, &error, m);
        status |= poly_mul_scalar(ring, &mut tmp, &correction, &half);
        status |= poly_add_assign(ring, &mut current, &tmp);
    }
    *res = current;
    return status;
}

///
/// Computes the square root of `f` modulo `x^n` as `f / sqrt(f)`, using
/// [`rsqrt_series_newton()`].
///
#[instrument(skip_all, level = "trace")]
pub fn sqrt_series_newton<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut rsqrt = GrPoly::new();
    let status = rsqrt_series_newton(ring, &mut rsqrt, f, n);
    return status | poly_mullow(ring, res, f, &rsqrt, n);
}

///
/// Computes a square root `res` of `f` modulo `x^n`.
///
/// Leading zero coefficients of `f` are handled by factoring out `x^v`, which fails
/// with [`Status::DomainError`] if `v` is odd, and with [`Status::Unable`] if the
/// valuation cannot be determined. The root of the remaining series is then computed
/// by Newton iteration or by the classical recurrence.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::series::sqrt_series;
/// let mut g = GrPoly::new();
/// sqrt_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[0, 0, 1, 2, 1]), 4).must_succeed();
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[0, 1, 1]), &g).is_true());
/// assert_eq!(Status::DomainError, sqrt_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[0, 1]), 4));
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn sqrt_series<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut valuation = 0;
    while valuation < f.len() {
        match ring.is_zero(&f.coeffs()[valuation]) {
            Truth::True => valuation += 1,
            Truth::False => break,
            Truth::Unknown => {
                *res = GrPoly::new();
                return Status::Unable;
            }
        }
    }
    if valuation == f.len() || valuation / 2 >= n {
        *res = GrPoly::new();
        return Status::Success;
    }
    if valuation % 2 != 0 {
        *res = GrPoly::new();
        return Status::DomainError;
    }
    let mut unit = GrPoly::new();
    poly_shift_right(&mut unit, f, valuation);
    let m = n - valuation / 2;

    let mut root = GrPoly::new();
    let use_newton = m >= ring.cutoffs().sqrt_series_newton && ring.is_invertible(&ring.int(2)).is_true() && ring.is_invertible(&unit.coeffs()[0]).is_true();
    let status = if use_newton {
        tracing::debug!(op = "sqrt_series", strategy = "newton", len = m);
        let status = sqrt_series_newton(ring, &mut root, &unit, m);
        if status.is_success() {
            status
        } else {
            tracing::debug!(op = "sqrt_series", strategy = "basecase", len = m, reason = "newton failed", status = ?status);
            sqrt_series_basecase(ring, &mut root, &unit, m)
        }
    } else {
        tracing::debug!(op = "sqrt_series", strategy = "basecase", len = m);
        sqrt_series_basecase(ring, &mut root, &unit, m)
    };
    poly_shift_left(ring, res, &root, valuation / 2);
    res.truncate(n, ring);
    return status;
}

pub fn sqrt_series_inplace<R>(ring: R, f: &mut GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut result = GrPoly::new();
    let status = sqrt_series(ring, &mut result, f, n);
    if status.is_success() {
        f.swap(&mut result);
    }
    return status;
}

#[cfg(test)]
use crate::rings::rational::QQ;
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

#[test]
fn test_sqrt_series_rational() {
    let f = GrPoly::from_ints(&QQ, &[1, 1]);
    let expected = GrPoly::from_coeffs(vec![
        QQ.one(),
        QQ.get_ring().from_fraction(1, 2),
        QQ.get_ring().from_fraction(-1, 8),
        QQ.get_ring().from_fraction(1, 16),
        QQ.get_ring().from_fraction(-5, 128)
    ]);
    let mut g = GrPoly::new();
    sqrt_series_basecase(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());
    sqrt_series_newton(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());
    sqrt_series(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());

    let mut square = GrPoly::new();
    sqrt_series(&QQ, &mut g, &f, 12).must_succeed();
    poly_mullow(&QQ, &mut square, &g, &g, 12).must_succeed();
    assert!(poly_equal(&QQ, &f, &square).is_true());
}

#[test]
fn test_sqrt_series_valuation() {
    let f = GrPoly::from_ints(&ZZ, &[0, 0, 1, 2, 1]);
    let mut g = GrPoly::new();
    sqrt_series(&ZZ, &mut g, &f, 4).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[0, 1, 1]), &g).is_true());
    sqrt_series(&ZZ, &mut g, &f, 2).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[0, 1]), &g).is_true());
    sqrt_series(&ZZ, &mut g, &f, 1).must_succeed();
    assert!(g.is_empty());
    sqrt_series(&ZZ, &mut g, &GrPoly::new(), 4).must_succeed();
    assert!(g.is_empty());

    assert_eq!(Status::DomainError, sqrt_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[0, 0, 0, 1]), 4));
    assert_eq!(Status::DomainError, sqrt_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[2, 1]), 4));
}

#[test]
fn test_failed_sqrt_series_overwrites_result() {
    let stale = GrPoly::from_ints(&ZZ, &[7, 7, 7, 7]);
    let mut g = stale.clone();
    // sqrt(4 + x) needs the coefficient 1/4
    assert_eq!(Status::DomainError, sqrt_series_basecase(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[4, 1]), 3));
    assert!(poly_equal(&ZZ, &stale, &g).is_false());
    assert_el_eq!(ZZ, ZZ.int(2), g.coeff(0, &ZZ));

    let mut g = stale.clone();
    assert_eq!(Status::DomainError, sqrt_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[0, 1]), 4));
    assert!(g.is_empty());
}

#[test]
fn test_sqrt_series_non_square_constant() {
    let F5 = Zn::new(5);
    let mut g = GrPoly::new();
    assert_eq!(Status::DomainError, sqrt_series(&F5, &mut g, &GrPoly::from_ints(&F5, &[2, 1]), 4));
    sqrt_series(&F5, &mut g, &GrPoly::from_ints(&F5, &[4, 1]), 6).must_succeed();
    let mut square = GrPoly::new();
    poly_mullow(&F5, &mut square, &g, &g, 6).must_succeed();
    assert!(poly_equal(&F5, &GrPoly::from_ints(&F5, &[4, 1]), &square).is_true());
}

#[test]
fn test_sqrt_series_unknown_valuation() {
    let RR = RealBallField::new();
    let f = GrPoly::from_coeffs(vec![RR.get_ring().ball(0., 1e-3), RR.one()]);
    let mut g = GrPoly::new();
    assert_eq!(Status::Unable, sqrt_series(&RR, &mut g, &f, 4));
}

#[test]
fn test_sqrt_series_selection() {
    let F13 = RingValue::from(ZnBase::new(13).with_cutoffs(Cutoffs::fast_always()));
    let f = GrPoly::from_ints(&F13, &[9, 1, 2, 3]);
    let mut g = GrPoly::new();
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || sqrt_series(&F13, &mut g, &f, 10)).must_succeed();
    assert_eq!(Some("newton".to_owned()), recorder.strategy_for("sqrt_series"));
    let mut basecase = GrPoly::new();
    sqrt_series_basecase(&F13, &mut basecase, &f, 10).must_succeed();
    let mut square = GrPoly::new();
    poly_mullow(&F13, &mut square, &g, &g, 10).must_succeed();
    assert!(poly_equal(&F13, &f, &square).is_true());
    poly_mullow(&F13, &mut square, &basecase, &basecase, 10).must_succeed();
    assert!(poly_equal(&F13, &f, &square).is_true());
}
