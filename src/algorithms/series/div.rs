use std::cmp::min;

use tracing::instrument;

use super::*;
use crate::algorithms::poly_mul::poly_mullow;
use crate::rings::poly::*;

///
/// Computes `res` with `res * b = a mod x^n` by the classical recurrence.
///
/// The constant coefficient of `b` does not have to be invertible, as long as all
/// occurring divisions are exact. This makes it possible to e.g. compute `2 / (2 - 2x)`
/// over the integers.
///
#[instrument(skip_all, level = "trace")]
pub fn div_series_basecase<R>(ring: R, res: &mut GrPoly<El<R>>, a: &GrPoly<El<R>>, b: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = require_nonzero_constant(ring, b) {
        *res = GrPoly::new();
        return status;
    }
    if n == 0 || a.is_empty() {
        *res = GrPoly::new();
        return Status::Success;
    }
    let divisor = ScalarDivisor::new(ring, &b.coeffs()[0]);
    let mut status = Status::Success;
    let mut result: Vec<El<R>> = Vec::with_capacity(n);
    for k in 0..n {
        let mut current = a.coeff(k, ring);
        for j in 1..min(k + 1, b.len()) {
            status |= ring.submul(&mut current, &b.coeffs()[j], &result[k - j]);
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
/// Computes `res` with `res * b = a mod x^n` as `a * (1 / b)`, where the inverse of
/// `b` is computed by Newton iteration. This requires the constant coefficient of `b`
/// to be invertible.
///
#[instrument(skip_all, level = "trace")]
pub fn div_series_newton<R>(ring: R, res: &mut GrPoly<El<R>>, a: &GrPoly<El<R>>, b: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = require_nonzero_constant(ring, b) {
        *res = GrPoly::new();
        return status;
    }
    let mut b_inv = GrPoly::new();
    let status = inv_series_newton(ring, &mut b_inv, b, n);
    return status | poly_mullow(ring, res, a, &b_inv, n);
}

///
/// Computes `res` with `res * b = a mod x^n`.
///
/// Fails with [`Status::DomainError`] if the constant coefficient of `b` is zero, since
/// the quotient then is not a power series anymore. If the constant coefficient is
/// invertible and `n` is large, this uses Newton iteration, otherwise the classical
/// recurrence, which also works if all occurring divisions are exact.
///
#[instrument(skip_all, level = "trace")]
pub fn div_series<R>(ring: R, res: &mut GrPoly<El<R>>, a: &GrPoly<El<R>>, b: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = require_nonzero_constant(ring, b) {
        *res = GrPoly::new();
        return status;
    }
    if a.is_empty() || n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    if b.len() == 1 {
        tracing::debug!(op = "div_series", strategy = "scalar", len = n);
        let divisor = ScalarDivisor::new(ring, &b.coeffs()[0]);
        let mut status = Status::Success;
        let mut result = Vec::with_capacity(min(n, a.len()));
        for c in a.coeffs().iter().take(n) {
            let mut q = ring.zero();
            status |= divisor.divide(&mut q, c);
            result.push(q);
        }
        *res = GrPoly::from_coeffs(result);
        res.normalize(ring);
        return status;
    }
    if n >= ring.cutoffs().div_series_newton && ring.is_invertible(&b.coeffs()[0]).is_true() {
        tracing::debug!(op = "div_series", strategy = "newton", len = n);
        let status = div_series_newton(ring, res, a, b, n);
        if status.is_success() {
            return status;
        }
        tracing::debug!(op = "div_series", strategy = "basecase", len = n, reason = "newton failed", status = ?status);
    } else {
        tracing::debug!(op = "div_series", strategy = "basecase", len = n);
    }
    return div_series_basecase(ring, res, a, b, n);
}

///
/// Computes `a = a / b mod x^n`.
///
pub fn div_series_inplace<R>(ring: R, a: &mut GrPoly<El<R>>, b: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut result = GrPoly::new();
    let status = div_series(ring, &mut result, a, b, n);
    if status.is_success() {
        a.swap(&mut result);
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
use crate::tuning::Cutoffs;
#[cfg(test)]
use crate::tracing::SelectionRecorder;
#[cfg(test)]
use crate::ring::RingValue;

#[test]
fn test_div_geometric_series() {
    let a = GrPoly::from_ints(&QQ, &[1]);
    let b = GrPoly::from_ints(&QQ, &[1, -1]);
    let expected = GrPoly::from_ints(&QQ, &[1, 1, 1, 1, 1]);
    let mut q = GrPoly::new();
    div_series_basecase(&QQ, &mut q, &a, &b, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &q).is_true());
    div_series_newton(&QQ, &mut q, &a, &b, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &q).is_true());
    div_series(&QQ, &mut q, &a, &b, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &q).is_true());
}

#[test]
fn test_div_series_exact_over_integers() {
    let a = GrPoly::from_ints(&ZZ, &[2]);
    let b = GrPoly::from_ints(&ZZ, &[2, -2]);
    let expected = GrPoly::from_ints(&ZZ, &[1, 1, 1, 1, 1, 1]);
    let mut q = GrPoly::new();
    assert_eq!(Status::DomainError, div_series_newton(&ZZ, &mut q, &a, &b, 6));
    div_series_basecase(&ZZ, &mut q, &a, &b, 6).must_succeed();
    assert!(poly_equal(&ZZ, &expected, &q).is_true());

    let Z4 = RingValue::from(ZnBase::new(4).with_cutoffs(Cutoffs::fast_always()));
    let a = GrPoly::from_ints(&Z4, &[2]);
    let b = GrPoly::from_ints(&Z4, &[2, -2]);
    let mut q = GrPoly::new();
    let recorder = SelectionRecorder::new();
    let status = tracing::subscriber::with_default(recorder.clone(), || div_series(&Z4, &mut q, &a, &b, 6));
    status.must_succeed();
    assert_eq!(Some("basecase".to_owned()), recorder.strategy_for("div_series"));
    let mut check = GrPoly::new();
    poly_mullow(&Z4, &mut check, &q, &b, 6).must_succeed();
    assert!(poly_equal(&Z4, &a, &check).is_true());

    let a = GrPoly::from_ints(&ZZ, &[1]);
    let b = GrPoly::from_ints(&ZZ, &[2, -2]);
    let mut q = GrPoly::new();
    assert_eq!(Status::DomainError, div_series(&ZZ, &mut q, &a, &b, 3));
}

#[test]
fn test_failed_div_series_overwrites_result() {
    let a = GrPoly::from_ints(&ZZ, &[2, 1]);
    let b = GrPoly::from_ints(&ZZ, &[2, -2]);
    let stale = GrPoly::from_ints(&ZZ, &[7, 7, 7, 7]);
    let mut q = stale.clone();
    // 3/2 is not an integer
    assert_eq!(Status::DomainError, div_series_basecase(&ZZ, &mut q, &a, &b, 3));
    assert!(poly_equal(&ZZ, &stale, &q).is_false());
    assert_el_eq!(ZZ, ZZ.int(1), q.coeff(0, &ZZ));

    let mut q = stale.clone();
    assert_eq!(Status::DomainError, div_series(&ZZ, &mut q, &a, &GrPoly::from_ints(&ZZ, &[2]), 3));
    assert_el_eq!(ZZ, ZZ.int(1), q.coeff(0, &ZZ));
    assert!(q.len() <= 2);

    let mut q = stale.clone();
    assert_eq!(Status::DomainError, div_series(&ZZ, &mut q, &a, &GrPoly::gen(&ZZ), 3));
    assert!(q.is_empty());
}

#[test]
fn test_div_series_zero_constant() {
    let a = GrPoly::from_ints(&QQ, &[1, 1]);
    let b = GrPoly::from_ints(&QQ, &[0, 1]);
    let mut q = GrPoly::new();
    assert_eq!(Status::DomainError, div_series(&QQ, &mut q, &a, &b, 4));
    assert_eq!(Status::DomainError, div_series(&QQ, &mut q, &a, &GrPoly::new(), 4));
    assert_eq!(Status::DomainError, div_series_basecase(&QQ, &mut q, &a, &b, 4));
}

#[test]
fn test_div_series_selection() {
    let F17 = RingValue::from(ZnBase::new(17).with_cutoffs(Cutoffs::fast_always()));
    let a = GrPoly::from_ints(&F17, &[1, 2, 3, 4, 5, 6]);
    let b = GrPoly::from_ints(&F17, &[3, 1, 4]);
    let mut q = GrPoly::new();
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || div_series(&F17, &mut q, &a, &b, 8)).must_succeed();
    assert_eq!(Some("newton".to_owned()), recorder.strategy_for("div_series"));
    let mut check = GrPoly::new();
    poly_mullow(&F17, &mut check, &q, &b, 8).must_succeed();
    assert!(poly_equal(&F17, &a, &check).is_true());

    recorder.clear();
    let b = GrPoly::from_ints(&F17, &[3]);
    tracing::subscriber::with_default(recorder.clone(), || div_series(&F17, &mut q, &a, &b, 4)).must_succeed();
    assert_eq!(Some("scalar".to_owned()), recorder.strategy_for("div_series"));
    assert_eq!(4, q.len());
}

#[test]
fn test_div_series_inplace() {
    let mut a = GrPoly::from_ints(&QQ, &[1, 2, 3]);
    let b = GrPoly::from_ints(&QQ, &[1, 1]);
    div_series_inplace(&QQ, &mut a, &b, 3).must_succeed();
    assert!(poly_equal(&QQ, &GrPoly::from_ints(&QQ, &[1, 1, 2]), &a).is_true());
}
