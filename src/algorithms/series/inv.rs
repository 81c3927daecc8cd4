use std::cmp::min;

use tracing::instrument;

use super::*;
use crate::algorithms::poly_mul::poly_mullow;
use crate::rings::poly::*;

///
/// Computes `res` with `res * f = 1 mod x^n` by the classical recurrence.
///
/// This requires the constant coefficient of `f` to be invertible, and fails with
/// the status of inverting it otherwise.
///
#[instrument(skip_all, level = "trace")]
pub fn inv_series_basecase<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore
{
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let f0 = match f.coefficient_at(0) {
        Some(f0) => f0,
        None => {
            *res = GrPoly::new();
            return Status::DomainError;
        }
    };
    let mut f0_inv = ring.zero();
    let status = ring.inv(&mut f0_inv, f0);
    if !status.is_success() {
        *res = GrPoly::new();
        return status;
    }
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(n);
    result.push(f0_inv.clone());
    for k in 1..n {
        let mut sum = ring.zero();
        for j in 1..min(k + 1, f.len()) {
            status |= ring.addmul(&mut sum, &f.coeffs()[j], &result[k - j]);
        }
        status |= ring.neg_inplace(&mut sum);
        let mut c = ring.zero();
        status |= ring.mul(&mut c, &sum, &f0_inv);
        result.push(c);
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(ring);
    return status;
}

///
/// Computes `res` with `res * f = 1 mod x^n` by Newton iteration, i.e. by repeatedly
/// doubling the precision using `g -> g + g (1 - f g)`.
///
#[instrument(skip_all, level = "trace")]
pub fn inv_series_newton<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let precisions = newton_precisions(n);
    let mut current = GrPoly::new();
    let mut status = inv_series_basecase(ring, &mut current, f, precisions[0]);
    if !status.is_success() {
        *res = current;
        return status;
    }
    let mut error = GrPoly::new();
    let mut correction = GrPoly::new();
    let mut tmp = GrPoly::new();
    for m in precisions.into_iter().skip(1) {
        status |= poly_mullow(ring, &mut tmp, f, &current, m);
        status |= one_minus(ring, &mut error, &tmp);
        status |= poly_mullow(ring, &mut correction, &current, &error, m);
        status |= poly_add_assign(ring, &mut current, &correction);
    }
    *res = current;
    return status;
}

///
/// Computes `res` with `res * f = 1 mod x^n`.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::rings::rational::QQ;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::series::inv_series;
/// let mut g = GrPoly::new();
/// inv_series(&QQ, &mut g, &GrPoly::from_ints(&QQ, &[1, -1]), 4).must_succeed();
/// assert!(poly_equal(&QQ, &GrPoly::from_ints(&QQ, &[1, 1, 1, 1]), &g).is_true());
/// let mut h = GrPoly::new();
/// assert_eq!(Status::DomainError, inv_series(&ZZ, &mut h, &GrPoly::from_ints(&ZZ, &[2, 1]), 4));
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn inv_series<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if n >= ring.cutoffs().inv_series_newton && f.len() > 1 {
        tracing::debug!(op = "inv_series", strategy = "newton", len = n);
        return inv_series_newton(ring, res, f, n);
    } else {
        tracing::debug!(op = "inv_series", strategy = "basecase", len = n);
        return inv_series_basecase(ring, res, f, n);
    }
}

pub fn inv_series_inplace<R>(ring: R, f: &mut GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut result = GrPoly::new();
    let status = inv_series(ring, &mut result, f, n);
    f.swap(&mut result);
    return status;
}

#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::rings::ball::RealBallField;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[test]
fn test_inv_geometric_series() {
    LogAlgorithmSubscriber::init_test();
    let f = GrPoly::from_ints(&QQ, &[1, -1]);
    let expected = GrPoly::from_ints(&QQ, &[1, 1, 1, 1, 1]);
    let mut g = GrPoly::new();
    inv_series_basecase(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());
    inv_series_newton(&QQ, &mut g, &f, 5).must_succeed();
    assert!(poly_equal(&QQ, &expected, &g).is_true());
}

#[test]
fn test_inv_series_zero_divisor() {
    let Z6 = Zn::new(6);
    let f = GrPoly::from_ints(&Z6, &[2, 1]);
    let mut g = GrPoly::new();
    assert_eq!(Status::DomainError, inv_series_basecase(&Z6, &mut g, &f, 3));
    assert_eq!(Status::DomainError, inv_series_newton(&Z6, &mut g, &f, 3));
    assert_eq!(Status::DomainError, inv_series(&Z6, &mut g, &GrPoly::new(), 3));
    inv_series(&Z6, &mut g, &f, 0).must_succeed();
    assert!(g.is_empty());
}

#[test]
fn test_inv_series_ball() {
    let RR = RealBallField::new();
    let f = GrPoly::from_coeffs(vec![RR.get_ring().ball(0., 1e-3), RR.one()]);
    let mut g = GrPoly::new();
    assert_eq!(Status::Unable, inv_series(&RR, &mut g, &f, 4));
    let f = GrPoly::from_ints(&RR, &[2, 3, 1]);
    let mut check = GrPoly::new();
    inv_series_newton(&RR, &mut g, &f, 20).must_succeed();
    poly_mullow(&RR, &mut check, &f, &g, 20).must_succeed();
    assert!(!poly_is_one(&RR, &check).is_false());
}

#[test]
fn test_inv_series_inplace() {
    let F7 = Zn::new(7);
    let mut f = GrPoly::from_ints(&F7, &[3, 1, 4, 1, 5]);
    let original = f.clone();
    inv_series_inplace(&F7, &mut f, 10).must_succeed();
    let mut check = GrPoly::new();
    poly_mullow(&F7, &mut check, &original, &f, 10).must_succeed();
    assert!(poly_is_one(&F7, &check).is_true());
}
