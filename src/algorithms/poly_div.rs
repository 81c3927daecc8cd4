use tracing::instrument;

use crate::algorithms::poly_mul::*;
use crate::algorithms::series::{inv_series, ScalarDivisor};
use crate::ring::*;
use crate::rings::poly::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// Below this degree of divisor or quotient, [`poly_divrem_divconquer()`] uses
/// [`poly_divrem_basecase()`].
///
#[stability::unstable(feature = "enable")]
pub const DIVCONQUER_BASECASE: usize = 8;

///
/// Checks the divisor of a polynomial division. Returns `None` if the division can
/// proceed, and otherwise the status to report.
///
fn check_divisor<R>(ring: R, divisor: &GrPoly<El<R>>) -> Option<Status>
    where R: RingStore
{
    match divisor.lc() {
        None => Some(Status::DomainError),
        Some(lc) => match ring.is_zero(lc) {
            Truth::False => None,
            Truth::Unknown => Some(Status::Unable),
            // not normalized, can only happen if constructed manually
            Truth::True => Some(Status::DomainError)
        }
    }
}

fn trivial_divrem<T: Clone>(quo: &mut GrPoly<T>, rem: &mut GrPoly<T>, lhs: &GrPoly<T>) {
    *quo = GrPoly::new();
    *rem = lhs.clone();
}

///
/// Computes `lhs = quo * rhs + rem` with `deg(rem) < deg(rhs)` by schoolbook division.
///
/// If the leading coefficient of `rhs` is provably invertible, this multiplies by its
/// inverse. Otherwise, every step uses exact division by it, which fails with
/// [`Status::DomainError`] if the quotient does not exist. Hence this succeeds e.g.
/// for polynomials over `Z` whenever the quotient has integral coefficients.
///
#[instrument(skip_all, level = "trace")]
pub fn poly_divrem_basecase<R>(ring: R, quo: &mut GrPoly<El<R>>, rem: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    if let Some(status) = check_divisor(&ring, rhs) {
        return status;
    }
    if lhs.len() < rhs.len() {
        trivial_divrem(quo, rem, lhs);
        return Status::Success;
    }
    let rhs_len = rhs.len();
    let quo_len = lhs.len() - rhs_len + 1;
    let lc = &rhs.coeffs()[rhs_len - 1];
    let divisor = ScalarDivisor::new(&ring, lc);

    let mut status = Status::Success;
    let mut remainder = lhs.coeffs().to_vec();
    let mut quotient = (0..quo_len).map(|_| ring.zero()).collect::<Vec<_>>();
    for i in (0..quo_len).rev() {
        let top = std::mem::replace(&mut remainder[i + rhs_len - 1], ring.zero());
        if ring.is_zero(&top).is_true() {
            continue;
        }
        status |= divisor.divide(&mut quotient[i], &top);
        for j in 0..(rhs_len - 1) {
            status |= ring.submul(&mut remainder[i + j], &quotient[i], &rhs.coeffs()[j]);
        }
    }
    remainder.truncate(rhs_len - 1);
    *quo = GrPoly::from_coeffs(quotient);
    quo.normalize(&ring);
    *rem = GrPoly::from_coeffs(remainder);
    rem.normalize(&ring);
    return status;
}

///
/// Computes the polynomial division by reducing it to a division of power series,
/// using the reversed polynomials. This requires the leading coefficient of `rhs`
/// to be invertible.
///
#[instrument(skip_all, level = "trace")]
pub fn poly_divrem_newton<R>(ring: R, quo: &mut GrPoly<El<R>>, rem: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_divisor(ring, rhs) {
        return status;
    }
    if lhs.len() < rhs.len() {
        trivial_divrem(quo, rem, lhs);
        return Status::Success;
    }
    let quo_len = lhs.len() - rhs.len() + 1;
    let mut lhs_rev = GrPoly::new();
    let mut rhs_rev = GrPoly::new();
    poly_reverse(ring, &mut lhs_rev, lhs, lhs.len());
    poly_reverse(ring, &mut rhs_rev, rhs, rhs.len());

    let mut rhs_rev_inv = GrPoly::new();
    let status = inv_series(ring, &mut rhs_rev_inv, &rhs_rev, quo_len);
    if !status.is_success() {
        return status;
    }
    let mut quo_rev = GrPoly::new();
    let mut status = poly_mullow(ring, &mut quo_rev, &lhs_rev, &rhs_rev_inv, quo_len);
    let mut quotient = GrPoly::new();
    poly_reverse(ring, &mut quotient, &quo_rev, quo_len);

    let rem_len = rhs.len() - 1;
    let mut product = GrPoly::new();
    status |= poly_mullow(ring, &mut product, &quotient, rhs, rem_len);
    let mut lhs_low = lhs.clone();
    lhs_low.truncate(rem_len, ring);
    status |= poly_sub(ring, rem, &lhs_low, &product);
    *quo = quotient;
    return status;
}

fn divconquer_impl<R>(ring: R, lhs: GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> (GrPoly<El<R>>, GrPoly<El<R>>, Status)
    where R: RingStore + Copy
{
    let Some(deg_g) = rhs.degree() else {
        return (GrPoly::new(), lhs, Status::DomainError);
    };
    let deg_f = match lhs.degree() {
        Some(d) if d >= deg_g => d,
        _ => return (GrPoly::new(), lhs, Status::Success)
    };
    if deg_g < DIVCONQUER_BASECASE || deg_f - deg_g < DIVCONQUER_BASECASE {
        let mut quo = GrPoly::new();
        let mut rem = GrPoly::new();
        let status = poly_divrem_basecase(ring, &mut quo, &mut rem, &lhs, rhs);
        return (quo, rem, status);
    }

    let (split_f, split_g) = if deg_f >= 3 * deg_g {
        (deg_f / 3, 0)
    } else if 2 * (deg_f / 3) < deg_g {
        (deg_g / 2, deg_g / 2)
    } else {
        (deg_f / 3, deg_g - deg_f / 3)
    };
    debug_assert!(split_f >= split_g);

    let mut f_upper = GrPoly::new();
    poly_shift_right(&mut f_upper, &lhs, split_f);
    let mut f_lower = lhs;
    f_lower.truncate(split_f, ring);
    let mut g_upper = GrPoly::new();
    poly_shift_right(&mut g_upper, rhs, split_g);
    let mut g_lower = rhs.clone();
    g_lower.truncate(split_g, ring);

    let (q_upper, r_upper, mut status) = divconquer_impl(ring, f_upper, &g_upper);

    let mut tmp = GrPoly::new();
    poly_shift_left(ring, &mut tmp, &r_upper, split_f);
    status |= poly_add_assign(ring, &mut f_lower, &tmp);
    status |= poly_mul_inplace(ring, &mut g_lower, &q_upper);
    poly_shift_left(ring, &mut tmp, &g_lower, split_f - split_g);
    status |= poly_sub_assign(ring, &mut f_lower, &tmp);

    let (mut q_lower, rem, lower_status) = divconquer_impl(ring, f_lower, rhs);
    status |= lower_status;
    poly_shift_left(ring, &mut tmp, &q_upper, split_f - split_g);
    status |= poly_add_assign(ring, &mut q_lower, &tmp);
    return (q_lower, rem, status);
}

///
/// Computes the polynomial division by recursively splitting dividend and divisor.
/// This does not require inverting the leading coefficient of `rhs`, the divisions
/// by it are exact divisions as in [`poly_divrem_basecase()`].
///
#[instrument(skip_all, level = "trace")]
pub fn poly_divrem_divconquer<R>(ring: R, quo: &mut GrPoly<El<R>>, rem: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_divisor(ring, rhs) {
        return status;
    }
    let (q, r, status) = divconquer_impl(ring, lhs.clone(), rhs);
    *quo = q;
    *rem = r;
    return status;
}

///
/// Computes `lhs = quo * rhs + rem` with `deg(rem) < deg(rhs)`.
///
/// Division by the zero polynomial is a [`Status::DomainError`]. The Newton-based
/// algorithm is only used if the leading coefficient of `rhs` is provably invertible,
/// otherwise large inputs use [`poly_divrem_divconquer()`].
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::poly_div::*;
/// let f = GrPoly::from_ints(&ZZ, &[-2, 0, 2]);
/// let g = GrPoly::from_ints(&ZZ, &[-2, 2]);
/// let (mut q, mut r) = (GrPoly::new(), GrPoly::new());
/// poly_divrem(&ZZ, &mut q, &mut r, &f, &g).must_succeed();
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1, 1]), &q).is_true());
/// assert!(r.is_empty());
/// assert_eq!(Status::DomainError, poly_divrem(&ZZ, &mut q, &mut r, &f, &GrPoly::from_ints(&ZZ, &[1, 2])));
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn poly_divrem<R>(ring: R, quo: &mut GrPoly<El<R>>, rem: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_divisor(ring, rhs) {
        return status;
    }
    if lhs.len() < rhs.len() {
        trivial_divrem(quo, rem, lhs);
        return Status::Success;
    }
    if rhs.len() == 1 {
        tracing::debug!(op = "poly_divrem", strategy = "scalar", len = lhs.len());
        let divisor = ScalarDivisor::new(ring, &rhs.coeffs()[0]);
        let mut status = Status::Success;
        let mut quotient = lhs.clone();
        for c in quotient.coeffs_mut().iter_mut() {
            let value = std::mem::replace(c, ring.zero());
            status |= divisor.divide(c, &value);
        }
        quotient.normalize(ring);
        *quo = quotient;
        *rem = GrPoly::new();
        return status;
    }
    let cutoffs = ring.cutoffs();
    let size = std::cmp::min(lhs.len() - rhs.len() + 1, rhs.len());
    if size >= cutoffs.divrem_newton && rhs.lc().map(|lc| ring.is_invertible(lc).is_true()).unwrap_or(false) {
        tracing::debug!(op = "poly_divrem", strategy = "newton", len = lhs.len());
        let status = poly_divrem_newton(ring, quo, rem, lhs, rhs);
        if status.is_success() {
            return status;
        }
        tracing::debug!(op = "poly_divrem", strategy = "basecase", reason = "newton failed", status = ?status);
        return poly_divrem_basecase(ring, quo, rem, lhs, rhs);
    } else if size >= cutoffs.divrem_divconquer {
        tracing::debug!(op = "poly_divrem", strategy = "divconquer", len = lhs.len());
        return poly_divrem_divconquer(ring, quo, rem, lhs, rhs);
    } else {
        tracing::debug!(op = "poly_divrem", strategy = "basecase", len = lhs.len());
        return poly_divrem_basecase(ring, quo, rem, lhs, rhs);
    }
}

pub fn poly_div<R>(ring: R, quo: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let mut rem = GrPoly::new();
    poly_divrem(ring, quo, &mut rem, lhs, rhs)
}

pub fn poly_rem<R>(ring: R, rem: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let mut quo = GrPoly::new();
    poly_divrem(ring, &mut quo, rem, lhs, rhs)
}

///
/// Computes `quo = lhs / rhs`, where `rhs` is expected to divide `lhs`. Returns
/// [`Status::DomainError`] if the remainder is provably nonzero.
///
pub fn poly_divexact<R>(ring: R, quo: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let mut rem = GrPoly::new();
    let status = poly_divrem(ring, quo, &mut rem, lhs, rhs);
    if !status.is_success() {
        return status;
    }
    match poly_is_zero(ring, &rem) {
        Truth::True => Status::Success,
        Truth::False => Status::DomainError,
        Truth::Unknown => Status::Unable
    }
}

///
/// Computes the pseudo-remainder `lc(rhs)^(deg(lhs) - deg(rhs) + 1) * lhs mod rhs`,
/// without any division in the base ring.
///
pub fn poly_pseudo_rem<R>(ring: R, rem: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_divisor(ring, rhs) {
        return status;
    }
    let Some((lc, rhs_tail)) = rhs.coeffs().split_last() else {
        return Status::DomainError;
    };
    let rhs_len = rhs.len();
    let mut status = Status::Success;
    let mut current = lhs.coeffs().to_vec();
    while current.len() >= rhs_len {
        let top = current.swap_remove(current.len() - 1);
        let shift = current.len() + 1 - rhs_len;
        for c in current.iter_mut() {
            status |= ring.mul_assign(c, lc);
        }
        for (j, g) in rhs_tail.iter().enumerate() {
            status |= ring.submul(&mut current[shift + j], &top, g);
        }
    }
    let mut result = GrPoly::from_coeffs(current);
    result.normalize(ring);
    *rem = result;
    return status;
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::rings::ball::RealBallField;
#[cfg(test)]
use crate::rings::poly::generic_tests;
#[cfg(test)]
use crate::tracing::{LogAlgorithmSubscriber, SelectionRecorder};
#[cfg(test)]
use crate::tuning::Cutoffs;
#[cfg(test)]
use crate::rings::zn::ZnBase;

#[cfg(test)]
fn assert_divrem_identity<R: RingStore + Copy>(ring: R, quo: &GrPoly<El<R>>, rem: &GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) {
    let mut check = GrPoly::new();
    poly_mul(ring, &mut check, quo, rhs).must_succeed();
    poly_add_assign(ring, &mut check, rem).must_succeed();
    assert!(poly_equal(ring, &check, lhs).is_true());
    assert!(rem.len() < rhs.len());
}

#[test]
fn test_divrem_basecase_exact_division() {
    LogAlgorithmSubscriber::init_test();
    let f = GrPoly::from_ints(&ZZ, &[3, 5, 2, 4]);
    let g = GrPoly::from_ints(&ZZ, &[1, 2]);
    let (mut q, mut r) = (GrPoly::new(), GrPoly::new());
    // 4x^3 + 2x^2 + 5x + 3 = (2x^2 + 0x + 5/2)(2x + 1) + ..., not integral
    assert_eq!(Status::DomainError, poly_divrem_basecase(&ZZ, &mut q, &mut r, &f, &g));
    // (2x + 1)(x^3 + 2x + 1) + 3
    let f = GrPoly::from_ints(&ZZ, &[4, 4, 4, 1, 2]);
    poly_divrem_basecase(&ZZ, &mut q, &mut r, &f, &g).must_succeed();
    assert_divrem_identity(&ZZ, &q, &r, &f, &g);
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1, 2, 0, 1]), &q).is_true());
}

#[test]
fn test_divrem_by_zero() {
    let f = GrPoly::from_ints(&QQ, &[1, 1]);
    let (mut q, mut r) = (GrPoly::new(), GrPoly::new());
    assert_eq!(Status::DomainError, poly_divrem(&QQ, &mut q, &mut r, &f, &GrPoly::new()));
    assert_eq!(Status::DomainError, poly_divrem_newton(&QQ, &mut q, &mut r, &f, &GrPoly::new()));
    assert_eq!(Status::DomainError, poly_divrem_divconquer(&QQ, &mut q, &mut r, &f, &GrPoly::new()));
}

#[test]
fn test_divrem_algorithms_agree() {
    LogAlgorithmSubscriber::init_test();
    let F = Zn::new(65537);
    let mut rng = oorandom::Rand64::new(3);
    for (la, lb) in [(60, 20), (100, 9), (41, 40), (30, 31), (90, 45)] {
        let f = generic_tests::random_poly(&F, la, &mut rng);
        let mut g = generic_tests::random_poly(&F, lb, &mut rng);
        g.set_coeff(lb - 1, F.int(3), &F);
        let (mut q1, mut r1) = (GrPoly::new(), GrPoly::new());
        let (mut q2, mut r2) = (GrPoly::new(), GrPoly::new());
        let (mut q3, mut r3) = (GrPoly::new(), GrPoly::new());
        poly_divrem_basecase(&F, &mut q1, &mut r1, &f, &g).must_succeed();
        poly_divrem_newton(&F, &mut q2, &mut r2, &f, &g).must_succeed();
        poly_divrem_divconquer(&F, &mut q3, &mut r3, &f, &g).must_succeed();
        assert_divrem_identity(&F, &q1, &r1, &f, &g);
        assert!(poly_equal(&F, &q1, &q2).is_true());
        assert!(poly_equal(&F, &r1, &r2).is_true());
        assert!(poly_equal(&F, &q1, &q3).is_true());
        assert!(poly_equal(&F, &r1, &r3).is_true());
    }
}

#[test]
fn test_divconquer_over_integers() {
    LogAlgorithmSubscriber::init_test();
    let g = GrPoly::from_coeffs((0..30).map(|i| ZZ.int(i % 7 - 3)).chain(std::iter::once(ZZ.one())).collect());
    let q = GrPoly::from_coeffs((0..50).map(|i| ZZ.int(i % 5 - 2)).chain(std::iter::once(ZZ.int(4))).collect());
    let mut f = GrPoly::new();
    poly_mul(&ZZ, &mut f, &g, &q).must_succeed();
    let mut g_scaled = GrPoly::new();
    poly_mul_scalar(&ZZ, &mut g_scaled, &g, &ZZ.int(2)).must_succeed();
    let (mut quo, mut rem) = (GrPoly::new(), GrPoly::new());
    poly_divrem_divconquer(&ZZ, &mut quo, &mut rem, &f, &g).must_succeed();
    assert!(poly_equal(&ZZ, &q, &quo).is_true());
    assert!(rem.is_empty());
    assert_eq!(Status::DomainError, poly_divrem_newton(&ZZ, &mut quo, &mut rem, &f, &g_scaled));
}

#[test]
fn test_divrem_selection() {
    let F = RingValue::from(ZnBase::new(17).with_cutoffs(Cutoffs::fast_always()));
    let f = GrPoly::from_ints(&F, &[1, 2, 3, 4, 5, 6, 7, 8]);
    let g = GrPoly::from_ints(&F, &[1, 1, 1, 2]);
    let recorder = SelectionRecorder::new();
    let (mut q, mut r) = (GrPoly::new(), GrPoly::new());
    tracing::subscriber::with_default(recorder.clone(), || poly_divrem(&F, &mut q, &mut r, &f, &g)).must_succeed();
    assert_eq!(Some("newton".to_owned()), recorder.strategy_for("poly_divrem"));
    assert_divrem_identity(&F, &q, &r, &f, &g);

    recorder.clear();
    let Z = RingValue::from(ZnBase::new(16).with_cutoffs(Cutoffs::fast_always()));
    let f = GrPoly::from_ints(&Z, &[1, 2, 3, 4, 5, 6, 7, 8]);
    let g = GrPoly::from_ints(&Z, &[1, 1, 1, 2]);
    let status = tracing::subscriber::with_default(recorder.clone(), || poly_divrem(&Z, &mut q, &mut r, &f, &g));
    assert_eq!(Some("divconquer".to_owned()), recorder.strategy_for("poly_divrem"));
    // the second step has to divide 3 by the leading coefficient 2
    assert_eq!(Status::DomainError, status);
}

#[test]
fn test_divconquer_unit_lc_over_zn() {
    let Z = Zn::new(16);
    let g = GrPoly::from_coeffs((0..12).map(|i| Z.int(i * i + 1)).chain(std::iter::once(Z.int(3))).collect());
    let f = GrPoly::from_coeffs((0..41).map(|i| Z.int(5 * i - 7)).collect());
    let (mut q1, mut r1) = (GrPoly::new(), GrPoly::new());
    let (mut q2, mut r2) = (GrPoly::new(), GrPoly::new());
    poly_divrem_divconquer(&Z, &mut q1, &mut r1, &f, &g).must_succeed();
    poly_divrem_basecase(&Z, &mut q2, &mut r2, &f, &g).must_succeed();
    assert_divrem_identity(&Z, &q1, &r1, &f, &g);
    assert_eq!(Some(28), q1.degree());
    assert!(poly_equal(&Z, &q1, &q2).is_true());
    assert!(poly_equal(&Z, &r1, &r2).is_true());
}

#[test]
fn test_divexact_and_pseudo_rem() {
    let f = GrPoly::from_ints(&QQ, &[-1, 0, 1]);
    let g = GrPoly::from_ints(&QQ, &[1, 1]);
    let mut q = GrPoly::new();
    poly_divexact(&QQ, &mut q, &f, &g).must_succeed();
    assert!(poly_equal(&QQ, &GrPoly::from_ints(&QQ, &[-1, 1]), &q).is_true());
    assert_eq!(Status::DomainError, poly_divexact(&QQ, &mut q, &f, &GrPoly::from_ints(&QQ, &[2, 1])));

    // prem(x^2 + 1, 2x + 1) = 4 * (x^2 + 1) mod (2x + 1) = 5
    let f = GrPoly::from_ints(&ZZ, &[1, 0, 1]);
    let g = GrPoly::from_ints(&ZZ, &[1, 2]);
    let mut r = GrPoly::new();
    poly_pseudo_rem(&ZZ, &mut r, &f, &g).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[5]), &r).is_true());
}

#[test]
fn test_divrem_ball_unknown_lc() {
    let RR = RealBallField::new();
    let f = GrPoly::from_ints(&RR, &[1, 2, 3]);
    let g = GrPoly::from_coeffs(vec![RR.one(), RR.get_ring().ball(0., 1e-3)]);
    let (mut q, mut r) = (GrPoly::new(), GrPoly::new());
    assert_eq!(Status::Unable, poly_divrem(&RR, &mut q, &mut r, &f, &g));
}

#[test]
fn test_series_algorithms_agree() {
    LogAlgorithmSubscriber::init_test();
    generic_tests::test_series_algorithms_agree(&QQ, 1, 12);
    generic_tests::test_series_algorithms_agree(&Zn::new(17), 2, 30);
    generic_tests::test_series_algorithms_agree(&RealBallField::new(), 3, 12);
}
