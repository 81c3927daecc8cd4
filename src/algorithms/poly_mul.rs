use std::cmp::{max, min};

use tracing::instrument;

use crate::algorithms::sqr_mul::generic_square_and_multiply;
use crate::ring::*;
use crate::rings::poly::GrPoly;
use crate::status::Status;
use crate::vector::*;

///
/// Below this length, the recursion of [`mullow_karatsuba()`] switches to the
/// classical algorithm. This is independent of [`crate::tuning::Cutoffs::mul_karatsuba`],
/// which decides whether Karatsuba is used at all.
///
#[stability::unstable(feature = "enable")]
pub const KARATSUBA_BASECASE: usize = 4;

///
/// Computes the first `dst.len()` coefficients of `lhs * rhs` by the classical
/// quadratic algorithm.
///
pub fn mullow_classical<R>(ring: R, dst: &mut [El<R>], lhs: &[El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore
{
    let mut status = Status::Success;
    for i in 0..dst.len() {
        let from = (i + 1).saturating_sub(rhs.len());
        let to = min(lhs.len(), i + 1);
        let mut value = ring.zero();
        for j in from..to {
            status |= ring.addmul(&mut value, &lhs[j], &rhs[i - j]);
        }
        dst[i] = value;
    }
    return status;
}

fn add_shifted<R>(ring: R, dst: &mut [El<R>], src: &[El<R>], shift: usize) -> Status
    where R: RingStore
{
    let end = min(dst.len(), shift + src.len());
    if end <= shift {
        return Status::Success;
    }
    vec_add_assign(ring, &mut dst[shift..end], &src[..(end - shift)])
}

fn sub_shifted<R>(ring: R, dst: &mut [El<R>], src: &[El<R>], shift: usize) -> Status
    where R: RingStore
{
    let end = min(dst.len(), shift + src.len());
    if end <= shift {
        return Status::Success;
    }
    vec_sub_assign(ring, &mut dst[shift..end], &src[..(end - shift)])
}

fn add_padded<R>(ring: R, lhs: &[El<R>], rhs: &[El<R>]) -> (Vec<El<R>>, Status)
    where R: RingStore
{
    let (longer, shorter) = if lhs.len() >= rhs.len() { (lhs, rhs) } else { (rhs, lhs) };
    let mut result = longer.to_vec();
    let status = vec_add_assign(ring, &mut result[..shorter.len()], shorter);
    return (result, status);
}

///
/// Computes the full product of `lhs` and `rhs`, which has length
/// `lhs.len() + rhs.len() - 1` if both are nonempty.
///
fn karatsuba_full<R>(ring: R, lhs: &[El<R>], rhs: &[El<R>]) -> (Vec<El<R>>, Status)
    where R: RingStore + Copy
{
    if lhs.is_empty() || rhs.is_empty() {
        return (Vec::new(), Status::Success);
    }
    let (lhs, rhs) = if lhs.len() >= rhs.len() { (lhs, rhs) } else { (rhs, lhs) };
    let n = lhs.len();
    let m = rhs.len();
    let mut result = (0..(n + m - 1)).map(|_| ring.zero()).collect::<Vec<_>>();

    if m <= KARATSUBA_BASECASE {
        let status = mullow_classical(ring, &mut result, lhs, rhs);
        return (result, status);
    }

    let mut status = Status::Success;
    if 2 * m <= n {
        // unbalanced, so multiply blocks of `lhs` of the size of `rhs`
        for start in (0..n).step_by(m) {
            let (block, block_status) = karatsuba_full(ring, &lhs[start..min(n, start + m)], rhs);
            status |= block_status;
            status |= add_shifted(ring, &mut result, &block, start);
        }
        return (result, status);
    }

    let h = (n + 1) / 2;
    debug_assert!(h <= m);
    let (lhs_lower, lhs_upper) = lhs.split_at(h);
    let (rhs_lower, rhs_upper) = rhs.split_at(h);

    let (lower, lower_status) = karatsuba_full(ring, lhs_lower, rhs_lower);
    let (upper, upper_status) = karatsuba_full(ring, lhs_upper, rhs_upper);
    let (lhs_sum, lhs_sum_status) = add_padded(ring, lhs_lower, lhs_upper);
    let (rhs_sum, rhs_sum_status) = add_padded(ring, rhs_lower, rhs_upper);
    let (mut middle, middle_status) = karatsuba_full(ring, &lhs_sum, &rhs_sum);
    status |= lower_status | upper_status | lhs_sum_status | rhs_sum_status | middle_status;

    status |= sub_shifted(ring, &mut middle, &lower, 0);
    status |= sub_shifted(ring, &mut middle, &upper, 0);
    status |= add_shifted(ring, &mut result, &lower, 0);
    status |= add_shifted(ring, &mut result, &middle, h);
    status |= add_shifted(ring, &mut result, &upper, 2 * h);
    return (result, status);
}

///
/// Computes the first `dst.len()` coefficients of `lhs * rhs` using Karatsuba's
/// algorithm. Inputs of very different length are split into blocks.
///
#[instrument(skip_all, level = "trace")]
pub fn mullow_karatsuba<R>(ring: R, dst: &mut [El<R>], lhs: &[El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    let n = dst.len();
    let lhs = &lhs[..min(n, lhs.len())];
    let rhs = &rhs[..min(n, rhs.len())];
    if lhs.is_empty() || rhs.is_empty() {
        vec_zero(ring, dst);
        return Status::Success;
    }
    let (product, status) = karatsuba_full(ring, lhs, rhs);
    for (i, c) in dst.iter_mut().enumerate() {
        *c = if i < product.len() { product[i].clone() } else { ring.zero() };
    }
    return status;
}

///
/// The generic implementation of [`RingBase::poly_mullow()`], choosing between the
/// classical algorithm and Karatsuba's algorithm based on [`crate::tuning::Cutoffs::mul_karatsuba`].
///
/// Empty operands give a zero result, and operands of length one are handled as
/// scalar multiplications.
///
#[instrument(skip_all, level = "trace")]
pub fn poly_mullow_generic<R>(ring: R, dst: &mut [El<R>], lhs: &[El<R>], rhs: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    let n = dst.len();
    if lhs.is_empty() || rhs.is_empty() || n == 0 {
        vec_zero(ring, dst);
        return Status::Success;
    }
    if lhs.len() == 1 || rhs.len() == 1 {
        tracing::debug!(op = "poly_mullow", strategy = "scalar", len = n);
        let (poly, scalar) = if lhs.len() == 1 { (rhs, &lhs[0]) } else { (lhs, &rhs[0]) };
        let len = min(n, poly.len());
        vec_zero(ring, &mut dst[len..]);
        return vec_scalar_mul(ring, &mut dst[..len], &poly[..len], scalar);
    }
    let len = min(min(lhs.len(), rhs.len()), n);
    if len >= ring.cutoffs().mul_karatsuba {
        tracing::debug!(op = "poly_mullow", strategy = "karatsuba", len = len);
        return mullow_karatsuba(ring, dst, lhs, rhs);
    } else {
        tracing::debug!(op = "poly_mullow", strategy = "classical", len = len);
        return mullow_classical(ring, dst, lhs, rhs);
    }
}

fn product_len<T: Clone>(lhs: &GrPoly<T>, rhs: &GrPoly<T>, n: usize) -> usize {
    if lhs.is_empty() || rhs.is_empty() {
        0
    } else {
        min(n, lhs.len() + rhs.len() - 1)
    }
}

fn poly_mullow_with<R, F>(ring: R, res: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>, n: usize, mullow: F) -> Status
    where R: RingStore,
        F: FnOnce(&mut [El<R>], &[El<R>], &[El<R>]) -> Status
{
    let len = product_len(lhs, rhs, n);
    let mut result = (0..len).map(|_| ring.zero()).collect::<Vec<_>>();
    let status = mullow(&mut result, lhs.coeffs(), rhs.coeffs());
    *res = GrPoly::from_coeffs(result);
    res.normalize(ring);
    return status;
}

///
/// Computes `res = lhs * rhs mod x^n` using the classical algorithm.
///
pub fn poly_mullow_classical<R>(ring: R, res: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    poly_mullow_with(ring, res, lhs, rhs, n, |dst, l, r| mullow_classical(ring, dst, l, r))
}

///
/// Computes `res = lhs * rhs mod x^n` using Karatsuba's algorithm.
///
pub fn poly_mullow_karatsuba<R>(ring: R, res: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    poly_mullow_with(ring, res, lhs, rhs, n, |dst, l, r| mullow_karatsuba(ring, dst, l, r))
}

///
/// Computes `res = lhs * rhs mod x^n`, using the ring-specific multiplication if the
/// ring provides one, and otherwise [`poly_mullow_generic()`].
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::poly_mul::poly_mullow;
/// let f = GrPoly::from_ints(&ZZ, &[1, 1]);
/// let mut g = GrPoly::new();
/// poly_mullow(&ZZ, &mut g, &f, &f, 2).must_succeed();
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1, 2]), &g).is_true());
/// ```
///
pub fn poly_mullow<R>(ring: R, res: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    poly_mullow_with(ring, res, lhs, rhs, n, |dst, l, r| ring.get_ring().poly_mullow(dst, l, r))
}

///
/// Like [`poly_mullow()`], but stores the result in `lhs`.
///
pub fn poly_mullow_inplace<R>(ring: R, lhs: &mut GrPoly<El<R>>, rhs: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut result = GrPoly::new();
    let status = poly_mullow(ring, &mut result, lhs, rhs, n);
    lhs.swap(&mut result);
    return status;
}

pub fn poly_mul<R>(ring: R, res: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    poly_mullow(ring, res, lhs, rhs, max(1, lhs.len() + rhs.len()) - 1)
}

pub fn poly_mul_inplace<R>(ring: R, lhs: &mut GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let mut result = GrPoly::new();
    let status = poly_mul(ring, &mut result, lhs, rhs);
    lhs.swap(&mut result);
    return status;
}

///
/// Computes `res = base^power mod x^n` by square-and-multiply.
///
pub fn poly_pow_mullow<R>(ring: R, res: &mut GrPoly<El<R>>, base: &GrPoly<El<R>>, power: u64, n: usize) -> Status
    where R: RingStore + Copy
{
    let mut one = GrPoly::constant(ring, ring.one());
    one.truncate(n, ring);
    let (result, status) = generic_square_and_multiply(
        base,
        power,
        |x| {
            let mut y = GrPoly::new();
            let status = poly_mullow(ring, &mut y, &x, &x, n);
            (y, status)
        },
        |b, x| {
            let mut y = GrPoly::new();
            let status = poly_mullow(ring, &mut y, &x, b, n);
            (y, status)
        },
        one
    );
    *res = result;
    return status;
}

///
/// Computes `res = base^power`.
///
pub fn poly_pow<R>(ring: R, res: &mut GrPoly<El<R>>, base: &GrPoly<El<R>>, power: u64) -> Status
    where R: RingStore + Copy
{
    let len = match base.degree() {
        None => if power == 0 { 1 } else { 0 },
        Some(d) => match usize::try_from(power).ok().and_then(|p| d.checked_mul(p)) {
            Some(deg) => deg + 1,
            None => return Status::Unable
        }
    };
    poly_pow_mullow(ring, res, base, power, len)
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::poly::poly_equal;
#[cfg(test)]
use crate::tracing::{LogAlgorithmSubscriber, SelectionRecorder};
#[cfg(test)]
use oorandom::Rand64;

#[test]
fn test_mullow_classical() {
    LogAlgorithmSubscriber::init_test();
    let lhs = [ZZ.int(1), ZZ.int(2), ZZ.int(3)];
    let rhs = [ZZ.int(1), ZZ.int(-1)];
    let mut dst = vec![ZZ.int(100); 5];
    mullow_classical(&ZZ, &mut dst, &lhs, &rhs).must_succeed();
    assert_eq!(vec![ZZ.int(1), ZZ.int(1), ZZ.int(1), ZZ.int(-3), ZZ.int(0)], dst);
    let mut dst = vec![ZZ.zero(); 2];
    mullow_classical(&ZZ, &mut dst, &lhs, &rhs).must_succeed();
    assert_eq!(vec![ZZ.int(1), ZZ.int(1)], dst);
}

#[test]
fn test_karatsuba_agrees_with_classical() {
    LogAlgorithmSubscriber::init_test();
    let ring = Zn::new(17);
    let mut rng = Rand64::new(7);
    for (l, r) in [(1, 1), (5, 5), (9, 8), (16, 3), (30, 11), (33, 33), (7, 40)] {
        let lhs = (0..l).map(|_| ring.random_element(&mut rng)).collect::<Vec<_>>();
        let rhs = (0..r).map(|_| ring.random_element(&mut rng)).collect::<Vec<_>>();
        for n in [1, l, l + r - 1, l + r + 2] {
            let mut expected = vec![ring.zero(); n];
            let mut actual = vec![ring.zero(); n];
            mullow_classical(&ring, &mut expected, &lhs, &rhs).must_succeed();
            mullow_karatsuba(&ring, &mut actual, &lhs, &rhs).must_succeed();
            assert_eq!(expected, actual, "lengths {}, {}, {}", l, r, n);
        }
    }
}

#[test]
fn test_poly_mullow_selection() {
    let ring = &ZZ;
    let f = GrPoly::from_coeffs((1..=40).map(|i| ZZ.int(i)).collect());
    let g = GrPoly::from_coeffs((1..=40).map(|i| ZZ.int(-i)).collect());
    let recorder = SelectionRecorder::new();
    let mut h = GrPoly::new();
    tracing::subscriber::with_default(recorder.clone(), || poly_mul(ring, &mut h, &f, &g)).must_succeed();
    assert_eq!(Some("karatsuba".to_owned()), recorder.strategy_for("poly_mullow"));
    assert_eq!(79, h.len());

    recorder.clear();
    let mut expected = GrPoly::new();
    poly_mullow_classical(ring, &mut expected, &f, &g, 79).must_succeed();
    assert!(poly_equal(&ZZ, &expected, &h).is_true());

    let x = GrPoly::gen(&ZZ);
    tracing::subscriber::with_default(recorder.clone(), || poly_mul(ring, &mut h, &x, &g)).must_succeed();
    assert_eq!(Some("classical".to_owned()), recorder.strategy_for("poly_mullow"));
    recorder.clear();
    let two = GrPoly::from_ints(&ZZ, &[2]);
    tracing::subscriber::with_default(recorder.clone(), || poly_mul(ring, &mut h, &two, &g)).must_succeed();
    assert_eq!(Some("scalar".to_owned()), recorder.strategy_for("poly_mullow"));
}

#[test]
fn test_empty_and_inplace() {
    let f = GrPoly::from_ints(&QQ, &[1, 2]);
    let mut h = GrPoly::from_ints(&QQ, &[1]);
    poly_mul(&QQ, &mut h, &f, &GrPoly::new()).must_succeed();
    assert!(h.is_empty());
    let mut g = f.clone();
    poly_mul_inplace(&QQ, &mut g, &f).must_succeed();
    assert!(poly_equal(&QQ, &GrPoly::from_ints(&QQ, &[1, 4, 4]), &g).is_true());
    poly_mullow_inplace(&QQ, &mut g, &f, 2).must_succeed();
    assert!(poly_equal(&QQ, &GrPoly::from_ints(&QQ, &[1, 6]), &g).is_true());
}

#[test]
fn test_zn_products_normalize() {
    let Z4 = Zn::new(4);
    let f = GrPoly::from_ints(&Z4, &[1, 2]);
    let mut h = GrPoly::new();
    poly_mul(&Z4, &mut h, &f, &f).must_succeed();
    assert!(poly_equal(&Z4, &GrPoly::from_ints(&Z4, &[1]), &h).is_true());
    assert_eq!(1, h.len());
}

#[test]
fn test_poly_pow() {
    let f = GrPoly::from_ints(&ZZ, &[1, 1]);
    let mut h = GrPoly::new();
    poly_pow(&ZZ, &mut h, &f, 4).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1, 4, 6, 4, 1]), &h).is_true());
    poly_pow_mullow(&ZZ, &mut h, &f, 4, 3).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1, 4, 6]), &h).is_true());
    poly_pow(&ZZ, &mut h, &GrPoly::new(), 0).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1]), &h).is_true());
    poly_pow(&ZZ, &mut h, &GrPoly::new(), 3).must_succeed();
    assert!(h.is_empty());
}
