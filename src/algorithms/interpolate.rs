use tracing::instrument;

use crate::algorithms::poly_div::poly_rem;
use crate::algorithms::poly_mul::poly_mul;
use crate::ring::*;
use crate::rings::poly::*;
use crate::status::Status;

///
/// Computes the product tree of the linear factors `x - points[i]`.
///
/// The `0`-th level of the result contains the linear factors, and every node of level
/// `k + 1` is the product of two neighboring nodes of level `k` (an unpaired last node
/// is copied unchanged). The last level contains only one polynomial, namely the
/// product of all factors. For no points, this is the constant polynomial `1`.
///
#[instrument(skip_all, level = "trace")]
pub fn product_tree<R>(ring: R, points: &[El<R>]) -> (Vec<Vec<GrPoly<El<R>>>>, Status)
    where R: RingStore + Copy
{
    if points.is_empty() {
        return (vec![vec![GrPoly::constant(ring, ring.one())]], Status::Success);
    }
    let mut status = Status::Success;
    let mut leaves = Vec::with_capacity(points.len());
    for p in points {
        let mut neg_p = ring.zero();
        status |= ring.neg(&mut neg_p, p);
        let mut factor = GrPoly::from_coeffs(vec![neg_p, ring.one()]);
        factor.normalize(ring);
        leaves.push(factor);
    }
    let mut tree = vec![leaves];
    while tree.last().map(|level| level.len()).unwrap_or(0) > 1 {
        let current = &tree[tree.len() - 1];
        let mut next = Vec::with_capacity((current.len() + 1) / 2);
        for pair in current.chunks(2) {
            if let [left, right] = pair {
                let mut product = GrPoly::new();
                status |= poly_mul(ring, &mut product, left, right);
                next.push(product);
            } else {
                next.push(pair[0].clone());
            }
        }
        tree.push(next);
    }
    return (tree, status);
}

///
/// Evaluates `poly` at each of the given points, using Horner's scheme for every
/// point separately.
///
#[instrument(skip_all, level = "trace")]
pub fn evaluate_vec_iter<R>(ring: R, res: &mut [El<R>], poly: &GrPoly<El<R>>, points: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    assert_eq!(res.len(), points.len());
    let mut status = Status::Success;
    for (r, p) in res.iter_mut().zip(points.iter()) {
        status |= poly_evaluate(ring, r, poly, p);
    }
    return status;
}

///
/// Evaluates `poly` at each of the given points, by reducing it modulo the nodes of
/// the [`product_tree()`] from the root to the leaves.
///
/// All nodes are monic, so this works over every ring.
///
#[instrument(skip_all, level = "trace")]
pub fn evaluate_vec_fast<R>(ring: R, res: &mut [El<R>], poly: &GrPoly<El<R>>, points: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    assert_eq!(res.len(), points.len());
    if points.is_empty() {
        return Status::Success;
    }
    let (tree, mut status) = product_tree(ring, points);
    let top = tree.len() - 1;
    let mut remainders = Vec::with_capacity(1);
    let mut root_rem = GrPoly::new();
    status |= poly_rem(ring, &mut root_rem, poly, &tree[top][0]);
    remainders.push(root_rem);
    for level in (0..top).rev() {
        let mut next = Vec::with_capacity(tree[level].len());
        for (j, node) in tree[level].iter().enumerate() {
            let mut rem = GrPoly::new();
            status |= poly_rem(ring, &mut rem, &remainders[j / 2], node);
            next.push(rem);
        }
        remainders = next;
    }
    for (r, rem) in res.iter_mut().zip(remainders.iter()) {
        *r = rem.coeff(0, ring);
    }
    return status;
}

///
/// Evaluates `poly` at each of the given points.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::interpolate::evaluate_vec;
/// let f = GrPoly::from_ints(&ZZ, &[1, 0, 1]);
/// let mut values = [ZZ.zero(), ZZ.zero(), ZZ.zero()];
/// evaluate_vec(&ZZ, &mut values, &f, &[ZZ.int(0), ZZ.int(1), ZZ.int(2)]).must_succeed();
/// assert_eq!([ZZ.int(1), ZZ.int(2), ZZ.int(5)], values);
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn evaluate_vec<R>(ring: R, res: &mut [El<R>], poly: &GrPoly<El<R>>, points: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    if points.len() >= ring.cutoffs().evaluate_fast {
        tracing::debug!(op = "evaluate_vec", strategy = "fast", len = points.len());
        evaluate_vec_fast(ring, res, poly, points)
    } else {
        tracing::debug!(op = "evaluate_vec", strategy = "iter", len = points.len());
        evaluate_vec_iter(ring, res, poly, points)
    }
}

///
/// Computes the polynomial `res` of degree `< n` with `res(xs[i]) = ys[i]`, using
/// Newton's divided differences.
///
/// The divided differences are computed by [`RingBase::div()`], so this fails with
/// [`Status::DomainError`] if two points coincide, or if (over a ring that is not a
/// field) the interpolating polynomial does not have coefficients in the ring.
///
#[instrument(skip_all, level = "trace")]
pub fn interpolate_newton<R>(ring: R, res: &mut GrPoly<El<R>>, xs: &[El<R>], ys: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut status = Status::Success;
    let mut coeffs = ys.to_vec();
    for j in 1..n {
        for i in (j..n).rev() {
            let mut num = ring.zero();
            status |= ring.sub(&mut num, &coeffs[i], &coeffs[i - 1]);
            let mut den = ring.zero();
            status |= ring.sub(&mut den, &xs[i], &xs[i - j]);
            let div_status = ring.div(&mut coeffs[i], &num, &den);
            if !div_status.is_success() {
                return div_status;
            }
        }
    }
    let mut result = GrPoly::constant(ring, coeffs[n - 1].clone());
    let mut shifted = GrPoly::new();
    let mut scaled = GrPoly::new();
    for i in (0..(n - 1)).rev() {
        poly_shift_left(ring, &mut shifted, &result, 1);
        status |= poly_mul_scalar(ring, &mut scaled, &result, &xs[i]);
        status |= poly_sub(ring, &mut result, &shifted, &scaled);
        status |= poly_add_assign(ring, &mut result, &GrPoly::constant(ring, coeffs[i].clone()));
    }
    *res = result;
    return status;
}

///
/// Computes the polynomial `res` of degree `< n` with `res(xs[i]) = ys[i]`, using the
/// Lagrange formula `res = sum_i ys[i] / M'(xs[i]) * M / (x - xs[i])` where
/// `M = prod_i (x - xs[i])`, evaluated along the [`product_tree()`].
///
/// This requires dividing by `M'(xs[i])`, which is zero if two points coincide.
///
#[instrument(skip_all, level = "trace")]
pub fn interpolate_fast<R>(ring: R, res: &mut GrPoly<El<R>>, xs: &[El<R>], ys: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let (tree, mut status) = product_tree(ring, xs);
    let mut derivative = GrPoly::new();
    status |= poly_derivative(ring, &mut derivative, &tree[tree.len() - 1][0]);
    let mut weights = (0..n).map(|_| ring.zero()).collect::<Vec<_>>();
    status |= evaluate_vec_fast(ring, &mut weights, &derivative, xs);

    let mut current = Vec::with_capacity(n);
    for (y, w) in ys.iter().zip(weights.iter()) {
        let mut c = ring.zero();
        let div_status = ring.div(&mut c, y, w);
        if !div_status.is_success() {
            return div_status;
        }
        current.push(GrPoly::constant(ring, c));
    }
    for level in 0..(tree.len() - 1) {
        let mut next = Vec::with_capacity((current.len() + 1) / 2);
        for (j, pair) in current.chunks(2).enumerate() {
            if let [left, right] = pair {
                let mut lhs = GrPoly::new();
                status |= poly_mul(ring, &mut lhs, left, &tree[level][2 * j + 1]);
                let mut rhs = GrPoly::new();
                status |= poly_mul(ring, &mut rhs, right, &tree[level][2 * j]);
                status |= poly_add_assign(ring, &mut lhs, &rhs);
                next.push(lhs);
            } else {
                next.push(pair[0].clone());
            }
        }
        current = next;
    }
    *res = current.swap_remove(0);
    return status;
}

///
/// Computes the polynomial `res` of degree `< n` with `res(xs[i]) = ys[i]`.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::interpolate::interpolate;
/// let mut f = GrPoly::new();
/// interpolate(&ZZ, &mut f, &[ZZ.int(0), ZZ.int(1), ZZ.int(2)], &[ZZ.int(0), ZZ.int(1), ZZ.int(0)]).must_succeed();
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[0, 2, -1]), &f).is_true());
/// // the line through (0, 0) and (2, 1) has non-integral slope
/// assert_eq!(Status::DomainError, interpolate(&ZZ, &mut f, &[ZZ.int(0), ZZ.int(2)], &[ZZ.int(0), ZZ.int(1)]));
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn interpolate<R>(ring: R, res: &mut GrPoly<El<R>>, xs: &[El<R>], ys: &[El<R>]) -> Status
    where R: RingStore + Copy
{
    let n = xs.len();
    if n >= ring.cutoffs().interpolate_fast && ring.ctx_is_field().is_true() {
        tracing::debug!(op = "interpolate", strategy = "fast", len = n);
        let status = interpolate_fast(ring, res, xs, ys);
        if !status.is_unable() {
            return status;
        }
        tracing::debug!(op = "interpolate", strategy = "newton", len = n, reason = "fast failed", status = ?status);
    } else {
        tracing::debug!(op = "interpolate", strategy = "newton", len = n);
    }
    return interpolate_newton(ring, res, xs, ys);
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::zn::*;
#[cfg(test)]
use crate::rings::poly::generic_tests::random_poly;
#[cfg(test)]
use crate::tracing::SelectionRecorder;
#[cfg(test)]
use crate::tuning::Cutoffs;
#[cfg(test)]
use oorandom::Rand64;

#[test]
fn test_interpolate_newton() {
    let mut f = GrPoly::new();
    interpolate_newton(&QQ, &mut f, &[QQ.int(0), QQ.int(1), QQ.int(2)], &[QQ.int(1), QQ.int(2), QQ.int(5)]).must_succeed();
    assert!(poly_equal(&QQ, &GrPoly::from_ints(&QQ, &[1, 0, 1]), &f).is_true());

    let mut g = GrPoly::new();
    interpolate_newton(&ZZ, &mut g, &[], &[]).must_succeed();
    assert!(g.is_empty());
    interpolate_newton(&ZZ, &mut g, &[ZZ.int(3)], &[ZZ.int(7)]).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[7]), &g).is_true());
    assert_eq!(Status::DomainError, interpolate_newton(&ZZ, &mut g, &[ZZ.int(0), ZZ.int(2)], &[ZZ.int(0), ZZ.int(1)]));
    assert_eq!(Status::DomainError, interpolate_newton(&QQ, &mut f, &[QQ.int(1), QQ.int(1)], &[QQ.int(0), QQ.int(1)]));
}

#[test]
fn test_evaluate_vec() {
    let F101 = Zn::new(101);
    let mut rng = Rand64::new(5);
    let points = (0..13).map(|i| F101.int(3 * i + 1)).collect::<Vec<_>>();
    for len in [0, 1, 5, 13, 20] {
        let f = random_poly(&F101, len, &mut rng);
        let mut expected = (0..points.len()).map(|_| F101.zero()).collect::<Vec<_>>();
        evaluate_vec_iter(&F101, &mut expected, &f, &points).must_succeed();
        let mut actual = (0..points.len()).map(|_| F101.zero()).collect::<Vec<_>>();
        evaluate_vec_fast(&F101, &mut actual, &f, &points).must_succeed();
        assert_eq!(expected, actual);
    }
}

#[test]
fn test_interpolate_algorithms_agree() {
    let F101 = RingValue::from(ZnBase::new(101).with_cutoffs(Cutoffs::fast_always()));
    let mut rng = Rand64::new(9);
    for n in [2, 3, 7, 10] {
        let xs = (0..n).map(|i| F101.int(5 * i as i64 + 2)).collect::<Vec<_>>();
        let ys = (0..n).map(|_| F101.random_element(&mut rng)).collect::<Vec<_>>();
        let mut expected = GrPoly::new();
        interpolate_newton(&F101, &mut expected, &xs, &ys).must_succeed();
        let mut actual = GrPoly::new();
        let recorder = SelectionRecorder::new();
        tracing::subscriber::with_default(recorder.clone(), || interpolate(&F101, &mut actual, &xs, &ys)).must_succeed();
        assert_eq!(Some("fast".to_owned()), recorder.strategy_for("interpolate"));
        assert!(poly_equal(&F101, &expected, &actual).is_true());
        let mut values = (0..n).map(|_| F101.zero()).collect::<Vec<_>>();
        evaluate_vec(&F101, &mut values, &actual, &xs).must_succeed();
        assert_eq!(ys, values);
    }
    let xs = [F101.int(1), F101.int(102)];
    let mut f = GrPoly::new();
    assert_eq!(Status::DomainError, interpolate(&F101, &mut f, &xs, &[F101.int(1), F101.int(2)]));
}
