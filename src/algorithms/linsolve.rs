use tracing::instrument;

use crate::algorithms::det::{find_pivot, Pivot};
use crate::matrix::GrMat;
use crate::ring::*;
use crate::status::Status;

///
/// An LU decomposition `P A = L U` of an `m x n` matrix `A` over a field, where
///  - `P` is the permutation matrix whose `i`-th row is the `perm[i]`-th unit vector,
///  - `L` is a unit lower triangular `m x m` matrix,
///  - `U` is an `m x n` matrix in row echelon form with `rank` nonzero rows.
///
#[derive(Debug, Clone, PartialEq)]
pub struct LuDecomposition<T> {
    pub l: GrMat<T>,
    pub u: GrMat<T>,
    pub perm: Vec<usize>,
    pub rank: usize
}

///
/// Computes an [`LuDecomposition`] of `mat` by Gaussian elimination with row pivoting.
///
/// The ring must be a field, otherwise [`Status::Unable`] is returned together with
/// a trivial decomposition. The same happens if at some point no pivot can be proven
/// to be nonzero, but also not all candidates can be proven to be zero, since then
/// the rank is not determined.
///
#[instrument(skip_all, level = "trace")]
pub fn lu<R>(ring: R, mat: &GrMat<El<R>>) -> (LuDecomposition<El<R>>, Status)
    where R: RingStore + Copy
{
    let m = mat.row_count();
    let n = mat.col_count();
    let mut result = LuDecomposition {
        l: GrMat::identity(m, ring),
        u: mat.clone(),
        perm: (0..m).collect(),
        rank: 0
    };
    if !ring.ctx_is_field().is_true() {
        return (result, Status::Unable);
    }
    let mut status = Status::Success;
    let mut r = 0;
    for col in 0..n {
        if r == m {
            break;
        }
        let pivot_row = match find_pivot(ring, &result.u, col, r) {
            Pivot::Found(i) => i,
            Pivot::Zero => continue,
            Pivot::Unknown => return (result, Status::Unable)
        };
        if pivot_row != r {
            result.u.swap_rows(pivot_row, r);
            result.perm.swap(pivot_row, r);
            for k in 0..r {
                let tmp = result.l.at(pivot_row, k).clone();
                *result.l.at_mut(pivot_row, k) = result.l.at(r, k).clone();
                *result.l.at_mut(r, k) = tmp;
            }
        }
        let mut pivot_inv = ring.zero();
        let inv_status = ring.inv(&mut pivot_inv, result.u.at(r, col));
        if !inv_status.is_success() {
            return (result, inv_status);
        }
        for i in (r + 1)..m {
            if ring.is_zero(result.u.at(i, col)).is_true() {
                continue;
            }
            let mut factor = ring.zero();
            status |= ring.mul(&mut factor, result.u.at(i, col), &pivot_inv);
            for j in (col + 1)..n {
                let value = result.u.at(r, j).clone();
                status |= ring.submul(result.u.at_mut(i, j), &factor, &value);
            }
            *result.u.at_mut(i, col) = ring.zero();
            *result.l.at_mut(i, r) = factor;
        }
        r += 1;
    }
    result.rank = r;
    return (result, status);
}

///
/// Solves `A X = B` for a square, nonsingular matrix `A` over a field, writing `X`
/// to `res`.
///
/// Returns [`Status::DomainError`] if `A` is provably singular, and [`Status::Unable`]
/// if the ring is not a field or singularity cannot be decided.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::matrix::*;
/// # use genring::rings::rational::QQ;
/// # use genring::algorithms::linsolve::solve;
/// let A = GrMat::from_ints(&QQ, &[&[2, 1], &[1, 3]]);
/// let B = GrMat::from_ints(&QQ, &[&[3], &[4]]);
/// let mut X = GrMat::zero(0, 0, &QQ);
/// solve(&QQ, &mut X, &A, &B).must_succeed();
/// assert!(mat_equal(&QQ, &GrMat::from_ints(&QQ, &[&[1], &[1]]), &X).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn solve<R>(ring: R, res: &mut GrMat<El<R>>, a: &GrMat<El<R>>, b: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert!(a.is_square(), "solve requires a square coefficient matrix");
    assert_eq!(a.row_count(), b.row_count(), "right-hand side has wrong number of rows");
    let n = a.row_count();
    let (decomposition, mut status) = lu(ring, a);
    if !status.is_success() {
        return status;
    }
    if decomposition.rank < n {
        return Status::DomainError;
    }
    let LuDecomposition { l, u, perm, .. } = decomposition;
    let mut result = GrMat::zero(n, b.col_count(), ring);
    for c in 0..b.col_count() {
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let mut value = b.at(perm[i], c).clone();
            for k in 0..i {
                status |= ring.submul(&mut value, l.at(i, k), &y[k]);
            }
            y.push(value);
        }
        for i in (0..n).rev() {
            let mut value = y[i].clone();
            for k in (i + 1)..n {
                status |= ring.submul(&mut value, u.at(i, k), result.at(k, c));
            }
            let div_status = ring.div(result.at_mut(i, c), &value, u.at(i, i));
            if !div_status.is_success() {
                return div_status;
            }
        }
    }
    *res = result;
    return status;
}

///
/// Computes the inverse of the square matrix `a` over a field.
///
/// As for [`solve()`], a singular matrix gives [`Status::DomainError`].
///
#[instrument(skip_all, level = "trace")]
pub fn mat_inv<R>(ring: R, res: &mut GrMat<El<R>>, a: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert!(a.is_square(), "only square matrices can be inverted");
    solve(ring, res, a, &GrMat::identity(a.row_count(), ring))
}

#[cfg(test)]
use crate::algorithms::matmul::mat_mul;
#[cfg(test)]
use crate::matrix::mat_equal;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::rings::ball::RealBallField;
#[cfg(test)]
use oorandom::Rand64;

#[cfg(test)]
fn assert_lu_valid<R: RingStore + Copy>(ring: R, mat: &GrMat<El<R>>, decomposition: &LuDecomposition<El<R>>) {
    let permuted = GrMat::from_fn(mat.row_count(), mat.col_count(), |i, j| mat.at(decomposition.perm[i], j).clone());
    let mut product = GrMat::zero(0, 0, ring);
    mat_mul(ring, &mut product, &decomposition.l, &decomposition.u).must_succeed();
    assert!(mat_equal(ring, &permuted, &product).is_true());
    for i in 0..mat.row_count() {
        assert!(ring.is_one(decomposition.l.at(i, i)).is_true());
        for j in (i + 1)..mat.row_count() {
            assert!(ring.is_zero(decomposition.l.at(i, j)).is_true());
        }
        for j in 0..i.min(mat.col_count()) {
            assert!(ring.is_zero(decomposition.u.at(i, j)).is_true());
        }
    }
}

#[test]
fn test_lu() {
    let F7 = Zn::new(7);
    let A = GrMat::from_ints(&F7, &[&[0, 1, 2, 3], &[0, 2, 4, 6], &[1, 0, 1, 0]]);
    let (decomposition, status) = lu(&F7, &A);
    status.must_succeed();
    assert_eq!(2, decomposition.rank);
    assert_lu_valid(&F7, &A, &decomposition);

    let mut rng = Rand64::new(3);
    for n in 1..6 {
        let A = GrMat::from_fn(n, n, |_, _| QQ.random_element(&mut rng));
        let (decomposition, status) = lu(&QQ, &A);
        status.must_succeed();
        assert_lu_valid(&QQ, &A, &decomposition);
    }
}

#[test]
fn test_lu_requires_field() {
    let A = GrMat::from_ints(&ZZ, &[&[2, 1], &[1, 1]]);
    let (_, status) = lu(&ZZ, &A);
    assert_eq!(Status::Unable, status);

    let RR = RealBallField::new();
    let A = GrMat::from_rows(vec![vec![RR.get_ring().ball(0., 1e-6), RR.one()], vec![RR.zero(), RR.one()]]);
    let (_, status) = lu(&RR, &A);
    assert_eq!(Status::Unable, status);
}

#[test]
fn test_solve() {
    let A = GrMat::from_ints(&QQ, &[&[1, 2, 0], &[0, 1, 1], &[1, 0, 3]]);
    let B = GrMat::from_ints(&QQ, &[&[1, 0], &[2, 1], &[3, 5]]);
    let mut X = GrMat::zero(0, 0, &QQ);
    solve(&QQ, &mut X, &A, &B).must_succeed();
    let mut product = GrMat::zero(0, 0, &QQ);
    mat_mul(&QQ, &mut product, &A, &X).must_succeed();
    assert!(mat_equal(&QQ, &B, &product).is_true());

    let singular = GrMat::from_ints(&QQ, &[&[1, 2], &[2, 4]]);
    let B = GrMat::from_ints(&QQ, &[&[1], &[2]]);
    assert_eq!(Status::DomainError, solve(&QQ, &mut X, &singular, &B));
}

#[test]
fn test_mat_inv() {
    let F11 = Zn::new(11);
    let A = GrMat::from_ints(&F11, &[&[0, 3, 1], &[2, 0, 5], &[1, 1, 2]]);
    let mut A_inv = GrMat::zero(0, 0, &F11);
    mat_inv(&F11, &mut A_inv, &A).must_succeed();
    let mut product = GrMat::zero(0, 0, &F11);
    mat_mul(&F11, &mut product, &A, &A_inv).must_succeed();
    assert!(mat_equal(&F11, &GrMat::identity(3, &F11), &product).is_true());

    let mut empty = GrMat::zero(0, 0, &F11);
    mat_inv(&F11, &mut empty, &GrMat::zero(0, 0, &F11)).must_succeed();
    assert_eq!(0, empty.row_count());
}
