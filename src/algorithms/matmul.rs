use tracing::instrument;

use crate::capability::{Method, OpId};
use crate::matrix::GrMat;
use crate::ring::*;
use crate::status::Status;

///
/// Computes the matrix product `res = lhs * rhs` by computing one inner product
/// (see [`RingBase::dot()`]) per entry of the result.
///
/// This is the default implementation of [`RingBase::mat_mul()`].
///
/// # Panics
///
/// Panics if the number of columns of `lhs` does not match the number of rows
/// of `rhs`.
///
#[instrument(skip_all, level = "trace")]
pub fn mat_mul_classical<R>(ring: R, res: &mut GrMat<El<R>>, lhs: &GrMat<El<R>>, rhs: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert_eq!(lhs.col_count(), rhs.row_count(), "inner dimensions of matrix product do not match");
    let columns = (0..rhs.col_count()).map(|j| rhs.col(j)).collect::<Vec<_>>();
    let mut status = Status::Success;
    let mut result = GrMat::zero(lhs.row_count(), rhs.col_count(), ring);
    for i in 0..lhs.row_count() {
        for (j, col) in columns.iter().enumerate() {
            status |= ring.dot(result.at_mut(i, j), None, lhs.row(i), col);
        }
    }
    *res = result;
    return status;
}

///
/// Computes the matrix product `res = lhs * rhs`, using the implementation of the
/// ring (see [`RingBase::mat_mul()`]).
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::matrix::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::algorithms::matmul::mat_mul;
/// let A = GrMat::from_ints(&ZZ, &[&[1, 2], &[3, 4]]);
/// let B = GrMat::from_ints(&ZZ, &[&[0, 1], &[1, 0]]);
/// let mut C = GrMat::zero(2, 2, &ZZ);
/// mat_mul(&ZZ, &mut C, &A, &B).must_succeed();
/// assert!(mat_equal(&ZZ, &GrMat::from_ints(&ZZ, &[&[2, 1], &[4, 3]]), &C).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn mat_mul<R>(ring: R, res: &mut GrMat<El<R>>, lhs: &GrMat<El<R>>, rhs: &GrMat<El<R>>) -> Status
    where R: RingStore
{
    let strategy = if ring.resolve(OpId::MatMul) == Method::Specific { "specific" } else { "classical" };
    tracing::debug!(op = "mat_mul", strategy = strategy, len = lhs.col_count());
    ring.get_ring().mat_mul(res, lhs, rhs)
}

#[cfg(test)]
use crate::matrix::mat_equal;
#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::tracing::SelectionRecorder;

#[test]
fn test_mat_mul() {
    let A = GrMat::from_ints(&ZZ, &[&[1, 2, 3], &[4, 5, 6]]);
    let B = GrMat::from_ints(&ZZ, &[&[1, 0], &[0, 1], &[1, 1]]);
    let mut C = GrMat::zero(0, 0, &ZZ);
    mat_mul(&ZZ, &mut C, &A, &B).must_succeed();
    assert!(mat_equal(&ZZ, &GrMat::from_ints(&ZZ, &[&[4, 5], &[10, 11]]), &C).is_true());

    let I = GrMat::identity(3, &ZZ);
    mat_mul(&ZZ, &mut C, &A, &I).must_succeed();
    assert!(mat_equal(&ZZ, &A, &C).is_true());
}

#[test]
fn test_mat_mul_empty_inner_dimension() {
    let Z5 = Zn::new(5);
    let A = GrMat::zero(2, 0, &Z5);
    let B = GrMat::zero(0, 3, &Z5);
    let mut C = GrMat::identity(2, &Z5);
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || mat_mul(&Z5, &mut C, &A, &B)).must_succeed();
    assert_eq!(Some("classical".to_owned()), recorder.strategy_for("mat_mul"));
    assert!(mat_equal(&Z5, &GrMat::zero(2, 3, &Z5), &C).is_true());
}

#[test]
#[should_panic]
fn test_mat_mul_dimension_mismatch() {
    let A = GrMat::from_ints(&ZZ, &[&[1, 2]]);
    let mut C = GrMat::zero(0, 0, &ZZ);
    _ = mat_mul(&ZZ, &mut C, &A, &A);
}
