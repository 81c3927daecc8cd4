use tracing::instrument;

use crate::matrix::GrMat;
use crate::ring::*;
use crate::rings::poly::GrPoly;
use crate::status::Status;
use crate::truth::Truth;

///
/// Result of searching a pivot in a column.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pivot {
    ///
    /// The entry in this row is provably nonzero.
    ///
    Found(usize),
    ///
    /// All candidate entries are provably zero.
    ///
    Zero,
    ///
    /// No entry is provably nonzero, but some could not be decided.
    ///
    Unknown
}

pub(crate) fn find_pivot<R>(ring: R, mat: &GrMat<El<R>>, col: usize, from_row: usize) -> Pivot
    where R: RingStore
{
    let mut unknown = false;
    for i in from_row..mat.row_count() {
        match ring.is_zero(mat.at(i, col)) {
            Truth::False => return Pivot::Found(i),
            Truth::Unknown => unknown = true,
            Truth::True => {}
        }
    }
    if unknown { Pivot::Unknown } else { Pivot::Zero }
}

///
/// Computes the determinant by cofactor expansion along the first row. This takes
/// time `O(n!)`, but is division-free and fast for very small matrices.
///
#[instrument(skip_all, level = "trace")]
pub fn det_cofactor<R>(ring: R, res: &mut El<R>, mat: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert!(mat.is_square(), "determinant requires a square matrix");
    let n = mat.row_count();
    match n {
        0 => {
            *res = ring.one();
            return Status::Success;
        },
        1 => {
            *res = mat.at(0, 0).clone();
            return Status::Success;
        },
        2 => {
            let mut result = ring.zero();
            let mut status = ring.mul(&mut result, mat.at(0, 0), mat.at(1, 1));
            status |= ring.submul(&mut result, mat.at(0, 1), mat.at(1, 0));
            *res = result;
            return status;
        },
        _ => {}
    }
    let mut status = Status::Success;
    let mut result = ring.zero();
    for j in 0..n {
        if ring.is_zero(mat.at(0, j)).is_true() {
            continue;
        }
        let mut minor = ring.zero();
        status |= det_cofactor(ring, &mut minor, &mat.minor(0, j));
        if j % 2 == 0 {
            status |= ring.addmul(&mut result, mat.at(0, j), &minor);
        } else {
            status |= ring.submul(&mut result, mat.at(0, j), &minor);
        }
    }
    *res = result;
    return status;
}

///
/// Computes the determinant by Gaussian elimination. This requires the ring to be
/// a field, and returns [`Status::Unable`] otherwise or if no pivot can be proven
/// to be nonzero.
///
#[instrument(skip_all, level = "trace")]
pub fn det_lu<R>(ring: R, res: &mut El<R>, mat: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert!(mat.is_square(), "determinant requires a square matrix");
    if !ring.ctx_is_field().is_true() {
        return Status::Unable;
    }
    let n = mat.row_count();
    let mut a = mat.clone();
    let mut status = Status::Success;
    let mut result = ring.one();
    for k in 0..n {
        let pivot_row = match find_pivot(ring, &a, k, k) {
            Pivot::Found(i) => i,
            Pivot::Zero => {
                *res = ring.zero();
                return status;
            },
            Pivot::Unknown => return Status::Unable
        };
        if pivot_row != k {
            a.swap_rows(pivot_row, k);
            status |= ring.neg_inplace(&mut result);
        }
        let mut pivot_inv = ring.zero();
        let inv_status = ring.inv(&mut pivot_inv, a.at(k, k));
        if !inv_status.is_success() {
            return inv_status;
        }
        status |= ring.mul_assign(&mut result, a.at(k, k));
        for i in (k + 1)..n {
            if ring.is_zero(a.at(i, k)).is_true() {
                continue;
            }
            let mut factor = ring.zero();
            status |= ring.mul(&mut factor, a.at(i, k), &pivot_inv);
            for j in (k + 1)..n {
                let value = a.at(k, j).clone();
                status |= ring.submul(a.at_mut(i, j), &factor, &value);
            }
            *a.at_mut(i, k) = ring.zero();
        }
    }
    *res = result;
    return status;
}

///
/// Computes the determinant by fraction-free elimination (Bareiss' algorithm). All
/// divisions are exact, so this works over every integral domain, and the size of
/// intermediate entries stays bounded by the size of minors of the input.
///
#[instrument(skip_all, level = "trace")]
pub fn det_bareiss<R>(ring: R, res: &mut El<R>, mat: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert!(mat.is_square(), "determinant requires a square matrix");
    if !ring.ctx_is_integral_domain().is_true() {
        return Status::Unable;
    }
    let n = mat.row_count();
    if n == 0 {
        *res = ring.one();
        return Status::Success;
    }
    let mut a = mat.clone();
    let mut status = Status::Success;
    let mut negate = false;
    let mut previous = ring.one();
    for k in 0..(n - 1) {
        match find_pivot(ring, &a, k, k) {
            Pivot::Found(i) => if i != k {
                a.swap_rows(i, k);
                negate = !negate;
            },
            Pivot::Zero => {
                *res = ring.zero();
                return status;
            },
            Pivot::Unknown => return Status::Unable
        }
        for i in (k + 1)..n {
            for j in (k + 1)..n {
                let mut value = ring.zero();
                status |= ring.mul(&mut value, a.at(i, j), a.at(k, k));
                status |= ring.submul(&mut value, a.at(i, k), a.at(k, j));
                let div_status = ring.divexact(a.at_mut(i, j), &value, &previous);
                if !div_status.is_success() {
                    return div_status;
                }
            }
            *a.at_mut(i, k) = ring.zero();
        }
        previous = a.at(k, k).clone();
    }
    let mut result = a.at(n - 1, n - 1).clone();
    if negate {
        status |= ring.neg_inplace(&mut result);
    }
    *res = result;
    return status;
}

///
/// Computes the characteristic polynomial `det(x I - A)` using Berkowitz' algorithm,
/// which uses no divisions and thus works over every commutative ring.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::matrix::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::det::*;
/// let A = GrMat::from_ints(&ZZ, &[&[1, 2], &[3, 4]]);
/// let mut charpoly = GrPoly::new();
/// charpoly_berkowitz(&ZZ, &mut charpoly, &A).must_succeed();
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[-2, -5, 1]), &charpoly).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn charpoly_berkowitz<R>(ring: R, res: &mut GrPoly<El<R>>, mat: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert!(mat.is_square(), "characteristic polynomial requires a square matrix");
    let n = mat.row_count();
    let mut status = Status::Success;
    // coefficients of the current characteristic polynomial, leading coefficient first
    let mut current = vec![ring.one()];
    for k in 0..n {
        let mut toeplitz = Vec::with_capacity(k + 2);
        toeplitz.push(ring.one());
        let mut diag = ring.zero();
        status |= ring.neg(&mut diag, mat.at(k, k));
        toeplitz.push(diag);

        // the column above the diagonal entry, multiplied repeatedly by the leading submatrix
        let mut column = (0..k).map(|i| mat.at(i, k).clone()).collect::<Vec<_>>();
        for step in 0..k {
            let mut value = ring.zero();
            status |= ring.dot(&mut value, None, &mat.row(k)[..k], &column);
            status |= ring.neg_inplace(&mut value);
            toeplitz.push(value);
            if step + 1 < k {
                let mut next = Vec::with_capacity(k);
                for i in 0..k {
                    let mut entry = ring.zero();
                    status |= ring.dot(&mut entry, None, &mat.row(i)[..k], &column);
                    next.push(entry);
                }
                column = next;
            }
        }

        let mut next = Vec::with_capacity(k + 2);
        for i in 0..(k + 2) {
            let mut entry = ring.zero();
            for j in 0..=i.min(k) {
                status |= ring.addmul(&mut entry, &toeplitz[i - j], &current[j]);
            }
            next.push(entry);
        }
        current = next;
    }
    current.reverse();
    let mut result = GrPoly::from_coeffs(current);
    result.normalize(ring);
    *res = result;
    return status;
}

///
/// Computes the determinant as `(-1)^n` times the constant coefficient of the
/// characteristic polynomial. This is division-free.
///
#[instrument(skip_all, level = "trace")]
pub fn det_berkowitz<R>(ring: R, res: &mut El<R>, mat: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    let mut charpoly = GrPoly::new();
    let mut status = charpoly_berkowitz(ring, &mut charpoly, mat);
    let mut result = charpoly.coeff(0, ring);
    if mat.row_count() % 2 == 1 {
        status |= ring.neg_inplace(&mut result);
    }
    *res = result;
    return status;
}

///
/// The default implementation of [`RingBase::mat_det()`], which selects an algorithm
/// based on the size of the matrix and on the ring predicates.
///
/// Small matrices use cofactor expansion. Otherwise, Gaussian elimination is used over
/// fields and Bareiss' algorithm over integral domains. If these fail, or over other
/// rings, the division-free algorithm of Berkowitz is used.
///
#[instrument(skip_all, level = "trace")]
pub fn det_generic<R>(ring: R, res: &mut El<R>, mat: &GrMat<El<R>>) -> Status
    where R: RingStore + Copy
{
    assert!(mat.is_square(), "determinant requires a square matrix");
    let n = mat.row_count();
    let status = if n <= ring.cutoffs().det_cofactor {
        tracing::debug!(op = "det", strategy = "cofactor", len = n);
        return det_cofactor(ring, res, mat);
    } else if ring.ctx_is_field().is_true() {
        tracing::debug!(op = "det", strategy = "lu", len = n);
        det_lu(ring, res, mat)
    } else if ring.ctx_is_integral_domain().is_true() {
        tracing::debug!(op = "det", strategy = "bareiss", len = n);
        det_bareiss(ring, res, mat)
    } else {
        tracing::debug!(op = "det", strategy = "berkowitz", len = n);
        return det_berkowitz(ring, res, mat);
    };
    if status.is_success() {
        return status;
    }
    tracing::debug!(op = "det", strategy = "berkowitz", len = n, reason = "elimination failed", status = ?status);
    return det_berkowitz(ring, res, mat);
}

///
/// Computes the determinant of the square matrix `mat`, using the implementation of
/// the ring (see [`RingBase::mat_det()`]).
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::matrix::*;
/// # use genring::rings::zn::Zn;
/// # use genring::algorithms::det::det;
/// let Z6 = Zn::new(6);
/// let A = GrMat::from_ints(&Z6, &[&[2, 1, 0, 1], &[3, 2, 1, 0], &[0, 1, 2, 3], &[1, 0, 3, 2]]);
/// let mut d = Z6.zero();
/// det(&Z6, &mut d, &A).must_succeed();
/// ```
///
pub fn det<R>(ring: R, res: &mut El<R>, mat: &GrMat<El<R>>) -> Status
    where R: RingStore
{
    ring.get_ring().mat_det(res, mat)
}

#[cfg(test)]
use oorandom::Rand64;
#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::zn::*;
#[cfg(test)]
use crate::rings::ball::RealBallField;
#[cfg(test)]
use crate::tracing::SelectionRecorder;
#[cfg(test)]
use crate::tuning::Cutoffs;

#[cfg(test)]
fn random_matrix<R: RingStore + Copy>(ring: R, n: usize, rng: &mut Rand64) -> GrMat<El<R>> {
    GrMat::from_fn(n, n, |_, _| ring.random_element(rng))
}

#[test]
fn test_det_algorithms_agree() {
    let mut rng = Rand64::new(1);
    for n in 0..6 {
        let A = random_matrix(&ZZ, n, &mut rng);
        let mut expected = ZZ.zero();
        det_cofactor(&ZZ, &mut expected, &A).must_succeed();
        let mut actual = ZZ.zero();
        det_bareiss(&ZZ, &mut actual, &A).must_succeed();
        assert_el_eq!(ZZ, expected, actual);
        det_berkowitz(&ZZ, &mut actual, &A).must_succeed();
        assert_el_eq!(ZZ, expected, actual);
        det(&ZZ, &mut actual, &A).must_succeed();
        assert_el_eq!(ZZ, expected, actual);
    }
    for n in 0..6 {
        let A = random_matrix(&QQ, n, &mut rng);
        let mut expected = QQ.zero();
        det_cofactor(&QQ, &mut expected, &A).must_succeed();
        let mut actual = QQ.zero();
        det_lu(&QQ, &mut actual, &A).must_succeed();
        assert_el_eq!(QQ, expected, actual);
    }
}

#[test]
fn test_det_singular() {
    let A = GrMat::from_ints(&ZZ, &[&[1, 2, 3], &[2, 4, 6], &[0, 1, 5]]);
    let mut d = ZZ.one();
    det_bareiss(&ZZ, &mut d, &A).must_succeed();
    assert!(ZZ.is_zero(&d).is_true());
    det_berkowitz(&ZZ, &mut d, &A).must_succeed();
    assert!(ZZ.is_zero(&d).is_true());
    let A = GrMat::from_ints(&QQ, &[&[0, 2, 3], &[0, 4, 6], &[0, 1, 5]]);
    let mut d = QQ.one();
    det_lu(&QQ, &mut d, &A).must_succeed();
    assert!(QQ.is_zero(&d).is_true());
}

#[test]
fn test_det_selection() {
    let A = GrMat::from_ints(&ZZ, &[&[2, 0, 1, 3], &[1, 1, 0, 2], &[0, 3, 1, 1], &[4, 1, 2, 0]]);
    let mut expected = ZZ.zero();
    det_cofactor(&ZZ, &mut expected, &A).must_succeed();
    let recorder = SelectionRecorder::new();
    let mut d = ZZ.zero();
    tracing::subscriber::with_default(recorder.clone(), || det(&ZZ, &mut d, &A)).must_succeed();
    assert_eq!(Some("bareiss".to_owned()), recorder.strategy_for("det"));
    assert_el_eq!(ZZ, expected, d);

    recorder.clear();
    let Z6 = RingValue::from(ZnBase::new(6).with_cutoffs(Cutoffs::fast_always()));
    let A = GrMat::from_ints(&Z6, &[&[2, 1, 0], &[3, 2, 1], &[0, 1, 2]]);
    let mut d = Z6.zero();
    tracing::subscriber::with_default(recorder.clone(), || det(&Z6, &mut d, &A)).must_succeed();
    assert_eq!(Some("berkowitz".to_owned()), recorder.strategy_for("det"));
    let mut expected = Z6.zero();
    det_cofactor(&Z6, &mut expected, &A).must_succeed();
    assert_el_eq!(Z6, expected, d);
}

#[test]
fn test_det_ball_falls_back() {
    let RR = RealBallField::new();
    let eps = RR.get_ring().ball(0., 1e-3);
    let A = GrMat::from_rows(vec![
        vec![eps, RR.one(), RR.zero(), RR.zero()],
        vec![RR.zero(), RR.one(), RR.zero(), RR.zero()],
        vec![RR.zero(), RR.zero(), RR.one(), RR.zero()],
        vec![RR.zero(), RR.zero(), RR.zero(), RR.one()]
    ]);
    let recorder = SelectionRecorder::new();
    let mut d = RR.zero();
    let status = tracing::subscriber::with_default(recorder.clone(), || det(&RR, &mut d, &A));
    assert_eq!(Status::Success, status);
    assert_eq!(Some("lu".to_owned()), recorder.strategy_for("det"));
    assert!(recorder.decisions().iter().any(|(op, strategy)| op == "det" && strategy == "berkowitz"));
    assert!(d.contains(0.));
    assert!(d.contains(1e-4));
}

#[test]
fn test_charpoly() {
    let A = GrMat::from_ints(&ZZ, &[&[2, 1, 0], &[0, 2, 0], &[0, 0, 3]]);
    let mut charpoly = GrPoly::new();
    charpoly_berkowitz(&ZZ, &mut charpoly, &A).must_succeed();
    // (x - 2)^2 (x - 3)
    assert!(crate::rings::poly::poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[-12, 16, -7, 1]), &charpoly).is_true());
    charpoly_berkowitz(&ZZ, &mut charpoly, &GrMat::zero(0, 0, &ZZ)).must_succeed();
    assert!(crate::rings::poly::poly_is_one(&ZZ, &charpoly).is_true());
}
