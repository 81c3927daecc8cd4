use tracing::instrument;

use crate::algorithms::det::det;
use crate::algorithms::poly_div::poly_rem;
use crate::matrix::GrMat;
use crate::ring::*;
use crate::rings::poly::*;
use crate::status::Status;

///
/// Computes the resultant of `f` and `g` by the Euclidean algorithm, using the
/// identity `Res(f, g) = (-1)^(deg f deg g) lc(g)^(deg f - deg r) Res(g, r)` where `r`
/// is the remainder of `f` modulo `g`.
///
/// This requires the leading coefficients of all remainders to be invertible, and
/// thus only works over fields. If this cannot be proven, [`Status::Unable`] is returned.
///
#[instrument(skip_all, level = "trace")]
pub fn resultant_euclidean<R>(ring: R, res: &mut El<R>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if f.is_empty() || g.is_empty() {
        *res = ring.zero();
        return Status::Success;
    }
    let mut status = Status::Success;
    let mut result = ring.one();
    let mut a = f.clone();
    let mut b = g.clone();
    let mut r = GrPoly::new();
    loop {
        let (da, db) = (a.len() - 1, b.len() - 1);
        if db == 0 || da == 0 {
            let (constant, power) = if db == 0 { (b.coeff(0, ring), da) } else { (a.coeff(0, ring), db) };
            let mut factor = ring.zero();
            status |= ring.pow_ui(&mut factor, &constant, power as u64);
            status |= ring.mul_assign(&mut result, &factor);
            break;
        }
        let lc = b.coeff(db, ring);
        if !ring.is_invertible(&lc).is_true() {
            return Status::Unable;
        }
        let rem_status = poly_rem(ring, &mut r, &a, &b);
        if !rem_status.is_success() {
            return rem_status;
        }
        let Some(dr) = r.degree() else {
            *res = ring.zero();
            return status;
        };
        let mut factor = ring.zero();
        status |= ring.pow_ui(&mut factor, &lc, (da - dr) as u64);
        status |= ring.mul_assign(&mut result, &factor);
        if (da * db) % 2 == 1 {
            status |= ring.neg_inplace(&mut result);
        }
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut b, &mut r);
    }
    *res = result;
    return status;
}

///
/// Returns the Sylvester matrix of `f` and `g`, i.e. the `(m + n) x (m + n)` matrix
/// whose first `n` rows contain shifted copies of the coefficients of `f` and whose
/// last `m` rows contain shifted copies of the coefficients of `g`, where `m` resp. `n`
/// are the degrees of `f` resp. `g`.
///
/// Both polynomials must be nonzero.
///
pub fn sylvester_matrix<R>(ring: R, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>) -> GrMat<El<R>>
    where R: RingStore + Copy
{
    assert!(!f.is_empty() && !g.is_empty(), "sylvester matrix is only defined for nonzero polynomials");
    let m = f.len() - 1;
    let n = g.len() - 1;
    GrMat::from_fn(m + n, m + n, |i, j| if i < n {
        if j >= i && j - i <= m { f.coeff(m - (j - i), ring) } else { ring.zero() }
    } else {
        let i = i - n;
        if j >= i && j - i <= n { g.coeff(n - (j - i), ring) } else { ring.zero() }
    })
}

///
/// Computes the resultant of `f` and `g` as the determinant of their Sylvester matrix.
///
/// The determinant is computed by [`det()`], which falls back to a division-free
/// algorithm, so this works over every commutative ring.
///
#[instrument(skip_all, level = "trace")]
pub fn resultant_sylvester<R>(ring: R, res: &mut El<R>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if f.is_empty() || g.is_empty() {
        *res = ring.zero();
        return Status::Success;
    }
    return det(ring, res, &sylvester_matrix(ring, f, g));
}

///
/// Computes the resultant of `f` and `g`.
///
/// Over fields, the Euclidean algorithm is used, otherwise (or if it fails) the
/// determinant of the Sylvester matrix is computed.
///
/// # Example
/// ```
/// # use genring::assert_el_eq;
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::resultant::resultant;
/// let f = GrPoly::from_ints(&ZZ, &[2, -3, 1]);
/// let g = GrPoly::from_ints(&ZZ, &[-3, 1]);
/// let mut r = ZZ.zero();
/// resultant(&ZZ, &mut r, &f, &g).must_succeed();
/// assert_el_eq!(ZZ, ZZ.int(2), r);
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn resultant<R>(ring: R, res: &mut El<R>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let len = f.len().max(g.len());
    if ring.ctx_is_field().is_true() {
        tracing::debug!(op = "resultant", strategy = "euclidean", len = len);
        let status = resultant_euclidean(ring, res, f, g);
        if status.is_success() {
            return status;
        }
        tracing::debug!(op = "resultant", strategy = "sylvester", len = len, reason = "euclidean failed", status = ?status);
    } else {
        tracing::debug!(op = "resultant", strategy = "sylvester", len = len);
    }
    return resultant_sylvester(ring, res, f, g);
}

///
/// Computes the discriminant `(-1)^(n (n - 1) / 2) Res(f, f') / lc(f)` of a polynomial
/// `f` of degree `n >= 1`.
///
/// The result for a constant polynomial is not defined, and [`Status::DomainError`]
/// is returned in this case.
///
/// # Example
/// ```
/// # use genring::assert_el_eq;
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::resultant::discriminant;
/// let mut d = ZZ.zero();
/// discriminant(&ZZ, &mut d, &GrPoly::from_ints(&ZZ, &[1, 3, 1])).must_succeed();
/// assert_el_eq!(ZZ, ZZ.int(5), d);
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn discriminant<R>(ring: R, res: &mut El<R>, f: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let n = match f.degree() {
        Some(n) if n >= 1 => n,
        _ => return Status::DomainError
    };
    let mut derivative = GrPoly::new();
    let mut status = poly_derivative(ring, &mut derivative, f);
    let Some(derivative_degree) = derivative.degree() else {
        *res = ring.zero();
        return status;
    };
    let mut result = ring.zero();
    let res_status = resultant(ring, &mut result, f, &derivative);
    if !res_status.is_success() {
        return res_status;
    }
    status |= res_status;
    let lc = f.coeff(n, ring);
    // the resultant w.r.t. the formal degree n - 1 of f' is lc^d times the actual one
    let d = (n - 1) - derivative_degree;
    if d >= 1 {
        let mut factor = ring.zero();
        status |= ring.pow_ui(&mut factor, &lc, (d - 1) as u64);
        status |= ring.mul_assign(&mut result, &factor);
    } else {
        let mut quotient = ring.zero();
        let div_status = ring.divexact(&mut quotient, &result, &lc);
        if !div_status.is_success() {
            return div_status;
        }
        result = quotient;
    }
    if (n * (n - 1) / 2) % 2 == 1 {
        status |= ring.neg_inplace(&mut result);
    }
    *res = result;
    return status;
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::rings::poly::generic_tests::random_poly;
#[cfg(test)]
use crate::tracing::SelectionRecorder;
#[cfg(test)]
use oorandom::Rand64;

#[test]
fn test_resultant() {
    let recorder = SelectionRecorder::new();
    let mut r = QQ.zero();
    let f = GrPoly::from_ints(&QQ, &[2, -3, 1]);
    let g = GrPoly::from_ints(&QQ, &[-3, 1]);
    tracing::subscriber::with_default(recorder.clone(), || resultant(&QQ, &mut r, &f, &g)).must_succeed();
    assert_eq!(Some("euclidean".to_owned()), recorder.strategy_for("resultant"));
    assert_el_eq!(QQ, QQ.int(2), r);
    resultant(&QQ, &mut r, &g, &f).must_succeed();
    assert_el_eq!(QQ, QQ.int(2), r);

    recorder.clear();
    let mut r = ZZ.zero();
    let f = GrPoly::from_ints(&ZZ, &[2, -3, 1]);
    let g = GrPoly::from_ints(&ZZ, &[-3, 1]);
    tracing::subscriber::with_default(recorder.clone(), || resultant(&ZZ, &mut r, &f, &g)).must_succeed();
    assert_eq!(Some("sylvester".to_owned()), recorder.strategy_for("resultant"));
    assert_el_eq!(ZZ, ZZ.int(2), r);

    let Z6 = Zn::new(6);
    let mut r = Z6.zero();
    resultant(&Z6, &mut r, &GrPoly::from_ints(&Z6, &[1, 1]), &GrPoly::from_ints(&Z6, &[3, 1])).must_succeed();
    assert_el_eq!(Z6, Z6.int(2), r);
}

#[test]
fn test_resultant_degenerate() {
    let mut r = QQ.one();
    resultant(&QQ, &mut r, &GrPoly::new(), &GrPoly::from_ints(&QQ, &[1, 1])).must_succeed();
    assert!(QQ.is_zero(&r).is_true());
    resultant(&QQ, &mut r, &GrPoly::from_ints(&QQ, &[3]), &GrPoly::from_ints(&QQ, &[1, 0, 1])).must_succeed();
    assert_el_eq!(QQ, QQ.int(9), r);
    resultant(&QQ, &mut r, &GrPoly::from_ints(&QQ, &[3]), &GrPoly::from_ints(&QQ, &[5])).must_succeed();
    assert!(QQ.is_one(&r).is_true());
    // common root 1
    resultant(&QQ, &mut r, &GrPoly::from_ints(&QQ, &[-1, 0, 1]), &GrPoly::from_ints(&QQ, &[-1, 1])).must_succeed();
    assert!(QQ.is_zero(&r).is_true());

    let mut r = ZZ.one();
    resultant(&ZZ, &mut r, &GrPoly::from_ints(&ZZ, &[3]), &GrPoly::from_ints(&ZZ, &[1, 0, 1])).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(9), r);
}

#[test]
fn test_resultant_algorithms_agree() {
    let F101 = Zn::new(101);
    let mut rng = Rand64::new(7);
    for _ in 0..10 {
        let f = random_poly(&F101, 1 + (rng.rand_u64() % 6) as usize, &mut rng);
        let g = random_poly(&F101, 1 + (rng.rand_u64() % 6) as usize, &mut rng);
        let mut expected = F101.zero();
        resultant_sylvester(&F101, &mut expected, &f, &g).must_succeed();
        let mut actual = F101.zero();
        resultant_euclidean(&F101, &mut actual, &f, &g).must_succeed();
        assert_el_eq!(F101, expected, actual);
    }
}

#[test]
fn test_discriminant() {
    let mut d = ZZ.zero();
    discriminant(&ZZ, &mut d, &GrPoly::from_ints(&ZZ, &[1, 3, 2])).must_succeed();
    assert_el_eq!(ZZ, ZZ.one(), d);
    discriminant(&ZZ, &mut d, &GrPoly::from_ints(&ZZ, &[1, 3, 1])).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(5), d);
    discriminant(&ZZ, &mut d, &GrPoly::from_ints(&ZZ, &[1, -2, 1])).must_succeed();
    assert!(ZZ.is_zero(&d).is_true());
    // -4 p^3 - 27 q^2 for x^3 + p x + q
    discriminant(&ZZ, &mut d, &GrPoly::from_ints(&ZZ, &[1, 1, 0, 1])).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(-31), d);

    let F3 = Zn::new(3);
    let mut d = F3.zero();
    discriminant(&F3, &mut d, &GrPoly::from_ints(&F3, &[2, 0, 0, 1])).must_succeed();
    assert!(F3.is_zero(&d).is_true());
    discriminant(&F3, &mut d, &GrPoly::from_ints(&F3, &[1, 1, 0, 1])).must_succeed();
    assert_el_eq!(F3, F3.int(2), d);

    let mut d = ZZ.zero();
    assert_eq!(Status::DomainError, discriminant(&ZZ, &mut d, &GrPoly::from_ints(&ZZ, &[5])));
    assert_eq!(Status::DomainError, discriminant(&ZZ, &mut d, &GrPoly::new()));
}
