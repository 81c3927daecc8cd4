use tracing::instrument;

use crate::algorithms::poly_div::{poly_pseudo_rem, poly_rem};
use crate::capability::{Method, OpId};
use crate::ring::*;
use crate::rings::poly::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// Computes the monic greatest common divisor of `a` and `b` using the Euclidean
/// algorithm.
///
/// Every remainder sequence step divides by the leading coefficient of the current
/// divisor. If it is provably not invertible, this fails with [`Status::DomainError`],
/// since no meaningful monic gcd exists; if invertibility cannot be decided, this
/// returns [`Status::Unable`].
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::rings::zn::Zn;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::poly_gcd::*;
/// let F7 = Zn::new(7);
/// let mut d = GrPoly::new();
/// gcd_euclidean(&F7, &mut d, &GrPoly::from_ints(&F7, &[-1, 0, 1]), &GrPoly::from_ints(&F7, &[-1, 1])).must_succeed();
/// assert!(poly_equal(&F7, &GrPoly::from_ints(&F7, &[-1, 1]), &d).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn gcd_euclidean<R>(ring: R, res: &mut GrPoly<El<R>>, a: &GrPoly<El<R>>, b: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let (mut current, mut next) = if a.len() >= b.len() { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) };
    let mut status = Status::Success;
    while let Some(lc) = next.lc() {
        match ring.is_invertible(lc) {
            Truth::True => {},
            Truth::False => return Status::DomainError,
            Truth::Unknown => return Status::Unable
        }
        let mut rem = GrPoly::new();
        let rem_status = poly_rem(ring, &mut rem, &current, &next);
        if !rem_status.is_success() {
            return rem_status;
        }
        status |= rem_status;
        current = next;
        next = rem;
    }
    if current.is_empty() {
        *res = current;
        return status;
    }
    return status | poly_make_monic(ring, res, &current);
}

///
/// Computes `res` as the gcd of all coefficients of `f`, as given by [`RingStore::gcd()`].
///
pub fn poly_content<R>(ring: R, res: &mut El<R>, f: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    let mut status = Status::Success;
    let mut current = ring.zero();
    for c in f.coeffs() {
        let mut next = ring.zero();
        status |= ring.gcd(&mut next, &current, c);
        current = next;
        if ring.is_one(&current).is_true() {
            break;
        }
    }
    *res = current;
    return status;
}

///
/// Computes `res = f / content(f)`.
///
pub fn poly_primitive_part<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let mut content = ring.zero();
    let status = poly_content(ring, &mut content, f);
    if !status.is_success() {
        return status;
    }
    match ring.is_zero(&content) {
        Truth::True => {
            *res = GrPoly::new();
            return status;
        },
        Truth::Unknown => return Status::Unable,
        Truth::False => {}
    }
    divide_by_scalar(ring, res, f, &content)
}

fn divide_by_scalar<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, scalar: &El<R>) -> Status
    where R: RingStore + Copy
{
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(f.len());
    for c in f.coeffs() {
        let mut q = ring.zero();
        status |= ring.divexact(&mut q, c, scalar);
        result.push(q);
    }
    if status.is_success() {
        *res = GrPoly::from_coeffs(result);
        res.normalize(ring);
    }
    return status;
}

///
/// Divides `f` by the unit `u` for which `lc(f) / u` is the canonical representative
/// `gcd(lc(f), 0)` of its associate class.
///
fn unit_normalize<R>(ring: R, f: &mut GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let lc = match f.lc() {
        Some(lc) => lc.clone(),
        None => return Status::Success
    };
    let mut canonical = ring.zero();
    let mut status = ring.gcd(&mut canonical, &lc, &ring.zero());
    if ring.equal(&canonical, &lc).is_true() {
        return status;
    }
    let mut unit = ring.zero();
    status |= ring.divexact(&mut unit, &lc, &canonical);
    let mut result = GrPoly::new();
    status |= divide_by_scalar(ring, &mut result, f, &unit);
    *f = result;
    return status;
}

///
/// Computes the greatest common divisor of `a` and `b` over an integral domain
/// with gcds, using the primitive polynomial remainder sequence. Unlike the
/// Euclidean algorithm, this never divides by leading coefficients.
///
/// The result is `gcd(cont(a), cont(b)) * d`, where `d` is the primitive gcd with
/// canonical leading coefficient (i.e. positive over the integers).
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::poly_gcd::*;
/// let mut d = GrPoly::new();
/// gcd_subresultant(&ZZ, &mut d, &GrPoly::from_ints(&ZZ, &[-4, 0, 4]), &GrPoly::from_ints(&ZZ, &[2, 2])).must_succeed();
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[2, 2]), &d).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn gcd_subresultant<R>(ring: R, res: &mut GrPoly<El<R>>, a: &GrPoly<El<R>>, b: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if a.is_empty() || b.is_empty() {
        let mut result = if a.is_empty() { b.clone() } else { a.clone() };
        let status = unit_normalize(ring, &mut result);
        *res = result;
        return status;
    }
    let mut a_content = ring.zero();
    let mut b_content = ring.zero();
    let mut content = ring.zero();
    let mut status = poly_content(ring, &mut a_content, a) | poly_content(ring, &mut b_content, b);
    status |= ring.gcd(&mut content, &a_content, &b_content);
    if !status.is_success() {
        return status;
    }

    let mut current = GrPoly::new();
    let mut next = GrPoly::new();
    status |= poly_primitive_part(ring, &mut current, a);
    status |= poly_primitive_part(ring, &mut next, b);
    if current.len() < next.len() {
        current.swap(&mut next);
    }
    let mut rem = GrPoly::new();
    while !next.is_empty() {
        if poly_is_zero(ring, &next).is_unknown() {
            return Status::Unable;
        }
        let rem_status = poly_pseudo_rem(ring, &mut rem, &current, &next);
        if !rem_status.is_success() {
            return rem_status;
        }
        current.swap(&mut next);
        if rem.is_empty() {
            next = GrPoly::new();
        } else {
            status |= poly_primitive_part(ring, &mut next, &rem);
        }
        if !status.is_success() {
            return status;
        }
    }
    status |= unit_normalize(ring, &mut current);
    let mut result = GrPoly::new();
    status |= poly_mul_scalar(ring, &mut result, &current, &content);
    *res = result;
    return status;
}

///
/// Computes a greatest common divisor of `a` and `b`.
///
/// Over fields, this is the monic gcd computed by [`gcd_euclidean()`]. Over integral
/// domains whose ring provides its own gcd, this is the canonical gcd computed by
/// [`gcd_subresultant()`]. Otherwise, the Euclidean algorithm is used, which fails
/// as soon as a non-invertible leading coefficient occurs.
///
#[instrument(skip_all, level = "trace")]
pub fn poly_gcd<R>(ring: R, res: &mut GrPoly<El<R>>, a: &GrPoly<El<R>>, b: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if ring.ctx_is_field().is_true() {
        tracing::debug!(op = "poly_gcd", strategy = "euclidean", len = a.len().max(b.len()));
        return gcd_euclidean(ring, res, a, b);
    }
    if ring.ctx_is_integral_domain().is_true() && ring.resolve(OpId::Gcd) == Method::Specific {
        tracing::debug!(op = "poly_gcd", strategy = "subresultant", len = a.len().max(b.len()));
        return gcd_subresultant(ring, res, a, b);
    }
    tracing::debug!(op = "poly_gcd", strategy = "euclidean", len = a.len().max(b.len()));
    return gcd_euclidean(ring, res, a, b);
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
use crate::tracing::SelectionRecorder;
#[cfg(test)]
use crate::algorithms::poly_mul::poly_mul;
#[cfg(test)]
use num_bigint::BigInt;

#[test]
fn test_gcd_over_finite_field() {
    let F7 = Zn::new(7);
    let f = GrPoly::from_ints(&F7, &[-1, 0, 1]);
    let g = GrPoly::from_ints(&F7, &[-1, 1]);
    let mut d = GrPoly::new();
    poly_gcd(&F7, &mut d, &f, &g).must_succeed();
    assert!(poly_equal(&F7, &g, &d).is_true());

    let g = GrPoly::from_ints(&F7, &[-3, 3]);
    poly_gcd(&F7, &mut d, &f, &g).must_succeed();
    assert!(poly_equal(&F7, &GrPoly::from_ints(&F7, &[-1, 1]), &d).is_true());
    poly_gcd(&F7, &mut d, &GrPoly::new(), &g).must_succeed();
    assert!(poly_equal(&F7, &GrPoly::from_ints(&F7, &[-1, 1]), &d).is_true());
    poly_gcd(&F7, &mut d, &GrPoly::new(), &GrPoly::new()).must_succeed();
    assert!(d.is_empty());
}

#[test]
fn test_gcd_non_invertible_leading_coefficient() {
    let Z6 = Zn::new(6);
    let f = GrPoly::from_ints(&Z6, &[-2, 0, 2]);
    let g = GrPoly::from_ints(&Z6, &[-2, 2]);
    let mut d = GrPoly::new();
    assert_eq!(Status::DomainError, poly_gcd(&Z6, &mut d, &f, &g));
}

#[test]
fn test_gcd_over_integers() {
    let f = GrPoly::from_ints(&ZZ, &[-4, 0, 4]);
    let g = GrPoly::from_ints(&ZZ, &[-6, 6]);
    let mut d = GrPoly::new();
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || poly_gcd(&ZZ, &mut d, &f, &g)).must_succeed();
    assert_eq!(Some("subresultant".to_owned()), recorder.strategy_for("poly_gcd"));
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[-2, 2]), &d).is_true());

    let f = GrPoly::from_ints(&ZZ, &[1, 1]);
    let g = GrPoly::from_ints(&ZZ, &[-1, 1]);
    poly_gcd(&ZZ, &mut d, &f, &g).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1]), &d).is_true());
}

#[test]
fn test_gcd_subresultant_agrees_with_euclidean() {
    let a = GrPoly::from_ints(&ZZ, &[3, -1, 2, 5]);
    let b = GrPoly::from_ints(&ZZ, &[1, 4, -2]);
    let c = GrPoly::from_ints(&ZZ, &[-7, 0, 3, 1]);
    let mut f = GrPoly::new();
    let mut g = GrPoly::new();
    poly_mul(&ZZ, &mut f, &a, &c).must_succeed();
    poly_mul(&ZZ, &mut g, &b, &c).must_succeed();
    let mut d = GrPoly::new();
    gcd_subresultant(&ZZ, &mut d, &f, &g).must_succeed();
    assert!(poly_equal(&ZZ, &c, &d).is_true());

    let to_qq = |p: &GrPoly<BigInt>| GrPoly::from_coeffs(p.coeffs().iter().map(|c| QQ.get_ring().from_integer(c.clone())).collect());
    let mut d_qq = GrPoly::new();
    gcd_euclidean(&QQ, &mut d_qq, &to_qq(&f), &to_qq(&g)).must_succeed();
    assert!(poly_equal(&QQ, &to_qq(&c), &d_qq).is_true());
}

#[test]
fn test_content_and_primitive_part() {
    let f = GrPoly::from_ints(&ZZ, &[6, -9, 12]);
    let mut content = ZZ.zero();
    poly_content(&ZZ, &mut content, &f).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(3), content);
    let mut pp = GrPoly::new();
    poly_primitive_part(&ZZ, &mut pp, &f).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[2, -3, 4]), &pp).is_true());
    poly_primitive_part(&ZZ, &mut pp, &GrPoly::new()).must_succeed();
    assert!(pp.is_empty());
}

#[test]
fn test_gcd_ball_unknown() {
    let RR = RealBallField::new();
    let f = GrPoly::from_ints(&RR, &[-1, 0, 1]);
    let g = GrPoly::from_coeffs(vec![RR.one(), RR.get_ring().ball(0., 1e-3)]);
    let mut d = GrPoly::new();
    assert_eq!(Status::Unable, poly_gcd(&RR, &mut d, &f, &g));
}
