use std::fmt::Formatter;

use oorandom::Rand64;

use crate::algorithms::poly_div::poly_divrem;
use crate::algorithms::poly_gcd::poly_gcd;
use crate::algorithms::poly_mul::poly_mul;
use crate::capability::{CapabilityTable, CapabilityTableBuilder, OpId, RingKind};
use crate::ring::*;
use crate::rings::poly::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// The univariate polynomial ring `R[X]` over a base ring `R`. Polynomials are stored
/// as dense [`GrPoly`]s of coefficients.
///
/// The base ring is stored via a [`RingStore`], so the polynomial ring can either own
/// it or just borrow it.
///
/// # Example
/// ```
/// # use genring::assert_el_eq;
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::rings::poly::dense_poly::*;
/// let P = PolyRing::new(ZZ, "x");
/// let x_plus_1 = GrPoly::from_ints(&ZZ, &[1, 1]);
/// let mut binomial = P.zero();
/// P.pow_ui(&mut binomial, &x_plus_1, 10).must_succeed();
/// assert_el_eq!(ZZ, ZZ.int(10 * 9 * 8 * 7 * 6 / 120), binomial.coeff(5, &ZZ));
/// ```
///
pub struct PolyRingBase<R: RingStore> {
    base_ring: R,
    var: &'static str
}

impl<R: RingStore + Clone> Clone for PolyRingBase<R> {

    fn clone(&self) -> Self {
        PolyRingBase {
            base_ring: self.base_ring.clone(),
            var: self.var
        }
    }
}

impl<R: RingStore + Copy> Copy for PolyRingBase<R> {}

impl<R: RingStore> std::fmt::Debug for PolyRingBase<R> {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PolyRing({})", self.var)
    }
}

///
/// The univariate polynomial ring `R[X]`.
///
/// For the difference to [`PolyRingBase`], see the documentation of [`crate::ring::RingStore`].
///
pub type PolyRing<R> = RingValue<PolyRingBase<R>>;

impl<R: RingStore> PolyRing<R> {

    pub fn new(base_ring: R, var: &'static str) -> Self {
        RingValue::from(PolyRingBase { base_ring, var })
    }
}

fn poly_capabilities(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE).provide(&[
        OpId::Sub,
        OpId::IsOne,
        OpId::Inv,
        OpId::Div,
        OpId::Gcd,
        OpId::RandomElement
    ])
}

impl<R: RingStore> PolyRingBase<R> {

    pub fn base_ring(&self) -> &R {
        &self.base_ring
    }

    pub fn var(&self) -> &'static str {
        self.var
    }

    pub fn indeterminate(&self) -> GrPoly<El<R>> {
        GrPoly::gen(&self.base_ring)
    }

    ///
    /// Returns the embedding of a base ring element as constant polynomial.
    ///
    pub fn from_base(&self, value: El<R>) -> GrPoly<El<R>> {
        GrPoly::constant(&self.base_ring, value)
    }
}

impl<R: RingStore> RingBase for PolyRingBase<R> {

    type Element = GrPoly<El<R>>;

    fn capabilities(&self) -> &'static CapabilityTable {
        CapabilityTable::register(RingKind::Polynomial, poly_capabilities)
    }

    fn ctx_is_exact(&self) -> Truth {
        self.base_ring.ctx_is_exact()
    }

    fn ctx_is_field(&self) -> Truth {
        Truth::False
    }

    fn ctx_is_integral_domain(&self) -> Truth {
        self.base_ring.ctx_is_integral_domain()
    }

    fn ctx_is_commutative(&self) -> Truth {
        self.base_ring.ctx_is_commutative()
    }

    fn characteristic(&self) -> Option<u64> {
        self.base_ring.characteristic()
    }

    fn zero(&self) -> Self::Element {
        GrPoly::new()
    }

    fn one(&self) -> Self::Element {
        self.from_base(self.base_ring.one())
    }

    fn set_si(&self, res: &mut Self::Element, value: i64) -> Status {
        let mut c = self.base_ring.zero();
        let status = self.base_ring.set_si(&mut c, value);
        *res = self.from_base(c);
        return status;
    }

    fn add(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        poly_add(&self.base_ring, res, lhs, rhs)
    }

    fn sub(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        poly_sub(&self.base_ring, res, lhs, rhs)
    }

    fn neg(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        poly_neg(&self.base_ring, res, value)
    }

    fn mul(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        poly_mul(&self.base_ring, res, lhs, rhs)
    }

    fn is_zero(&self, value: &Self::Element) -> Truth {
        poly_is_zero(&self.base_ring, value)
    }

    fn is_one(&self, value: &Self::Element) -> Truth {
        poly_is_one(&self.base_ring, value)
    }

    fn equal(&self, lhs: &Self::Element, rhs: &Self::Element) -> Truth {
        poly_equal(&self.base_ring, lhs, rhs)
    }

    ///
    /// Constant polynomials are inverted in the base ring. Nonconstant polynomials
    /// are not invertible over an integral domain; otherwise they might be (e.g.
    /// `1 + 2x` over `Z/4Z`), which is not decided.
    ///
    fn inv(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        match value.len() {
            0 => Status::DomainError,
            1 => {
                let mut c = self.base_ring.zero();
                let status = self.base_ring.inv(&mut c, &value.coeffs()[0]);
                if status.is_success() {
                    *res = self.from_base(c);
                }
                status
            },
            _ if self.base_ring.ctx_is_integral_domain().is_true() => Status::DomainError,
            _ => Status::Unable
        }
    }

    ///
    /// Computes the exact quotient by polynomial division with remainder.
    ///
    fn div(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        if rhs.is_empty() {
            return Status::DomainError;
        }
        let is_domain = self.base_ring.ctx_is_integral_domain().is_true();
        let mut quo = GrPoly::new();
        let mut rem = GrPoly::new();
        match poly_divrem(&self.base_ring, &mut quo, &mut rem, lhs, rhs) {
            Status::Success => {},
            Status::DomainError if is_domain => return Status::DomainError,
            _ => return Status::Unable
        }
        match poly_is_zero(&self.base_ring, &rem) {
            Truth::True => {
                *res = quo;
                Status::Success
            },
            Truth::False if is_domain => Status::DomainError,
            _ => Status::Unable
        }
    }

    fn gcd(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        poly_gcd(&self.base_ring, res, lhs, rhs)
    }

    fn random_element(&self, rng: &mut Rand64) -> Self::Element {
        let len = rng.rand_range(0..5) as usize;
        let mut result = GrPoly::from_coeffs((0..len).map(|_| self.base_ring.random_element(rng)).collect());
        result.normalize(&self.base_ring);
        return result;
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result {
        dbg_poly(&self.base_ring, value, out, self.var)
    }
}

#[cfg(test)]
use crate::ring::generic_tests;
#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::matrix::GrMat;
#[cfg(test)]
use crate::algorithms::det::det;

#[cfg(test)]
fn edge_case_elements<R: RingStore + Copy>(base_ring: R) -> impl Iterator<Item = GrPoly<El<R>>> {
    [
        vec![],
        vec![1],
        vec![-1],
        vec![0, 1],
        vec![2, 0, -1],
        vec![1, 1, 1, 1],
        vec![3, 0, 0, 0, 5]
    ].into_iter().map(move |c| GrPoly::from_ints(base_ring, &c))
}

#[test]
fn test_ring_axioms() {
    let P = PolyRing::new(ZZ, "x");
    generic_tests::test_ring_axioms(&P, edge_case_elements(&ZZ));
    generic_tests::test_division_axioms(&P, edge_case_elements(&ZZ));
    let Z6 = Zn::new(6);
    let P = PolyRing::new(&Z6, "x");
    generic_tests::test_ring_axioms(&P, edge_case_elements(&Z6));
    generic_tests::test_division_axioms(&P, edge_case_elements(&Z6));
}

#[test]
fn test_div() {
    let P = PolyRing::new(ZZ, "x");
    let mut q = P.zero();
    P.div(&mut q, &GrPoly::from_ints(&ZZ, &[-1, 0, 1]), &GrPoly::from_ints(&ZZ, &[-1, 1])).must_succeed();
    assert_el_eq!(P, GrPoly::from_ints(&ZZ, &[1, 1]), q);
    assert_eq!(Status::DomainError, P.div(&mut q, &GrPoly::from_ints(&ZZ, &[0, 0, 1]), &GrPoly::from_ints(&ZZ, &[0, 2])));
    assert_eq!(Status::DomainError, P.div(&mut q, &GrPoly::from_ints(&ZZ, &[1, 0, 1]), &GrPoly::from_ints(&ZZ, &[-1, 1])));
    assert_eq!(Status::DomainError, P.div(&mut q, &P.one(), &P.zero()));

    let Z4 = Zn::new(4);
    let P = PolyRing::new(Z4, "x");
    let mut q = P.zero();
    assert_eq!(Status::Unable, P.inv(&mut q, &GrPoly::from_ints(&Z4, &[1, 2])));
    P.inv(&mut q, &GrPoly::from_ints(&Z4, &[3])).must_succeed();
    assert_el_eq!(P, GrPoly::from_ints(&Z4, &[3]), q);
}

#[test]
fn test_inv() {
    let P = PolyRing::new(ZZ, "x");
    let mut r = P.zero();
    P.inv(&mut r, &P.int(-1)).must_succeed();
    assert_el_eq!(P, P.int(-1), r);
    assert_eq!(Status::DomainError, P.inv(&mut r, &P.int(2)));
    assert_eq!(Status::DomainError, P.inv(&mut r, &P.get_ring().indeterminate()));
    assert!(P.is_invertible(&P.get_ring().indeterminate()).is_false());
}

#[test]
fn test_gcd_and_det() {
    let P = PolyRing::new(ZZ, "x");
    let mut g = P.zero();
    P.gcd(&mut g, &GrPoly::from_ints(&ZZ, &[-4, 0, 4]), &GrPoly::from_ints(&ZZ, &[-6, 6])).must_succeed();
    assert_el_eq!(P, GrPoly::from_ints(&ZZ, &[-2, 2]), g);

    // the determinant of x I - A is the characteristic polynomial of A
    let A = GrMat::from_rows(vec![
        vec![GrPoly::from_ints(&ZZ, &[-2, 1]), GrPoly::from_ints(&ZZ, &[-1]), P.zero(), P.zero()],
        vec![P.zero(), GrPoly::from_ints(&ZZ, &[-2, 1]), P.zero(), P.zero()],
        vec![P.zero(), P.zero(), GrPoly::from_ints(&ZZ, &[-3, 1]), P.zero()],
        vec![P.zero(), P.zero(), P.zero(), GrPoly::from_ints(&ZZ, &[0, 1])]
    ]);
    let mut d = P.zero();
    det(&P, &mut d, &A).must_succeed();
    assert_el_eq!(P, GrPoly::from_ints(&ZZ, &[0, -12, 16, -7, 1]), d);
}

#[test]
fn test_format() {
    let P = PolyRing::new(ZZ, "x");
    assert_eq!("x^2 + (2)x + 1", format!("{}", P.format(&GrPoly::from_ints(&ZZ, &[1, 2, 1]))));
    assert_eq!("0", format!("{}", P.format(&P.zero())));
}
