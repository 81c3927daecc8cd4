use std::fmt::Formatter;

use oorandom::Rand64;

use crate::algorithms::poly_mul::poly_mullow;
use crate::algorithms::series::*;
use crate::capability::{CapabilityTable, CapabilityTableBuilder, OpId, RingKind};
use crate::ring::*;
use crate::rings::poly::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// The ring `R[[x]]/(x^n)` of power series truncated at a fixed precision `n`.
///
/// Elements are [`GrPoly`]s of length at most `n`. All arithmetic is performed by the
/// series algorithms of [`crate::algorithms::series`], so e.g. inverses are computed by
/// Newton iteration once the precision exceeds the cutoff of the base ring.
///
pub struct SeriesModRingBase<R: RingStore> {
    base_ring: R,
    prec: usize,
    var: &'static str
}

impl<R: RingStore + Clone> Clone for SeriesModRingBase<R> {

    fn clone(&self) -> Self {
        SeriesModRingBase {
            base_ring: self.base_ring.clone(),
            prec: self.prec,
            var: self.var
        }
    }
}

impl<R: RingStore + Copy> Copy for SeriesModRingBase<R> {}

impl<R: RingStore> std::fmt::Debug for SeriesModRingBase<R> {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeriesModRing({}, {})", self.var, self.prec)
    }
}

///
/// The ring `R[[x]]/(x^n)`.
///
/// For the difference to [`SeriesModRingBase`], see the documentation of [`crate::ring::RingStore`].
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::rational::QQ;
/// # use genring::rings::poly::*;
/// # use genring::rings::series::*;
/// let S = SeriesModRing::new(QQ, 4);
/// let mut inverse = S.zero();
/// S.inv(&mut inverse, &GrPoly::from_ints(&QQ, &[1, -1])).must_succeed();
/// assert!(S.equal(&GrPoly::from_ints(&QQ, &[1, 1, 1, 1]), &inverse).is_true());
/// ```
///
pub type SeriesModRing<R> = RingValue<SeriesModRingBase<R>>;

impl<R: RingStore> SeriesModRing<R> {

    ///
    /// Creates the ring `R[[x]]/(x^prec)`.
    ///
    /// # Panics
    ///
    /// Panics if `prec` is zero.
    ///
    pub fn new(base_ring: R, prec: usize) -> Self {
        assert!(prec > 0, "precision of a series ring must be positive");
        RingValue::from(SeriesModRingBase { base_ring, prec, var: "x" })
    }
}

fn series_capabilities(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE).provide(&[
        OpId::Sub,
        OpId::IsOne,
        OpId::Inv,
        OpId::Div,
        OpId::Sqrt,
        OpId::Exp,
        OpId::Log,
        OpId::RandomElement
    ])
}

impl<R: RingStore> SeriesModRingBase<R> {

    pub fn base_ring(&self) -> &R {
        &self.base_ring
    }

    pub fn prec(&self) -> usize {
        self.prec
    }

    ///
    /// Returns the image of the polynomial in this ring, i.e. its truncation.
    ///
    pub fn from_poly(&self, mut poly: GrPoly<El<R>>) -> GrPoly<El<R>> {
        poly.truncate(self.prec, &self.base_ring);
        return poly;
    }

    ///
    /// Maps `DomainError` to `Unable` if the base ring is not an integral domain,
    /// since the series algorithms then only prove that their particular approach
    /// fails.
    ///
    fn domain_error_if_domain(&self, status: Status) -> Status {
        if status.is_domain_error() && !self.base_ring.ctx_is_integral_domain().is_true() {
            Status::Unable
        } else {
            status
        }
    }
}

impl<R: RingStore> RingBase for SeriesModRingBase<R> {

    type Element = GrPoly<El<R>>;

    fn capabilities(&self) -> &'static CapabilityTable {
        CapabilityTable::register(RingKind::SeriesMod, series_capabilities)
    }

    fn ctx_is_exact(&self) -> Truth {
        self.base_ring.ctx_is_exact()
    }

    fn ctx_is_field(&self) -> Truth {
        if self.prec == 1 { self.base_ring.ctx_is_field() } else { Truth::False }
    }

    fn ctx_is_integral_domain(&self) -> Truth {
        if self.prec == 1 { self.base_ring.ctx_is_integral_domain() } else { Truth::False }
    }

    fn characteristic(&self) -> Option<u64> {
        self.base_ring.characteristic()
    }

    fn zero(&self) -> Self::Element {
        GrPoly::new()
    }

    fn one(&self) -> Self::Element {
        GrPoly::constant(&self.base_ring, self.base_ring.one())
    }

    fn set_si(&self, res: &mut Self::Element, value: i64) -> Status {
        let mut c = self.base_ring.zero();
        let status = self.base_ring.set_si(&mut c, value);
        *res = GrPoly::constant(&self.base_ring, c);
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
        poly_mullow(&self.base_ring, res, lhs, rhs, self.prec)
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
    /// A series is invertible if and only if its constant coefficient is.
    ///
    fn inv(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        inv_series(&self.base_ring, res, value, self.prec)
    }

    ///
    /// Division by a series whose constant coefficient is provably zero is not
    /// decided, since the quotient might still exist (e.g. `x / x`).
    ///
    fn div(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        match poly_is_zero(&self.base_ring, rhs) {
            Truth::True => return Status::DomainError,
            Truth::Unknown => return Status::Unable,
            Truth::False => {}
        }
        if self.base_ring.is_zero(&rhs.coeff(0, &self.base_ring)).is_true() {
            return Status::Unable;
        }
        self.domain_error_if_domain(div_series(&self.base_ring, res, lhs, rhs, self.prec))
    }

    fn sqrt(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        self.domain_error_if_domain(sqrt_series(&self.base_ring, res, value, self.prec))
    }

    fn exp(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        exp_series(&self.base_ring, res, value, self.prec)
    }

    fn log(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        log_series(&self.base_ring, res, value, self.prec)
    }

    fn random_element(&self, rng: &mut Rand64) -> Self::Element {
        let mut result = GrPoly::from_coeffs((0..self.prec).map(|_| self.base_ring.random_element(rng)).collect());
        result.normalize(&self.base_ring);
        return result;
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result {
        dbg_poly(&self.base_ring, value, out, self.var)?;
        write!(out, " + O({}^{})", self.var, self.prec)
    }
}

#[cfg(test)]
use crate::ring::generic_tests;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::zn::Zn;

#[cfg(test)]
fn edge_case_elements<R: RingStore + Copy>(base_ring: R) -> impl Iterator<Item = GrPoly<El<R>>> {
    [
        vec![],
        vec![1],
        vec![-1],
        vec![0, 1],
        vec![1, -1],
        vec![2, 0, 3],
        vec![0, 0, 1]
    ].into_iter().map(move |c| GrPoly::from_ints(base_ring, &c))
}

#[test]
fn test_ring_axioms() {
    let S = SeriesModRing::new(QQ, 3);
    generic_tests::test_ring_axioms(&S, edge_case_elements(&QQ));
    generic_tests::test_division_axioms(&S, edge_case_elements(&QQ));
    let Z6 = Zn::new(6);
    let S = SeriesModRing::new(&Z6, 3);
    generic_tests::test_ring_axioms(&S, edge_case_elements(&Z6));
    generic_tests::test_division_axioms(&S, edge_case_elements(&Z6));
}

#[test]
fn test_mul_truncates() {
    let S = SeriesModRing::new(ZZ, 3);
    let mut power = S.zero();
    S.pow_ui(&mut power, &GrPoly::from_ints(&ZZ, &[1, 1]), 5).must_succeed();
    assert_el_eq!(S, GrPoly::from_ints(&ZZ, &[1, 5, 10]), power);
    S.pow_ui(&mut power, &S.get_ring().from_poly(GrPoly::from_ints(&ZZ, &[0, 1])), 3).must_succeed();
    assert!(S.is_zero(&power).is_true());
}

#[test]
fn test_div_and_inv() {
    let S = SeriesModRing::new(ZZ, 4);
    let mut q = S.zero();
    S.div(&mut q, &GrPoly::from_ints(&ZZ, &[2]), &GrPoly::from_ints(&ZZ, &[2, -2])).must_succeed();
    assert_el_eq!(S, GrPoly::from_ints(&ZZ, &[1, 1, 1, 1]), q);
    assert_eq!(Status::DomainError, S.div(&mut q, &GrPoly::from_ints(&ZZ, &[1]), &GrPoly::from_ints(&ZZ, &[2, -2])));
    assert_eq!(Status::Unable, S.div(&mut q, &GrPoly::from_ints(&ZZ, &[0, 1]), &GrPoly::from_ints(&ZZ, &[0, 1])));
    assert_eq!(Status::DomainError, S.inv(&mut q, &GrPoly::from_ints(&ZZ, &[0, 1])));
    assert_eq!(Status::DomainError, S.inv(&mut q, &GrPoly::from_ints(&ZZ, &[2, 1])));
    S.inv(&mut q, &GrPoly::from_ints(&ZZ, &[-1, 1])).must_succeed();
    assert_el_eq!(S, GrPoly::from_ints(&ZZ, &[-1, -1, -1, -1]), q);
}

#[test]
fn test_transcendental() {
    let S = SeriesModRing::new(QQ, 6);
    let f = GrPoly::from_ints(&QQ, &[1, 1]);
    let mut log = S.zero();
    S.log(&mut log, &f).must_succeed();
    let mut exp_log = S.zero();
    S.exp(&mut exp_log, &log).must_succeed();
    assert_el_eq!(S, f, exp_log);

    let mut root = S.zero();
    S.sqrt(&mut root, &f).must_succeed();
    let mut square = S.zero();
    S.mul(&mut square, &root, &root).must_succeed();
    assert_el_eq!(S, f, square);

    let S = SeriesModRing::new(ZZ, 6);
    let mut r = S.zero();
    assert_eq!(Status::DomainError, S.exp(&mut r, &GrPoly::from_ints(&ZZ, &[0, 1])));
}

#[test]
fn test_format() {
    let S = SeriesModRing::new(ZZ, 3);
    assert_eq!("x + 1 + O(x^3)", format!("{}", S.format(&GrPoly::from_ints(&ZZ, &[1, 1]))));
}
