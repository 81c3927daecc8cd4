use std::f64::EPSILON;
use std::fmt::Formatter;

use oorandom::Rand64;

use crate::capability::{CapabilityTable, CapabilityTableBuilder, OpId, RingKind};
use crate::ring::*;
use crate::status::Status;
use crate::truth::Truth;
use crate::tuning::{Cutoffs, RingClass};

///
/// Approximation to the real numbers, using `f64` arithmetic.
///
/// All predicates are decided on the stored floating-point values, i.e. they never
/// return [`Truth::Unknown`]. Results are only approximations, which is why the ring
/// reports [`RingBase::ctx_is_exact()`] as [`Truth::False`]; use [`Real64Base::is_approx_eq()`]
/// to compare results of different computations. If a guarantee is required, use
/// [`crate::rings::ball::RealBallField`] instead.
///
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Real64Base {
    cutoffs: Option<Cutoffs>
}

pub type Real64 = RingValue<Real64Base>;

impl Real64 {

    pub const RING: Real64 = RingValue::from(Real64Base { cutoffs: None });
}

fn real64_capabilities(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE).provide(&[
        OpId::Sub,
        OpId::Inv,
        OpId::Div,
        OpId::Sqrt,
        OpId::Exp,
        OpId::Log,
        OpId::RandomElement
    ])
}

impl Real64Base {

    pub fn with_cutoffs(self, cutoffs: Cutoffs) -> Self {
        Real64Base { cutoffs: Some(cutoffs) }
    }

    pub fn is_absolute_approx_eq(&self, lhs: f64, rhs: f64, absolute_threshold: f64) -> bool {
        (lhs - rhs).abs() <= absolute_threshold
    }

    pub fn is_relative_approx_eq(&self, lhs: f64, rhs: f64, relative_threshold: f64) -> bool {
        self.is_absolute_approx_eq(lhs, rhs, lhs.abs() * relative_threshold)
    }

    ///
    /// Checks whether the two values agree up to `precision` units of the machine
    /// epsilon, relatively, or absolutely if `lhs` is close to zero.
    ///
    pub fn is_approx_eq(&self, lhs: f64, rhs: f64, precision: u64) -> bool {
        let scaled_precision = precision as f64 * EPSILON;
        if self.is_absolute_approx_eq(lhs, 0., scaled_precision) {
            self.is_absolute_approx_eq(rhs, 0., scaled_precision)
        } else {
            self.is_relative_approx_eq(lhs, rhs, scaled_precision)
        }
    }
}

impl RingBase for Real64Base {

    type Element = f64;

    fn capabilities(&self) -> &'static CapabilityTable {
        CapabilityTable::register(RingKind::Real64, real64_capabilities)
    }

    fn ctx_is_exact(&self) -> Truth {
        Truth::False
    }

    fn ctx_is_field(&self) -> Truth {
        Truth::True
    }

    fn characteristic(&self) -> Option<u64> {
        Some(0)
    }

    fn cutoffs(&self) -> Cutoffs {
        self.cutoffs.unwrap_or_else(|| Cutoffs::for_class(RingClass::of(self)))
    }

    fn zero(&self) -> f64 {
        0.
    }

    fn one(&self) -> f64 {
        1.
    }

    fn set_si(&self, res: &mut f64, value: i64) -> Status {
        *res = value as f64;
        Status::Success
    }

    fn add(&self, res: &mut f64, lhs: &f64, rhs: &f64) -> Status {
        *res = lhs + rhs;
        Status::Success
    }

    fn sub(&self, res: &mut f64, lhs: &f64, rhs: &f64) -> Status {
        *res = lhs - rhs;
        Status::Success
    }

    fn neg(&self, res: &mut f64, value: &f64) -> Status {
        *res = -value;
        Status::Success
    }

    fn mul(&self, res: &mut f64, lhs: &f64, rhs: &f64) -> Status {
        *res = lhs * rhs;
        Status::Success
    }

    fn is_zero(&self, value: &f64) -> Truth {
        Truth::from_bool(*value == 0.)
    }

    fn equal(&self, lhs: &f64, rhs: &f64) -> Truth {
        Truth::from_bool(lhs == rhs)
    }

    fn inv(&self, res: &mut f64, value: &f64) -> Status {
        if *value == 0. {
            return Status::DomainError;
        }
        *res = 1. / value;
        Status::Success
    }

    fn div(&self, res: &mut f64, lhs: &f64, rhs: &f64) -> Status {
        if *rhs == 0. {
            return Status::DomainError;
        }
        *res = lhs / rhs;
        Status::Success
    }

    fn sqrt(&self, res: &mut f64, value: &f64) -> Status {
        if *value < 0. {
            return Status::DomainError;
        }
        *res = value.sqrt();
        Status::Success
    }

    fn exp(&self, res: &mut f64, value: &f64) -> Status {
        *res = value.exp();
        Status::Success
    }

    fn log(&self, res: &mut f64, value: &f64) -> Status {
        if *value <= 0. {
            return Status::DomainError;
        }
        *res = value.ln();
        Status::Success
    }

    fn random_element(&self, rng: &mut Rand64) -> f64 {
        rng.rand_float() * 20. - 10.
    }

    fn dbg<'a>(&self, value: &f64, out: &mut Formatter<'a>) -> std::fmt::Result {
        write!(out, "{}", value)
    }
}

#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
fn edge_case_elements() -> impl Iterator<Item = f64> {
    // dyadic values, so that all checked identities hold exactly
    [0., 1., -1., 0.5, -0.25, 2., -4., 1024.].into_iter()
}

#[test]
fn test_ring_axioms() {
    generic_tests::test_ring_axioms(Real64::RING, edge_case_elements());
    generic_tests::test_division_axioms(Real64::RING, edge_case_elements());
}

#[test]
fn test_rounding_is_visible() {
    let RR = Real64::RING;
    let mut sum = 0.;
    let mut diff = 0.;
    RR.add(&mut sum, &0.1, &0.7).must_succeed();
    RR.sub(&mut diff, &sum, &0.7).must_succeed();
    assert_eq!(Truth::False, RR.equal(&0.1, &diff));
    assert!(RR.get_ring().is_approx_eq(0.1, diff, 8));
}

#[test]
fn test_predicates_are_decided() {
    let RR = Real64::RING;
    assert_eq!(Truth::True, RR.is_zero(&0.));
    assert_eq!(Truth::False, RR.is_zero(&1e-300));
    assert_eq!(Truth::False, RR.equal(&0.1, &(0.3 - 0.2)));
    assert!(RR.get_ring().is_approx_eq(0.1, 0.3 - 0.2, 10));
    assert_eq!(Truth::False, RR.ctx_is_exact());
    assert_eq!(RingClass::Inexact, RingClass::of(RR.get_ring()));
}

#[test]
fn test_domain_errors() {
    let RR = Real64::RING;
    let mut res = 0.;
    assert_eq!(Status::DomainError, RR.inv(&mut res, &0.));
    assert_eq!(Status::DomainError, RR.sqrt(&mut res, &-1.));
    assert_eq!(Status::DomainError, RR.log(&mut res, &0.));
    RR.exp(&mut res, &1.).must_succeed();
    assert!(RR.get_ring().is_approx_eq(std::f64::consts::E, res, 4));
}

#[test]
fn test_with_cutoffs() {
    let RR = RingValue::from(Real64::RING.get_ring().with_cutoffs(Cutoffs::basecase_only()));
    assert_eq!(usize::MAX, RR.cutoffs().mul_karatsuba);
    assert_eq!(Cutoffs::for_class(RingClass::Inexact), Real64::RING.cutoffs());
}
