use std::f64::EPSILON;
use std::fmt::Formatter;

use oorandom::Rand64;

use crate::capability::{CapabilityTable, CapabilityTableBuilder, OpId, RingKind};
use crate::ring::*;
use crate::status::Status;
use crate::truth::Truth;
use crate::tuning::{Cutoffs, RingClass};

///
/// An element of [`RealBallField`], i.e. the closed interval `[mid - rad, mid + rad]`.
///
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Ball {
    mid: f64,
    rad: f64
}

impl Ball {

    pub fn mid(&self) -> f64 {
        self.mid
    }

    pub fn rad(&self) -> f64 {
        self.rad
    }

    pub fn lower(&self) -> f64 {
        self.mid - self.rad
    }

    pub fn upper(&self) -> f64 {
        self.mid + self.rad
    }

    pub fn contains(&self, x: f64) -> bool {
        (self.mid - x).abs() <= self.rad
    }

    pub fn contains_zero(&self) -> bool {
        self.contains(0.)
    }

    pub fn is_exact(&self) -> bool {
        self.rad == 0.
    }
}

///
/// Real numbers represented by balls, i.e. a `f64` midpoint together with a radius
/// that bounds the error of the midpoint. All operations produce balls that are
/// guaranteed to contain the exact result of the operation applied to any values
/// within the input balls.
///
/// Predicates are only decided if the balls allow it: a ball that contains zero,
/// but is not exactly zero, might or might not be zero, so [`RingBase::is_zero()`]
/// returns [`Truth::Unknown`]. Consequently, inverting such a ball is
/// [`Status::Unable`], while inverting an exact zero is [`Status::DomainError`].
///
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RealBallFieldBase {
    cutoffs: Option<Cutoffs>
}

///
/// Real ball arithmetic, see [`RealBallFieldBase`].
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::truth::*;
/// # use genring::rings::ball::*;
/// let RR = RealBallField::new();
/// let x = RR.get_ring().ball(0.5, 1.);
/// assert_eq!(Truth::Unknown, RR.is_zero(&x));
/// let mut res = RR.zero();
/// assert_eq!(Status::Unable, RR.inv(&mut res, &x));
/// assert_eq!(Status::DomainError, RR.inv(&mut res, &RR.zero()));
/// ```
///
pub type RealBallField = RingValue<RealBallFieldBase>;

impl RealBallField {

    pub const fn new() -> Self {
        RingValue::from(RealBallFieldBase { cutoffs: None })
    }
}

fn ball_capabilities(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE).provide(&[
        OpId::Sqr,
        OpId::IsOne,
        OpId::Inv,
        OpId::Sqrt,
        OpId::Exp,
        OpId::Log,
        OpId::RandomElement
    ])
}

///
/// Bound on the rounding error of an operation whose exact result is near `mid`.
///
fn rounding_error(mid: f64) -> f64 {
    mid.abs() * (2. * EPSILON) + f64::MIN_POSITIVE
}

impl RealBallFieldBase {

    pub fn with_cutoffs(self, cutoffs: Cutoffs) -> Self {
        RealBallFieldBase { cutoffs: Some(cutoffs) }
    }

    ///
    /// Creates the ball with given midpoint and radius.
    ///
    /// # Panics
    ///
    /// Panics if the radius is negative or not a number.
    ///
    pub fn ball(&self, mid: f64, rad: f64) -> Ball {
        assert!(rad >= 0., "radius must be nonnegative");
        Ball { mid, rad }
    }

    pub fn exact(&self, value: f64) -> Ball {
        Ball { mid: value, rad: 0. }
    }

    fn rounded(&self, mid: f64, rad: f64) -> Ball {
        let rad = rad * (1. + 2. * EPSILON);
        if mid.is_finite() && rad.is_finite() {
            Ball { mid, rad: rad + rounding_error(mid) }
        } else {
            Ball { mid: 0., rad: f64::INFINITY }
        }
    }

    fn overflowed(&self, value: &Ball) -> Status {
        if value.rad.is_finite() { Status::Success } else { Status::Unable }
    }
}

impl RingBase for RealBallFieldBase {

    type Element = Ball;

    fn capabilities(&self) -> &'static CapabilityTable {
        CapabilityTable::register(RingKind::RealBall, ball_capabilities)
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

    fn zero(&self) -> Ball {
        Ball { mid: 0., rad: 0. }
    }

    fn one(&self) -> Ball {
        Ball { mid: 1., rad: 0. }
    }

    fn set_si(&self, res: &mut Ball, value: i64) -> Status {
        let mid = value as f64;
        *res = if mid as i64 == value && mid.abs() < (1u64 << f64::MANTISSA_DIGITS) as f64 {
            Ball { mid, rad: 0. }
        } else {
            self.rounded(mid, 0.)
        };
        Status::Success
    }

    fn add(&self, res: &mut Ball, lhs: &Ball, rhs: &Ball) -> Status {
        let mid = lhs.mid + rhs.mid;
        *res = if lhs.is_exact() && rhs.is_exact() && mid - lhs.mid == rhs.mid && mid - rhs.mid == lhs.mid {
            Ball { mid, rad: 0. }
        } else {
            self.rounded(mid, lhs.rad + rhs.rad)
        };
        self.overflowed(res)
    }

    fn neg(&self, res: &mut Ball, value: &Ball) -> Status {
        *res = Ball { mid: -value.mid, rad: value.rad };
        Status::Success
    }

    fn mul(&self, res: &mut Ball, lhs: &Ball, rhs: &Ball) -> Status {
        let mid = lhs.mid * rhs.mid;
        let small_integers = lhs.mid.fract() == 0. && rhs.mid.fract() == 0. && mid.abs() < (1u64 << f64::MANTISSA_DIGITS) as f64;
        *res = if lhs.is_exact() && rhs.is_exact() && (lhs.mid == 0. || rhs.mid == 0. || small_integers) {
            Ball { mid, rad: 0. }
        } else {
            self.rounded(mid, lhs.mid.abs() * rhs.rad + rhs.mid.abs() * lhs.rad + lhs.rad * rhs.rad)
        };
        self.overflowed(res)
    }

    fn is_zero(&self, value: &Ball) -> Truth {
        if value.mid == 0. && value.rad == 0. {
            Truth::True
        } else if value.contains_zero() {
            Truth::Unknown
        } else {
            Truth::False
        }
    }

    fn is_one(&self, value: &Ball) -> Truth {
        if value.mid == 1. && value.rad == 0. {
            Truth::True
        } else if value.contains(1.) {
            Truth::Unknown
        } else {
            Truth::False
        }
    }

    fn equal(&self, lhs: &Ball, rhs: &Ball) -> Truth {
        if lhs.is_exact() && rhs.is_exact() {
            Truth::from_bool(lhs.mid == rhs.mid)
        } else if (lhs.mid - rhs.mid).abs() <= (lhs.rad + rhs.rad) * (1. + 4. * EPSILON) {
            Truth::Unknown
        } else {
            Truth::False
        }
    }

    fn inv(&self, res: &mut Ball, value: &Ball) -> Status {
        match self.is_zero(value) {
            Truth::True => Status::DomainError,
            Truth::Unknown => Status::Unable,
            Truth::False => {
                let mid = 1. / value.mid;
                let lower = value.mid.abs() - value.rad;
                *res = self.rounded(mid, value.rad / (value.mid.abs() * lower));
                self.overflowed(res)
            }
        }
    }

    fn sqr(&self, res: &mut Ball, value: &Ball) -> Status {
        self.mul(res, value, value)
    }

    fn sqrt(&self, res: &mut Ball, value: &Ball) -> Status {
        if value.upper() < 0. {
            return Status::DomainError;
        } else if value.lower() < 0. {
            return Status::Unable;
        }
        let mid = value.mid.sqrt();
        let rad = mid - value.lower().sqrt();
        *res = if value.is_exact() && mid * mid == value.mid {
            Ball { mid, rad: 0. }
        } else {
            self.rounded(mid, rad)
        };
        Status::Success
    }

    fn exp(&self, res: &mut Ball, value: &Ball) -> Status {
        if value.mid == 0. && value.rad == 0. {
            *res = self.one();
            return Status::Success;
        }
        let mid = value.mid.exp();
        *res = self.rounded(mid, mid * value.rad.exp_m1());
        self.overflowed(res)
    }

    fn log(&self, res: &mut Ball, value: &Ball) -> Status {
        if value.upper() <= 0. {
            return Status::DomainError;
        } else if value.lower() <= 0. {
            return Status::Unable;
        }
        if value.mid == 1. && value.rad == 0. {
            *res = self.zero();
            return Status::Success;
        }
        let mid = value.mid.ln();
        *res = self.rounded(mid, mid - value.lower().ln());
        self.overflowed(res)
    }

    fn random_element(&self, rng: &mut Rand64) -> Ball {
        Ball { mid: rng.rand_range(0..21) as f64 - 10., rad: 0. }
    }

    fn dbg<'a>(&self, value: &Ball, out: &mut Formatter<'a>) -> std::fmt::Result {
        if value.rad == 0. {
            write!(out, "{}", value.mid)
        } else {
            write!(out, "[{} +/- {:.3e}]", value.mid, value.rad)
        }
    }
}

#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
use crate::capability::Method;

#[cfg(test)]
fn edge_case_elements() -> impl Iterator<Item = Ball> {
    let RR = RealBallField::new();
    [(0., 0.), (1., 0.), (-1., 0.), (0.5, 0.), (3., 1e-10), (0., 1e-5), (-7.25, 0.5), (1e10, 1.)].into_iter().map(move |(m, r)| RR.get_ring().ball(m, r))
}

#[test]
fn test_ring_axioms() {
    let RR = RealBallField::new();
    generic_tests::test_ring_axioms(RR, edge_case_elements());
    generic_tests::test_division_axioms(RR, edge_case_elements());
}

#[test]
fn test_capabilities() {
    let RR = RealBallField::new();
    assert_eq!(Method::Specific, RR.resolve(OpId::IsOne));
    assert_eq!(Method::Specific, RR.resolve(OpId::Sqr));
    assert_eq!(Method::Generic(&[OpId::Inv, OpId::Mul]), RR.resolve(OpId::Div));
    assert_eq!(Truth::Unknown, RR.is_one(&RR.get_ring().ball(1., 1e-5)));
}

#[test]
fn test_straddling_ball() {
    let RR = RealBallField::new();
    let x = RR.get_ring().ball(1e-3, 1e-2);
    assert_eq!(Truth::Unknown, RR.is_zero(&x));
    assert_eq!(Truth::Unknown, RR.equal(&x, &RR.zero()));
    assert_eq!(Truth::Unknown, RR.is_invertible(&x));
    let mut res = RR.zero();
    assert_eq!(Status::Unable, RR.inv(&mut res, &x));
    assert_eq!(Status::Unable, RR.div(&mut res, &RR.one(), &x));
    assert_eq!(Status::Unable, RR.sqrt(&mut res, &x));
    assert_eq!(Status::DomainError, RR.div(&mut res, &RR.one(), &RR.zero()));
    assert_eq!(Status::DomainError, RR.sqrt(&mut res, &RR.int(-1)));
}

#[test]
fn test_enclosure() {
    let RR = RealBallField::new();
    let mut third = RR.zero();
    RR.div(&mut third, &RR.one(), &RR.int(3)).must_succeed();
    assert!(third.contains(1. / 3.));
    assert!(!third.is_exact());
    let mut sum = RR.zero();
    RR.add(&mut sum, &third, &third).must_succeed();
    RR.add_assign(&mut sum, &third).must_succeed();
    assert_eq!(Truth::Unknown, RR.is_one(&sum));
    assert_eq!(Truth::False, RR.is_zero(&sum));
    let mut root = RR.zero();
    RR.sqrt(&mut root, &RR.int(2)).must_succeed();
    assert!(root.contains(std::f64::consts::SQRT_2));
    RR.sqrt(&mut root, &RR.int(16)).must_succeed();
    assert!(root.is_exact());
}

#[test]
fn test_exact_integer_arithmetic() {
    let RR = RealBallField::new();
    let mut res = RR.zero();
    RR.mul(&mut res, &RR.int(-12), &RR.int(7)).must_succeed();
    assert_eq!(Truth::True, RR.equal(&res, &RR.int(-84)));
    RR.sub(&mut res, &RR.int(5), &RR.int(5)).must_succeed();
    assert_eq!(Truth::True, RR.is_zero(&res));
    assert_eq!("[0.5 +/- 1.000e-1]", format!("{}", RR.format(&RR.get_ring().ball(0.5, 0.1))));
}
