use std::fmt::Formatter;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use oorandom::Rand64;

use crate::capability::{CapabilityTable, CapabilityTableBuilder, OpId, RingKind};
use crate::ring::*;
use crate::rings::integer::ZZ;
use crate::status::Status;
use crate::truth::Truth;

///
/// An element of [`RationalField`], i.e. a fraction `num / den` in lowest terms
/// with positive denominator.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    num: BigInt,
    den: BigInt
}

impl Rational {

    pub fn num(&self) -> &BigInt {
        &self.num
    }

    pub fn den(&self) -> &BigInt {
        &self.den
    }
}

///
/// The field of rational numbers `Q`, based on representing them as reduced
/// fractions of arbitrary-precision integers.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RationalFieldBase;

///
/// The field of rational numbers `Q`.
///
/// # Example
/// ```
/// # use genring::assert_el_eq;
/// # use genring::ring::*;
/// # use genring::rings::rational::QQ;
/// let one_half = QQ.get_ring().from_fraction(1, 2);
/// let mut result = QQ.zero();
/// QQ.pow_ui(&mut result, &one_half, 2).must_succeed();
/// assert_el_eq!(QQ, QQ.get_ring().from_fraction(2, 8), result);
/// ```
///
pub type RationalField = RingValue<RationalFieldBase>;

pub const QQ: RationalField = RingValue::from(RationalFieldBase);

impl RationalField {

    pub const RING: RationalField = QQ;
}

fn rational_capabilities(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE).provide(&[
        OpId::Sub,
        OpId::IsOne,
        OpId::Inv,
        OpId::Div,
        OpId::Sqrt,
        OpId::RandomElement
    ])
}

impl RationalFieldBase {

    fn reduce(&self, mut num: BigInt, mut den: BigInt) -> Rational {
        debug_assert!(!den.is_zero());
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        let mut gcd = BigInt::zero();
        ZZ.gcd(&mut gcd, &num, &den).must_succeed();
        if !gcd.is_one() {
            num /= &gcd;
            den /= &gcd;
        }
        Rational { num, den }
    }

    ///
    /// Returns `num / den`.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    ///
    pub fn from_fraction(&self, num: i64, den: i64) -> Rational {
        assert!(den != 0, "denominator must be nonzero");
        self.reduce(BigInt::from(num), BigInt::from(den))
    }

    pub fn from_integer(&self, value: BigInt) -> Rational {
        Rational { num: value, den: BigInt::one() }
    }
}

impl RingBase for RationalFieldBase {

    type Element = Rational;

    fn capabilities(&self) -> &'static CapabilityTable {
        CapabilityTable::register(RingKind::Rational, rational_capabilities)
    }

    fn ctx_is_exact(&self) -> Truth {
        Truth::True
    }

    fn ctx_is_field(&self) -> Truth {
        Truth::True
    }

    fn characteristic(&self) -> Option<u64> {
        Some(0)
    }

    fn zero(&self) -> Rational {
        Rational { num: BigInt::zero(), den: BigInt::one() }
    }

    fn one(&self) -> Rational {
        Rational { num: BigInt::one(), den: BigInt::one() }
    }

    fn set_si(&self, res: &mut Rational, value: i64) -> Status {
        *res = self.from_integer(BigInt::from(value));
        Status::Success
    }

    fn add(&self, res: &mut Rational, lhs: &Rational, rhs: &Rational) -> Status {
        if lhs.den == rhs.den {
            *res = self.reduce(&lhs.num + &rhs.num, lhs.den.clone());
        } else {
            *res = self.reduce(&lhs.num * &rhs.den + &rhs.num * &lhs.den, &lhs.den * &rhs.den);
        }
        Status::Success
    }

    fn sub(&self, res: &mut Rational, lhs: &Rational, rhs: &Rational) -> Status {
        if lhs.den == rhs.den {
            *res = self.reduce(&lhs.num - &rhs.num, lhs.den.clone());
        } else {
            *res = self.reduce(&lhs.num * &rhs.den - &rhs.num * &lhs.den, &lhs.den * &rhs.den);
        }
        Status::Success
    }

    fn neg(&self, res: &mut Rational, value: &Rational) -> Status {
        *res = Rational { num: -&value.num, den: value.den.clone() };
        Status::Success
    }

    fn mul(&self, res: &mut Rational, lhs: &Rational, rhs: &Rational) -> Status {
        *res = self.reduce(&lhs.num * &rhs.num, &lhs.den * &rhs.den);
        Status::Success
    }

    fn is_zero(&self, value: &Rational) -> Truth {
        Truth::from_bool(value.num.is_zero())
    }

    fn is_one(&self, value: &Rational) -> Truth {
        Truth::from_bool(value.num.is_one() && value.den.is_one())
    }

    fn equal(&self, lhs: &Rational, rhs: &Rational) -> Truth {
        Truth::from_bool(lhs == rhs)
    }

    fn inv(&self, res: &mut Rational, value: &Rational) -> Status {
        if value.num.is_zero() {
            return Status::DomainError;
        }
        *res = self.reduce(value.den.clone(), value.num.clone());
        Status::Success
    }

    fn div(&self, res: &mut Rational, lhs: &Rational, rhs: &Rational) -> Status {
        if rhs.num.is_zero() {
            return Status::DomainError;
        }
        *res = self.reduce(&lhs.num * &rhs.den, &lhs.den * &rhs.num);
        Status::Success
    }

    fn sqrt(&self, res: &mut Rational, value: &Rational) -> Status {
        let mut num = BigInt::zero();
        let mut den = BigInt::zero();
        let status = ZZ.sqrt(&mut num, &value.num) | ZZ.sqrt(&mut den, &value.den);
        if status.is_success() {
            *res = Rational { num, den };
        }
        return status;
    }

    fn random_element(&self, rng: &mut Rand64) -> Rational {
        let num = rng.rand_range(0..41) as i64 - 20;
        let den = rng.rand_range(1..6) as i64;
        self.from_fraction(num, den)
    }

    fn dbg<'a>(&self, value: &Rational, out: &mut Formatter<'a>) -> std::fmt::Result {
        if value.den.is_one() {
            write!(out, "{}", value.num)
        } else {
            write!(out, "{}/{}", value.num, value.den)
        }
    }
}

#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
fn edge_case_elements() -> impl Iterator<Item = Rational> {
    [(0, 1), (1, 1), (-1, 1), (1, 2), (-7, 3), (100, 7)].into_iter().map(|(n, d)| QQ.get_ring().from_fraction(n, d))
}

#[test]
fn test_ring_axioms() {
    generic_tests::test_ring_axioms(QQ, edge_case_elements());
    generic_tests::test_division_axioms(QQ, edge_case_elements());
}

#[test]
fn test_reduced_representation() {
    let x = QQ.get_ring().from_fraction(6, -4);
    assert_eq!(&BigInt::from(-3), x.num());
    assert_eq!(&BigInt::from(2), x.den());
    let mut y = QQ.zero();
    QQ.add(&mut y, &x, &QQ.get_ring().from_fraction(3, 2)).must_succeed();
    assert!(QQ.is_zero(&y).is_true());
    assert!(y.den().is_one());
    assert_eq!("-3/2", format!("{}", QQ.format(&x)));
}

#[test]
fn test_inverse() {
    let mut res = QQ.zero();
    assert_eq!(Status::DomainError, QQ.inv(&mut res, &QQ.zero()));
    QQ.inv(&mut res, &QQ.get_ring().from_fraction(-2, 3)).must_succeed();
    assert_el_eq!(QQ, QQ.get_ring().from_fraction(-3, 2), res);
    assert_eq!(Truth::True, QQ.is_invertible(&QQ.int(5)));
}

#[test]
fn test_sqrt() {
    let mut res = QQ.zero();
    QQ.sqrt(&mut res, &QQ.get_ring().from_fraction(9, 4)).must_succeed();
    assert_el_eq!(QQ, QQ.get_ring().from_fraction(3, 2), res);
    assert_eq!(Status::DomainError, QQ.sqrt(&mut res, &QQ.int(2)));
    assert_eq!(Truth::False, QQ.is_square(&QQ.int(-1)));
}
