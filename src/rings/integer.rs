use std::fmt::Formatter;

use num_bigint::BigInt;
use num_traits::{One, Pow, Signed, Zero};
use oorandom::Rand64;

use crate::capability::{CapabilityTable, CapabilityTableBuilder, OpId, RingKind};
use crate::ring::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// The ring of integers `Z`, with arbitrary-precision elements based on
/// [`num_bigint::BigInt`].
///
/// For the difference to [`IntegerRing`], see the documentation of [`crate::ring::RingStore`].
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegerRingBase;

///
/// The ring of integers `Z`, with arbitrary-precision elements.
///
/// This is an integral domain, but not a field: only `1` and `-1` are invertible,
/// and division succeeds exactly when the quotient is an integer.
///
/// # Example
/// ```
/// # use genring::assert_el_eq;
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::rings::integer::ZZ;
/// let mut q = ZZ.zero();
/// ZZ.div(&mut q, &ZZ.int(12), &ZZ.int(-4)).must_succeed();
/// assert_el_eq!(ZZ, ZZ.int(-3), q);
/// assert_eq!(Status::DomainError, ZZ.div(&mut q, &ZZ.int(12), &ZZ.int(5)));
/// ```
///
pub type IntegerRing = RingValue<IntegerRingBase>;

pub const ZZ: IntegerRing = RingValue::from(IntegerRingBase);

impl IntegerRing {

    pub const RING: IntegerRing = ZZ;
}

fn integer_capabilities(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE).provide(&[
        OpId::Sub,
        OpId::MulSi,
        OpId::PowUi,
        OpId::IsOne,
        OpId::IsNegOne,
        OpId::Inv,
        OpId::Div,
        OpId::DivExact,
        OpId::Sqrt,
        OpId::Exp,
        OpId::Log,
        OpId::Gcd,
        OpId::RandomElement
    ])
}

impl IntegerRingBase {

    ///
    /// Returns the value as `i64`, if it fits.
    ///
    pub fn to_i64(&self, value: &BigInt) -> Option<i64> {
        i64::try_from(value).ok()
    }
}

impl RingBase for IntegerRingBase {

    type Element = BigInt;

    fn capabilities(&self) -> &'static CapabilityTable {
        CapabilityTable::register(RingKind::Integer, integer_capabilities)
    }

    fn ctx_is_exact(&self) -> Truth {
        Truth::True
    }

    fn ctx_is_field(&self) -> Truth {
        Truth::False
    }

    fn ctx_is_integral_domain(&self) -> Truth {
        Truth::True
    }

    fn characteristic(&self) -> Option<u64> {
        Some(0)
    }

    fn zero(&self) -> BigInt {
        BigInt::zero()
    }

    fn one(&self) -> BigInt {
        BigInt::one()
    }

    fn set_si(&self, res: &mut BigInt, value: i64) -> Status {
        *res = BigInt::from(value);
        Status::Success
    }

    fn add(&self, res: &mut BigInt, lhs: &BigInt, rhs: &BigInt) -> Status {
        *res = lhs + rhs;
        Status::Success
    }

    fn sub(&self, res: &mut BigInt, lhs: &BigInt, rhs: &BigInt) -> Status {
        *res = lhs - rhs;
        Status::Success
    }

    fn neg(&self, res: &mut BigInt, value: &BigInt) -> Status {
        *res = -value;
        Status::Success
    }

    fn mul(&self, res: &mut BigInt, lhs: &BigInt, rhs: &BigInt) -> Status {
        *res = lhs * rhs;
        Status::Success
    }

    fn mul_si(&self, res: &mut BigInt, lhs: &BigInt, rhs: i64) -> Status {
        *res = lhs * rhs;
        Status::Success
    }

    fn pow_ui(&self, res: &mut BigInt, base: &BigInt, power: u64) -> Status {
        match u32::try_from(power) {
            Ok(power) => {
                *res = Pow::pow(base, power);
                Status::Success
            },
            Err(_) if base.is_zero() || base.is_one() => {
                *res = base.clone();
                Status::Success
            },
            Err(_) if self.is_neg_one(base).is_true() => {
                *res = if power % 2 == 1 { base.clone() } else { BigInt::one() };
                Status::Success
            },
            Err(_) => Status::Unable
        }
    }

    fn is_zero(&self, value: &BigInt) -> Truth {
        Truth::from_bool(value.is_zero())
    }

    fn is_one(&self, value: &BigInt) -> Truth {
        Truth::from_bool(value.is_one())
    }

    fn is_neg_one(&self, value: &BigInt) -> Truth {
        Truth::from_bool(value.is_negative() && value.abs().is_one())
    }

    fn equal(&self, lhs: &BigInt, rhs: &BigInt) -> Truth {
        Truth::from_bool(lhs == rhs)
    }

    fn inv(&self, res: &mut BigInt, value: &BigInt) -> Status {
        if value.abs().is_one() {
            *res = value.clone();
            Status::Success
        } else {
            Status::DomainError
        }
    }

    fn div(&self, res: &mut BigInt, lhs: &BigInt, rhs: &BigInt) -> Status {
        if rhs.is_zero() {
            return Status::DomainError;
        }
        if (lhs % rhs).is_zero() {
            *res = lhs / rhs;
            Status::Success
        } else {
            Status::DomainError
        }
    }

    fn divexact(&self, res: &mut BigInt, lhs: &BigInt, rhs: &BigInt) -> Status {
        self.div(res, lhs, rhs)
    }

    ///
    /// Square roots exist exactly for perfect squares; the nonnegative root is returned.
    ///
    fn sqrt(&self, res: &mut BigInt, value: &BigInt) -> Status {
        if value.is_negative() {
            return Status::DomainError;
        }
        let root = value.sqrt();
        if &(&root * &root) == value {
            *res = root;
            Status::Success
        } else {
            Status::DomainError
        }
    }

    fn exp(&self, res: &mut BigInt, value: &BigInt) -> Status {
        if value.is_zero() {
            *res = BigInt::one();
            Status::Success
        } else {
            Status::DomainError
        }
    }

    fn log(&self, res: &mut BigInt, value: &BigInt) -> Status {
        if value.is_one() {
            *res = BigInt::zero();
            Status::Success
        } else {
            Status::DomainError
        }
    }

    ///
    /// The nonnegative greatest common divisor.
    ///
    fn gcd(&self, res: &mut BigInt, lhs: &BigInt, rhs: &BigInt) -> Status {
        let mut a = lhs.abs();
        let mut b = rhs.abs();
        while !b.is_zero() {
            let r = &a % &b;
            a = b;
            b = r;
        }
        *res = a;
        Status::Success
    }

    fn random_element(&self, rng: &mut Rand64) -> BigInt {
        BigInt::from(rng.rand_range(0..201) as i64 - 100)
    }

    fn dbg<'a>(&self, value: &BigInt, out: &mut Formatter<'a>) -> std::fmt::Result {
        write!(out, "{}", value)
    }
}

#[cfg(test)]
use crate::ring::generic_tests;

#[cfg(test)]
fn edge_case_elements() -> impl Iterator<Item = BigInt> {
    [0, 1, -1, 2, -3, 7, 1 << 40, -(1 << 62)].into_iter().map(|x| ZZ.int(x))
}

#[test]
fn test_ring_axioms() {
    generic_tests::test_ring_axioms(ZZ, edge_case_elements());
    generic_tests::test_division_axioms(ZZ, edge_case_elements());
}

#[test]
fn test_capabilities() {
    assert_eq!(RingKind::Integer, ZZ.kind());
    assert!(ZZ.capabilities().provides(OpId::Gcd));
    assert!(!ZZ.capabilities().provides(OpId::PolyMullow));
    assert_eq!(Truth::True, ZZ.ctx_is_integral_domain());
    assert_eq!(Truth::False, ZZ.ctx_is_field());
}

#[test]
fn test_division() {
    let mut res = ZZ.zero();
    assert_eq!(Status::DomainError, ZZ.inv(&mut res, &ZZ.int(2)));
    assert_eq!(Status::DomainError, ZZ.inv(&mut res, &ZZ.zero()));
    ZZ.inv(&mut res, &ZZ.int(-1)).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(-1), res);
    assert_eq!(Status::DomainError, ZZ.div(&mut res, &ZZ.int(1), &ZZ.zero()));
    ZZ.divexact(&mut res, &ZZ.int(-12), &ZZ.int(4)).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(-3), res);
    assert_eq!(Truth::False, ZZ.is_invertible(&ZZ.int(3)));
}

#[test]
fn test_sqrt_gcd() {
    let mut res = ZZ.zero();
    ZZ.sqrt(&mut res, &ZZ.int(144)).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(12), res);
    assert_eq!(Status::DomainError, ZZ.sqrt(&mut res, &ZZ.int(12)));
    assert_eq!(Status::DomainError, ZZ.sqrt(&mut res, &ZZ.int(-4)));
    assert_eq!(Truth::True, ZZ.is_square(&ZZ.int(0)));
    ZZ.gcd(&mut res, &ZZ.int(-12), &ZZ.int(18)).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(6), res);
    ZZ.gcd(&mut res, &ZZ.zero(), &ZZ.int(-5)).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(5), res);
}

#[test]
fn test_pow() {
    let mut res = ZZ.zero();
    ZZ.pow_ui(&mut res, &ZZ.int(-2), 65).must_succeed();
    assert_eq!(-(BigInt::one() << 65usize), res);
    ZZ.pow_ui(&mut res, &ZZ.int(-1), u64::MAX).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(-1), res);
    assert_eq!("-36893488147419103232", format!("{}", ZZ.format(&(-(BigInt::one() << 65usize)))));
}
