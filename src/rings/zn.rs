use std::fmt::Formatter;

use oorandom::Rand64;
use tracing::instrument;

use crate::algorithms;
use crate::algorithms::miller_rabin::is_prime;
use crate::capability::{CapabilityTable, CapabilityTableBuilder, OpId, RingKind};
use crate::ring::*;
use crate::status::Status;
use crate::truth::Truth;
use crate::tuning::{Cutoffs, RingClass};

///
/// An element of [`Zn`], represented by its smallest nonnegative lift.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ZnEl(u64);

impl ZnEl {

    pub fn value(&self) -> u64 {
        self.0
    }
}

///
/// The ring `Z/nZ` for a modulus `n` that fits into a `u64`.
///
/// Whether the ring is a field is determined once during construction, using a
/// deterministic primality test. Since all rings `Z/nZ` share one capability
/// table, this information is exposed through [`RingBase::ctx_is_field()`].
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZnBase {
    modulus: u64,
    is_field: bool,
    cutoffs: Option<Cutoffs>
}

///
/// The ring `Z/nZ` for a modulus `n` that fits into a `u64`.
///
/// # Example
/// ```
/// # use genring::assert_el_eq;
/// # use genring::ring::*;
/// # use genring::status::*;
/// # use genring::rings::zn::*;
/// let Z6 = Zn::new(6);
/// let mut res = Z6.zero();
/// assert_eq!(Status::DomainError, Z6.inv(&mut res, &Z6.int(2)));
/// // 2 * 4 = 2 mod 6
/// Z6.div(&mut res, &Z6.int(2), &Z6.int(4)).must_succeed();
/// let mut check = Z6.zero();
/// Z6.mul(&mut check, &res, &Z6.int(4)).must_succeed();
/// assert_el_eq!(Z6, Z6.int(2), check);
/// ```
///
pub type Zn = RingValue<ZnBase>;

impl Zn {

    pub fn new(modulus: u64) -> Self {
        RingValue::from(ZnBase::new(modulus))
    }
}

fn zn_capabilities(builder: CapabilityTableBuilder) -> CapabilityTableBuilder {
    builder.provide(&OpId::CORE).provide(&[
        OpId::Sub,
        OpId::MulSi,
        OpId::IsOne,
        OpId::Inv,
        OpId::Div,
        OpId::DivExact,
        OpId::Sqrt,
        OpId::RandomElement,
        OpId::PolyMullow
    ])
}

///
/// Returns `(g, s)` with `g = gcd(a, n)` and `s * a = g mod n`.
///
fn extended_gcd(a: u64, n: u64) -> (u64, u64) {
    let (mut old_r, mut r) = (a as i128, n as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    (old_r as u64, old_s.rem_euclid(n as i128) as u64)
}

impl ZnBase {

    pub fn new(modulus: u64) -> Self {
        assert!(modulus >= 1, "modulus must be positive");
        ZnBase { modulus, is_field: is_prime(modulus), cutoffs: None }
    }

    ///
    /// Returns a copy of this ring that uses the given cutoffs for algorithm selection.
    ///
    pub fn with_cutoffs(self, cutoffs: Cutoffs) -> Self {
        ZnBase { cutoffs: Some(cutoffs), ..self }
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    pub fn from_u64(&self, value: u64) -> ZnEl {
        ZnEl(value % self.modulus)
    }

    fn mul_mod(&self, lhs: u64, rhs: u64) -> u64 {
        ((lhs as u128 * rhs as u128) % self.modulus as u128) as u64
    }

    fn pow_mod(&self, mut base: u64, mut power: u64) -> u64 {
        let mut result = 1 % self.modulus;
        while power > 0 {
            if power & 1 == 1 {
                result = self.mul_mod(result, base);
            }
            base = self.mul_mod(base, base);
            power >>= 1;
        }
        return result;
    }

    ///
    /// Tonelli-Shanks; requires that the modulus is an odd prime.
    ///
    fn sqrt_mod_prime(&self, a: u64) -> Option<u64> {
        let p = self.modulus;
        if a == 0 {
            return Some(0);
        }
        if self.pow_mod(a, (p - 1) / 2) != 1 {
            return None;
        }
        let s = (p - 1).trailing_zeros();
        let q = (p - 1) >> s;
        let z = (2..p).find(|z| self.pow_mod(*z, (p - 1) / 2) == p - 1)?;
        let mut m = s;
        let mut c = self.pow_mod(z, q);
        let mut t = self.pow_mod(a, q);
        let mut r = self.pow_mod(a, (q + 1) / 2);
        while t != 1 {
            let mut i = 0;
            let mut t_pow = t;
            while t_pow != 1 {
                t_pow = self.mul_mod(t_pow, t_pow);
                i += 1;
            }
            let b = self.pow_mod(c, 1 << (m - i - 1));
            m = i;
            c = self.mul_mod(b, b);
            t = self.mul_mod(t, c);
            r = self.mul_mod(r, b);
        }
        return Some(r);
    }

    ///
    /// Classical multiplication that accumulates each coefficient of the product as
    /// `u128` and reduces only once. This is valid as long as the sum of all products
    /// fits into a `u128`, which is guaranteed for moduli below `2^32`.
    ///
    #[instrument(skip_all, level = "trace")]
    fn mullow_delayed_reduction(&self, dst: &mut [ZnEl], lhs: &[ZnEl], rhs: &[ZnEl]) {
        debug_assert!(self.modulus <= u32::MAX as u64);
        for i in 0..dst.len() {
            let from = (i + 1).saturating_sub(rhs.len());
            let to = std::cmp::min(lhs.len(), i + 1);
            let mut sum: u128 = 0;
            for j in from..to {
                sum += lhs[j].0 as u128 * rhs[i - j].0 as u128;
            }
            dst[i] = ZnEl((sum % self.modulus as u128) as u64);
        }
    }
}

impl RingBase for ZnBase {

    type Element = ZnEl;

    fn capabilities(&self) -> &'static CapabilityTable {
        CapabilityTable::register(RingKind::ModularInteger, zn_capabilities)
    }

    fn ctx_is_exact(&self) -> Truth {
        Truth::True
    }

    fn ctx_is_field(&self) -> Truth {
        Truth::from_bool(self.is_field)
    }

    fn ctx_is_integral_domain(&self) -> Truth {
        Truth::from_bool(self.is_field)
    }

    fn characteristic(&self) -> Option<u64> {
        Some(self.modulus)
    }

    fn cutoffs(&self) -> Cutoffs {
        self.cutoffs.unwrap_or_else(|| Cutoffs::for_class(RingClass::of(self)))
    }

    fn zero(&self) -> ZnEl {
        ZnEl(0)
    }

    fn one(&self) -> ZnEl {
        ZnEl(1 % self.modulus)
    }

    fn set_si(&self, res: &mut ZnEl, value: i64) -> Status {
        *res = ZnEl((value as i128).rem_euclid(self.modulus as i128) as u64);
        Status::Success
    }

    fn add(&self, res: &mut ZnEl, lhs: &ZnEl, rhs: &ZnEl) -> Status {
        *res = ZnEl(((lhs.0 as u128 + rhs.0 as u128) % self.modulus as u128) as u64);
        Status::Success
    }

    fn sub(&self, res: &mut ZnEl, lhs: &ZnEl, rhs: &ZnEl) -> Status {
        *res = ZnEl(((lhs.0 as u128 + self.modulus as u128 - rhs.0 as u128) % self.modulus as u128) as u64);
        Status::Success
    }

    fn neg(&self, res: &mut ZnEl, value: &ZnEl) -> Status {
        *res = ZnEl(if value.0 == 0 { 0 } else { self.modulus - value.0 });
        Status::Success
    }

    fn mul(&self, res: &mut ZnEl, lhs: &ZnEl, rhs: &ZnEl) -> Status {
        *res = ZnEl(self.mul_mod(lhs.0, rhs.0));
        Status::Success
    }

    fn mul_si(&self, res: &mut ZnEl, lhs: &ZnEl, rhs: i64) -> Status {
        let rhs = (rhs as i128).rem_euclid(self.modulus as i128) as u64;
        *res = ZnEl(self.mul_mod(lhs.0, rhs));
        Status::Success
    }

    fn is_zero(&self, value: &ZnEl) -> Truth {
        Truth::from_bool(value.0 == 0)
    }

    fn is_one(&self, value: &ZnEl) -> Truth {
        Truth::from_bool(value.0 == 1 % self.modulus)
    }

    fn equal(&self, lhs: &ZnEl, rhs: &ZnEl) -> Truth {
        Truth::from_bool(lhs.0 == rhs.0)
    }

    fn inv(&self, res: &mut ZnEl, value: &ZnEl) -> Status {
        if self.modulus == 1 {
            *res = ZnEl(0);
            return Status::Success;
        }
        let (gcd, s) = extended_gcd(value.0, self.modulus);
        if gcd == 1 {
            *res = ZnEl(s);
            Status::Success
        } else {
            Status::DomainError
        }
    }

    ///
    /// Computes some `q` with `q * rhs = lhs`. If `rhs` is a zero divisor, such a
    /// `q` might still exist, in which case one of them is returned.
    ///
    fn div(&self, res: &mut ZnEl, lhs: &ZnEl, rhs: &ZnEl) -> Status {
        if self.modulus == 1 {
            *res = ZnEl(0);
            return Status::Success;
        }
        if rhs.0 == 0 {
            return Status::DomainError;
        }
        let (gcd, _) = extended_gcd(rhs.0, self.modulus);
        if lhs.0 % gcd != 0 {
            return Status::DomainError;
        }
        let reduced_modulus = self.modulus / gcd;
        let (_, rhs_inv) = extended_gcd(rhs.0 / gcd, reduced_modulus);
        let q = ((lhs.0 / gcd) as u128 * rhs_inv as u128 % reduced_modulus as u128) as u64;
        *res = ZnEl(q);
        Status::Success
    }

    fn divexact(&self, res: &mut ZnEl, lhs: &ZnEl, rhs: &ZnEl) -> Status {
        self.div(res, lhs, rhs)
    }

    fn sqrt(&self, res: &mut ZnEl, value: &ZnEl) -> Status {
        if value.0 <= 1 {
            *res = *value;
            return Status::Success;
        }
        let root = if self.is_field && self.modulus > 2 {
            self.sqrt_mod_prime(value.0)
        } else if self.modulus <= 1 << 16 {
            (0..self.modulus).find(|x| self.mul_mod(*x, *x) == value.0)
        } else {
            return Status::Unable;
        };
        match root {
            Some(root) => {
                *res = ZnEl(root);
                Status::Success
            },
            None => Status::DomainError
        }
    }

    fn random_element(&self, rng: &mut Rand64) -> ZnEl {
        ZnEl(rng.rand_range(0..self.modulus))
    }

    fn poly_mullow(&self, dst: &mut [ZnEl], lhs: &[ZnEl], rhs: &[ZnEl]) -> Status {
        let len = std::cmp::min(lhs.len(), rhs.len());
        if self.modulus > u32::MAX as u64 || len >= self.cutoffs().mul_karatsuba {
            return algorithms::poly_mul::poly_mullow_generic(RingRef::new(self), dst, lhs, rhs);
        }
        tracing::debug!(op = "poly_mullow", strategy = "delayed_reduction", len = len);
        self.mullow_delayed_reduction(dst, lhs, rhs);
        Status::Success
    }

    fn dbg<'a>(&self, value: &ZnEl, out: &mut Formatter<'a>) -> std::fmt::Result {
        write!(out, "{}", value.0)
    }
}

#[cfg(test)]
use crate::ring::generic_tests;
#[cfg(test)]
use crate::algorithms::poly_mul::mullow_classical;

#[cfg(test)]
fn edge_case_elements(ring: &Zn) -> impl Iterator<Item = ZnEl> {
    let n = ring.get_ring().modulus();
    [0, 1, 2, n - 1, n / 2, n / 3].into_iter().map(move |x| ZnEl(x % n))
}

#[test]
fn test_ring_axioms() {
    for n in [2, 6, 7, 17, 1 << 20, 18446744073709551557] {
        let ring = Zn::new(n);
        generic_tests::test_ring_axioms(&ring, edge_case_elements(&ring));
        generic_tests::test_division_axioms(&ring, edge_case_elements(&ring));
    }
}

#[test]
fn test_field_predicate_per_instance() {
    assert_eq!(Truth::True, Zn::new(7).ctx_is_field());
    assert_eq!(Truth::False, Zn::new(6).ctx_is_field());
    assert_eq!(Truth::False, Zn::new(6).ctx_is_integral_domain());
    assert!(std::ptr::eq(Zn::new(7).capabilities(), Zn::new(6).capabilities()));
    assert_eq!(RingClass::FiniteCharacteristic, RingClass::of(Zn::new(6).get_ring()));
}

#[test]
fn test_div_zero_divisor() {
    let Z12 = Zn::new(12);
    let mut q = Z12.zero();
    Z12.div(&mut q, &Z12.int(8), &Z12.int(4)).must_succeed();
    let mut check = Z12.zero();
    Z12.mul(&mut check, &q, &Z12.int(4)).must_succeed();
    assert_el_eq!(Z12, Z12.int(8), check);
    assert_eq!(Status::DomainError, Z12.div(&mut q, &Z12.int(3), &Z12.int(4)));
    assert_eq!(Status::DomainError, Z12.div(&mut q, &Z12.int(3), &Z12.zero()));
    assert_eq!(Truth::False, Z12.is_invertible(&Z12.int(4)));
    assert_eq!(Truth::True, Z12.is_invertible(&Z12.int(5)));
}

#[test]
fn test_sqrt() {
    let F13 = Zn::new(13);
    let mut root = F13.zero();
    for x in 0..13 {
        let mut square = F13.zero();
        F13.sqr(&mut square, &F13.int(x)).must_succeed();
        F13.sqrt(&mut root, &square).must_succeed();
        let mut check = F13.zero();
        F13.sqr(&mut check, &root).must_succeed();
        assert_el_eq!(F13, square, check);
    }
    assert_eq!(Status::DomainError, F13.sqrt(&mut root, &F13.int(2)));
    let Z8 = Zn::new(8);
    Z8.sqrt(&mut root, &Z8.int(4)).must_succeed();
    assert_eq!(Truth::False, Z8.is_square(&Z8.int(3)));
}

#[test]
fn test_specific_mullow_agrees() {
    let ring = Zn::new(65521);
    assert!(ring.capabilities().provides(OpId::PolyMullow));
    let mut rng = Rand64::new(1);
    let lhs = (0..10).map(|_| ring.random_element(&mut rng)).collect::<Vec<_>>();
    let rhs = (0..7).map(|_| ring.random_element(&mut rng)).collect::<Vec<_>>();
    let mut expected = vec![ring.zero(); 12];
    let mut actual = vec![ring.zero(); 12];
    mullow_classical(&ring, &mut expected, &lhs, &rhs).must_succeed();
    ring.get_ring().poly_mullow(&mut actual, &lhs, &rhs).must_succeed();
    assert_eq!(expected, actual);
}
