use std::fmt::Formatter;
use std::rc::Rc;
use std::sync::Arc;

use oorandom::Rand64;

use crate::algorithms;
use crate::capability::{CapabilityTable, Method, OpId, RingKind};
use crate::matrix::GrMat;
use crate::status::Status;
use crate::truth::Truth;
use crate::tuning::{Cutoffs, RingClass};

///
/// Basic trait for ring contexts, i.e. objects that describe one algebraic structure
/// and implement its operations.
///
/// Every operation takes the context explicitly, writes its result into an output
/// argument and returns a [`Status`]. Decision predicates return a [`Truth`], since
/// they might not be decidable in rings with approximate arithmetic.
///
/// Implementors have to provide the core operations ([`OpId::CORE`]), all other
/// operations have a default implementation built from more primitive ones (see
/// [`OpId::generic_recipe()`]). Overriding a default implementation should be
/// declared in the ring's [`CapabilityTable`], so that algorithms can query which
/// operations are efficiently available.
///
/// Note that usually, this trait will not be used directly, but always through a
/// [`RingStore`]. While this trait defines the functionality, [`RingStore`] abstracts
/// the storage, e.g. a ring by value, a reference to a ring or a shared pointer to one.
///
pub trait RingBase {

    type Element: Clone;

    ///
    /// The capability table of the kind of this ring, usually obtained through
    /// [`CapabilityTable::register()`].
    ///
    fn capabilities(&self) -> &'static CapabilityTable;

    ///
    /// Whether the arithmetic of this ring is exact. For floating-point or ball arithmetic,
    /// this is [`Truth::False`].
    ///
    fn ctx_is_exact(&self) -> Truth;

    fn ctx_is_field(&self) -> Truth;

    fn ctx_is_integral_domain(&self) -> Truth {
        match self.ctx_is_field() {
            Truth::True => Truth::True,
            _ => Truth::Unknown
        }
    }

    fn ctx_is_commutative(&self) -> Truth {
        Truth::True
    }

    ///
    /// Returns the characteristic of the ring, or `None` if it is unknown or does not
    /// fit into a `u64`.
    ///
    fn characteristic(&self) -> Option<u64>;

    ///
    /// The thresholds used by the algorithm-selection layer for this ring.
    ///
    fn cutoffs(&self) -> Cutoffs {
        Cutoffs::for_class(RingClass::of(self))
    }

    fn zero(&self) -> Self::Element;

    fn one(&self) -> Self::Element;

    fn set_si(&self, res: &mut Self::Element, value: i64) -> Status;

    fn add(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status;

    fn neg(&self, res: &mut Self::Element, value: &Self::Element) -> Status;

    fn mul(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status;

    fn is_zero(&self, value: &Self::Element) -> Truth;

    fn equal(&self, lhs: &Self::Element, rhs: &Self::Element) -> Truth;

    fn dbg<'a>(&self, value: &Self::Element, out: &mut Formatter<'a>) -> std::fmt::Result;

    fn sub(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        let mut neg_rhs = self.zero();
        let status = self.neg(&mut neg_rhs, rhs);
        status | self.add(res, lhs, &neg_rhs)
    }

    fn add_assign(&self, lhs: &mut Self::Element, rhs: &Self::Element) -> Status {
        let lhs_val = std::mem::replace(lhs, self.zero());
        self.add(lhs, &lhs_val, rhs)
    }

    fn sub_assign(&self, lhs: &mut Self::Element, rhs: &Self::Element) -> Status {
        let lhs_val = std::mem::replace(lhs, self.zero());
        self.sub(lhs, &lhs_val, rhs)
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: &Self::Element) -> Status {
        let lhs_val = std::mem::replace(lhs, self.zero());
        self.mul(lhs, &lhs_val, rhs)
    }

    fn neg_inplace(&self, value: &mut Self::Element) -> Status {
        let val = std::mem::replace(value, self.zero());
        self.neg(value, &val)
    }

    fn sqr(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        self.mul(res, value, value)
    }

    fn mul_si(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: i64) -> Status {
        let mut rhs_el = self.zero();
        let status = self.set_si(&mut rhs_el, rhs);
        status | self.mul(res, lhs, &rhs_el)
    }

    ///
    /// Computes `res += lhs * rhs`.
    ///
    fn addmul(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        let mut prod = self.zero();
        let status = self.mul(&mut prod, lhs, rhs);
        status | self.add_assign(res, &prod)
    }

    ///
    /// Computes `res -= lhs * rhs`.
    ///
    fn submul(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        let mut prod = self.zero();
        let status = self.mul(&mut prod, lhs, rhs);
        status | self.sub_assign(res, &prod)
    }

    fn pow_ui(&self, res: &mut Self::Element, base: &Self::Element, power: u64) -> Status {
        algorithms::sqr_mul::generic_pow(RingRef::new(self), res, base, power)
    }

    fn is_one(&self, value: &Self::Element) -> Truth {
        self.equal(value, &self.one())
    }

    fn is_neg_one(&self, value: &Self::Element) -> Truth {
        let mut neg_one = self.one();
        if !self.neg_inplace(&mut neg_one).is_success() {
            return Truth::Unknown;
        }
        self.equal(value, &neg_one)
    }

    ///
    /// Computes the multiplicative inverse. Returns [`Status::DomainError`] if the
    /// value is provably not invertible, and [`Status::Unable`] if this cannot be
    /// decided.
    ///
    /// The default implementation only handles `0` and `±1`.
    ///
    fn inv(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        if self.is_one(value).is_true() {
            *res = self.one();
            return Status::Success;
        } else if self.is_neg_one(value).is_true() {
            *res = value.clone();
            return Status::Success;
        } else if self.is_zero(value).is_true() {
            return Status::DomainError;
        } else {
            return Status::Unable;
        }
    }

    fn is_invertible(&self, value: &Self::Element) -> Truth {
        let mut inverse = self.zero();
        match self.inv(&mut inverse, value) {
            Status::Success => Truth::True,
            Status::DomainError => Truth::False,
            Status::Unable => Truth::Unknown
        }
    }

    ///
    /// Computes `lhs / rhs`, i.e. an element `q` with `q * rhs = lhs`. Returns
    /// [`Status::DomainError`] if no such element exists.
    ///
    fn div(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        if self.is_zero(rhs).is_true() {
            return Status::DomainError;
        }
        let mut rhs_inv = self.zero();
        match self.inv(&mut rhs_inv, rhs) {
            Status::Success => self.mul(res, lhs, &rhs_inv),
            Status::DomainError if self.ctx_is_field().is_true() => Status::DomainError,
            Status::DomainError if self.is_zero(lhs).is_true() && self.ctx_is_integral_domain().is_true() => {
                *res = self.zero();
                Status::Success
            },
            _ => Status::Unable
        }
    }

    ///
    /// Like [`RingBase::div()`], but the caller guarantees that the quotient exists,
    /// which may allow a faster implementation.
    ///
    fn divexact(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        self.div(res, lhs, rhs)
    }

    ///
    /// Computes a square root. The default implementation only handles `0` and `1`.
    ///
    fn sqrt(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        if self.is_zero(value).is_true() {
            *res = self.zero();
            return Status::Success;
        } else if self.is_one(value).is_true() {
            *res = self.one();
            return Status::Success;
        } else {
            return Status::Unable;
        }
    }

    fn is_square(&self, value: &Self::Element) -> Truth {
        let mut root = self.zero();
        match self.sqrt(&mut root, value) {
            Status::Success => Truth::True,
            Status::DomainError => Truth::False,
            Status::Unable => Truth::Unknown
        }
    }

    ///
    /// The exponential function, for rings where it makes sense. The default
    /// implementation only handles `exp(0) = 1`.
    ///
    fn exp(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        if self.is_zero(value).is_true() {
            *res = self.one();
            return Status::Success;
        } else {
            return Status::Unable;
        }
    }

    ///
    /// The natural logarithm, for rings where it makes sense. The default
    /// implementation only handles `log(1) = 0` and `log(0)`.
    ///
    fn log(&self, res: &mut Self::Element, value: &Self::Element) -> Status {
        if self.is_one(value).is_true() {
            *res = self.zero();
            return Status::Success;
        } else if self.is_zero(value).is_true() {
            return Status::DomainError;
        } else {
            return Status::Unable;
        }
    }

    ///
    /// Computes a canonical greatest common divisor. The default implementation
    /// only handles fields, where the gcd of two elements is `0` or `1`.
    ///
    fn gcd(&self, res: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) -> Status {
        if !self.ctx_is_field().is_true() {
            return Status::Unable;
        }
        match self.is_zero(lhs) & self.is_zero(rhs) {
            Truth::True => {
                *res = self.zero();
                Status::Success
            },
            Truth::False => {
                *res = self.one();
                Status::Success
            },
            Truth::Unknown => Status::Unable
        }
    }

    fn random_element(&self, rng: &mut Rand64) -> Self::Element {
        let mut result = self.zero();
        if !self.set_si(&mut result, rng.rand_range(0..21) as i64 - 10).is_success() {
            return self.zero();
        }
        return result;
    }

    ///
    /// Computes `res = initial + sum_i lhs[i] * rhs[i]`.
    ///
    fn dot(&self, res: &mut Self::Element, initial: Option<&Self::Element>, lhs: &[Self::Element], rhs: &[Self::Element]) -> Status {
        assert_eq!(lhs.len(), rhs.len());
        *res = initial.cloned().unwrap_or_else(|| self.zero());
        let mut status = Status::Success;
        for (l, r) in lhs.iter().zip(rhs.iter()) {
            status |= self.addmul(res, l, r);
        }
        return status;
    }

    ///
    /// Computes the first `dst.len()` coefficients of the product of the polynomials
    /// with coefficients `lhs` and `rhs`. Entries of `dst` beyond the length of the full
    /// product are set to zero.
    ///
    fn poly_mullow(&self, dst: &mut [Self::Element], lhs: &[Self::Element], rhs: &[Self::Element]) -> Status {
        algorithms::poly_mul::poly_mullow_generic(RingRef::new(self), dst, lhs, rhs)
    }

    fn mat_mul(&self, res: &mut GrMat<Self::Element>, lhs: &GrMat<Self::Element>, rhs: &GrMat<Self::Element>) -> Status {
        algorithms::matmul::mat_mul_classical(RingRef::new(self), res, lhs, rhs)
    }

    fn mat_det(&self, res: &mut Self::Element, mat: &GrMat<Self::Element>) -> Status {
        algorithms::det::det_generic(RingRef::new(self), res, mat)
    }
}

macro_rules! delegate {
    (fn $name:ident (&self, $($pname:ident: $ptype:ty),*) -> $rtype:ty) => {
        fn $name (&self, $($pname: $ptype),*) -> $rtype {
            self.get_ring().$name($($pname),*)
        }
    };
    (fn $name:ident (&self) -> $rtype:ty) => {
        fn $name (&self) -> $rtype {
            self.get_ring().$name()
        }
    };
}

///
/// Basic trait for objects that store (in some sense) a ring. This can
/// be a ring-by-value, a reference to a ring, or a box to a ring.
///
/// As opposed to [`RingBase`], which is responsible for the functionality and
/// ring operations, this trait is solely responsible for the storage. Rings built
/// on top of other rings (like polynomial rings) store their base ring through
/// this trait, and thus can either own it or just borrow it.
///
pub trait RingStore {

    type Type: RingBase + ?Sized;

    fn get_ring<'a>(&'a self) -> &'a Self::Type;

    delegate!{ fn capabilities(&self) -> &'static CapabilityTable }
    delegate!{ fn ctx_is_exact(&self) -> Truth }
    delegate!{ fn ctx_is_field(&self) -> Truth }
    delegate!{ fn ctx_is_integral_domain(&self) -> Truth }
    delegate!{ fn ctx_is_commutative(&self) -> Truth }
    delegate!{ fn characteristic(&self) -> Option<u64> }
    delegate!{ fn cutoffs(&self) -> Cutoffs }
    delegate!{ fn zero(&self) -> El<Self> }
    delegate!{ fn one(&self) -> El<Self> }
    delegate!{ fn set_si(&self, res: &mut El<Self>, value: i64) -> Status }
    delegate!{ fn add(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn neg(&self, res: &mut El<Self>, value: &El<Self>) -> Status }
    delegate!{ fn mul(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn is_zero(&self, value: &El<Self>) -> Truth }
    delegate!{ fn equal(&self, lhs: &El<Self>, rhs: &El<Self>) -> Truth }
    delegate!{ fn sub(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn add_assign(&self, lhs: &mut El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn sub_assign(&self, lhs: &mut El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn mul_assign(&self, lhs: &mut El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn neg_inplace(&self, value: &mut El<Self>) -> Status }
    delegate!{ fn sqr(&self, res: &mut El<Self>, value: &El<Self>) -> Status }
    delegate!{ fn mul_si(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: i64) -> Status }
    delegate!{ fn addmul(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn submul(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn pow_ui(&self, res: &mut El<Self>, base: &El<Self>, power: u64) -> Status }
    delegate!{ fn is_one(&self, value: &El<Self>) -> Truth }
    delegate!{ fn is_neg_one(&self, value: &El<Self>) -> Truth }
    delegate!{ fn inv(&self, res: &mut El<Self>, value: &El<Self>) -> Status }
    delegate!{ fn is_invertible(&self, value: &El<Self>) -> Truth }
    delegate!{ fn div(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn divexact(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn sqrt(&self, res: &mut El<Self>, value: &El<Self>) -> Status }
    delegate!{ fn is_square(&self, value: &El<Self>) -> Truth }
    delegate!{ fn exp(&self, res: &mut El<Self>, value: &El<Self>) -> Status }
    delegate!{ fn log(&self, res: &mut El<Self>, value: &El<Self>) -> Status }
    delegate!{ fn gcd(&self, res: &mut El<Self>, lhs: &El<Self>, rhs: &El<Self>) -> Status }
    delegate!{ fn random_element(&self, rng: &mut Rand64) -> El<Self> }
    delegate!{ fn dot(&self, res: &mut El<Self>, initial: Option<&El<Self>>, lhs: &[El<Self>], rhs: &[El<Self>]) -> Status }

    fn kind(&self) -> RingKind {
        self.capabilities().kind()
    }

    ///
    /// Determines how the given operation is implemented in this ring.
    ///
    fn resolve(&self, op: OpId) -> Method {
        self.capabilities().resolve(op)
    }

    ///
    /// Returns whether this ring has its own implementation of the given operation,
    /// or one can be synthesized from the operations it provides.
    ///
    fn supports(&self, op: OpId) -> bool {
        self.resolve(op).is_supported()
    }

    ///
    /// Returns the image of the integer `value` in this ring.
    ///
    /// # Panics
    ///
    /// Panics if the ring cannot represent the value. This is a convenience function,
    /// use [`RingBase::set_si()`] to handle this case.
    ///
    fn int(&self, value: i64) -> El<Self> {
        let mut result = self.zero();
        self.set_si(&mut result, value).must_succeed();
        return result;
    }

    fn format<'a>(&'a self, value: &'a El<Self>) -> RingElementDisplayWrapper<'a, Self> {
        RingElementDisplayWrapper { ring: self, element: value }
    }

    fn println(&self, value: &El<Self>) {
        println!("{}", self.format(value));
    }
}

pub struct RingElementDisplayWrapper<'a, R: RingStore + ?Sized> {
    ring: &'a R,
    element: &'a El<R>
}

impl<'a, R: RingStore + ?Sized> std::fmt::Display for RingElementDisplayWrapper<'a, R> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ring.get_ring().dbg(self.element, f)
    }
}

pub type El<R> = <<R as RingStore>::Type as RingBase>::Element;

///
/// Asserts that two ring elements are provably equal, i.e. that
/// [`RingBase::equal()`] returns [`Truth::True`].
///
#[macro_export]
macro_rules! assert_el_eq {
    ($ring:expr, $lhs:expr, $rhs:expr) => {
        match (&$ring, &$lhs, &$rhs) {
            (ring_val, lhs_val, rhs_val) => {
                assert!(
                    <_ as $crate::ring::RingStore>::equal(ring_val, lhs_val, rhs_val).is_true(),
                    "Assertion failed: {} != {}",
                    <_ as $crate::ring::RingStore>::format(ring_val, lhs_val),
                    <_ as $crate::ring::RingStore>::format(ring_val, rhs_val)
                );
            }
        }
    }
}

///
/// The most fundamental [`RingStore`]. It is basically a no-op container, i.e.
/// stores a [`RingBase`] object by value, and allows accessing it.
///
/// We cannot implement [`RingStore`] for every `R: RingBase` directly, since this
/// would conflict with the implementation for references `&R` where `R: RingStore`.
/// Hence, the common pattern is to create the ring type as
/// ```ignore
/// struct ABase { ... }
/// impl RingBase for ABase { ... }
/// ```
/// and then provide a type alias
/// ```ignore
/// type A = RingValue<ABase>;
/// ```
///
#[derive(Debug, Clone, Copy)]
pub struct RingValue<R: RingBase> {
    ring: R
}

impl<R: RingBase> RingValue<R> {

    pub const fn from(value: R) -> Self {
        RingValue { ring: value }
    }
}

impl<R: RingBase> RingStore for RingValue<R> {

    type Type = R;

    fn get_ring(&self) -> &R {
        &self.ring
    }
}

///
/// The second most basic [`RingStore`]. Similarly to [`RingValue`] it is just a
/// no-op container around a reference to a [`RingBase`].
///
/// This is mainly used when we only have a reference to a [`RingBase`], e.g. in
/// the default implementations of [`RingBase`] functions, but want to call a
/// generic algorithm that requires a [`RingStore`].
///
#[derive(Debug)]
pub struct RingRef<'a, R: ?Sized + RingBase> {
    ring: &'a R
}

impl<'a, R: ?Sized + RingBase> Clone for RingRef<'a, R> {

    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R: ?Sized + RingBase> Copy for RingRef<'a, R> {}

impl<'a, R: ?Sized + RingBase> RingRef<'a, R> {

    pub const fn new(value: &'a R) -> Self {
        RingRef { ring: value }
    }
}

impl<'a, R: ?Sized + RingBase> RingStore for RingRef<'a, R> {

    type Type = R;

    fn get_ring(&self) -> &R {
        self.ring
    }
}

impl<'a, R: RingStore + ?Sized> RingStore for &'a R {

    type Type = <R as RingStore>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

impl<R: RingStore + ?Sized> RingStore for Box<R> {

    type Type = <R as RingStore>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

impl<R: RingStore + ?Sized> RingStore for Rc<R> {

    type Type = <R as RingStore>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

impl<R: RingStore + ?Sized> RingStore for Arc<R> {

    type Type = <R as RingStore>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use super::*;

    ///
    /// Asserts that `lhs` and `rhs` are not provably different, and that they are
    /// provably equal if the ring is exact.
    ///
    pub fn assert_consistent<R: RingStore>(ring: R, lhs: &El<R>, rhs: &El<R>) {
        let equal = ring.equal(lhs, rhs);
        if ring.ctx_is_exact().is_true() {
            assert!(equal.is_true(), "expected {} == {}", ring.format(lhs), ring.format(rhs));
        } else {
            assert!(!equal.is_false(), "expected {} ~ {}", ring.format(lhs), ring.format(rhs));
        }
    }

    ///
    /// Checks the ring axioms on the given elements. Only results of operations that
    /// report [`Status::Success`] are checked.
    ///
    pub fn test_ring_axioms<R: RingStore, I: Iterator<Item = El<R>>>(ring: R, edge_case_elements: I) {
        let elements = edge_case_elements.collect::<Vec<_>>();
        let zero = ring.zero();
        let one = ring.one();
        assert!(ring.is_zero(&zero).is_true());
        assert!(ring.is_one(&one).is_true());

        for a in &elements {
            let mut res = ring.zero();
            if ring.add(&mut res, a, &zero).is_success() {
                assert_consistent(&ring, a, &res);
            }
            if ring.mul(&mut res, a, &one).is_success() {
                assert_consistent(&ring, a, &res);
            }
            if ring.sub(&mut res, a, a).is_success() {
                assert!(!ring.is_zero(&res).is_false());
            }
            let is_zero = ring.is_zero(a);
            let equals_zero = ring.equal(a, &zero);
            assert!(is_zero == equals_zero || is_zero.is_unknown() || equals_zero.is_unknown());
        }

        for a in &elements {
            for b in &elements {
                // round trip (a + b) - b = a
                let mut sum = ring.zero();
                let mut diff = ring.zero();
                if ring.add(&mut sum, a, b).is_success() && ring.sub(&mut diff, &sum, b).is_success() {
                    assert_consistent(&ring, a, &diff);
                }

                let mut ab = ring.zero();
                let mut ba = ring.zero();
                if ring.add(&mut ab, a, b).is_success() && ring.add(&mut ba, b, a).is_success() {
                    assert_consistent(&ring, &ab, &ba);
                }
                if ring.ctx_is_commutative().is_true() && ring.mul(&mut ab, a, b).is_success() && ring.mul(&mut ba, b, a).is_success() {
                    assert_consistent(&ring, &ab, &ba);
                }

                // aliasing variants agree with out-of-place ones
                let mut in_place = a.clone();
                if ring.mul(&mut ab, a, b).is_success() && ring.mul_assign(&mut in_place, b).is_success() {
                    assert_consistent(&ring, &ab, &in_place);
                }
            }
        }

        for a in &elements {
            for b in &elements {
                for c in &elements {
                    let mut lhs = ring.zero();
                    let mut rhs = ring.zero();
                    let mut tmp = ring.zero();
                    let mut status = ring.add(&mut tmp, b, c);
                    status |= ring.mul(&mut lhs, a, &tmp);
                    status |= ring.mul(&mut rhs, a, b);
                    status |= ring.addmul(&mut rhs, a, c);
                    if status.is_success() {
                        assert_consistent(&ring, &lhs, &rhs);
                    }

                    let mut status = ring.mul(&mut tmp, a, b);
                    status |= ring.mul(&mut lhs, &tmp, c);
                    status |= ring.mul(&mut tmp, b, c);
                    status |= ring.mul(&mut rhs, a, &tmp);
                    if status.is_success() {
                        assert_consistent(&ring, &lhs, &rhs);
                    }
                }
            }
        }
    }

    ///
    /// Checks that inverses and divisions are consistent with multiplication.
    ///
    pub fn test_division_axioms<R: RingStore, I: Iterator<Item = El<R>>>(ring: R, edge_case_elements: I) {
        let elements = edge_case_elements.collect::<Vec<_>>();
        for a in &elements {
            let mut inv = ring.zero();
            match ring.inv(&mut inv, a) {
                Status::Success => {
                    let mut prod = ring.zero();
                    if ring.mul(&mut prod, a, &inv).is_success() {
                        assert!(!ring.is_one(&prod).is_false());
                    }
                    assert!(!ring.is_invertible(a).is_false());
                },
                Status::DomainError => {
                    assert!(!ring.is_invertible(a).is_true());
                },
                Status::Unable => {}
            }
            if ring.is_zero(a).is_true() {
                assert!(!ring.inv(&mut inv, a).is_success());
            }
            for b in &elements {
                let mut quo = ring.zero();
                if ring.div(&mut quo, a, b).is_success() {
                    let mut prod = ring.zero();
                    if ring.mul(&mut prod, &quo, b).is_success() {
                        assert_consistent(&ring, a, &prod);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::ball::RealBallField;

#[test]
fn test_internal_wrappings_dont_matter() {
    let boxed: Box<_> = Box::new(ZZ);
    let shared = Rc::new(&boxed);
    let a = shared.int(6);
    let b = (&&shared).int(7);
    let mut c = ZZ.zero();
    RingRef::new(boxed.get_ring()).mul(&mut c, &a, &b).must_succeed();
    assert_el_eq!(ZZ, ZZ.int(42), c);
}

#[test]
fn test_default_sub_synthesized() {
    let RR = RealBallField::new();
    let mut res = RR.zero();
    RR.sub(&mut res, &RR.int(3), &RR.int(5)).must_succeed();
    assert_el_eq!(&RR, RR.int(-2), res);
    assert_eq!(Method::Generic(&[OpId::Neg, OpId::Add]), RR.resolve(OpId::Sub));
    assert_eq!(Method::Specific, ZZ.resolve(OpId::Sub));
}

#[test]
fn test_default_pow() {
    let mut res = ZZ.zero();
    ZZ.pow_ui(&mut res, &ZZ.int(3), 5).must_succeed();
    assert_el_eq!(&ZZ, ZZ.int(243), res);
    ZZ.pow_ui(&mut res, &ZZ.int(3), 0).must_succeed();
    assert_el_eq!(&ZZ, ZZ.one(), res);
}
