use std::cmp::{max, min};
use std::fmt::Formatter;

use crate::ring::*;
use crate::status::Status;
use crate::truth::Truth;
use crate::vector::*;

///
/// Contains [`dense_poly::PolyRing`], the ring of univariate polynomials over a
/// base ring.
///
pub mod dense_poly;

///
/// A univariate polynomial, stored as the dense vector of its coefficients, lowest
/// degree first.
///
/// As all elements, polynomials only have a meaning together with the ring their
/// coefficients belong to. All operations of this module return normalized
/// polynomials, i.e. polynomials whose last coefficient is not provably zero. Note
/// that over rings with approximate arithmetic, the last coefficient might still be
/// zero, if this cannot be decided (see [`GrPoly::normalize()`]).
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrPoly<T> {
    coeffs: GrVec<T>
}

impl<T> Default for GrPoly<T> {

    fn default() -> Self {
        GrPoly { coeffs: GrVec::new() }
    }
}

impl<T: Clone> GrPoly<T> {

    pub const fn new() -> Self {
        GrPoly { coeffs: GrVec::new() }
    }

    ///
    /// Creates the polynomial with the given coefficients. The result is not
    /// normalized.
    ///
    pub fn from_coeffs(coeffs: Vec<T>) -> Self {
        GrPoly { coeffs: GrVec::from_vec(coeffs) }
    }

    ///
    /// Creates the polynomial with the given integer coefficients, lowest degree first.
    ///
    /// # Panics
    ///
    /// Panics if one of the integers cannot be represented in the ring.
    ///
    pub fn from_ints<R>(ring: R, coeffs: &[i64]) -> Self
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        let mut result = GrPoly::from_coeffs(coeffs.iter().map(|c| ring.int(*c)).collect());
        result.normalize(&ring);
        return result;
    }

    pub fn constant<R>(ring: R, value: T) -> Self
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        let mut result = GrPoly::from_coeffs(vec![value]);
        result.normalize(ring);
        return result;
    }

    ///
    /// Returns the polynomial `x`.
    ///
    pub fn gen<R>(ring: R) -> Self
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        GrPoly::from_coeffs(vec![ring.zero(), ring.one()])
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.len() == 0
    }

    ///
    /// The degree of the polynomial, assuming that it is normalized. For the zero
    /// polynomial, this is `None`.
    ///
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    pub fn coeffs_mut(&mut self) -> &mut GrVec<T> {
        &mut self.coeffs
    }

    pub fn into_coeffs(self) -> Vec<T> {
        self.coeffs.into_vec()
    }

    pub fn coefficient_at(&self, i: usize) -> Option<&T> {
        self.coeffs.get(i)
    }

    ///
    /// Returns the `i`-th coefficient, which is zero if `i` exceeds the length.
    ///
    pub fn coeff<R>(&self, i: usize, ring: R) -> T
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        self.coeffs.get(i).cloned().unwrap_or_else(|| ring.zero())
    }

    ///
    /// The leading coefficient, assuming that the polynomial is normalized.
    ///
    pub fn lc(&self) -> Option<&T> {
        self.coeffs.last()
    }

    pub fn set_coeff<R>(&mut self, i: usize, value: T, ring: R)
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        if i >= self.coeffs.len() {
            self.coeffs.set_length(i + 1, &ring);
        }
        self.coeffs[i] = value;
        self.normalize(ring);
    }

    pub fn fit_length(&mut self, n: usize) {
        self.coeffs.fit_capacity(n);
    }

    ///
    /// Sets the length of the coefficient vector, filling with zeros or cutting off
    /// the highest coefficients. The result is not normalized.
    ///
    pub fn set_length<R>(&mut self, n: usize, ring: R)
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        self.coeffs.set_length(n, ring);
    }

    ///
    /// Removes all trailing coefficients that are provably zero. Coefficients for
    /// which this cannot be decided are kept, so normalization never changes the
    /// value of a polynomial. Normalizing a normalized polynomial does nothing.
    ///
    pub fn normalize<R>(&mut self, ring: R)
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        let len = vec_normalized_len(&ring, &self.coeffs);
        self.coeffs.truncate(len);
    }

    ///
    /// Reduces the polynomial modulo `x^n`. Does nothing if `n >= self.len()`.
    ///
    pub fn truncate<R>(&mut self, n: usize, ring: R)
        where R: RingStore,
            R::Type: RingBase<Element = T>
    {
        if n < self.coeffs.len() {
            self.coeffs.truncate(n);
            self.normalize(ring);
        }
    }

    pub fn swap(&mut self, other: &mut GrPoly<T>) {
        std::mem::swap(self, other);
    }
}

///
/// Returns a [`std::fmt::Display`]-able wrapper around the polynomial.
///
pub fn poly_format<'a, R>(ring: R, poly: &'a GrPoly<El<R>>, var: &'a str) -> PolyDisplayWrapper<'a, R>
    where R: RingStore
{
    PolyDisplayWrapper { ring, poly, var }
}

pub struct PolyDisplayWrapper<'a, R: RingStore> {
    ring: R,
    poly: &'a GrPoly<El<R>>,
    var: &'a str
}

impl<'a, R: RingStore> std::fmt::Display for PolyDisplayWrapper<'a, R> {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        dbg_poly(&self.ring, self.poly, f, self.var)
    }
}

pub(crate) fn dbg_poly<R>(ring: R, poly: &GrPoly<El<R>>, out: &mut Formatter, var: &str) -> std::fmt::Result
    where R: RingStore
{
    let mut first = true;
    for i in (0..poly.len()).rev() {
        let c = &poly.coeffs()[i];
        if ring.is_zero(c).is_true() {
            continue;
        }
        if !first {
            write!(out, " + ")?;
        }
        first = false;
        if i == 0 {
            ring.get_ring().dbg(c, out)?;
        } else {
            if !ring.is_one(c).is_true() {
                write!(out, "(")?;
                ring.get_ring().dbg(c, out)?;
                write!(out, ")")?;
            }
            if i == 1 {
                write!(out, "{}", var)?;
            } else {
                write!(out, "{}^{}", var, i)?;
            }
        }
    }
    if first {
        write!(out, "0")?;
    }
    return Ok(());
}

pub fn poly_is_zero<R>(ring: R, poly: &GrPoly<El<R>>) -> Truth
    where R: RingStore
{
    vec_is_zero(ring, poly.coeffs())
}

pub fn poly_is_one<R>(ring: R, poly: &GrPoly<El<R>>) -> Truth
    where R: RingStore
{
    if poly.is_empty() {
        return ring.is_zero(&ring.one());
    }
    ring.is_one(&poly.coeffs()[0]) & vec_is_zero(&ring, &poly.coeffs()[1..])
}

pub fn poly_equal<R>(ring: R, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Truth
    where R: RingStore
{
    let common = min(lhs.len(), rhs.len());
    let longer = if lhs.len() > rhs.len() { lhs } else { rhs };
    vec_equal(&ring, &lhs.coeffs()[..common], &rhs.coeffs()[..common]) & vec_is_zero(&ring, &longer.coeffs()[common..])
}

///
/// Returns whether the polynomial is monic. If the leading coefficient might
/// be zero, the result is [`Truth::Unknown`], since then a lower coefficient
/// might be the actual leading one.
///
pub fn poly_is_monic<R>(ring: R, poly: &GrPoly<El<R>>) -> Truth
    where R: RingStore
{
    match poly.lc() {
        None => Truth::False,
        Some(lc) => match (ring.is_one(lc), ring.is_zero(lc)) {
            (Truth::True, _) => Truth::True,
            (_, Truth::Unknown) => Truth::Unknown,
            (is_one, _) => is_one
        }
    }
}

pub fn poly_add<R>(ring: R, res: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    let len = max(lhs.len(), rhs.len());
    let mut result = Vec::with_capacity(len);
    let mut status = Status::Success;
    for i in 0..len {
        match (lhs.coefficient_at(i), rhs.coefficient_at(i)) {
            (Some(l), Some(r)) => {
                let mut c = ring.zero();
                status |= ring.add(&mut c, l, r);
                result.push(c);
            },
            (Some(l), None) => result.push(l.clone()),
            (None, Some(r)) => result.push(r.clone()),
            (None, None) => unreachable!()
        }
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(&ring);
    return status;
}

pub fn poly_sub<R>(ring: R, res: &mut GrPoly<El<R>>, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    let len = max(lhs.len(), rhs.len());
    let mut result = Vec::with_capacity(len);
    let mut status = Status::Success;
    for i in 0..len {
        let mut c = ring.zero();
        match (lhs.coefficient_at(i), rhs.coefficient_at(i)) {
            (Some(l), Some(r)) => status |= ring.sub(&mut c, l, r),
            (Some(l), None) => c = l.clone(),
            (None, Some(r)) => status |= ring.neg(&mut c, r),
            (None, None) => unreachable!()
        }
        result.push(c);
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(&ring);
    return status;
}

pub fn poly_add_assign<R>(ring: R, lhs: &mut GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    let lhs_val = std::mem::take(lhs);
    poly_add(ring, lhs, &lhs_val, rhs)
}

pub fn poly_sub_assign<R>(ring: R, lhs: &mut GrPoly<El<R>>, rhs: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    let lhs_val = std::mem::take(lhs);
    poly_sub(ring, lhs, &lhs_val, rhs)
}

pub fn poly_neg<R>(ring: R, res: &mut GrPoly<El<R>>, value: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    let mut result = value.clone();
    let status = vec_neg_inplace(&ring, result.coeffs_mut());
    result.normalize(&ring);
    *res = result;
    return status;
}

pub fn poly_mul_scalar<R>(ring: R, res: &mut GrPoly<El<R>>, poly: &GrPoly<El<R>>, scalar: &El<R>) -> Status
    where R: RingStore
{
    let mut result = poly.clone();
    let status = vec_scalar_mul_inplace(&ring, result.coeffs_mut(), scalar);
    result.normalize(&ring);
    *res = result;
    return status;
}

///
/// Computes `res = poly * x^n`.
///
pub fn poly_shift_left<R>(ring: R, res: &mut GrPoly<El<R>>, poly: &GrPoly<El<R>>, n: usize)
    where R: RingStore
{
    if poly.is_empty() {
        *res = GrPoly::new();
        return;
    }
    let mut result = Vec::with_capacity(poly.len() + n);
    result.extend((0..n).map(|_| ring.zero()));
    result.extend(poly.coeffs().iter().cloned());
    *res = GrPoly::from_coeffs(result);
}

///
/// Computes `res = poly div x^n`, i.e. drops the lowest `n` coefficients.
///
pub fn poly_shift_right<T>(res: &mut GrPoly<T>, poly: &GrPoly<T>, n: usize)
    where T: Clone
{
    if n >= poly.len() {
        *res = GrPoly::new();
        return;
    }
    *res = GrPoly::from_coeffs(poly.coeffs()[n..].to_vec());
}

///
/// Computes `res = x^(n - 1) poly(1/x)`, the reversal of the first `n` coefficients
/// of `poly` (padded with zeros). The result is normalized.
///
pub fn poly_reverse<R>(ring: R, res: &mut GrPoly<El<R>>, poly: &GrPoly<El<R>>, n: usize)
    where R: RingStore
{
    let result = (0..n).map(|i| poly.coeff(n - 1 - i, &ring)).collect::<Vec<_>>();
    *res = GrPoly::from_coeffs(result);
    res.normalize(&ring);
}

pub fn poly_derivative<R>(ring: R, res: &mut GrPoly<El<R>>, poly: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    if poly.len() <= 1 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(poly.len() - 1);
    for i in 1..poly.len() {
        let mut c = ring.zero();
        status |= ring.mul_si(&mut c, &poly.coeffs()[i], i as i64);
        result.push(c);
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(&ring);
    return status;
}

///
/// Computes the formal integral `res` of `poly` with `res(0) = 0`. This requires
/// dividing by `1, ..., deg(poly) + 1`, which fails in small characteristic.
///
pub fn poly_integral<R>(ring: R, res: &mut GrPoly<El<R>>, poly: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    if poly.is_empty() {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut status = Status::Success;
    let mut result = Vec::with_capacity(poly.len() + 1);
    result.push(ring.zero());
    for i in 0..poly.len() {
        let mut c = ring.zero();
        let mut k = ring.zero();
        status |= ring.set_si(&mut k, i as i64 + 1);
        status |= ring.div(&mut c, &poly.coeffs()[i], &k);
        result.push(c);
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(&ring);
    return status;
}

///
/// Evaluates the polynomial at the given point using Horner's scheme.
///
pub fn poly_evaluate<R>(ring: R, res: &mut El<R>, poly: &GrPoly<El<R>>, point: &El<R>) -> Status
    where R: RingStore
{
    let mut status = Status::Success;
    let mut current = ring.zero();
    for c in poly.coeffs().iter().rev() {
        status |= ring.mul_assign(&mut current, point);
        status |= ring.add_assign(&mut current, c);
    }
    *res = current;
    return status;
}

///
/// Divides the polynomial by its leading coefficient. Fails with [`Status::DomainError`]
/// if the leading coefficient is provably not invertible (including the zero polynomial).
///
pub fn poly_make_monic<R>(ring: R, res: &mut GrPoly<El<R>>, poly: &GrPoly<El<R>>) -> Status
    where R: RingStore
{
    let lc = match poly.lc() {
        None => return Status::DomainError,
        Some(lc) => lc
    };
    if ring.is_one(lc).is_true() {
        *res = poly.clone();
        return Status::Success;
    }
    let mut lc_inv = ring.zero();
    let status = ring.inv(&mut lc_inv, lc);
    if !status.is_success() {
        return status;
    }
    let mut result = poly.clone();
    let status = vec_scalar_mul_inplace(&ring, result.coeffs_mut(), &lc_inv);
    let len = result.len();
    result.coeffs_mut()[len - 1] = ring.one();
    *res = result;
    return status;
}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use oorandom::Rand64;

    use super::*;
    use crate::algorithms::poly_div::*;
    use crate::algorithms::poly_mul::*;
    use crate::algorithms::series::*;
    use crate::ring::generic_tests::assert_consistent;

    pub fn random_poly<R: RingStore>(ring: R, len: usize, rng: &mut Rand64) -> GrPoly<El<R>> {
        let mut result = GrPoly::from_coeffs((0..len).map(|_| ring.random_element(rng)).collect());
        result.normalize(ring);
        return result;
    }

    pub fn assert_poly_consistent<R: RingStore + Copy>(ring: R, lhs: &GrPoly<El<R>>, rhs: &GrPoly<El<R>>) {
        for i in 0..max(lhs.len(), rhs.len()) {
            assert_consistent(ring, &lhs.coeff(i, ring), &rhs.coeff(i, ring));
        }
    }

    ///
    /// Checks on random inputs that all algorithms for the same operation agree
    /// whenever they succeed, and that successful series divisions satisfy
    /// `q * b = a mod x^n`.
    ///
    pub fn test_series_algorithms_agree<R: RingStore + Copy>(ring: R, seed: u128, max_len: usize) {
        let mut rng = Rand64::new(seed);
        for len in 1..max_len {
            let a = random_poly(ring, len, &mut rng);
            let mut b = random_poly(ring, len, &mut rng);
            b.set_coeff(0, ring.one(), ring);
            let n = len + 1;

            let mut classical = GrPoly::new();
            let mut karatsuba = GrPoly::new();
            if poly_mullow_classical(ring, &mut classical, &a, &b, n).is_success() && poly_mullow_karatsuba(ring, &mut karatsuba, &a, &b, n).is_success() {
                assert_poly_consistent(ring, &classical, &karatsuba);
            }

            let mut basecase = GrPoly::new();
            let mut newton = GrPoly::new();
            let basecase_status = div_series_basecase(ring, &mut basecase, &a, &b, n);
            let newton_status = div_series_newton(ring, &mut newton, &a, &b, n);
            if basecase_status.is_success() && newton_status.is_success() {
                assert_poly_consistent(ring, &basecase, &newton);
            }
            if basecase_status.is_success() {
                let mut check = GrPoly::new();
                if poly_mullow(ring, &mut check, &basecase, &b, n).is_success() {
                    let mut a_trunc = a.clone();
                    a_trunc.truncate(n, ring);
                    assert_poly_consistent(ring, &check, &a_trunc);
                }
            }

            let mut inv_basecase = GrPoly::new();
            let mut inv_newton = GrPoly::new();
            if inv_series_basecase(ring, &mut inv_basecase, &b, n).is_success() && inv_series_newton(ring, &mut inv_newton, &b, n).is_success() {
                assert_poly_consistent(ring, &inv_basecase, &inv_newton);
            }

            let mut divrem_basecase = (GrPoly::new(), GrPoly::new());
            let mut divrem_fast = (GrPoly::new(), GrPoly::new());
            if !b.is_empty() && poly_divrem_basecase(ring, &mut divrem_basecase.0, &mut divrem_basecase.1, &a, &b).is_success() {
                if poly_divrem_divconquer(ring, &mut divrem_fast.0, &mut divrem_fast.1, &a, &b).is_success() {
                    assert_poly_consistent(ring, &divrem_basecase.0, &divrem_fast.0);
                    assert_poly_consistent(ring, &divrem_basecase.1, &divrem_fast.1);
                }
                if poly_divrem_newton(ring, &mut divrem_fast.0, &mut divrem_fast.1, &a, &b).is_success() {
                    assert_poly_consistent(ring, &divrem_basecase.0, &divrem_fast.0);
                    assert_poly_consistent(ring, &divrem_basecase.1, &divrem_fast.1);
                }
            }
        }
    }
}

#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::ball::RealBallField;
#[cfg(test)]
use crate::rings::zn::Zn;

#[test]
fn test_normalize_idempotent() {
    let mut f = GrPoly::from_coeffs(vec![ZZ.int(1), ZZ.int(2), ZZ.zero(), ZZ.zero()]);
    f.normalize(&ZZ);
    assert_eq!(2, f.len());
    let copy = f.clone();
    f.normalize(&ZZ);
    assert_eq!(copy, f);
    f.truncate(5, &ZZ);
    assert_eq!(copy, f);
}

#[test]
fn test_normalize_keeps_ambiguous_term() {
    let RR = RealBallField::new();
    let straddling = RR.get_ring().ball(0.0, 1e-3);
    assert_eq!(Truth::Unknown, RR.is_zero(&straddling));
    let mut f = GrPoly::from_coeffs(vec![RR.int(1), straddling, RR.zero()]);
    f.normalize(&RR);
    assert_eq!(2, f.len());
    assert_eq!(Truth::Unknown, poly_is_monic(&RR, &f));
}

#[test]
fn test_poly_arithmetic() {
    let f = GrPoly::from_ints(&ZZ, &[1, 2, 3]);
    let g = GrPoly::from_ints(&ZZ, &[-1, -2, -3, 1]);
    let mut h = GrPoly::new();
    poly_add(&ZZ, &mut h, &f, &g).must_succeed();
    assert!(poly_equal(&ZZ, &h, &GrPoly::from_ints(&ZZ, &[0, 0, 0, 1])).is_true());
    poly_sub_assign(&ZZ, &mut h, &g).must_succeed();
    assert!(poly_equal(&ZZ, &h, &f).is_true());
    poly_sub(&ZZ, &mut h, &f, &f).must_succeed();
    assert!(h.is_empty());
    assert!(poly_is_zero(&ZZ, &h).is_true());
}

#[test]
fn test_derivative_integral() {
    let f = GrPoly::from_ints(&ZZ, &[5, 2, 3, 4]);
    let mut df = GrPoly::new();
    poly_derivative(&ZZ, &mut df, &f).must_succeed();
    assert!(poly_equal(&ZZ, &df, &GrPoly::from_ints(&ZZ, &[2, 6, 12])).is_true());
    let mut back = GrPoly::new();
    poly_integral(&ZZ, &mut back, &df).must_succeed();
    assert!(poly_equal(&ZZ, &back, &GrPoly::from_ints(&ZZ, &[0, 2, 3, 4])).is_true());
    // 1/2 does not exist in Z
    assert_eq!(Status::DomainError, poly_integral(&ZZ, &mut back, &GrPoly::from_ints(&ZZ, &[0, 1])));
}

#[test]
fn test_evaluate_and_reverse() {
    let f = GrPoly::from_ints(&ZZ, &[1, 2, 3]);
    let mut value = ZZ.zero();
    poly_evaluate(&ZZ, &mut value, &f, &ZZ.int(2)).must_succeed();
    assert_el_eq!(&ZZ, ZZ.int(17), value);
    let mut rev = GrPoly::new();
    poly_reverse(&ZZ, &mut rev, &f, 4);
    assert!(poly_equal(&ZZ, &rev, &GrPoly::from_ints(&ZZ, &[0, 3, 2, 1])).is_true());
}

#[test]
fn test_shifts() {
    let f = GrPoly::from_ints(&ZZ, &[1, 2, 3]);
    let mut g = GrPoly::new();
    poly_shift_left(&ZZ, &mut g, &f, 2);
    assert!(poly_equal(&ZZ, &g, &GrPoly::from_ints(&ZZ, &[0, 0, 1, 2, 3])).is_true());
    let mut h = GrPoly::new();
    poly_shift_right(&mut h, &g, 3);
    assert!(poly_equal(&ZZ, &h, &GrPoly::from_ints(&ZZ, &[2, 3])).is_true());
    poly_shift_right(&mut h, &g, 5);
    assert!(h.is_empty());
}

#[test]
fn test_make_monic() {
    let F7 = Zn::new(7);
    let f = GrPoly::from_ints(&F7, &[1, 0, 3]);
    let mut g = GrPoly::new();
    poly_make_monic(&F7, &mut g, &f).must_succeed();
    assert!(poly_equal(&F7, &g, &GrPoly::from_ints(&F7, &[5, 0, 1])).is_true());
    let Z6 = Zn::new(6);
    let f = GrPoly::from_ints(&Z6, &[1, 2]);
    assert_eq!(Status::DomainError, poly_make_monic(&Z6, &mut g, &f));
    assert_eq!(Status::DomainError, poly_make_monic(&Z6, &mut g, &GrPoly::new()));
}

#[test]
fn test_format() {
    let f = GrPoly::from_ints(&ZZ, &[1, 0, -3, 1]);
    assert_eq!("x^3 + (-3)x^2 + 1", format!("{}", poly_format(&ZZ, &f, "x")));
}
