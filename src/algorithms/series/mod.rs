use crate::ring::*;
use crate::rings::poly::GrPoly;
use crate::status::Status;
use crate::truth::Truth;

///
/// Contains [`inv::inv_series()`] and its implementations.
///
pub mod inv;
///
/// Contains [`div::div_series()`] and its implementations.
///
pub mod div;
///
/// Contains [`sqrt::sqrt_series()`] and its implementations, including the reciprocal
/// square root.
///
pub mod sqrt;
///
/// Contains [`exp_log::exp_series()`] and [`exp_log::log_series()`].
///
pub mod exp_log;

pub use inv::*;
pub use div::*;
pub use sqrt::*;
pub use exp_log::*;
pub use crate::rings::poly::{poly_derivative, poly_integral};

///
/// Division by a fixed element, through its inverse if it is provably invertible,
/// and through exact division otherwise.
///
pub(crate) struct ScalarDivisor<'a, R: RingStore> {
    ring: R,
    divisor: &'a El<R>,
    inverse: Option<El<R>>
}

impl<'a, R: RingStore> ScalarDivisor<'a, R> {

    pub(crate) fn new(ring: R, divisor: &'a El<R>) -> Self {
        let mut inverse = ring.zero();
        let inverse = if ring.inv(&mut inverse, divisor).is_success() { Some(inverse) } else { None };
        ScalarDivisor { ring, divisor, inverse }
    }

    pub(crate) fn divide(&self, res: &mut El<R>, value: &El<R>) -> Status {
        match &self.inverse {
            Some(inverse) => self.ring.mul(res, value, inverse),
            None => self.ring.div(res, value, self.divisor)
        }
    }
}

///
/// The precisions of a Newton iteration for precision `n`, starting from 1 and
/// roughly doubling in every step, i.e. `[1, 2, 3, 5]` for `n = 5`.
///
pub(crate) fn newton_precisions(n: usize) -> Vec<usize> {
    debug_assert!(n > 0);
    let mut result = vec![n];
    let mut current = n;
    while current > 1 {
        current = (current + 1) / 2;
        result.push(current);
    }
    result.reverse();
    return result;
}

///
/// Returns the status for a series operation that requires the constant coefficient
/// to be nonzero, or `None` if it provably is.
///
pub(crate) fn require_nonzero_constant<R>(ring: R, f: &GrPoly<El<R>>) -> Option<Status>
    where R: RingStore
{
    match f.coefficient_at(0) {
        None => Some(Status::DomainError),
        Some(c) => match ring.is_zero(c) {
            Truth::False => None,
            Truth::True => Some(Status::DomainError),
            Truth::Unknown => Some(Status::Unable)
        }
    }
}

///
/// Computes `1 - value`, which is used in all Newton iterations.
///
pub(crate) fn one_minus<R>(ring: R, res: &mut GrPoly<El<R>>, value: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let one = GrPoly::constant(ring, ring.one());
    crate::rings::poly::poly_sub(ring, res, &one, value)
}

#[test]
fn test_newton_precisions() {
    assert_eq!(vec![1], newton_precisions(1));
    assert_eq!(vec![1, 2], newton_precisions(2));
    assert_eq!(vec![1, 2, 3, 5], newton_precisions(5));
    assert_eq!(vec![1, 2, 4, 8, 16], newton_precisions(16));
}
