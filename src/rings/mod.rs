
///
/// This module contains [`integer::IntegerRing`], the ring of arbitrary-precision
/// integers `Z`.
///
pub mod integer;

///
/// This module contains [`rational::RationalField`], the field of rational numbers `Q`.
///
pub mod rational;

///
/// This module contains [`zn::Zn`], the ring `Z/nZ` for a 64-bit modulus `n`.
///
pub mod zn;

///
/// An approximate implementation of the field of real numbers `R`, using 64-bit floating point
/// numbers.
///
pub mod float_real;

///
/// An implementation of the real numbers using ball arithmetic, i.e. every element is
/// an interval that provably contains the exact result.
///
pub mod ball;

///
/// This module contains [`series::SeriesModRing`], the ring of truncated power series
/// `R[[x]]/(x^n)` over any base ring.
///
pub mod series;

///
/// This module contains the polynomial container [`poly::GrPoly`] and its elementary
/// operations, and the polynomial ring [`poly::dense_poly::PolyRing`].
///
pub mod poly;
