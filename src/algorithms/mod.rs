///
/// Contains [`sqr_mul::generic_square_and_multiply()`] for computing a power of an
/// element in a generic monoid.
///
pub mod sqr_mul;
///
/// Contains a deterministic Miller-Rabin primality test for 64-bit integers.
///
pub mod miller_rabin;
///
/// Contains the classical and Karatsuba algorithms for (truncated) polynomial
/// multiplication, and [`poly_mul::poly_mullow()`] which chooses between them.
///
pub mod poly_mul;
///
/// Contains the basecase, Newton and divide-and-conquer algorithms for polynomial
/// division with remainder, and [`poly_div::poly_divrem()`] which chooses between them.
///
pub mod poly_div;
///
/// Contains algorithms on truncated power series: inversion, division, square roots,
/// exponential and logarithm.
///
pub mod series;
///
/// Contains algorithms for composition of polynomials and power series, and for
/// reversion of power series.
///
pub mod compose;
///
/// Contains algorithms for computing the gcd of polynomials.
///
pub mod poly_gcd;
///
/// Contains algorithms for computing resultants and discriminants.
///
pub mod resultant;
///
/// Contains algorithms for multipoint evaluation and interpolation of polynomials.
///
pub mod interpolate;
///
/// Contains [`matmul::mat_mul()`] for computing matrix products.
///
pub mod matmul;
///
/// Contains algorithms for computing determinants and characteristic polynomials.
///
pub mod det;
///
/// Contains LU decompositions and algorithms for solving linear systems.
///
pub mod linsolve;
