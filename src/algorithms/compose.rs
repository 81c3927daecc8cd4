use tracing::instrument;

use crate::algorithms::poly_mul::{poly_mul, poly_mullow};
use crate::algorithms::series::{div_series, inv_series};
use crate::ring::*;
use crate::rings::poly::*;
use crate::status::Status;
use crate::truth::Truth;

///
/// Below this length, [`compose_divconquer()`] switches to Horner's scheme.
///
#[stability::unstable(feature = "enable")]
pub const COMPOSE_BASECASE: usize = 4;

///
/// Computes `res = f(g)` using Horner's scheme.
///
#[instrument(skip_all, level = "trace")]
pub fn compose_horner<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let (result, status) = horner_impl(ring, f.coeffs(), g);
    *res = result;
    return status;
}

fn horner_impl<R>(ring: R, f: &[El<R>], g: &GrPoly<El<R>>) -> (GrPoly<El<R>>, Status)
    where R: RingStore + Copy
{
    let mut status = Status::Success;
    let mut current = GrPoly::new();
    let mut tmp = GrPoly::new();
    for c in f.iter().rev() {
        status |= poly_mul(ring, &mut tmp, &current, g);
        status |= poly_add(ring, &mut current, &tmp, &GrPoly::constant(ring, c.clone()));
    }
    return (current, status);
}

fn divconquer_impl<R>(ring: R, f: &[El<R>], powers: &[GrPoly<El<R>>]) -> (GrPoly<El<R>>, Status)
    where R: RingStore + Copy
{
    if f.len() <= COMPOSE_BASECASE {
        return horner_impl(ring, f, &powers[0]);
    }
    let mut k = 0;
    while (2 << k) < f.len() {
        k += 1;
    }
    let split = 1 << k;
    let (lower, mut status) = divconquer_impl(ring, &f[..split], powers);
    let (upper, upper_status) = divconquer_impl(ring, &f[split..], powers);
    status |= upper_status;
    let mut result = GrPoly::new();
    status |= poly_mul(ring, &mut result, &upper, &powers[k]);
    status |= poly_add_assign(ring, &mut result, &lower);
    return (result, status);
}

///
/// Computes `res = f(g)` by splitting `f = f_0 + x^h f_1` for a power of two `h`, and
/// computing `f_0(g) + g^h f_1(g)` recursively, using the precomputed powers `g^(2^i)`.
///
#[instrument(skip_all, level = "trace")]
pub fn compose_divconquer<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    let mut status = Status::Success;
    let mut powers = vec![g.clone()];
    while (1 << powers.len()) < f.len() {
        let mut square = GrPoly::new();
        status |= poly_mul(ring, &mut square, &powers[powers.len() - 1], &powers[powers.len() - 1]);
        powers.push(square);
    }
    let (result, compose_status) = divconquer_impl(ring, f.coeffs(), &powers);
    *res = result;
    return status | compose_status;
}

///
/// Computes the composition `res = f(g)`.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::compose::compose;
/// let f = GrPoly::from_ints(&ZZ, &[1, 2, 3]);
/// let g = GrPoly::from_ints(&ZZ, &[1, 1]);
/// let mut res = GrPoly::new();
/// compose(&ZZ, &mut res, &f, &g).must_succeed();
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[6, 8, 3]), &res).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn compose<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>) -> Status
    where R: RingStore + Copy
{
    if f.len() <= 1 {
        tracing::debug!(op = "compose", strategy = "scalar", len = f.len());
        *res = f.clone();
        return Status::Success;
    }
    if g.len() <= 1 {
        tracing::debug!(op = "compose", strategy = "scalar", len = f.len());
        let mut value = ring.zero();
        let status = poly_evaluate(ring, &mut value, f, &g.coeff(0, ring));
        *res = GrPoly::constant(ring, value);
        return status;
    }
    if f.len() >= ring.cutoffs().compose_divconquer {
        tracing::debug!(op = "compose", strategy = "divconquer", len = f.len());
        return compose_divconquer(ring, res, f, g);
    } else {
        tracing::debug!(op = "compose", strategy = "horner", len = f.len());
        return compose_horner(ring, res, f, g);
    }
}

///
/// Composition of power series requires the inner series to have no constant term.
///
fn check_inner_series<R>(ring: R, g: &GrPoly<El<R>>) -> Option<Status>
    where R: RingStore
{
    match g.coefficient_at(0).map(|c| ring.is_zero(c)) {
        None | Some(Truth::True) => None,
        Some(Truth::False) => Some(Status::DomainError),
        Some(Truth::Unknown) => Some(Status::Unable)
    }
}

///
/// Computes `res = f(g) mod x^n` using Horner's scheme. The constant coefficient of
/// `g` must be zero.
///
#[instrument(skip_all, level = "trace")]
pub fn compose_series_horner<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_inner_series(ring, g) {
        return status;
    }
    let mut status = Status::Success;
    let mut current = GrPoly::new();
    let mut tmp = GrPoly::new();
    for c in f.coeffs().iter().take(n).rev() {
        status |= poly_mullow(ring, &mut tmp, &current, g, n);
        status |= poly_add(ring, &mut current, &tmp, &GrPoly::constant(ring, c.clone()));
    }
    current.truncate(n, ring);
    *res = current;
    return status;
}

///
/// Computes `res = f(g) mod x^n` using the baby-step giant-step algorithm of Brent
/// and Kung, which needs about `2 sqrt(len(f))` series multiplications. The constant
/// coefficient of `g` must be zero.
///
#[instrument(skip_all, level = "trace")]
pub fn compose_series_brent_kung<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_inner_series(ring, g) {
        return status;
    }
    let len = f.len().min(n);
    if len == 0 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut block = 1;
    while block * block < len {
        block += 1;
    }
    let mut status = Status::Success;
    let mut powers = Vec::with_capacity(block + 1);
    powers.push(GrPoly::constant(ring, ring.one()));
    for i in 1..=block {
        let mut next = GrPoly::new();
        status |= poly_mullow(ring, &mut next, &powers[i - 1], g, n);
        powers.push(next);
    }
    let giant_step = &powers[block];
    let mut current = GrPoly::new();
    let mut tmp = GrPoly::new();
    for chunk in f.coeffs()[..len].chunks(block).rev() {
        let mut block_value = GrPoly::new();
        for (c, power) in chunk.iter().zip(powers.iter()) {
            status |= poly_mul_scalar(ring, &mut tmp, power, c);
            status |= poly_add_assign(ring, &mut block_value, &tmp);
        }
        status |= poly_mullow(ring, &mut tmp, &current, giant_step, n);
        status |= poly_add(ring, &mut current, &tmp, &block_value);
    }
    current.truncate(n, ring);
    *res = current;
    return status;
}

///
/// Computes `res = f(g) mod x^n`.
///
/// Fails with [`Status::DomainError`] if the constant coefficient of `g` is nonzero,
/// and with [`Status::Unable`] if this cannot be decided.
///
#[instrument(skip_all, level = "trace")]
pub fn compose_series<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, g: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_inner_series(ring, g) {
        return status;
    }
    if f.len() <= 1 || g.is_empty() {
        tracing::debug!(op = "compose_series", strategy = "scalar", len = n);
        *res = if n == 0 { GrPoly::new() } else { GrPoly::constant(ring, f.coeff(0, ring)) };
        return Status::Success;
    }
    if f.len().min(n) >= ring.cutoffs().compose_series_brent_kung {
        tracing::debug!(op = "compose_series", strategy = "brent_kung", len = n);
        return compose_series_brent_kung(ring, res, f, g, n);
    } else {
        tracing::debug!(op = "compose_series", strategy = "horner", len = n);
        return compose_series_horner(ring, res, f, g, n);
    }
}

///
/// Returns the status for reverting `f`, or `None` if `f = f_1 x + ...` with provably
/// invertible `f_1`.
///
fn check_revertible<R>(ring: R, f: &GrPoly<El<R>>) -> Option<Status>
    where R: RingStore
{
    if let Some(status) = check_inner_series(&ring, f) {
        return Some(status);
    }
    match f.coefficient_at(1).map(|c| ring.is_invertible(c)) {
        Some(Truth::True) => None,
        None | Some(Truth::False) => Some(Status::DomainError),
        Some(Truth::Unknown) => Some(Status::Unable)
    }
}

///
/// Computes the compositional inverse `res` of `f` modulo `x^n` using the Lagrange
/// inversion formula `k g_k = [x^(k - 1)] (x / f)^k`.
///
/// This requires dividing by `1, ..., n - 1`, which is often still possible over rings
/// that are not fields, since the coefficients of the inverse are integral for monic `f`.
///
#[instrument(skip_all, level = "trace")]
pub fn revert_series_lagrange<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_revertible(ring, f) {
        *res = GrPoly::new();
        return status;
    }
    if n <= 1 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut f_div_x = GrPoly::new();
    poly_shift_right(&mut f_div_x, f, 1);
    let mut h = GrPoly::new();
    let mut status = inv_series(ring, &mut h, &f_div_x, n - 1);
    if !status.is_success() {
        *res = GrPoly::new();
        return status;
    }
    let mut result = Vec::with_capacity(n);
    result.push(ring.zero());
    let mut power = h.clone();
    let mut tmp = GrPoly::new();
    for k in 1..n {
        let mut k_el = ring.zero();
        status |= ring.set_si(&mut k_el, k as i64);
        let mut c = ring.zero();
        status |= ring.div(&mut c, &power.coeff(k - 1, ring), &k_el);
        result.push(c);
        if k + 1 < n {
            status |= poly_mullow(ring, &mut tmp, &power, &h, n - 1);
            power.swap(&mut tmp);
        }
    }
    *res = GrPoly::from_coeffs(result);
    res.normalize(ring);
    return status;
}

///
/// Computes the compositional inverse `res` of `f` modulo `x^n` by the Newton iteration
/// `g -> g - (f(g) - x) / f'(g)`.
///
#[instrument(skip_all, level = "trace")]
pub fn revert_series_newton<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_revertible(ring, f) {
        *res = GrPoly::new();
        return status;
    }
    if n <= 1 {
        *res = GrPoly::new();
        return Status::Success;
    }
    let mut f1_inv = ring.zero();
    let mut status = ring.inv(&mut f1_inv, &f.coeffs()[1]);
    if !status.is_success() {
        *res = GrPoly::new();
        return status;
    }
    let mut current = GrPoly::from_coeffs(vec![ring.zero(), f1_inv]);
    let mut derivative = GrPoly::new();
    status |= poly_derivative(ring, &mut derivative, f);
    let x = GrPoly::gen(ring);
    let mut value = GrPoly::new();
    let mut slope = GrPoly::new();
    let mut correction = GrPoly::new();
    for m in crate::algorithms::series::newton_precisions(n).into_iter().filter(|m| *m > 2) {
        status |= compose_series(ring, &mut value, f, &current, m);
        status |= poly_sub_assign(ring, &mut value, &x);
        status |= compose_series(ring, &mut slope, &derivative, &current, m);
        let div_status = div_series(ring, &mut correction, &value, &slope, m);
        if !div_status.is_success() {
            status |= div_status;
            break;
        }
        status |= poly_sub_assign(ring, &mut current, &correction);
    }
    *res = current;
    return status;
}

///
/// Computes the compositional inverse `res` of the power series `f` modulo `x^n`, i.e.
/// the series with `f(res) = res(f) = x mod x^n`.
///
/// This requires `f = f_1 x + f_2 x^2 + ...` with invertible `f_1`; otherwise, this
/// fails with [`Status::DomainError`], or with [`Status::Unable`] if the conditions
/// cannot be decided.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::integer::ZZ;
/// # use genring::rings::poly::*;
/// # use genring::algorithms::compose::revert_series;
/// let mut g = GrPoly::new();
/// revert_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[0, 1, -1]), 6).must_succeed();
/// // the generating function of the Catalan numbers
/// assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[0, 1, 1, 2, 5, 14]), &g).is_true());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn revert_series<R>(ring: R, res: &mut GrPoly<El<R>>, f: &GrPoly<El<R>>, n: usize) -> Status
    where R: RingStore + Copy
{
    if let Some(status) = check_revertible(ring, f) {
        *res = GrPoly::new();
        return status;
    }
    if n >= ring.cutoffs().revert_series_newton {
        tracing::debug!(op = "revert_series", strategy = "newton", len = n);
        let status = revert_series_newton(ring, res, f, n);
        if status.is_success() {
            return status;
        }
        tracing::debug!(op = "revert_series", strategy = "lagrange", len = n, reason = "newton failed", status = ?status);
    } else {
        tracing::debug!(op = "revert_series", strategy = "lagrange", len = n);
    }
    return revert_series_lagrange(ring, res, f, n);
}

#[cfg(test)]
use oorandom::Rand64;
#[cfg(test)]
use crate::rings::integer::ZZ;
#[cfg(test)]
use crate::rings::rational::QQ;
#[cfg(test)]
use crate::rings::zn::*;
#[cfg(test)]
use crate::rings::ball::RealBallField;
#[cfg(test)]
use crate::rings::poly::generic_tests::random_poly;
#[cfg(test)]
use crate::tuning::Cutoffs;
#[cfg(test)]
use crate::tracing::SelectionRecorder;

#[test]
fn test_compose_algorithms_agree() {
    let F101 = Zn::new(101);
    let mut rng = Rand64::new(1);
    for len in [2, 5, 9, 17] {
        let f = random_poly(&F101, len, &mut rng);
        let g = random_poly(&F101, 3, &mut rng);
        let mut horner = GrPoly::new();
        let mut divconquer = GrPoly::new();
        compose_horner(&F101, &mut horner, &f, &g).must_succeed();
        compose_divconquer(&F101, &mut divconquer, &f, &g).must_succeed();
        assert!(poly_equal(&F101, &horner, &divconquer).is_true());
    }
}

#[test]
fn test_compose_scalar() {
    let f = GrPoly::from_ints(&ZZ, &[1, 2, 3]);
    let mut res = GrPoly::new();
    compose(&ZZ, &mut res, &f, &GrPoly::from_ints(&ZZ, &[2])).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[17]), &res).is_true());
    compose(&ZZ, &mut res, &f, &GrPoly::new()).must_succeed();
    assert!(poly_equal(&ZZ, &GrPoly::from_ints(&ZZ, &[1]), &res).is_true());
    compose(&ZZ, &mut res, &GrPoly::new(), &f).must_succeed();
    assert!(res.is_empty());
}

#[test]
fn test_compose_selection() {
    let ring = RingValue::from(ZnBase::new(101).with_cutoffs(Cutoffs::fast_always()));
    let f = GrPoly::from_ints(&ring, &[1, 2, 3, 4, 5, 6, 7]);
    let g = GrPoly::from_ints(&ring, &[0, 1, 1]);
    let mut res = GrPoly::new();
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || compose(&ring, &mut res, &f, &g)).must_succeed();
    assert_eq!(Some("divconquer".to_owned()), recorder.strategy_for("compose"));
    let mut expected = GrPoly::new();
    compose_horner(&ring, &mut expected, &f, &g).must_succeed();
    assert!(poly_equal(&ring, &expected, &res).is_true());
}

#[test]
fn test_compose_series() {
    let f = GrPoly::from_ints(&ZZ, &[1, 1, 1]);
    let g = GrPoly::from_ints(&ZZ, &[0, 1, 1]);
    let expected = GrPoly::from_ints(&ZZ, &[1, 1, 2, 2]);
    let mut res = GrPoly::new();
    compose_series_horner(&ZZ, &mut res, &f, &g, 4).must_succeed();
    assert!(poly_equal(&ZZ, &expected, &res).is_true());
    compose_series_brent_kung(&ZZ, &mut res, &f, &g, 4).must_succeed();
    assert!(poly_equal(&ZZ, &expected, &res).is_true());
    compose_series(&ZZ, &mut res, &f, &g, 4).must_succeed();
    assert!(poly_equal(&ZZ, &expected, &res).is_true());

    assert_eq!(Status::DomainError, compose_series(&ZZ, &mut res, &f, &GrPoly::from_ints(&ZZ, &[1, 1]), 4));
    let RR = RealBallField::new();
    let g = GrPoly::from_coeffs(vec![RR.get_ring().ball(0., 1e-3), RR.one()]);
    let mut res = GrPoly::new();
    assert_eq!(Status::Unable, compose_series(&RR, &mut res, &GrPoly::from_ints(&RR, &[1, 1]), &g, 4));
}

#[test]
fn test_compose_series_algorithms_agree() {
    let F101 = Zn::new(101);
    let mut rng = Rand64::new(2);
    for (len, n) in [(3, 5), (10, 8), (20, 20), (30, 12)] {
        let f = random_poly(&F101, len, &mut rng);
        let mut g = random_poly(&F101, 6, &mut rng);
        g.set_coeff(0, F101.zero(), &F101);
        let mut horner = GrPoly::new();
        let mut brent_kung = GrPoly::new();
        compose_series_horner(&F101, &mut horner, &f, &g, n).must_succeed();
        compose_series_brent_kung(&F101, &mut brent_kung, &f, &g, n).must_succeed();
        assert!(poly_equal(&F101, &horner, &brent_kung).is_true());
    }
}

#[test]
fn test_revert_catalan() {
    let f = GrPoly::from_ints(&ZZ, &[0, 1, -1]);
    let expected = GrPoly::from_ints(&ZZ, &[0, 1, 1, 2, 5, 14, 42]);
    let mut g = GrPoly::new();
    revert_series_lagrange(&ZZ, &mut g, &f, 7).must_succeed();
    assert!(poly_equal(&ZZ, &expected, &g).is_true());
    revert_series_newton(&ZZ, &mut g, &f, 7).must_succeed();
    assert!(poly_equal(&ZZ, &expected, &g).is_true());
}

#[test]
fn test_revert_preconditions() {
    let mut g = GrPoly::new();
    assert_eq!(Status::DomainError, revert_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[1, 1]), 4));
    assert_eq!(Status::DomainError, revert_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[0, 2, 1]), 4));
    assert_eq!(Status::DomainError, revert_series(&ZZ, &mut g, &GrPoly::from_ints(&ZZ, &[0, 0, 1]), 4));
    let mut h = GrPoly::new();
    revert_series(&QQ, &mut h, &GrPoly::from_ints(&QQ, &[0, 2, 1]), 4).must_succeed();
    let mut check = GrPoly::new();
    compose_series(&QQ, &mut check, &GrPoly::from_ints(&QQ, &[0, 2, 1]), &h, 4).must_succeed();
    assert!(poly_equal(&QQ, &GrPoly::gen(&QQ), &check).is_true());
}

#[test]
fn test_failed_revert_overwrites_result() {
    let F5 = Zn::new(5);
    let f = GrPoly::from_ints(&F5, &[0, 1, -1]);
    let stale = GrPoly::from_ints(&F5, &[3, 3, 3, 3, 3, 3, 3]);
    let mut g = stale.clone();
    // the Catalan recurrence divides by 5 from x^5 on
    assert_eq!(Status::DomainError, revert_series_lagrange(&F5, &mut g, &f, 7));
    assert!(poly_equal(&F5, &stale, &g).is_false());
    for (i, c) in [0, 1, 1, 2, 0].into_iter().enumerate() {
        assert_el_eq!(F5, F5.int(c), g.coeff(i, &F5));
    }

    let mut g = stale.clone();
    assert_eq!(Status::DomainError, revert_series(&F5, &mut g, &GrPoly::from_ints(&F5, &[1, 1]), 4));
    assert!(g.is_empty());
}

#[test]
fn test_revert_is_inverse() {
    let ring = RingValue::from(ZnBase::new(101).with_cutoffs(Cutoffs::fast_always()));
    let mut rng = Rand64::new(3);
    let mut f = random_poly(&ring, 12, &mut rng);
    f.set_coeff(0, ring.zero(), &ring);
    f.set_coeff(1, ring.int(3), &ring);
    let n = 20;
    let mut g = GrPoly::new();
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || revert_series(&ring, &mut g, &f, n)).must_succeed();
    assert_eq!(Some("newton".to_owned()), recorder.strategy_for("revert_series"));
    let mut check = GrPoly::new();
    compose_series(&ring, &mut check, &f, &g, n).must_succeed();
    assert!(poly_equal(&ring, &GrPoly::gen(&ring), &check).is_true());
    let mut lagrange = GrPoly::new();
    revert_series_lagrange(&ring, &mut lagrange, &f, n).must_succeed();
    assert!(poly_equal(&ring, &lagrange, &g).is_true());
}
