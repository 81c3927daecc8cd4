use crate::ring::*;
use crate::status::Status;

///
/// Computes `base^power` by square-and-multiply, using the given closures for
/// squaring and for multiplying by `base`, where `identity` is the neutral element.
/// The statuses returned by the closures are accumulated.
///
pub fn generic_square_and_multiply<T, U, F, H>(base: &U, power: u64, mut square: F, mut multiply_base: H, identity: T) -> (T, Status)
    where F: FnMut(T) -> (T, Status),
        H: FnMut(&U, T) -> (T, Status)
{
    if power == 0 {
        return (identity, Status::Success);
    } else if power == 1 {
        return multiply_base(base, identity);
    }

    let mut status = Status::Success;
    let mut result = identity;
    for i in (0..=(u64::BITS - 1 - power.leading_zeros())).rev() {
        let (squared, square_status) = square(result);
        status |= square_status;
        if (power >> i) & 1 == 1 {
            let (product, mul_status) = multiply_base(base, squared);
            status |= mul_status;
            result = product;
        } else {
            result = squared;
        }
    }
    return (result, status);
}

///
/// Computes `res = base^power` in the given ring.
///
pub fn generic_pow<R>(ring: R, res: &mut El<R>, base: &El<R>, power: u64) -> Status
    where R: RingStore + Copy
{
    let (result, status) = generic_square_and_multiply(
        base,
        power,
        |x| {
            let mut y = ring.zero();
            let status = ring.sqr(&mut y, &x);
            (y, status)
        },
        |b, x| {
            let mut y = ring.zero();
            let status = ring.mul(&mut y, &x, b);
            (y, status)
        },
        ring.one()
    );
    *res = result;
    return status;
}

#[test]
fn test_square_and_multiply() {
    let square = |a: i64| (a * a, Status::Success);
    let multiply = |a: &i64, b: i64| (*a * b, Status::Success);
    assert_eq!((1, Status::Success), generic_square_and_multiply(&3, 0, square, multiply, 1));
    assert_eq!((3 * 3, Status::Success), generic_square_and_multiply(&3, 2, square, multiply, 1));
    assert_eq!((3 * 3 * 3 * 3 * 3, Status::Success), generic_square_and_multiply(&3, 5, square, multiply, 1));
    assert_eq!((3i64.pow(13), Status::Success), generic_square_and_multiply(&3, 13, square, multiply, 1));
}

#[test]
fn test_status_accumulates() {
    let square = |a: i64| (a * a, if a == 9 { Status::Unable } else { Status::Success });
    let multiply = |a: &i64, b: i64| (*a * b, Status::Success);
    let (value, status) = generic_square_and_multiply(&3, 8, square, multiply, 1);
    assert_eq!(3i64.pow(8), value);
    assert_eq!(Status::Unable, status);
}
