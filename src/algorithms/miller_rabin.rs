///
/// Bases for which the Miller-Rabin test is known to be deterministic for all
/// integers below `2^64`.
///
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(lhs: u64, rhs: u64, modulus: u64) -> u64 {
    ((lhs as u128 * rhs as u128) % modulus as u128) as u64
}

fn pow_mod(mut base: u64, mut power: u64, modulus: u64) -> u64 {
    let mut result = 1 % modulus;
    base %= modulus;
    while power > 0 {
        if power & 1 == 1 {
            result = mul_mod(result, base, modulus);
        }
        base = mul_mod(base, base, modulus);
        power >>= 1;
    }
    return result;
}

///
/// Miller-Rabin primality test.
///
/// Since the integers are restricted to `u64`, using the first twelve primes as
/// witnesses makes the test deterministic, i.e. the result is always correct.
///
/// # Example
/// ```
/// # use genring::algorithms::miller_rabin::is_prime;
/// assert!(is_prime(68719476767));
/// assert!(!is_prime(68719476765));
/// ```
///
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for p in WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }
    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;

    'witness: for a in WITNESSES {
        let mut current = pow_mod(a, d, n);
        if current == 1 || current == n - 1 {
            continue;
        }
        for _r in 1..s {
            current = mul_mod(current, current, n);
            if current == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    return true;
}

///
/// Returns the largest prime smaller than the given integer.
///
pub fn prev_prime(n: u64) -> Option<u64> {
    (2..n).rev().find(|k| is_prime(*k))
}

#[test]
pub fn test_is_prime() {
    assert!(is_prime(2));
    assert!(is_prime(3));
    assert!(is_prime(5));
    assert!(is_prime(7));
    assert!(is_prime(11));
    assert!(is_prime(22531));
    assert!(is_prime(417581));
    assert!(is_prime(68719476767));
    assert!(is_prime(18446744073709551557));

    assert!(!is_prime(0));
    assert!(!is_prime(1));
    assert!(!is_prime(4));
    assert!(!is_prime(6));
    assert!(!is_prime(9));
    assert!(!is_prime(22532));
    assert!(!is_prime(347584));
    // strong pseudoprime to the bases 2, 3, 5, 7
    assert!(!is_prime(3215031751));
    assert!(!is_prime(18446744073709551555));
}

#[test]
fn test_prev_prime() {
    assert_eq!(Some(7), prev_prime(11));
    assert_eq!(Some(7), prev_prime(8));
    assert_eq!(Some(5), prev_prime(7));
    assert_eq!(Some(2), prev_prime(3));
    assert_eq!(None, prev_prime(2));
    assert_eq!(None, prev_prime(1));

    let mut last_prime = 29;
    for i in 30..1000 {
        assert_eq!(Some(last_prime), prev_prime(i));
        if (2..i).all(|d| i % d != 0) {
            last_prime = i;
        }
    }
}
