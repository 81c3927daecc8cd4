use serde::{Deserialize, Serialize};

use crate::ring::RingBase;
use crate::truth::Truth;

///
/// Coarse classification of rings, used to choose default algorithm cutoffs.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingClass {
    ///
    /// Exact rings of characteristic zero, e.g. integers and rationals. Coefficient
    /// growth makes the asymptotically fast algorithms pay off only later.
    ///
    ExactCharZero,
    ///
    /// Exact rings of positive characteristic, e.g. `Z/nZ`.
    ///
    FiniteCharacteristic,
    ///
    /// Rings whose arithmetic is only approximate, e.g. floating-point or ball arithmetic.
    ///
    Inexact,
    ///
    /// Rings about which too little is known to choose one of the other classes.
    ///
    Generic
}

impl RingClass {

    ///
    /// Classifies the given ring. Predicates that cannot be decided lead to the more
    /// conservative class.
    ///
    pub fn of<R: ?Sized + RingBase>(ring: &R) -> RingClass {
        match ring.ctx_is_exact() {
            Truth::False => RingClass::Inexact,
            Truth::Unknown => RingClass::Generic,
            Truth::True => match ring.characteristic() {
                Some(0) => RingClass::ExactCharZero,
                Some(_) => RingClass::FiniteCharacteristic,
                None => RingClass::Generic
            }
        }
    }
}

///
/// Size thresholds at which the algorithm selection switches from a basecase
/// algorithm to an asymptotically faster one.
///
/// Each value is the smallest input size (usually a polynomial length or a series
/// truncation length) for which the faster algorithm is used. Setting a value to
/// `usize::MAX` disables the corresponding fast algorithm.
///
/// The values can be loaded from any `serde` format; missing fields are taken from
/// the [`RingClass::Generic`] defaults.
///
/// # Example
/// ```
/// # use genring::tuning::*;
/// let defaults = Cutoffs::for_class(RingClass::FiniteCharacteristic);
/// let no_karatsuba = Cutoffs { mul_karatsuba: usize::MAX, ..defaults };
/// assert!(no_karatsuba.inv_series_newton < usize::MAX);
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Cutoffs {
    pub mul_karatsuba: usize,
    pub inv_series_newton: usize,
    pub div_series_newton: usize,
    pub sqrt_series_newton: usize,
    pub exp_series_newton: usize,
    pub divrem_newton: usize,
    pub divrem_divconquer: usize,
    pub compose_divconquer: usize,
    pub compose_series_brent_kung: usize,
    pub revert_series_newton: usize,
    pub evaluate_fast: usize,
    pub interpolate_fast: usize,
    pub det_cofactor: usize
}

impl Cutoffs {

    pub const fn for_class(class: RingClass) -> Cutoffs {
        match class {
            RingClass::ExactCharZero => Cutoffs {
                mul_karatsuba: 16,
                inv_series_newton: 32,
                div_series_newton: 32,
                sqrt_series_newton: 32,
                exp_series_newton: 24,
                divrem_newton: 48,
                divrem_divconquer: 24,
                compose_divconquer: 12,
                compose_series_brent_kung: 12,
                revert_series_newton: 16,
                evaluate_fast: 24,
                interpolate_fast: 24,
                det_cofactor: 3
            },
            RingClass::FiniteCharacteristic => Cutoffs {
                mul_karatsuba: 24,
                inv_series_newton: 20,
                div_series_newton: 20,
                sqrt_series_newton: 24,
                exp_series_newton: 32,
                divrem_newton: 32,
                divrem_divconquer: 16,
                compose_divconquer: 10,
                compose_series_brent_kung: 8,
                revert_series_newton: 12,
                evaluate_fast: 32,
                interpolate_fast: 32,
                det_cofactor: 3
            },
            RingClass::Inexact => Cutoffs {
                mul_karatsuba: 64,
                inv_series_newton: 48,
                div_series_newton: 48,
                sqrt_series_newton: 48,
                exp_series_newton: 48,
                divrem_newton: 96,
                divrem_divconquer: 64,
                compose_divconquer: 24,
                compose_series_brent_kung: 24,
                revert_series_newton: 32,
                evaluate_fast: 64,
                interpolate_fast: 64,
                det_cofactor: 3
            },
            RingClass::Generic => Cutoffs {
                mul_karatsuba: 32,
                inv_series_newton: 40,
                div_series_newton: 40,
                sqrt_series_newton: 40,
                exp_series_newton: 40,
                divrem_newton: 64,
                divrem_divconquer: 32,
                compose_divconquer: 16,
                compose_series_brent_kung: 16,
                revert_series_newton: 24,
                evaluate_fast: 48,
                interpolate_fast: 48,
                det_cofactor: 3
            }
        }
    }

    ///
    /// Cutoffs that make every selection choose the basecase algorithm.
    ///
    pub const fn basecase_only() -> Cutoffs {
        Cutoffs {
            mul_karatsuba: usize::MAX,
            inv_series_newton: usize::MAX,
            div_series_newton: usize::MAX,
            sqrt_series_newton: usize::MAX,
            exp_series_newton: usize::MAX,
            divrem_newton: usize::MAX,
            divrem_divconquer: usize::MAX,
            compose_divconquer: usize::MAX,
            compose_series_brent_kung: usize::MAX,
            revert_series_newton: usize::MAX,
            evaluate_fast: usize::MAX,
            interpolate_fast: usize::MAX,
            det_cofactor: 3
        }
    }

    ///
    /// Cutoffs that make every selection choose the asymptotically fast algorithm,
    /// whenever its preconditions are met. Mainly useful for testing.
    ///
    pub const fn fast_always() -> Cutoffs {
        Cutoffs {
            mul_karatsuba: 2,
            inv_series_newton: 2,
            div_series_newton: 2,
            sqrt_series_newton: 2,
            exp_series_newton: 2,
            divrem_newton: 2,
            divrem_divconquer: 2,
            compose_divconquer: 2,
            compose_series_brent_kung: 2,
            revert_series_newton: 2,
            evaluate_fast: 2,
            interpolate_fast: 2,
            det_cofactor: 0
        }
    }
}

impl Default for Cutoffs {

    fn default() -> Self {
        Cutoffs::for_class(RingClass::Generic)
    }
}

#[test]
fn test_partial_config() {
    let parsed: Cutoffs = serde_json::from_str(r#"{ "mul_karatsuba": 7, "det_cofactor": 2 }"#).unwrap();
    assert_eq!(7, parsed.mul_karatsuba);
    assert_eq!(2, parsed.det_cofactor);
    assert_eq!(Cutoffs::default().inv_series_newton, parsed.inv_series_newton);
}

#[test]
fn test_config_serialization() {
    let cutoffs = Cutoffs::for_class(RingClass::FiniteCharacteristic);
    let json = serde_json::to_string(&cutoffs).unwrap();
    assert_eq!(cutoffs, serde_json::from_str::<Cutoffs>(&json).unwrap());
}
