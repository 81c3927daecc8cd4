use std::fmt::Display;
use std::iter::Sum;
use std::ops::{BitOr, BitOrAssign};

use thiserror::Error;

use crate::truth::Truth;

///
/// The completion status of a ring operation.
///
/// Ring operations never abort early on a failing sub-step; instead, they keep
/// computing a best-effort result and combine the status of all sub-steps using
/// `|`, which returns the worse of both operands. The order is
/// ```text
///   Success < Unable < DomainError
/// ```
/// so an accumulated status can never go back to [`Status::Success`] once a
/// failure has been seen. A proven mathematical impossibility dominates a mere
/// failure to decide.
///
/// # Example
/// ```
/// # use genring::status::*;
/// let mut status = Status::Success;
/// status |= Status::Unable;
/// status |= Status::Success;
/// assert_eq!(Status::Unable, status);
/// status |= Status::DomainError;
/// assert_eq!(Status::DomainError, status);
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use = "a Status may report that the result is not valid"]
pub enum Status {
    #[default]
    Success,
    ///
    /// The operation could not be completed or decided, e.g. since a predicate
    /// returned [`Truth::Unknown`], the ring does not support a required capability,
    /// or the precision was insufficient. Callers may retry with a different algorithm
    /// or higher precision.
    ///
    Unable,
    ///
    /// The input is provably outside of the domain of the operation, e.g. when
    /// inverting a zero divisor.
    ///
    DomainError
}

///
/// Error type for converting a failed [`Status`] into a [`Result`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum StatusError {
    #[error("input is outside of the domain of the operation")]
    Domain,
    #[error("unable to decide or complete the operation")]
    Unable
}

impl Status {

    pub const fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    pub const fn is_domain_error(self) -> bool {
        matches!(self, Status::DomainError)
    }

    pub const fn is_unable(self) -> bool {
        matches!(self, Status::Unable)
    }

    ///
    /// Returns the worse of both statuses.
    ///
    pub fn union(self, rhs: Status) -> Status {
        std::cmp::max(self, rhs)
    }

    ///
    /// Converts a required precondition into a status: a proven precondition
    /// is [`Status::Success`], a disproven one [`Status::DomainError`] and an
    /// undecided one [`Status::Unable`].
    ///
    pub const fn from_precondition(precondition: Truth) -> Status {
        match precondition {
            Truth::True => Status::Success,
            Truth::False => Status::DomainError,
            Truth::Unknown => Status::Unable
        }
    }

    pub fn check(self) -> Result<(), StatusError> {
        match self {
            Status::Success => Ok(()),
            Status::Unable => Err(StatusError::Unable),
            Status::DomainError => Err(StatusError::Domain)
        }
    }

    ///
    /// Asserts that the operation succeeded. Only use this where a failure would
    /// indicate a violated internal invariant, not a legitimate limitation of the ring.
    ///
    #[track_caller]
    pub fn must_succeed(self) {
        if self != Status::Success {
            panic!("operation that must succeed returned {}", self);
        }
    }
}

impl From<StatusError> for Status {

    fn from(value: StatusError) -> Self {
        match value {
            StatusError::Domain => Status::DomainError,
            StatusError::Unable => Status::Unable
        }
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        self.union(rhs)
    }
}

impl BitOrAssign for Status {

    fn bitor_assign(&mut self, rhs: Status) {
        *self = self.union(rhs);
    }
}

impl Sum for Status {

    fn sum<I: Iterator<Item = Status>>(iter: I) -> Self {
        iter.fold(Status::Success, Status::union)
    }
}

impl Display for Status {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Unable => write!(f, "unable"),
            Status::DomainError => write!(f, "domain error")
        }
    }
}

#[cfg(test)]
const ALL: [Status; 3] = [Status::Success, Status::Unable, Status::DomainError];

#[test]
fn test_union_monotonic() {
    for x in ALL {
        for y in ALL {
            let z = x | y;
            assert!(z >= x);
            assert!(z >= y);
            for w in ALL {
                assert_eq!((x | y) | w, x | (y | w));
            }
        }
    }
    for failed in [Status::Unable, Status::DomainError] {
        let mut accumulated = failed;
        for _ in 0..3 {
            accumulated |= Status::Success;
        }
        assert!(!accumulated.is_success());
    }
}

#[test]
fn test_sum() {
    assert_eq!(Status::Success, ALL[..1].iter().copied().sum::<Status>());
    assert_eq!(Status::Unable, [Status::Success, Status::Unable, Status::Success].into_iter().sum::<Status>());
    assert_eq!(Status::DomainError, ALL.into_iter().sum::<Status>());
    assert_eq!(Status::Success, std::iter::empty::<Status>().sum::<Status>());
}

#[test]
fn test_precondition() {
    assert_eq!(Status::Success, Status::from_precondition(Truth::True));
    assert_eq!(Status::DomainError, Status::from_precondition(Truth::False));
    assert_eq!(Status::Unable, Status::from_precondition(Truth::Unknown));
}

#[test]
fn test_check() {
    assert_eq!(Ok(()), Status::Success.check());
    assert_eq!(Err(StatusError::Domain), Status::DomainError.check());
    assert_eq!(Status::Unable, Status::from(Status::Unable.check().unwrap_err()));
}

#[test]
#[should_panic]
fn test_must_succeed_panics() {
    Status::Unable.must_succeed();
}
