use std::fmt::Display;
use std::ops::{BitAnd, BitOr, Not};

///
/// The result of a decision predicate that might not be decidable in a given ring.
///
/// For exact rings, predicates like [`crate::ring::RingBase::is_zero()`] will always
/// return [`Truth::True`] or [`Truth::False`]. However, when working e.g. with
/// ball arithmetic, an element might be indistinguishable from zero without being
/// provably zero, in which case [`Truth::Unknown`] is returned.
///
/// The combinators follow Kleene's strong three-valued logic, i.e. a value is only
/// [`Truth::Unknown`] if the outcome actually depends on the undecided operand.
/// In particular, [`Truth::Unknown`] is never silently converted into [`Truth::False`];
/// to get a `bool`, use [`Truth::is_true()`] or [`Truth::is_false()`], which make
/// explicit which side the unknown case falls on.
///
/// # Example
/// ```
/// # use genring::truth::*;
/// assert_eq!(Truth::False, Truth::Unknown & Truth::False);
/// assert_eq!(Truth::Unknown, Truth::Unknown & Truth::True);
/// assert_eq!(Truth::True, Truth::Unknown | Truth::True);
/// assert_eq!(Truth::Unknown, !Truth::Unknown);
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Truth {
    True, False, Unknown
}

impl Truth {

    pub const fn from_bool(value: bool) -> Self {
        if value { Truth::True } else { Truth::False }
    }

    ///
    /// Returns `true` if and only if the predicate is proven to hold.
    ///
    pub const fn is_true(self) -> bool {
        matches!(self, Truth::True)
    }

    ///
    /// Returns `true` if and only if the predicate is proven not to hold.
    ///
    pub const fn is_false(self) -> bool {
        matches!(self, Truth::False)
    }

    pub const fn is_unknown(self) -> bool {
        matches!(self, Truth::Unknown)
    }

    ///
    /// Returns `Some(b)` if the value is decided, and `None` otherwise.
    ///
    pub const fn to_bool(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Unknown => None
        }
    }

    pub const fn and(self, rhs: Truth) -> Truth {
        match (self, rhs) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown
        }
    }

    pub const fn or(self, rhs: Truth) -> Truth {
        match (self, rhs) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown
        }
    }

    pub const fn negate(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown
        }
    }

    ///
    /// Kleene-conjunction of all values, evaluated lazily: stops at the first
    /// [`Truth::False`]. The empty conjunction is [`Truth::True`].
    ///
    pub fn all<I>(values: I) -> Truth
        where I: IntoIterator<Item = Truth>
    {
        let mut result = Truth::True;
        for x in values {
            result = result.and(x);
            if result == Truth::False {
                return Truth::False;
            }
        }
        return result;
    }

    ///
    /// Kleene-disjunction of all values, evaluated lazily: stops at the first
    /// [`Truth::True`]. The empty disjunction is [`Truth::False`].
    ///
    pub fn any<I>(values: I) -> Truth
        where I: IntoIterator<Item = Truth>
    {
        let mut result = Truth::False;
        for x in values {
            result = result.or(x);
            if result == Truth::True {
                return Truth::True;
            }
        }
        return result;
    }
}

impl From<bool> for Truth {

    fn from(value: bool) -> Self {
        Truth::from_bool(value)
    }
}

impl BitAnd for Truth {
    type Output = Truth;

    fn bitand(self, rhs: Truth) -> Truth {
        self.and(rhs)
    }
}

impl BitOr for Truth {
    type Output = Truth;

    fn bitor(self, rhs: Truth) -> Truth {
        self.or(rhs)
    }
}

impl Not for Truth {
    type Output = Truth;

    fn not(self) -> Truth {
        self.negate()
    }
}

impl Display for Truth {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Truth::True => write!(f, "true"),
            Truth::False => write!(f, "false"),
            Truth::Unknown => write!(f, "unknown")
        }
    }
}

#[cfg(test)]
const ALL: [Truth; 3] = [Truth::True, Truth::False, Truth::Unknown];

#[test]
fn test_kleene_and() {
    for x in ALL {
        assert_eq!(Truth::False, x & Truth::False);
        assert_eq!(Truth::False, Truth::False & x);
        assert_eq!(x, x & Truth::True);
    }
    assert_eq!(Truth::Unknown, Truth::True & Truth::Unknown);
    assert_eq!(Truth::Unknown, Truth::Unknown & Truth::Unknown);
}

#[test]
fn test_kleene_or() {
    for x in ALL {
        assert_eq!(Truth::True, x | Truth::True);
        assert_eq!(Truth::True, Truth::True | x);
        assert_eq!(x, x | Truth::False);
    }
    assert_eq!(Truth::Unknown, Truth::False | Truth::Unknown);
    assert_eq!(Truth::Unknown, Truth::Unknown | Truth::Unknown);
}

#[test]
fn test_de_morgan() {
    for x in ALL {
        for y in ALL {
            assert_eq!(!(x & y), !x | !y);
            assert_eq!(!(x | y), !x & !y);
        }
        assert_eq!(x, !!x);
    }
}

#[test]
fn test_all_any() {
    assert_eq!(Truth::True, Truth::all([]));
    assert_eq!(Truth::False, Truth::any([]));
    assert_eq!(Truth::Unknown, Truth::all([Truth::True, Truth::Unknown, Truth::True]));
    assert_eq!(Truth::False, Truth::all([Truth::Unknown, Truth::False, Truth::Unknown]));
    assert_eq!(Truth::True, Truth::any([Truth::Unknown, Truth::True]));
    assert_eq!(Truth::Unknown, Truth::any([Truth::False, Truth::Unknown]));
}

#[test]
fn test_no_silent_collapse() {
    assert!(!Truth::Unknown.is_true());
    assert!(!Truth::Unknown.is_false());
    assert_eq!(None, Truth::Unknown.to_bool());
}
