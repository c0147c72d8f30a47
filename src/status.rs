use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use thiserror::Error;

///
/// The outcome of every ring operation.
///
/// The variants are ordered by severity, and composite operations combine the
/// outcomes of their parts by taking the worst one, available as `|` and `|=`.
/// In particular, a single [`Status::Domain`] or [`Status::Unable`] anywhere in
/// a composite operation voids [`Status::Success`] for the whole operation.
///
/// # Example
/// ```
/// # use generic_ring::status::*;
/// let mut status = Status::Success;
/// status |= Status::Unable;
/// assert_eq!(Status::Unable, status);
/// status |= Status::Domain;
/// assert_eq!(Status::Domain, status);
/// status |= Status::Success;
/// assert_eq!(Status::Domain, status);
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    /// The result was computed.
    Success,
    /// The implementation could not decide the result, e.g. since a zero test
    /// in the base ring is undecidable or a resource bound was hit. This is
    /// never a proof that the result does not exist.
    Unable,
    /// The result is mathematically undefined for this input, e.g. an exact
    /// division with nonzero remainder.
    Domain
}

impl Status {

    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    ///
    /// Runs `f` only if `self` is [`Status::Success`], otherwise keeps the failure.
    ///
    pub fn and_then<F>(self, f: F) -> Status
        where F: FnOnce() -> Status
    {
        if self.is_success() {
            f()
        } else {
            self
        }
    }

    pub fn into_result(self) -> Result<(), Failure> {
        match self {
            Status::Success => Ok(()),
            Status::Unable => Err(Failure::Unable),
            Status::Domain => Err(Failure::Domain)
        }
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        std::cmp::max(self, rhs)
    }
}

impl BitOrAssign for Status {

    fn bitor_assign(&mut self, rhs: Status) {
        *self = *self | rhs;
    }
}

impl From<Result<(), Failure>> for Status {

    fn from(value: Result<(), Failure>) -> Self {
        match value {
            Ok(()) => Status::Success,
            Err(e) => e.into()
        }
    }
}

impl From<Failure> for Status {

    fn from(value: Failure) -> Self {
        match value {
            Failure::Unable => Status::Unable,
            Failure::Domain => Status::Domain
        }
    }
}

///
/// The failure cases of [`Status`], as an error type for use with `?`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Failure {
    #[error("unable to compute the result")]
    Unable,
    #[error("result is not defined for the given input")]
    Domain
}

///
/// Three-valued truth, the result of predicates in rings where
/// not everything is decidable.
///
/// `&` and `|` are the Kleene connectives, so e.g. `Truth::False & Truth::Unknown`
/// is `Truth::False`, since the conjunction is false whatever the unknown value is.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Truth {
    True,
    False,
    Unknown
}

impl Truth {

    pub fn is_true(self) -> bool {
        self == Truth::True
    }

    pub fn is_false(self) -> bool {
        self == Truth::False
    }

    pub fn is_unknown(self) -> bool {
        self == Truth::Unknown
    }
}

impl From<bool> for Truth {

    fn from(value: bool) -> Self {
        if value { Truth::True } else { Truth::False }
    }
}

impl BitAnd for Truth {
    type Output = Truth;

    fn bitand(self, rhs: Truth) -> Truth {
        match (self, rhs) {
            (Truth::False, _) | (_, Truth::False) => Truth::False,
            (Truth::True, Truth::True) => Truth::True,
            _ => Truth::Unknown
        }
    }
}

impl BitOr for Truth {
    type Output = Truth;

    fn bitor(self, rhs: Truth) -> Truth {
        match (self, rhs) {
            (Truth::True, _) | (_, Truth::True) => Truth::True,
            (Truth::False, Truth::False) => Truth::False,
            _ => Truth::Unknown
        }
    }
}

impl Not for Truth {
    type Output = Truth;

    fn not(self) -> Truth {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown
        }
    }
}

#[test]
fn test_status_join() {
    let all = [Status::Success, Status::Unable, Status::Domain];
    for a in all {
        for b in all {
            assert_eq!(a | b, b | a);
            for c in all {
                assert_eq!((a | b) | c, a | (b | c));
            }
        }
        assert_eq!(a, a | Status::Success);
        assert_eq!(Status::Domain, a | Status::Domain);
    }
    assert_eq!(Status::Unable, Status::Success | Status::Unable);
}

#[test]
fn test_status_result_conversion() {
    assert_eq!(Ok(()), Status::Success.into_result());
    assert_eq!(Err(Failure::Unable), Status::Unable.into_result());
    assert_eq!(Status::Domain, Status::from(Status::Domain.into_result()));
    assert_eq!(Status::Unable, Status::Success.and_then(|| Status::Unable));
    assert_eq!(Status::Domain, Status::Domain.and_then(|| Status::Success));
}

#[test]
fn test_truth_connectives() {
    assert_eq!(Truth::False, Truth::False & Truth::Unknown);
    assert_eq!(Truth::Unknown, Truth::True & Truth::Unknown);
    assert_eq!(Truth::True, Truth::True | Truth::Unknown);
    assert_eq!(Truth::Unknown, Truth::False | Truth::Unknown);
    assert_eq!(Truth::Unknown, !Truth::Unknown);
    assert_eq!(Truth::False, !Truth::from(true));
}
