//! Errors reported by the graphics context.

use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Result type of fallible context operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// An error reported by a context operation.
///
/// A failed operation leaves the context state as it was before the call.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    /// The operation is not allowed between `begin` and `end`.
    #[error("{op} cannot be called between begin and end")]
    InsidePrimitive { op: &'static str },

    /// The operation is only allowed between `begin` and `end`.
    #[error("{op} called with no matching begin")]
    OutsidePrimitive { op: &'static str },

    /// An argument was missing, malformed, or out of range.
    #[error("invalid argument to {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    /// A free-function call was made with no current context.
    #[error("no current graphics context")]
    NoContext,

    /// A pop was attempted on an empty stack.
    #[error("{0} stack underflow")]
    StackUnderflow(Stack),

    /// A matrix or vector was too degenerate to proceed.
    #[error("{op}: {what}")]
    Degenerate { op: &'static str, what: Degeneracy },

    /// The shader pipeline reported a failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// The broad category of an [`Error`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Programmer error: bad argument, wrong mode, or missing context.
    Precondition,
    /// A stack was popped while empty.
    Exhausted,
    /// A numeric degeneracy such as a singular matrix.
    Degenerate,
    /// The underlying pipeline failed.
    Backend,
}

/// The stacks that can underflow.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stack {
    Modelview,
    Projection,
    Texture,
    Attrib,
}

/// Kinds of numeric degeneracy.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Degeneracy {
    /// A matrix with zero determinant.
    SingularMatrix,
    /// A rotation axis or direction of (nearly) zero length.
    ZeroAxis,
    /// A homogeneous point with zero `w`.
    AtInfinity,
}

impl Error {
    /// Returns the category of `self`.
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            InsidePrimitive { .. }
            | OutsidePrimitive { .. }
            | InvalidArgument { .. }
            | NoContext => ErrorKind::Precondition,
            StackUnderflow(_) => ErrorKind::Exhausted,
            Degenerate { .. } => ErrorKind::Degenerate,
            Backend(_) => ErrorKind::Backend,
        }
    }
}

// Constructors used by the context. Each one logs the error as it is
// created, as the error is about to be returned to the caller.

pub(crate) fn invalid(op: &'static str, reason: impl Into<String>) -> Error {
    logged(Error::InvalidArgument { op, reason: reason.into() })
}

pub(crate) fn inside(op: &'static str) -> Error {
    logged(Error::InsidePrimitive { op })
}

pub(crate) fn outside(op: &'static str) -> Error {
    logged(Error::OutsidePrimitive { op })
}

pub(crate) fn underflow(stack: Stack) -> Error {
    logged(Error::StackUnderflow(stack))
}

pub(crate) fn degenerate(op: &'static str, what: Degeneracy) -> Error {
    logged(Error::Degenerate { op, what })
}

pub(crate) fn backend(msg: impl Into<String>) -> Error {
    logged(Error::Backend(msg.into()))
}

fn logged(e: Error) -> Error {
    log::warn!("{e}");
    e
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stack::Modelview => "modelview matrix",
            Stack::Projection => "projection matrix",
            Stack::Texture => "texture matrix",
            Stack::Attrib => "attribute",
        })
    }
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Degeneracy::SingularMatrix => "matrix is not invertible",
            Degeneracy::ZeroAxis => "axis has zero length",
            Degeneracy::AtInfinity => "point is at infinity",
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::InsidePrimitive { op: "enable" }.to_string(),
            "enable cannot be called between begin and end"
        );
        assert_eq!(
            Error::StackUnderflow(Stack::Projection).to_string(),
            "projection matrix stack underflow"
        );
        assert_eq!(
            Error::Degenerate { op: "rotate", what: Degeneracy::ZeroAxis }
                .to_string(),
            "rotate: axis has zero length"
        );
        assert_eq!(
            invalid("vertex_fv", "expected 2 to 4 values").to_string(),
            "invalid argument to vertex_fv: expected 2 to 4 values"
        );
    }

    #[test]
    fn kinds() {
        assert_eq!(outside("end").kind(), ErrorKind::Precondition);
        assert_eq!(Error::NoContext.kind(), ErrorKind::Precondition);
        assert_eq!(underflow(Stack::Attrib).kind(), ErrorKind::Exhausted);
        assert_eq!(
            degenerate("invert", Degeneracy::SingularMatrix).kind(),
            ErrorKind::Degenerate
        );
        assert_eq!(backend("link failed").kind(), ErrorKind::Backend);
    }
}
