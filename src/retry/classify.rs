//! Error kinds and is-a classification for exception filters.
//!
//! Rust errors have no class hierarchy, so an error opts into filtering by
//! naming its [`ErrorKind`]. Kinds may declare a parent; a kind "is a" every
//! kind on its ancestor chain, which gives the usual "same or more specific"
//! matching.
//!
//! # Example
//!
//! ```rust
//! use stillwater_retry::{Classify, ErrorKind};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind {
//!     Io,
//!     Timeout,
//!     Parse,
//! }
//!
//! impl ErrorKind for Kind {
//!     fn parent(&self) -> Option<Self> {
//!         match self {
//!             Kind::Timeout => Some(Kind::Io),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! assert!(Kind::Timeout.is_a(&Kind::Io));
//! assert!(!Kind::Io.is_a(&Kind::Timeout));
//! assert!(!Kind::Parse.is_a(&Kind::Io));
//! ```

use std::fmt::Debug;

/// A classification of errors, optionally arranged in a hierarchy.
pub trait ErrorKind: Copy + Eq + Debug + Send + Sync + 'static {
    /// The more general kind this one specialises, if any.
    fn parent(&self) -> Option<Self> {
        None
    }

    /// True if `self` equals `other` or has `other` as an ancestor.
    fn is_a(&self, other: &Self) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == *other {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

/// An error that can report its [`ErrorKind`].
pub trait Classify {
    /// The kind type used by this error.
    type Kind: ErrorKind;

    /// The most specific kind of this error.
    fn kind(&self) -> Self::Kind;
}
