use std::io;

use thiserror::Error;

/// Broad classification shared by every error the workspace produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// A value supplied to a setter or to content intake had the wrong shape.
    InvalidArgument,
    /// An operation was attempted before the specification was complete.
    InvalidState,
    /// A filesystem, identity or resolver service reported a failure.
    ExternalService,
}

/// Error produced while building or querying a [`FileSpec`](crate::FileSpec).
#[derive(Debug, Error)]
pub enum SpecError {
    /// The permission string was empty, too long or contained a non-octal digit.
    #[error("invalid permission string {value:?}: expected 1 to 4 octal digits")]
    InvalidPermissions {
        /// Rejected input, kept verbatim.
        value: String,
    },
    /// A readable content source failed or produced non UTF-8 data.
    #[error("failed to capture content from reader: {source}")]
    ContentRead {
        /// Underlying read failure.
        #[source]
        source: io::Error,
    },
    /// No path was set on the specification.
    #[error("file specification has no path")]
    MissingPath,
    /// Deferred content was requested without a resolver.
    #[error("content reference {name:?} requires a resolver")]
    UnresolvedContent {
        /// Name of the deferred reference.
        name: String,
    },
    /// The resolver failed to produce content for a deferred reference.
    #[error("failed to resolve content reference {name:?}: {source}")]
    Resolve {
        /// Name of the deferred reference.
        name: String,
        /// Failure reported by the resolver.
        #[source]
        source: io::Error,
    },
}

impl SpecError {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPermissions { .. } | Self::ContentRead { .. } => ErrorKind::InvalidArgument,
            Self::MissingPath | Self::UnresolvedContent { .. } => ErrorKind::InvalidState,
            Self::Resolve { .. } => ErrorKind::ExternalService,
        }
    }
}
