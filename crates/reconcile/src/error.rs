use std::io;

use filespec::{ErrorKind, SpecError};
use thiserror::Error;

/// Error returned by [`Reconciler::reconcile`](crate::Reconciler::reconcile).
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The specification was incomplete or its content could not be resolved.
    #[error(transparent)]
    Spec(#[from] SpecError),
    /// A filesystem or identity service call failed; the error is unchanged.
    #[error(transparent)]
    Service(#[from] io::Error),
}

impl ReconcileError {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Spec(error) => error.kind(),
            Self::Service(_) => ErrorKind::ExternalService,
        }
    }

    /// Returns the service error, if that is what failed.
    #[must_use]
    pub const fn as_io(&self) -> Option<&io::Error> {
        match self {
            Self::Service(error) => Some(error),
            Self::Spec(_) => None,
        }
    }
}
