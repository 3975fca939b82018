use thiserror::Error;

use super::host::HostError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the registry, the pair factory and the coordinator
#[derive(Debug, Error)]
pub enum NavError {
    /// A required view -> view-model mapping is missing
    #[error("View type '{kind}' not registered")]
    NotRegistered { kind: &'static str },

    /// Checked before any state is touched
    #[error("{operation}: {reason}")]
    PreconditionNotMet {
        operation: &'static str,
        reason: &'static str,
    },

    #[error("Unable to create View: {kind}")]
    ViewConstructionFailed {
        kind: &'static str,
        #[source]
        cause: BoxError,
    },

    #[error("Unable to create ViewModel: {kind}")]
    ViewModelConstructionFailed {
        kind: &'static str,
        #[source]
        cause: BoxError,
    },

    /// A view asked for its own pair before its constructor returned
    #[error("View '{kind}' was requested while it is still being constructed")]
    ConstructionCycle { kind: &'static str },

    /// The navigation host rejected a stack mutation
    #[error("Navigation operation '{operation}' failed")]
    NavigationIOFailed {
        operation: &'static str,
        source: HostError,
    },

    /// The cache holds an instance of a different shape than the kind implies
    #[error("Cached instance for '{kind}' has an unexpected type")]
    InstanceMismatch { kind: &'static str },
}

impl NavError {
    pub fn precondition(operation: &'static str, reason: &'static str) -> Self {
        NavError::PreconditionNotMet { operation, reason }
    }

    pub(crate) fn io(operation: &'static str) -> impl FnOnce(HostError) -> Self {
        move |source| NavError::NavigationIOFailed { operation, source }
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, NavError::PreconditionNotMet { .. })
    }
}
