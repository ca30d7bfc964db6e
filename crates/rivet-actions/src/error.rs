use rivet_di::DiError;
use thiserror::Error;

/// Errors raised by the action service.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ActionError {
	#[error(transparent)]
	Di(#[from] DiError),

	/// The service was cleaned up, or never had a container to pool actions in.
	#[error("action service has no resolver; pooled actions are unavailable")]
	NoResolver,

	/// A pooled action was requested while it is still being dispatched.
	#[error("pooled action `{action}` is already in flight")]
	InFlight { action: &'static str },
}

pub type ActionResult<T> = Result<T, ActionError>;
