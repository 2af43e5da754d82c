use crate::node::NodeKind;

/// Failure of a [`construct`](`crate::construct`) or [`patch`](`crate::patch`) call.
///
/// Programming errors ([`Error::DocumentNode`], [`Error::DepthLimit`]) are detected before the first adapter call
/// and leave the live tree untouched. They indicate a caller bug and should not be retried.
///
/// [`Error::Dom`] aborts the call where it happened. Mutations applied before it are not rolled back,
/// so the affected subtree must be treated as being in an unspecified state.
/// Recovering by patching with `previous = None` into a fresh container always converges.
#[derive(Debug, thiserror::Error)]
pub enum Error<E>
where
	E: std::error::Error + 'static,
{
	#[error("a {} node cannot be constructed or diffed; the live root is supplied by the host", NodeKind::Document)]
	DocumentNode,

	#[error("virtual tree exceeds the depth limit of {limit}")]
	DepthLimit { limit: usize },

	#[error("document adapter failure")]
	Dom(#[source] E),
}

impl<E> Error<E>
where
	E: std::error::Error + 'static,
{
	/// Whether this error signals misuse rather than a failing host.
	#[must_use]
	pub fn is_programming_error(&self) -> bool {
		match self {
			Error::DocumentNode | Error::DepthLimit { .. } => true,
			Error::Dom(_) => false,
		}
	}

	/// The adapter's error, if this is an adapter failure.
	pub fn into_dom_error(self) -> Option<E> {
		match self {
			Error::Dom(error) => Some(error),
			Error::DocumentNode | Error::DepthLimit { .. } => None,
		}
	}
}

impl<E> From<E> for Error<E>
where
	E: std::error::Error + 'static,
{
	fn from(error: E) -> Self {
		Error::Dom(error)
	}
}
