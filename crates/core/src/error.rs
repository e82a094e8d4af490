use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use robodream_model::{ErrorKind, ModelProviderError};

/// A failed completion request.
///
/// The widget never shows this to the user, it only decides that the
/// fallback reply is used. The cause is kept for logging.
#[derive(Debug)]
pub struct Error {
    repr: Repr,
}

#[derive(Debug)]
enum Repr {
    Provider(Box<dyn ModelProviderError>),
    Timeout(Duration),
}

impl Error {
    #[inline]
    pub(crate) fn provider<E: ModelProviderError>(err: E) -> Self {
        Self {
            repr: Repr::Provider(Box::new(err)),
        }
    }

    #[inline]
    pub(crate) fn timed_out(after: Duration) -> Self {
        Self {
            repr: Repr::Timeout(after),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match &self.repr {
            Repr::Provider(err) => err.kind(),
            Repr::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Provider(err) => {
                write!(f, "completion request failed: {err}")
            }
            Repr::Timeout(after) => {
                write!(f, "completion request timed out after {after:?}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.repr {
            Repr::Provider(err) => Some(err.as_ref()),
            Repr::Timeout(_) => None,
        }
    }
}
