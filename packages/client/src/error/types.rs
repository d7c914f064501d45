use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

/// A Result alias where the Err case is `fetchkit_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors produced while orchestrating a request.
#[derive(Clone)]
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub url: Option<url::Url>,
}

impl Clone for Inner {
    fn clone(&self) -> Self {
        Inner {
            kind: self.kind.clone(),
            source: None, // Cannot clone trait objects, so we lose the source
            url: self.url.clone(),
        }
    }
}

/// Why a superseded or timed-out attempt was aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// A newer request with the same identity key took over.
    Superseded,
    /// The per-attempt timeout elapsed.
    TimedOut,
}

#[derive(Debug, Clone)]
pub enum Kind {
    /// Transport never produced a response (DNS, connection, IO).
    Network,
    /// Transport produced a non-2xx response.
    Status(StatusCode, String),
    /// Abort triggered by supersession or timeout.
    Cancelled(AbortReason),
    /// A request or response interceptor threw.
    Interceptor,
    /// Body decoding failed with nothing recoverable.
    Parse,
    /// Invalid configuration or URL before any network work.
    Builder,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner { kind, source: None, url: None }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.inner.url = Some(url);
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&url::Url> {
        self.inner.url.as_ref()
    }

    /// The HTTP status attached to this error, if it carries one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.kind {
            Kind::Status(status, _) => Some(status),
            _ => None,
        }
    }

    /// True for aborts, whether by supersession or timeout.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self.inner.kind, Kind::Cancelled(_))
    }

    /// True only for per-attempt timeout aborts.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.inner.kind, Kind::Cancelled(AbortReason::TimedOut))
    }

    /// True when the transport never produced a response.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self.inner.kind, Kind::Network)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("fetchkit::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref url) = self.inner.url {
            f.field("url", url);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Network => f.write_str("network error sending request"),
            Kind::Cancelled(AbortReason::Superseded) => {
                f.write_str("request cancelled: superseded by a newer request")
            }
            Kind::Cancelled(AbortReason::TimedOut) => f.write_str("request timeout"),
            Kind::Interceptor => f.write_str("interceptor error"),
            Kind::Parse => f.write_str("error decoding response body"),
            Kind::Builder => f.write_str("builder error"),
            Kind::Status(code, reason) => {
                let prefix = if code.is_client_error() {
                    "HTTP status client error"
                } else if code.is_server_error() {
                    "HTTP status server error"
                } else {
                    "HTTP status error"
                };
                if reason.is_empty() {
                    write!(f, "{prefix} ({code})")
                } else {
                    write!(f, "{prefix} ({} {})", code.as_str(), reason)
                }
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
