//! Interceptor pipeline
//!
//! Three phases share one mechanism: an ordered chain of async callbacks
//! mutating a shared subject in place, each awaited before the next runs
//! so later interceptors observe earlier mutations. Request and response
//! interceptors are fallible and abort the remaining chain on error; error
//! interceptors are observational and infallible.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::RequestConfig;
use crate::error::{Kind, Result};
use crate::response::FetchResponse;

/// Mutates the effective config before the transport call.
pub trait RequestInterceptor: Send + Sync {
    fn on_request<'a>(&'a self, config: &'a mut RequestConfig) -> BoxFuture<'a, Result<()>>;
}

/// Mutates the in-flight response after normalization. Must not change the
/// response's identity, only its contents.
pub trait ResponseInterceptor: Send + Sync {
    fn on_response<'a>(&'a self, response: &'a mut FetchResponse) -> BoxFuture<'a, Result<()>>;
}

/// Observes a failed response before the strategy disposes of it. Runs for
/// swallowed errors too, so observability survives every strategy.
pub trait ErrorInterceptor: Send + Sync {
    fn on_error<'a>(&'a self, response: &'a FetchResponse) -> BoxFuture<'a, ()>;
}

// Plain sync closures participate without boilerplate; async interceptors
// implement the traits directly.

impl<F> RequestInterceptor for F
where
    F: Fn(&mut RequestConfig) -> Result<()> + Send + Sync,
{
    fn on_request<'a>(&'a self, config: &'a mut RequestConfig) -> BoxFuture<'a, Result<()>> {
        let result = self(config);
        Box::pin(async move { result })
    }
}

impl<F> ResponseInterceptor for F
where
    F: Fn(&mut FetchResponse) -> Result<()> + Send + Sync,
{
    fn on_response<'a>(&'a self, response: &'a mut FetchResponse) -> BoxFuture<'a, Result<()>> {
        let result = self(response);
        Box::pin(async move { result })
    }
}

impl<F> ErrorInterceptor for F
where
    F: Fn(&FetchResponse) + Send + Sync,
{
    fn on_error<'a>(&'a self, response: &'a FetchResponse) -> BoxFuture<'a, ()> {
        self(response);
        Box::pin(async move {})
    }
}

/// Tag any error escaping an interceptor so the orchestrator can tell it
/// apart from transport failures.
fn tag(error: crate::error::Error) -> crate::error::Error {
    match error.kind() {
        Kind::Interceptor => error,
        _ => crate::error::interceptor(error),
    }
}

/// Run the request-phase chain strictly in order.
///
/// # Errors
///
/// The first failing interceptor aborts the chain; the error surfaces as
/// `Kind::Interceptor` and no network call happens.
pub async fn apply_request(
    chain: &[Arc<dyn RequestInterceptor>],
    config: &mut RequestConfig,
) -> Result<()> {
    for interceptor in chain {
        interceptor.on_request(config).await.map_err(tag)?;
    }
    Ok(())
}

/// Run the response-phase chain strictly in order.
///
/// # Errors
///
/// The first failing interceptor aborts the chain and overrides the
/// response with `Kind::Interceptor`.
pub async fn apply_response(
    chain: &[Arc<dyn ResponseInterceptor>],
    response: &mut FetchResponse,
) -> Result<()> {
    for interceptor in chain {
        interceptor.on_response(response).await.map_err(tag)?;
    }
    Ok(())
}

/// Run the error observers in order. Observational only.
pub async fn apply_error(chain: &[Arc<dyn ErrorInterceptor>], response: &FetchResponse) {
    for interceptor in chain {
        interceptor.on_error(response).await;
    }
}
