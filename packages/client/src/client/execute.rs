//! The request pipeline
//!
//! `request(url, config)` walks a fixed, failure-sensitive order: cache
//! read, dedup join, request interceptors, cancellation registration, the
//! retry-wrapped attempt loop, normalization, response/error interceptors,
//! cache write, queue cleanup, polling re-entry, and finally strategy
//! disposition.

use std::sync::Arc;

use futures::FutureExt;
use tokio::time::sleep;
use url::Url;

use super::core::FetchClient;
use super::stats::ClientStats;
use crate::cache::{CacheStore, generate_cache_key};
use crate::config::{ErrorStrategy, RequestConfig};
use crate::error::{AbortReason, Error, Result};
use crate::interceptor;
use crate::queue::{AbortController, AbortSignal};
use crate::response::{FetchResponse, ResponseData};
use crate::transport::{Transport, TransportRequest};

impl FetchClient {
    /// Issue one orchestrated request.
    ///
    /// The config is the effective one: builders merge client defaults
    /// before calling this, and nothing is merged again here.
    ///
    /// # Errors
    ///
    /// Under the default `Reject` strategy, rejects with the terminal
    /// error once retries are exhausted. Other strategies resolve error
    /// paths per their contract.
    pub async fn request(&self, url: &str, config: RequestConfig) -> Result<FetchResponse> {
        config.validate()?;
        let base = Url::parse(url).map_err(crate::error::builder)?;
        // Identity (cache key, dedup key) sees the query as configured at
        // call time; interceptor additions only affect the wire request.
        let url_str = url_with_query(&base, &config.query).to_string();
        self.stats.record_request();

        let cache_key = generate_cache_key(&url_str, &config);

        // Cache read path
        if config.cache.enabled() {
            let busted = config
                .cache
                .cache_buster
                .as_ref()
                .is_some_and(|f| f(&url_str, &config));
            if busted {
                tracing::debug!(
                    target: "fetchkit::cache",
                    key = %cache_key,
                    "cache busted for this call"
                );
            } else if let Some(hit) = self.cache.get(&cache_key, config.cache.cache_time) {
                self.stats.record_cache_hit();
                return Ok(hit);
            } else {
                self.stats.record_cache_miss();
            }
        }

        // Dedup join path
        let identity = match &config.dedupe_key {
            Some(custom) => custom(&url_str, &config),
            None => cache_key.clone(),
        };

        if !config.dedupe_time.is_zero() {
            if let Some(shared) = self.queue.deduped(&identity, config.dedupe_time) {
                self.stats.record_deduped();
                tracing::debug!(
                    target: "fetchkit::queue",
                    key = %identity,
                    "joined in-flight request"
                );
                let outcome = shared.await;
                return dispose(&self.stats, &url_str, &config, outcome).await;
            }
        }

        let controller = AbortController::new();
        let ctx = ExecuteContext {
            transport: Arc::clone(&self.transport),
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            url: base,
            config: config.clone(),
            cache_key,
            controller: controller.clone(),
        };

        // Cancellable and dedupe-eligible requests live in the queue until
        // they settle or are superseded; everything else runs untracked.
        let tracked = config.cancellable || !config.dedupe_time.is_zero();
        let outcome = if tracked {
            let shared = execute(ctx).boxed().shared();
            let id = self
                .queue
                .register(&identity, controller, shared.clone(), config.cancellable);
            let outcome = shared.await;
            self.queue.settle(&identity, id);
            outcome
        } else {
            execute(ctx).await
        };

        dispose(&self.stats, &url_str, &config, outcome).await
    }

    /// GET `url` with this client's default config.
    ///
    /// # Errors
    ///
    /// See [`FetchClient::request`].
    pub async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.request(url, self.defaults.clone()).await
    }
}

fn url_with_query(base: &Url, query: &[(String, String)]) -> Url {
    let mut url = base.clone();
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    url
}

/// Everything the pipeline future owns; `'static` so dedup sharers can
/// hold it past the originating caller.
struct ExecuteContext {
    transport: Arc<dyn Transport>,
    cache: Arc<CacheStore>,
    stats: Arc<ClientStats>,
    /// Base URL without the configured query; attempts re-serialize the
    /// (possibly interceptor-extended) query onto it.
    url: Url,
    config: RequestConfig,
    cache_key: String,
    controller: AbortController,
}

/// Steps 4-11: interceptors, attempts under retry, cache write, polling.
/// Returns the pre-strategy outcome; non-2xx responses come back as `Ok`
/// with the error slot populated.
async fn execute(mut ctx: ExecuteContext) -> std::result::Result<FetchResponse, Error> {
    let chain = ctx.config.on_request.clone();
    interceptor::apply_request(&chain, &mut ctx.config).await?;

    let signal = ctx.controller.signal();
    let mut poll_attempt: u32 = 0;

    loop {
        let outcome = attempt_loop(&ctx, &signal).await;
        match outcome {
            Ok(mut response) if response.error.is_none() => {
                let chain = response.config.on_response.clone();
                interceptor::apply_response(&chain, &mut response).await?;

                if ctx.config.cache.enabled() {
                    let skip = ctx
                        .config
                        .cache
                        .skip_cache
                        .as_ref()
                        .is_some_and(|f| f(&response, &ctx.config));
                    if !skip {
                        ctx.cache.set(&ctx.cache_key, response.clone());
                    }
                }

                let polling = &ctx.config.polling;
                if polling.enabled() {
                    poll_attempt += 1;
                    let stop = polling
                        .should_stop
                        .as_ref()
                        .is_some_and(|f| f(&response, poll_attempt));
                    let capped =
                        polling.max_attempts > 0 && poll_attempt >= polling.max_attempts;
                    if !stop && !capped {
                        ctx.stats.record_poll();
                        if poll_attempt == 1 && !polling.delay.is_zero() {
                            sleep(polling.delay).await;
                        }
                        sleep(polling.interval).await;
                        continue;
                    }
                    if capped && !stop {
                        tracing::debug!(
                            target: "fetchkit::client",
                            attempts = poll_attempt,
                            "polling stopped at max attempts"
                        );
                    }
                }

                return Ok(response);
            }
            // Errors stop polling immediately; retry already had its say
            // inside the attempt loop.
            other => return other,
        }
    }
}

/// Step 6: transport attempts under the retry policy.
async fn attempt_loop(
    ctx: &ExecuteContext,
    signal: &AbortSignal,
) -> std::result::Result<FetchResponse, Error> {
    let mut attempt: u32 = 0;
    loop {
        let outcome = single_attempt(ctx, signal).await;
        let decision = crate::retry::evaluate(&ctx.config.retry, &outcome, attempt).await;
        if decision.should_retry {
            ctx.stats.record_retry();
            sleep(decision.delay).await;
            attempt += 1;
            continue;
        }
        return outcome;
    }
}

/// One transport call raced against the abort signal and the per-attempt
/// timeout. The timeout aborts the shared controller so dedup sharers see
/// the same settlement.
async fn single_attempt(
    ctx: &ExecuteContext,
    signal: &AbortSignal,
) -> std::result::Result<FetchResponse, Error> {
    let request = build_transport_request(&ctx.url, &ctx.config)?;
    let fetch = ctx.transport.fetch(request);
    let timeout_arm = async {
        match ctx.config.timeout {
            Some(timeout) => sleep(timeout).await,
            None => futures::future::pending().await,
        }
    };

    let raw = tokio::select! {
        result = fetch => result?,
        reason = signal.aborted() => {
            return Err(crate::error::cancelled(reason).with_url(ctx.url.clone()));
        }
        () = timeout_arm => {
            ctx.controller.abort(AbortReason::TimedOut);
            return Err(crate::error::timed_out().with_url(ctx.url.clone()));
        }
    };

    Ok(FetchResponse::from_raw(raw, ctx.config.clone()))
}

fn build_transport_request(
    base: &Url,
    config: &RequestConfig,
) -> std::result::Result<TransportRequest, Error> {
    let mut headers = config.headers.clone();
    if let Some(content_type) = config.body.content_type() {
        headers
            .entry(http::header::CONTENT_TYPE)
            .or_insert_with(|| http::HeaderValue::from_static(content_type));
    }

    Ok(TransportRequest {
        method: config.method.clone(),
        url: url_with_query(base, &config.query),
        headers,
        body: config.body.to_bytes()?,
    })
}

/// Step 12: strategy disposition. Swallowed errors still reach the error
/// observers and the logger first, so observability survives every
/// strategy.
async fn dispose(
    stats: &ClientStats,
    url: &str,
    config: &RequestConfig,
    outcome: std::result::Result<FetchResponse, Error>,
) -> Result<FetchResponse> {
    match outcome {
        Ok(response) if response.error.is_none() => {
            stats.record_success();
            Ok(response)
        }
        Ok(response) => {
            stats.record_failure();
            let chain = response.config.on_error.clone();
            interceptor::apply_error(&chain, &response).await;

            // The error slot is always populated on this arm
            let error = response
                .error
                .clone()
                .unwrap_or_else(|| crate::error::network("missing error on failed response"));
            tracing::error!(
                target: "fetchkit::client",
                url,
                error = %error,
                "request failed"
            );

            match response.config.strategy {
                ErrorStrategy::Reject => Err(error),
                ErrorStrategy::DefaultResponse => {
                    let mut resolved = response;
                    resolved.data = resolved
                        .config
                        .default_response
                        .clone()
                        .map(ResponseData::Json)
                        .unwrap_or_default();
                    resolved.error = None;
                    Ok(resolved)
                }
                ErrorStrategy::SoftFail => {
                    let mut resolved = response;
                    if resolved.data.is_nullish() {
                        if let Some(fallback) = &resolved.config.default_response {
                            resolved.data = ResponseData::Json(fallback.clone());
                        }
                    }
                    Ok(resolved)
                }
                ErrorStrategy::Silent => never_settle().await,
            }
        }
        Err(error) => {
            let response = FetchResponse::failure(url.to_string(), config.clone(), error.clone());
            interceptor::apply_error(&config.on_error, &response).await;

            if error.is_cancellation() {
                stats.record_cancelled();
                tracing::debug!(target: "fetchkit::client", url, "request cancelled");
                return if config.reject_cancelled {
                    Err(error)
                } else {
                    Ok(response)
                };
            }

            stats.record_failure();
            tracing::error!(
                target: "fetchkit::client",
                url,
                error = %error,
                "request failed"
            );

            match config.strategy {
                ErrorStrategy::Reject => Err(error),
                ErrorStrategy::DefaultResponse => {
                    let mut resolved = response;
                    resolved.error = None;
                    Ok(resolved)
                }
                ErrorStrategy::SoftFail => Ok(response),
                ErrorStrategy::Silent => never_settle().await,
            }
        }
    }
}

/// The `silent` strategy: a future that deliberately never settles.
async fn never_settle() -> Result<FetchResponse> {
    let never: std::convert::Infallible = futures::future::pending().await;
    match never {}
}
