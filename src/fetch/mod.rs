//! Redirect-aware HTTP fetching.
//!
//! One GET per target, optionally through a SOCKS5 proxy, with the full
//! redirect chain recorded hop by hop. `fetch` is infallible at the
//! signature level: every transport failure resolves into the outcome's
//! `transport_error` field, never an error escaping to the caller.

mod client;
mod redirects;

use std::time::{Duration, Instant};

use crate::config::RunConfig;
use crate::error_handling::format_transport_error;
use crate::models::{FetchOutcome, ProxyConfig, RedirectHop};
use redirects::ChainEnd;

/// Options for a single fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub proxy: Option<ProxyConfig>,
    pub user_agent: String,
    pub force_ipv4: bool,
    pub max_redirects: usize,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

impl FetchOptions {
    /// Lifts the fetch-relevant subset out of a run configuration.
    pub fn from_config(config: &RunConfig) -> Self {
        FetchOptions {
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            force_ipv4: config.force_ipv4,
            max_redirects: config.max_redirects,
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            total_timeout: Duration::from_secs(config.total_timeout_secs),
        }
    }
}

/// Issues a GET for `url` and records everything observed on the way to the
/// final response.
///
/// Redirects are followed up to `opts.max_redirects` under one end-to-end
/// deadline of `opts.total_timeout`; every 3xx hop is recorded in order.
/// After a 200 whose effective URL differs from the original request URL and
/// from every recorded hop, one synthetic terminal hop is appended (never
/// duplicated). A non-200 final status is the caller's failure to judge; the
/// partial chain gathered so far is still returned.
pub async fn fetch(url: &str, opts: &FetchOptions) -> FetchOutcome {
    let started = Instant::now();
    let mut outcome = FetchOutcome {
        effective_url: url.to_string(),
        ..FetchOutcome::default()
    };

    let client = match client::build_client(opts) {
        Ok(client) => client,
        Err(e) => {
            outcome.transport_error = Some(format!("client setup failed: {e}"));
            outcome.response_time_ms = elapsed_ms(started);
            return outcome;
        }
    };

    let deadline = started + opts.total_timeout;
    let mut chain: Vec<RedirectHop> = Vec::new();

    match redirects::walk_redirect_chain(&client, url, opts.max_redirects, deadline, &mut chain)
        .await
    {
        ChainEnd::Transport { message, url: hop_url } => {
            outcome.transport_error = Some(message);
            outcome.effective_url = hop_url;
        }
        ChainEnd::Final(response) => {
            outcome.status_code = response.status().as_u16();
            outcome.content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            outcome.effective_url = response.url().to_string();

            match response.bytes().await {
                Ok(bytes) => outcome.body = bytes.to_vec(),
                Err(e) => outcome.transport_error = Some(format_transport_error(&e)),
            }

            if outcome.status_code == 200
                && outcome.transport_error.is_none()
                && outcome.effective_url != url
                && !chain.iter().any(|hop| hop.location == outcome.effective_url)
            {
                chain.push(RedirectHop {
                    status: 200,
                    location: outcome.effective_url.clone(),
                });
            }
        }
    }

    outcome.redirect_chain = chain;
    outcome.response_time_ms = elapsed_ms(started);
    outcome
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
