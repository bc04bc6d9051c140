//! HTTP client construction.
//!
//! Builds the per-run `reqwest::Client` with redirects disabled so the
//! redirect chain can be tracked hop by hop (see `redirects`).

use std::net::{IpAddr, Ipv4Addr};

use reqwest::redirect::Policy;

use super::FetchOptions;

/// Builds a client configured for one batch run.
///
/// Redirects are disabled for manual chain tracking. TLS certificate
/// verification is disabled: the tool targets arbitrary, often self-signed,
/// streaming origins, and reachability is what is being measured. When
/// `force_ipv4` is set the client binds to the IPv4 wildcard address, which
/// constrains both resolution and connection to IPv4.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails (e.g. a malformed
/// proxy URL).
pub fn build_client(opts: &FetchOptions) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::ClientBuilder::new()
        .redirect(Policy::none())
        .connect_timeout(opts.connect_timeout)
        .user_agent(opts.user_agent.clone())
        .danger_accept_invalid_certs(true);

    if opts.force_ipv4 {
        builder = builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    if let Some(proxy) = &opts.proxy {
        let mut socks = reqwest::Proxy::all(proxy.label())?;
        if proxy.has_credentials() {
            let username = proxy.username.as_deref().unwrap_or("");
            let password = proxy.password.as_deref().unwrap_or("");
            socks = socks.basic_auth(username, password);
        }
        builder = builder.proxy(socks);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyConfig;
    use std::time::Duration;

    fn options() -> FetchOptions {
        FetchOptions {
            proxy: None,
            user_agent: "test-agent".to_string(),
            force_ipv4: false,
            max_redirects: 10,
            connect_timeout: Duration::from_secs(10),
            total_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_build_direct_client() {
        assert!(build_client(&options()).is_ok());
    }

    #[test]
    fn test_build_proxied_ipv4_client() {
        let mut opts = options();
        opts.force_ipv4 = true;
        opts.proxy = Some(ProxyConfig {
            host: "127.0.0.1".to_string(),
            port: 1080,
            username: Some("user".to_string()),
            password: Some("secret".to_string()),
        });
        assert!(build_client(&opts).is_ok());
    }
}
