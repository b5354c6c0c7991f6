//! Network infrastructure — implements `NetworkProbe` using `spawn_blocking`.

use anyhow::Result;

use crate::application::ports::NetworkProbe;

/// Resolves host names through the system resolver.
pub struct SystemResolver;

impl NetworkProbe for SystemResolver {
    async fn check_dns_resolution(&self, hostname: &str) -> Result<bool> {
        let addr = format!("{hostname}:443");
        let resolved = tokio::task::spawn_blocking(move || {
            use std::net::ToSocketAddrs;
            addr.to_socket_addrs().is_ok_and(|mut it| it.next().is_some())
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?;
        tracing::debug!(%hostname, resolved, "dns lookup");
        Ok(resolved)
    }
}
