use std::time::Duration;

use anyhow::{Context, Result, ensure};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<(Duration, Client)> = OnceCell::new();

/// Shared blocking client, built on first use with the given timeout. Asking
/// for a different timeout afterwards is an error rather than a silent reuse.
pub fn http_client(timeout: Duration) -> Result<&'static Client> {
    let (built_with, client) = CLIENT.get_or_try_init(|| {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mii_terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")?;
        Ok::<_, anyhow::Error>((timeout, client))
    })?;
    ensure!(
        *built_with == timeout,
        "http client already built with a {}s timeout, {}s requested",
        built_with.as_secs(),
        timeout.as_secs()
    );
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_timeout_is_rejected() {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        assert!(http_client(timeout).is_ok());
        assert!(http_client(timeout).is_ok());
        let err = http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS + 5)).unwrap_err();
        assert!(err.to_string().contains("already built"), "{err}");
    }
}
