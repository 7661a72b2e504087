//! Single-shot internet connectivity probe.

use std::time::Duration;

use crate::error::ConnectivityError;

pub const DEFAULT_PROBE_URL: &str = "https://www.google.com";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Decides whether the host is online. No retries.
pub trait ConnectivityProbe {
    fn check(&self) -> Result<(), ConnectivityError>;

    fn is_online(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "no internet connection");
                false
            }
        }
    }
}

/// One HTTP GET against a fixed URL; only a 2xx answer counts as online.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_URL, DEFAULT_PROBE_TIMEOUT)
    }
}

impl ConnectivityProbe for HttpProbe {
    fn check(&self) -> Result<(), ConnectivityError> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        tracing::debug!(url = %self.url, timeout = ?self.timeout, "probing connectivity");

        match agent.get(&self.url).call() {
            Ok(response) if (200..300).contains(&response.status()) => Ok(()),
            Ok(response) => Err(ConnectivityError::Status {
                url: self.url.clone(),
                status: response.status(),
            }),
            Err(ureq::Error::Status(status, _)) => Err(ConnectivityError::Status {
                url: self.url.clone(),
                status,
            }),
            Err(ureq::Error::Transport(transport)) => Err(ConnectivityError::Transport {
                url: self.url.clone(),
                message: transport.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probe_settings() {
        let probe = HttpProbe::default();
        assert_eq!(probe.url(), "https://www.google.com");
        assert_eq!(probe.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn malformed_url_is_offline() {
        let probe = HttpProbe::new("not a url", Duration::from_millis(200));
        assert!(matches!(
            probe.check(),
            Err(ConnectivityError::Transport { .. })
        ));
        assert!(!probe.is_online());
    }
}
