use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ORIGIN, REFERER, USER_AGENT};

use crate::error::ApiError;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client; the timeout of the first caller wins.
pub fn http_client(timeout: Duration) -> Result<&'static Client, ApiError> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Api(format!("failed to build http client: {e}")))
    })
}

/// A failed attempt, before retry classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl FetchFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// A 429 reply, or a status-less failure that names a rate limit. Bodies
    /// of other error replies are never inspected.
    pub fn is_rate_limit(&self) -> bool {
        match self.status {
            Some(code) => code == 429,
            None => {
                let text = self.message.to_lowercase();
                text.contains("rate limit") || text.contains("too many requests")
            }
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(code) => write!(f, "http {code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Fetches the JSON body of one stats endpoint call.
pub trait StatsTransport {
    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, FetchFailure>;
}

pub struct HttpTransport {
    client: &'static Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl StatsTransport for HttpTransport {
    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, FetchFailure> {
        let url = format!("{}/{endpoint}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(params)
            .header(USER_AGENT, "Mozilla/5.0")
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(REFERER, "https://www.nba.com/")
            .header(ORIGIN, "https://www.nba.com")
            .header("x-nba-stats-origin", "stats")
            .header("x-nba-stats-token", "true")
            .send()
            .map_err(|e| FetchFailure::network(format!("request failed: {e}")))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| FetchFailure::network(format!("failed reading body: {e}")))?;
        if !status.is_success() {
            return Err(FetchFailure::status(status.as_u16(), body));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::FetchFailure;

    #[test]
    fn only_429_or_named_limits_are_rate_limits() {
        assert!(FetchFailure::status(429, "").is_rate_limit());
        assert!(FetchFailure::network("Rate limit exceeded").is_rate_limit());
        assert!(!FetchFailure::status(503, "Page generated by edge proxy").is_rate_limit());
        assert!(!FetchFailure::status(500, "rate limit backend down").is_rate_limit());
        assert!(!FetchFailure::network("failed to separate headers").is_rate_limit());
    }
}
