use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::Url;

use crate::error::Result;

/// How many times a request is retried and how long to wait in between.
///
/// Mirrors the usual urllib3 semantics: `total` counts retries (not
/// attempts), and the n-th consecutive failure sleeps
/// `backoff_factor * 2^(n-1)` seconds, except the first which retries
/// immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub total: u32,
    pub backoff_factor: f64,
    pub status_forcelist: Vec<u16>,
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            total: 3,
            backoff_factor: 10.0,
            // just in case they start rate limiting
            status_forcelist: vec![429],
            backoff_max: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures <= 1 {
            return Duration::ZERO;
        }
        let secs = self.backoff_factor * 2f64.powi(consecutive_failures as i32 - 1);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.backoff_max)
            .min(self.backoff_max)
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            retry: RetryPolicy::default(),
            user_agent: concat!("apod-scraper/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// Server-requested delay, from an integral `Retry-After` header.
    pub retry_after: Option<Duration>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking GET. Implementations own their retry behaviour; callers only
/// see the final response.
pub trait HttpGet {
    fn get(&self, url: &Url) -> Result<HttpResponse>;
}

impl<T: HttpGet + ?Sized> HttpGet for &T {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url)
    }
}

/// Runs `attempt` until it yields a response that should not be retried or
/// the policy's budget is spent. When the budget runs out on a retryable
/// status, that last response is handed back rather than turned into an
/// error.
pub fn send_with_retries<E, F, S>(
    policy: &RetryPolicy,
    mut attempt: F,
    mut sleep: S,
) -> std::result::Result<HttpResponse, E>
where
    E: std::fmt::Display,
    F: FnMut() -> std::result::Result<HttpResponse, E>,
    S: FnMut(Duration),
{
    let mut failures = 0u32;
    loop {
        match attempt() {
            Ok(response) => {
                if !policy.retries_status(response.status) || failures >= policy.total {
                    return Ok(response);
                }
                failures += 1;
                let delay = response
                    .retry_after
                    .unwrap_or_else(|| policy.backoff(failures));
                warn!(
                    "Got status {}, retry {}/{} in {:?}",
                    response.status, failures, policy.total, delay
                );
                sleep(delay);
            }
            Err(err) => {
                if failures >= policy.total {
                    return Err(err);
                }
                failures += 1;
                let delay = policy.backoff(failures);
                warn!(
                    "Request failed ({}), retry {}/{} in {:?}",
                    err, failures, policy.total, delay
                );
                sleep(delay);
            }
        }
    }
}

/// Delay requested by a `Retry-After` header. Only the delta-seconds form
/// is understood; HTTP dates and junk fall back to the policy's backoff.
pub(crate) fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// One reqwest session shared by every request of a run.
pub struct ApodClient {
    client: Client,
    config: ClientConfig,
}

impl ApodClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(ApodClient { client, config })
    }

    fn send_once(&self, url: &Url) -> reqwest::Result<HttpResponse> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send()?;
        let status = response.status().as_u16();
        let retry_after = retry_after(response.headers());
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            body,
            retry_after,
        })
    }
}

impl HttpGet for ApodClient {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = send_with_retries(
            &self.config.retry,
            || self.send_once(url),
            std::thread::sleep,
        )?;
        Ok(response)
    }
}
