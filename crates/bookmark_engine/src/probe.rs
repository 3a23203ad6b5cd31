use std::time::{Duration, Instant};

use audit_logging::audit_debug;
use reqwest::{Method, StatusCode};

use crate::{EngineError, ProbeOutcome};

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub connect_timeout: Duration,
    pub redirect_limit: usize,
    pub user_agent: String,
    /// Retry with GET when a server refuses HEAD (405/501).
    pub get_fallback: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            redirect_limit: 10,
            user_agent: concat!("bookmark-audit/", env!("CARGO_PKG_VERSION")).to_string(),
            get_fallback: true,
        }
    }
}

/// Checks whether a URL answers.
///
/// Implementations never fail: every problem is folded into a
/// [`ProbeOutcome`].
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestProber {
    client: reqwest::Client,
    settings: ProbeSettings,
}

impl ReqwestProber {
    pub fn new(settings: ProbeSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client, settings })
    }

    async fn send(
        &self,
        method: Method,
        url: reqwest::Url,
        timeout: Duration,
    ) -> Result<StatusCode, reqwest::Error> {
        let response = self
            .client
            .request(method, url)
            .timeout(timeout)
            .send()
            .await?;
        Ok(response.status())
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let parsed = match reqwest::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => return ProbeOutcome::MalformedInput(format!("invalid url: {err}")),
        };

        // HEAD and the GET fallback share one budget.
        let deadline = Instant::now() + timeout;
        let status = match self.send(Method::HEAD, parsed.clone(), timeout).await {
            Ok(status) if self.settings.get_fallback && head_refused(status) => {
                audit_debug!("HEAD refused with {} for {}, retrying with GET", status, url);
                let remaining = deadline.saturating_duration_since(Instant::now());
                self.send(Method::GET, parsed, remaining).await
            }
            other => other,
        };

        match status {
            Ok(status) => ProbeOutcome::from_status(status.as_u16()),
            Err(err) => classify_error(err),
        }
    }
}

fn head_refused(status: StatusCode) -> bool {
    status == StatusCode::METHOD_NOT_ALLOWED || status == StatusCode::NOT_IMPLEMENTED
}

fn classify_error(err: reqwest::Error) -> ProbeOutcome {
    if err.is_builder() {
        // Bucket keys must not embed the URL, or every bookmark gets its own.
        return ProbeOutcome::MalformedInput(describe(&err.without_url()));
    }
    if err.is_timeout() || err.is_connect() || err.is_request() {
        return ProbeOutcome::NoResponse;
    }
    ProbeOutcome::Unknown(describe(&err))
}

fn describe(err: &reqwest::Error) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
