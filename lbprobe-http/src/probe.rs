//! One observed request against the routable host

use crate::config::{build_client, HttpConfig};
use crate::errors::HttpError;
use crate::identity::IdentityExtractor;
use async_trait::async_trait;
use lbprobe_core::{Observation, ObservationSource, ProbeError, Target};
use lbprobe_resilience::{RetryError, RetryExecutor, RetryPolicy, Retryable};
use reqwest::{header::HOST, Client};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

/// Outcome of a single attempt that did not produce a usable response
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptError {
    TransientStatus(u16),
    UnexpectedStatus(u16),
    Network(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::TransientStatus(status) => write!(f, "transient status {}", status),
            AttemptError::UnexpectedStatus(status) => write!(f, "unexpected status {}", status),
            AttemptError::Network(message) => write!(f, "network error: {}", message),
        }
    }
}

impl Retryable for AttemptError {
    fn is_retryable(&self) -> bool {
        matches!(self, AttemptError::TransientStatus(_))
    }
}

impl AttemptError {
    fn into_probe_error(self, attempts: u32) -> ProbeError {
        match self {
            AttemptError::TransientStatus(last_status) => ProbeError::ExhaustedRetry {
                attempts,
                last_status,
            },
            AttemptError::UnexpectedStatus(status) => {
                ProbeError::UnexpectedStatus { status, attempts }
            }
            AttemptError::Network(message) => ProbeError::Transport(message),
        }
    }
}

fn probe_error_from_retry(error: RetryError<AttemptError>) -> ProbeError {
    let attempts = error.attempts();
    error.into_inner().into_probe_error(attempts)
}

/// Sends GET requests to one target with a fixed `Host` header
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    target: Target,
    executor: RetryExecutor,
    transient_statuses: HashSet<u16>,
    extractor: IdentityExtractor,
}

impl HttpProbe {
    pub fn new(
        target: Target,
        config: &HttpConfig,
        policy: RetryPolicy,
        transient_statuses: impl IntoIterator<Item = u16>,
        extractor: IdentityExtractor,
    ) -> Result<Self, HttpError> {
        Ok(Self::with_client(
            build_client(config)?,
            target,
            policy,
            transient_statuses,
            extractor,
        ))
    }

    /// Reuse an existing client, e.g. one built before the target was known
    pub fn with_client(
        client: Client,
        target: Target,
        policy: RetryPolicy,
        transient_statuses: impl IntoIterator<Item = u16>,
        extractor: IdentityExtractor,
    ) -> Self {
        Self {
            client,
            target,
            executor: RetryExecutor::new(policy),
            transient_statuses: transient_statuses.into_iter().collect(),
            extractor,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn policy(&self) -> &RetryPolicy {
        self.executor.policy()
    }

    /// Perform one logical request and report which replica served it.
    ///
    /// Transient statuses are retried within the policy's budget and never
    /// reach the caller on their own; a request that recovers counts once.
    pub async fn run_one_request(&self) -> Result<Observation, ProbeError> {
        let (status, body) = self
            .executor
            .execute_with_context(|attempt| self.attempt(attempt))
            .await
            .map_err(probe_error_from_retry)?;

        let token = self
            .extractor
            .extract(&body)
            .ok_or_else(|| ProbeError::MalformedResponse {
                status,
                reason: format!(
                    "no replica identity matching `{}` in response body",
                    self.extractor.pattern()
                ),
            })?;

        Observation::new(token).map_err(|e| ProbeError::MalformedResponse {
            status,
            reason: e.to_string(),
        })
    }

    async fn attempt(&self, attempt: u32) -> Result<(u16, String), AttemptError> {
        trace!(attempt, url = %self.target.url, host = %self.target.host, "Sending request");

        let response = self
            .client
            .get(self.target.url.clone())
            .header(HOST, self.target.host.as_str())
            .send()
            .await
            .map_err(|e| AttemptError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if self.transient_statuses.contains(&status) {
            debug!(attempt, status, "Transient status");
            return Err(AttemptError::TransientStatus(status));
        }
        if !response.status().is_success() {
            return Err(AttemptError::UnexpectedStatus(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Network(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl ObservationSource for HttpProbe {
    async fn observe(&self, iteration: u64) -> Result<Observation, ProbeError> {
        let observation = self.run_one_request().await?;
        trace!(iteration, replica = %observation, "Observed");
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HOST_NAME: &str = "load-balance.com";

    fn echo_body(replica: &str) -> String {
        format!("\n\nHostname: {}\n\nPod Information:\n\tnode name: kind\n", replica)
    }

    fn probe_for(server: &MockServer, max_retries: u32) -> HttpProbe {
        let target = Target::parse(&format!("{}/", server.uri()), HOST_NAME).unwrap();
        HttpProbe::new(
            target,
            &HttpConfig::default(),
            RetryPolicy::fixed(max_retries, Duration::from_millis(5)),
            [404, 503],
            IdentityExtractor::from_prefix("http-svc").unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_successful_request_yields_identity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("host", HOST_NAME))
            .respond_with(ResponseTemplate::new(200).set_body_string(echo_body("http-svc-a")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let probe = probe_for(&mock_server, 10);
        let observation = probe.run_one_request().await.unwrap();
        assert_eq!(observation.as_str(), "http-svc-a");
    }

    #[tokio::test]
    async fn test_recovered_transient_statuses_count_once() {
        let mock_server = MockServer::start().await;

        // Two 503s, then the replica answers
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(echo_body("http-svc-b")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let probe = probe_for(&mock_server, 10);
        let observation = probe.observe(0).await.unwrap();
        assert_eq!(observation.as_str(), "http-svc-b");

        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 3);
    }

    #[tokio::test]
    async fn test_eleventh_transient_status_exhausts_budget() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(11)
            .mount(&mock_server)
            .await;

        let probe = probe_for(&mock_server, 10);
        let err = probe.run_one_request().await.unwrap_err();
        assert_eq!(
            err,
            ProbeError::ExhaustedRetry {
                attempts: 11,
                last_status: 503
            }
        );
    }

    #[tokio::test]
    async fn test_unrouted_host_404_is_transient() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(echo_body("http-svc-c")))
            .mount(&mock_server)
            .await;

        let probe = probe_for(&mock_server, 10);
        assert_eq!(probe.run_one_request().await.unwrap().as_str(), "http-svc-c");
    }

    #[tokio::test]
    async fn test_body_without_identity_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("default backend"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let probe = probe_for(&mock_server, 10);
        let err = probe.run_one_request().await.unwrap_err();
        assert!(err.is_malformed());
        assert!(matches!(err, ProbeError::MalformedResponse { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_non_transient_error_status_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let probe = probe_for(&mock_server, 10);
        let err = probe.run_one_request().await.unwrap_err();
        assert_eq!(
            err,
            ProbeError::UnexpectedStatus {
                status: 500,
                attempts: 1
            }
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let target = Target::parse(&format!("http://{}/", addr), HOST_NAME).unwrap();
        let probe = HttpProbe::new(
            target,
            &HttpConfig::default(),
            RetryPolicy::fixed(10, Duration::from_millis(5)),
            [404, 503],
            IdentityExtractor::from_prefix("http-svc").unwrap(),
        )
        .unwrap();

        let err = probe.run_one_request().await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn test_retry_error_mapping() {
        let exhausted = RetryError::MaxAttemptsExceeded {
            attempts: 11,
            last_error: AttemptError::TransientStatus(404),
        };
        assert_eq!(
            probe_error_from_retry(exhausted),
            ProbeError::ExhaustedRetry {
                attempts: 11,
                last_status: 404
            }
        );

        let unexpected = RetryError::NonRetryableError {
            attempts: 3,
            error: AttemptError::UnexpectedStatus(502),
        };
        assert_eq!(
            probe_error_from_retry(unexpected),
            ProbeError::UnexpectedStatus {
                status: 502,
                attempts: 3
            }
        );
    }
}
