//! The interception hook
//!
//! [`Recorder`] is the single choke point all outbound requests go through.
//! It snapshots the request, delegates to the transport unmodified, appends
//! one traffic record per completion, and forwards the original outcome to
//! the caller untouched.

use crate::intercept::correlator::{CaptureInFlight, Completion};
use crate::intercept::transport::{ReqwestTransport, RequestParts, Transport, TransportError, TransportResponse};
use crate::storage::TrafficStore;
use std::sync::Arc;

/// Transparent traffic recorder over an arbitrary transport.
///
/// Construct one recorder at the composition root and route every HTTP call
/// through [`Recorder::execute`]; call sites need no knowledge of logging.
/// The store is supplied explicitly so the same instance can be handed to
/// the query facade.
pub struct Recorder<T: Transport> {
    transport: T,
    store: Arc<TrafficStore>,
}

impl Recorder<ReqwestTransport> {
    /// Recorder over a freshly built reqwest client
    pub fn over_reqwest(store: Arc<TrafficStore>) -> anyhow::Result<Self> {
        Ok(Self::new(ReqwestTransport::new()?, store))
    }
}

impl<T: Transport> Recorder<T> {
    pub fn new(transport: T, store: Arc<TrafficStore>) -> Self {
        Self { transport, store }
    }

    /// The store this recorder appends to
    pub fn store(&self) -> &Arc<TrafficStore> {
        &self.store
    }

    /// Execute a request through the real transport, recording exactly one
    /// traffic record for its completion.
    ///
    /// The response or error returned here is byte-for-byte what the
    /// transport produced. If the returned future is dropped before the
    /// transport completes, the capture is still finalized once, as an error
    /// completion, so no in-flight record leaks.
    pub async fn execute(
        &self,
        parts: RequestParts,
    ) -> Result<TransportResponse, TransportError> {
        tracing::debug!(method = %parts.method, url = %parts.url, "request start");

        let mut guard = FinalizeGuard {
            pending: Some(CaptureInFlight::begin(&parts)),
            store: Arc::clone(&self.store),
        };

        let outcome = self.transport.send(parts).await;

        match &outcome {
            Ok(response) => {
                tracing::debug!(status = response.status, "response received");
                guard.complete(Completion::Response {
                    status: response.status,
                    headers: response.headers.clone(),
                    body: response.body.clone(),
                });
            }
            Err(error) => {
                tracing::debug!(%error, "request failed");
                guard.complete(Completion::Error(error.to_string()));
            }
        }

        outcome
    }
}

/// Single-fire finalization: `complete` and `Drop` race for the one pending
/// capture via `Option::take`, so a record is appended exactly once whether
/// the request resolves, errors, or is canceled mid-flight.
struct FinalizeGuard {
    pending: Option<CaptureInFlight>,
    store: Arc<TrafficStore>,
}

impl FinalizeGuard {
    fn complete(&mut self, completion: Completion) {
        if let Some(capture) = self.pending.take() {
            self.store.append(capture.finish(completion));
        }
    }
}

impl Drop for FinalizeGuard {
    fn drop(&mut self) {
        if let Some(capture) = self.pending.take() {
            tracing::debug!("request canceled before completion");
            self.store
                .append(capture.finish(Completion::Error(
                    "request canceled before completion".to_string(),
                )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::future::Future;
    use std::time::Duration;

    /// Transport that resolves according to the request path
    struct ScriptedTransport;

    impl Transport for ScriptedTransport {
        fn send(
            &self,
            parts: RequestParts,
        ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
            async move {
                if parts.url.ends_with("/hang") {
                    // Never resolves; used to exercise cancellation
                    futures::future::pending::<()>().await;
                }
                if parts.url.ends_with("/down") {
                    return Err(TransportError::Network("connection refused".to_string()));
                }
                Ok(TransportResponse {
                    status: 200,
                    headers: HashMap::from([(
                        "content-type".to_string(),
                        "text/plain".to_string(),
                    )]),
                    body: Bytes::from_static(b"ok"),
                })
            }
        }
    }

    fn recorder(capacity: usize) -> Recorder<ScriptedTransport> {
        Recorder::new(ScriptedTransport, Arc::new(TrafficStore::new(capacity)))
    }

    #[tokio::test]
    async fn success_is_forwarded_and_recorded() {
        let recorder = recorder(10);
        let response = recorder
            .execute(RequestParts::new(HttpMethod::Get, "https://svc.test/ok"))
            .await
            .expect("request succeeds");

        assert_eq!(response.status, 200);
        assert_eq!(response.body.as_ref(), b"ok");

        let records = recorder.store().all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status_code, Some(200));
        assert_eq!(records[0].response_body.as_deref(), Some("ok"));
        assert_eq!(records[0].error, None);
    }

    #[tokio::test]
    async fn transport_error_is_forwarded_and_recorded() {
        let recorder = recorder(10);
        let err = recorder
            .execute(RequestParts::new(HttpMethod::Get, "https://svc.test/down"))
            .await
            .expect_err("request fails");
        assert!(matches!(err, TransportError::Network(_)));

        let records = recorder.store().all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status_code, None);
        assert_eq!(records[0].error.as_deref(), Some("network error: connection refused"));
    }

    #[tokio::test]
    async fn dropped_request_finalizes_exactly_once() {
        let recorder = recorder(10);
        let result = tokio::time::timeout(
            Duration::from_millis(20),
            recorder.execute(RequestParts::new(HttpMethod::Get, "https://svc.test/hang")),
        )
        .await;
        assert!(result.is_err(), "request must still be pending at timeout");

        let records = recorder.store().all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status_code, None);
        assert_eq!(
            records[0].error.as_deref(),
            Some("request canceled before completion")
        );
    }
}
