use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chatflow_model::{
    ErrorKind, PredictionProvider, PredictionProviderError, PredictionRequest,
    PredictionResponse,
};
use tokio::time::timeout;
use tracing::Instrument;

use crate::config::DEFAULT_REQUEST_TIMEOUT;

pub type PredictResult =
    Result<PredictionResponse, Box<dyn PredictionProviderError>>;
type BoxedPredictFuture = Pin<Box<dyn Future<Output = PredictResult> + Send>>;
type HandlerFn = Arc<dyn Fn(PredictionRequest) -> BoxedPredictFuture + Send + Sync>;

/// A wrapper around a prediction provider that bounds every request in
/// time and provides a type-erased interface for the other modules.
#[derive(Clone)]
pub struct PredictionClient {
    handler_fn: HandlerFn,
    timeout: Duration,
}

impl PredictionClient {
    #[inline]
    pub fn new<P: PredictionProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since the controller doesn't have
        // a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| -> BoxedPredictFuture {
            let fut = provider.predict(&req);
            Box::pin(async move {
                trace!("got a request: {req:?}");
                fut.await.map_err(|err| {
                    error!("got an error: {err:?}");
                    Box::new(err) as Box<dyn PredictionProviderError>
                })
            })
        });
        Self {
            handler_fn,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends a request and waits for the answer.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future drops the in-flight
    /// provider request.
    pub async fn predict(&self, req: PredictionRequest) -> PredictResult {
        let fut = (self.handler_fn)(req);
        let limit = self.timeout;
        let resp_or_err = timeout(limit, fut)
            .instrument(trace_span!("prediction client req"))
            .await;
        match resp_or_err {
            Ok(Ok(resp)) => {
                trace!("finished a request");
                Ok(resp)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                error!("request timed out after {limit:?}");
                Err(Box::new(TimeoutError(limit)))
            }
        }
    }
}

/// The request was still in flight when the time limit passed.
#[derive(Debug)]
struct TimeoutError(Duration);

impl Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no answer within {:?}", self.0)
    }
}

impl StdError for TimeoutError {}

impl PredictionProviderError for TimeoutError {
    #[inline]
    fn kind(&self) -> ErrorKind {
        ErrorKind::Timeout
    }
}

#[cfg(test)]
mod tests {
    use chatflow_test_model::{PresetReply, TestPredictionProvider};

    use super::*;

    #[tokio::test]
    async fn test_predict() {
        let provider = TestPredictionProvider::with_script([
            PresetReply::answer("How are you?"),
            PresetReply::answer("Fine."),
        ]);
        let client = PredictionClient::new(provider.clone());

        for expected in ["How are you?", "Fine."] {
            let resp = client
                .predict(PredictionRequest::new("Hi", "chat-1"))
                .await
                .unwrap();
            assert_eq!(resp.text, expected);
        }
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let provider = TestPredictionProvider::with_script([
            PresetReply::Failure(ErrorKind::Transport),
        ]);
        let client = PredictionClient::new(provider);
        let err = client
            .predict(PredictionRequest::new("Hi", "chat-1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let provider = TestPredictionProvider::with_script([PresetReply::Hang]);
        let client =
            PredictionClient::new(provider).with_timeout(Duration::from_secs(5));
        let err = client
            .predict(PredictionRequest::new("Hi", "chat-1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }
}
