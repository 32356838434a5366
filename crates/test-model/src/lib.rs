//! A local fake prediction endpoint for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::pending;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chatflow_model::{
    ErrorKind, PredictionProvider, PredictionProviderError, PredictionRequest,
    PredictionResponse,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl PredictionProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Shared {
    next_step: AtomicUsize,
    requests: Mutex<Vec<PredictionRequest>>,
}

/// A local fake prediction endpoint for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// endpoint should settle each call. Calls consume the script in order; if
/// there are no enough steps in the script, a protocol error is returned.
///
/// Clones share the script cursor and the request log, so a test can keep
/// one clone for inspection after handing the other to the code under
/// test.
#[derive(Clone, Default)]
pub struct TestPredictionProvider {
    script: Vec<PresetReply>,
    delay: Option<Duration>,
    shared: Arc<Shared>,
}

impl TestPredictionProvider {
    /// Creates a provider with the given script.
    #[inline]
    pub fn with_script(script: impl Into<Vec<PresetReply>>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn add_reply(&mut self, reply: PresetReply) {
        self.script.push(reply);
    }

    /// Makes every call wait for `duration` before settling.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far, in order.
    pub fn requests(&self) -> Vec<PredictionRequest> {
        self.shared
            .requests
            .lock()
            .map(|reqs| reqs.clone())
            .unwrap_or_default()
    }

    /// Returns the number of calls received so far.
    #[inline]
    pub fn call_count(&self) -> usize {
        self.shared.next_step.load(Ordering::SeqCst)
    }
}

impl PredictionProvider for TestPredictionProvider {
    type Error = crate::Error;

    fn predict(
        &self,
        req: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResponse, Self::Error>>
    + Send
    + 'static {
        if let Ok(mut reqs) = self.shared.requests.lock() {
            reqs.push(req.clone());
        }
        let step_idx = self.shared.next_step.fetch_add(1, Ordering::SeqCst);
        let reply = self.script.get(step_idx).cloned();
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            match reply {
                Some(PresetReply::Answer(text)) => {
                    Ok(PredictionResponse { text })
                }
                Some(PresetReply::Failure(kind)) => Err(Error {
                    message: "scripted failure",
                    kind,
                }),
                Some(PresetReply::Hang) => pending().await,
                None => Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::Protocol,
                }),
            }
        }
    }
}
