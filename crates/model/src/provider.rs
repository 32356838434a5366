use std::error::Error;

use crate::error::ErrorKind;
use crate::request::PredictionRequest;
use crate::response::PredictionResponse;

/// The error type for a prediction provider.
pub trait PredictionProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a prediction endpoint.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the provider should be prepared for being dropped anytime.
pub trait PredictionProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: PredictionProviderError;

    /// Asks the endpoint for an answer to the request.
    ///
    /// The returned future must not borrow the provider, callers are free
    /// to move it to another task and drop the provider meanwhile.
    fn predict(
        &self,
        req: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResponse, Self::Error>>
    + Send
    + 'static;
}
