//! A prediction provider for hosted Flowise chatflows.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use chatflow_model::{
    ErrorKind, PredictionProvider, PredictionProviderError, PredictionRequest,
    PredictionResponse,
};
use mime::Mime;
use reqwest::{Client, header};

pub use config::{FlowiseConfig, FlowiseConfigBuilder};

/// Error type for [`FlowiseProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::Transport
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl PredictionProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Flowise prediction provider.
#[derive(Clone, Debug)]
pub struct FlowiseProvider {
    client: Client,
    config: Arc<FlowiseConfig>,
}

impl FlowiseProvider {
    /// Creates a new `FlowiseProvider` with the given configuration.
    #[inline]
    pub fn new(config: FlowiseConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl PredictionProvider for FlowiseProvider {
    type Error = Error;

    fn predict(
        &self,
        req: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResponse, Self::Error>>
    + Send
    + 'static {
        let body = proto::create_body(req);
        let mut builder = self
            .client
            .post(self.config.endpoint())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&body);
        if let Some(api_key) = &self.config.api_key {
            builder =
                builder.header(header::AUTHORIZATION, format!("Bearer {api_key}"));
        }
        let resp_fut = builder.send();

        async move {
            let resp = resp_fut.await.map_err(Error::from_reqwest)?;

            let status = resp.status();
            if !status.is_success() {
                return Err(Error::new(
                    format!("Unexpected status: {status}"),
                    ErrorKind::Transport,
                ));
            }

            // A missing content type is tolerated, but anything explicitly
            // not JSON (e.g. an HTML page from a proxy) is not an answer.
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            if let Some(content_type) = &content_type {
                let is_json = content_type
                    .parse::<Mime>()
                    .map(|m| {
                        m.subtype() == mime::JSON
                            || m.suffix() == Some(mime::JSON)
                    })
                    .unwrap_or(false);
                if !is_json {
                    return Err(Error::new(
                        format!("Unexpected content type: {content_type}"),
                        ErrorKind::Protocol,
                    ));
                }
            }

            let body = resp.bytes().await.map_err(Error::from_reqwest)?;
            trace!("got prediction body of {} bytes", body.len());
            proto::parse_answer(&body)
                .map_err(|reason| Error::new(reason, ErrorKind::Protocol))
        }
    }
}
