//! A model provider for the Gemini `generateContent` API.

#[macro_use]
extern crate tracing;

mod config;
mod io;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use reqwest::{Client, Response, StatusCode, header};
use robodream_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
};

pub use config::{GeminiConfig, GeminiConfigBuilder};
use io::{Chunks, Sse};
use proto::ApiErrorEnvelope;
pub use response::GeminiResponse;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error type for [`GeminiProvider`].
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

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else {
            err.status().map_or(ErrorKind::Other, error_kind_for_status)
        };
        Self::new(format!("{err}"), kind)
    }
}

/// Gemini model provider.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Creates a new `GeminiProvider` that sends requests through
    /// `client`, e.g. one with custom connect timeouts or proxies.
    #[inline]
    pub fn with_client(config: GeminiConfig, client: Client) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for GeminiProvider {
    type Error = Error;
    type Response = GeminiResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(req, &self.config);
        trace!("sending request to {}", self.config.model);
        let resp_fut = self
            .client
            .post(self.config.stream_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "text/event-stream")
            .json(&gemini_req)
            .send();

        async move {
            let resp = resp_fut.await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(error_from_response(resp).await);
            }

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok());
            if !is_event_stream(content_type) {
                return Err(Error::new(
                    format!("unexpected content type: {content_type:?}"),
                    ErrorKind::Other,
                ));
            }

            // Here we got a successful response.
            let chunks = Chunks::from_response(resp);
            let sse = Sse::new(chunks);
            Ok(GeminiResponse::from_sse(sse))
        }
    }
}

fn is_event_stream(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| {
            m.type_() == mime::TEXT && m.subtype() == mime::EVENT_STREAM
        })
        .unwrap_or(false)
}

#[inline]
fn error_kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ErrorKind::Unauthorized
        }
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimitExceeded,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ErrorKind::Timeout
        }
        _ => ErrorKind::Other,
    }
}

async fn error_from_response(resp: Response) -> Error {
    let status = resp.status();
    let kind = error_kind_for_status(status);
    let body = resp.text().await.unwrap_or_default();
    Error::new(error_message(status, &body), kind)
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => format!("{status}: {}", envelope.error.message),
        Err(_) => format!("{status}"),
    }
}
