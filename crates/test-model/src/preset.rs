use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "message_delta")]
    MessageDelta(String),
}

/// How a preset request should fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    /// The connection never produced a response.
    Network,
    /// The endpoint rejected the credential.
    Unauthorized,
    /// The endpoint is rate limited.
    RateLimited,
    /// The prompt was blocked.
    Moderated,
}

/// The preset response for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the request fails instead of producing `events`.
    pub failure: Option<PresetFailure>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            failure: None,
        }
    }

    /// Creates a `PresetResponse` that replies with `text` in one delta.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self::with_events([PresetEvent::MessageDelta(text.into())])
    }

    /// Creates a `PresetResponse` that completes without any text.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a `PresetResponse` that fails.
    #[inline]
    pub fn failing(failure: PresetFailure) -> Self {
        Self {
            events: vec![],
            failure: Some(failure),
        }
    }
}
