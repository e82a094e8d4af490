use std::time::Duration;

use robodream_model::ModelProvider;

use super::ChatWidget;
use crate::model_client::ModelClient;
use crate::prompt::Preamble;

/// [`ChatWidget`] builder.
pub struct ChatWidgetBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) preamble: Preamble,
}

impl ChatWidgetBuilder {
    /// Creates a new builder with the specified model provider.
    ///
    /// The provider carries the endpoint credential, the widget never
    /// looks it up by itself.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            preamble: Preamble::default(),
        }
    }

    /// Replaces the default RoboDream preamble.
    #[inline]
    pub fn with_preamble(mut self, preamble: Preamble) -> Self {
        self.preamble = preamble;
        self
    }

    /// Sets how long a request may take before it counts as failed.
    /// Defaults to 30 seconds.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.model_client.set_timeout(timeout);
        self
    }

    /// Builds the widget, initially closed.
    #[inline]
    pub fn build(self) -> ChatWidget {
        ChatWidget::from_builder(self)
    }
}
