use robodream_core::{ChatWidget, ChatWidgetBuilder};
use robodream_gemini_model::GeminiProvider;

use crate::Config;

/// Builds a chat widget that asks Gemini with the RoboDream preamble.
pub fn build_widget(config: &Config) -> ChatWidget {
    let gemini_config = config.gemini_config();
    debug!("building widget with {gemini_config:?}");

    let mut builder =
        ChatWidgetBuilder::with_model_provider(GeminiProvider::new(gemini_config));
    if let Some(timeout) = config.timeout() {
        builder = builder.with_timeout(timeout);
    }
    builder.build()
}
