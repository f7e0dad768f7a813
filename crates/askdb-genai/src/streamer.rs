//! The SQL candidate streamer.

use std::sync::Arc;

use askdb_commons::TableDescription;
use futures::StreamExt;
use log::debug;

use crate::error::Result;
use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::service::{FragmentStream, GenerationConfig, GenerationService};

/// Streams one SQL candidate for a question and its schema context.
pub struct SqlStreamer {
    service: Arc<dyn GenerationService>,
    config: GenerationConfig,
}

impl SqlStreamer {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            service,
            config: GenerationConfig::default(),
        }
    }

    /// Open one model invocation and return its fragment stream.
    ///
    /// Empty fragments are dropped. The caller accumulates the
    /// fragments into the full candidate for validation.
    pub async fn stream(
        &self,
        question: &str,
        context: &[TableDescription],
    ) -> Result<FragmentStream> {
        let prompt = build_prompt(question, context);
        debug!(
            "Opening generation stream ({} table(s) in context)",
            context.len()
        );
        let fragments = self
            .service
            .generate_stream(&prompt, SYSTEM_PROMPT, &self.config)
            .await?;

        let filtered = fragments.filter(|fragment| {
            futures::future::ready(match fragment {
                Ok(text) => !text.is_empty(),
                Err(_) => true,
            })
        });

        Ok(Box::pin(filtered))
    }
}
