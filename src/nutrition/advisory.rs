// ABOUTME: Advisory client sending one bounded request per target calculation
// ABOUTME: Wraps an injected LlmProvider and maps every failure to AdvisoryUnavailable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use super::prompts::{build_target_prompt, SYSTEM_PROMPT};
use super::{TargetError, TargetInputs};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// Sampling temperature for target requests
const ADVISORY_TEMPERATURE: f32 = 0.2;

/// Client for the external advisory (AI) service
///
/// Makes exactly one call per request with a single timeout. Retries belong to
/// the caller-side sync layer, not here.
#[derive(Clone)]
pub struct AdvisoryClient {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl AdvisoryClient {
    /// Create a client over a provider with a finite timeout
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Timeout bounding each call
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Request targets for the given inputs, returning the raw answer text
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::AdvisoryUnavailable`] on transport failure,
    /// non-success status, or timeout.
    #[instrument(skip_all, fields(provider = self.provider.name()))]
    pub async fn request_targets(&self, inputs: &TargetInputs) -> Result<String, TargetError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_target_prompt(inputs)),
        ])
        .with_temperature(ADVISORY_TEMPERATURE);

        let response = tokio::time::timeout(self.timeout, self.provider.complete(&request))
            .await
            .map_err(|_| {
                TargetError::AdvisoryUnavailable(format!(
                    "no answer within {}s",
                    self.timeout.as_secs_f64()
                ))
            })?
            .map_err(|e| TargetError::AdvisoryUnavailable(e.to_string()))?;

        debug!(
            model = %response.model,
            chars = response.content.len(),
            "Advisory answer received"
        );
        Ok(response.content)
    }
}

impl fmt::Debug for AdvisoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryClient")
            .field("provider", &self.provider.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
