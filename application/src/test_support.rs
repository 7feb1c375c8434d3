//! Scripted provider double shared by the use case tests.

use crate::ports::provider_client::{ProviderClient, ProviderError};
use async_trait::async_trait;
use prism_domain::ProviderId;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Replays queued responses and records every call it receives.
pub(crate) struct ScriptedProvider {
    id: ProviderId,
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: ProviderId::new(id).unwrap(),
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn shared(id: &str) -> Arc<Self> {
        Arc::new(Self::new(id))
    }

    pub(crate) fn replying(id: &str, text: &str) -> Arc<Self> {
        let provider = Self::new(id);
        provider.push_ok(text);
        Arc::new(provider)
    }

    pub(crate) fn failing(id: &str) -> Arc<Self> {
        let provider = Self::new(id);
        provider.push_err(ProviderError::Status {
            provider: provider.id.clone(),
            status: 500,
            message: "internal error".to_string(),
        });
        Arc::new(provider)
    }

    pub(crate) fn push_ok(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    pub(crate) fn push_err(&self, err: ProviderError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `(system_instruction, user_prompt)` of every call, in order
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn invoke(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled {
                provider: self.id.clone(),
            });
        }
        self.calls
            .lock()
            .unwrap()
            .push((system_instruction.to_string(), user_prompt.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::Transport {
                    provider: self.id.clone(),
                    message: "no scripted response left".to_string(),
                })
            })
    }
}
