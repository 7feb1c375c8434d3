//! Request plumbing shared by both provider families.

use prism_application::ProviderError;
use prism_domain::ProviderId;
use reqwest::RequestBuilder;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Send a JSON request and return the decoded success body.
///
/// Non-2xx statuses become [`ProviderError::Status`]; a success body that
/// is not JSON becomes [`ProviderError::MalformedResponse`].
pub(crate) async fn send_json(
    provider: &ProviderId,
    request: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<Value, ProviderError> {
    let exchange = async {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(provider, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(provider, e))?;
        debug!("{} responded {} ({} bytes)", provider, status, body.len());

        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: provider.clone(),
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|_| ProviderError::MalformedResponse {
            provider: provider.clone(),
        })
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ProviderError::Cancelled {
            provider: provider.clone(),
        }),
        result = exchange => result,
    }
}

fn transport_error(provider: &ProviderId, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider: provider.clone(),
        }
    } else {
        ProviderError::Transport {
            provider: provider.clone(),
            message: err.to_string(),
        }
    }
}

/// `error.message` of a JSON error body, else the raw body
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
