use crate::error::UpstreamError;
use serde::de::DeserializeOwned;
use tracing::debug;

const ERROR_BODY_LIMIT: usize = 200;

/// Send a request and decode a successful JSON body into its schema.
/// Non-2xx responses keep a short prefix of the body for the error message.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|source| UpstreamError::Network { service, source })?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Http {
            service,
            status: status.as_u16(),
            body: truncate(text.trim(), ERROR_BODY_LIMIT),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| UpstreamError::Network { service, source })?;

    serde_json::from_str(&body).map_err(|e| {
        debug!("{} payload rejected: {}", service, e);
        UpstreamError::malformed(service, e)
    })
}

/// Credential or fail with a configuration error naming the variable to set
pub(crate) fn require(value: &Option<String>, env_name: &str) -> Result<String, UpstreamError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| UpstreamError::Configuration(format!("{} is not set", env_name)))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
