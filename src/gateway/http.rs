// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP gateway for the cloud device-control API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ValueError};
use crate::types::PowerState;

use super::{Gateway, duration_millis};

// ============================================================================
// HttpConfig
// ============================================================================

/// Configuration for the cloud control API.
///
/// # Examples
///
/// ```
/// use hotelctl_lib::gateway::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("https://openapi.tuyaus.com")
///     .with_api_key("secret")
///     .with_switch_code("switch_led")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.switch_code(), "switch_led");
/// ```
#[derive(Clone)]
pub struct HttpConfig {
    base_url: String,
    api_key: Option<String>,
    switch_code: String,
    timeout: Duration,
}

impl HttpConfig {
    /// US data-centre endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://openapi.tuyaus.com";
    /// Data point code of the main on/off switch.
    pub const DEFAULT_SWITCH_CODE: &'static str = "switch_1";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Environment variable holding the base URL.
    pub const ENV_BASE_URL: &'static str = "HOTELCTL_API_BASE";
    /// Environment variable holding the API key.
    pub const ENV_API_KEY: &'static str = "HOTELCTL_API_KEY";
    /// Environment variable overriding the switch code.
    pub const ENV_SWITCH_CODE: &'static str = "HOTELCTL_SWITCH_CODE";
    /// Environment variable overriding the timeout, in milliseconds.
    pub const ENV_TIMEOUT_MS: &'static str = "HOTELCTL_TIMEOUT_MS";

    /// Creates a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            switch_code: Self::DEFAULT_SWITCH_CODE.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Reads the configuration from `HOTELCTL_*` environment variables.
    ///
    /// `HOTELCTL_API_KEY` is required. The base URL falls back to
    /// [`DEFAULT_BASE_URL`](Self::DEFAULT_BASE_URL).
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the key is missing or the timeout is not a
    /// number.
    pub fn from_env() -> Result<Self, ValueError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the key is missing or the timeout is not a
    /// number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(Self::ENV_API_KEY).ok_or(ValueError::MissingSetting(Self::ENV_API_KEY))?;
        let base_url = get(Self::ENV_BASE_URL).unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url.trim()).with_api_key(api_key.trim());

        if let Some(code) = get(Self::ENV_SWITCH_CODE) {
            config = config.with_switch_code(code.trim());
        }

        if let Some(raw) = get(Self::ENV_TIMEOUT_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ValueError::InvalidSetting {
                    name: Self::ENV_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
            config = config.with_timeout(Duration::from_millis(millis));
        }

        Ok(config)
    }

    /// Sets the API key sent as a bearer token.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the data point code that switches the device on and off.
    #[must_use]
    pub fn with_switch_code(mut self, code: impl Into<String>) -> Self {
        self.switch_code = code.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the API key if set.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the switch data point code.
    #[must_use]
    pub fn switch_code(&self) -> &str {
        &self.switch_code
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an [`HttpGateway`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL has no `http`/`https` scheme or the HTTP
    /// client cannot be created.
    pub fn into_gateway(self) -> Result<HttpGateway, ProtocolError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpGateway {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            client,
            api_key: self.api_key,
            switch_code: self.switch_code,
            timeout: self.timeout,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redacted(self.api_key.as_deref()))
            .field("switch_code", &self.switch_code)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Masks a secret for `Debug` output.
fn redacted(secret: Option<&str>) -> Option<&'static str> {
    secret.map(|_| "<redacted>")
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
struct CommandRequest<'a> {
    commands: [SwitchCommand<'a>; 1],
}

#[derive(Debug, Serialize)]
struct SwitchCommand<'a> {
    code: &'a str,
    value: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default = "Option::default")]
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct StatusEntry {
    code: String,
    value: serde_json::Value,
}

// ============================================================================
// HttpGateway
// ============================================================================

/// Gateway that talks to the cloud control API over HTTPS.
///
/// - `POST {base}/v1.0/devices/{id}/commands` switches a device
/// - `GET {base}/v1.0/devices/{id}/status` reads its data points
///
/// # Examples
///
/// ```no_run
/// use hotelctl_lib::gateway::{Gateway, HttpConfig};
/// use hotelctl_lib::types::PowerState;
///
/// # async fn example() -> hotelctl_lib::Result<()> {
/// let gateway = HttpConfig::from_env()?.into_gateway()?;
/// gateway.set_power("tuya_005", PowerState::On).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
    api_key: Option<String>,
    switch_code: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn device_url(&self, external_id: &str, action: &str) -> String {
        format!(
            "{}/v1.0/devices/{}/{action}",
            self.base_url,
            urlencoding::encode(external_id)
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProtocolError {
        if err.is_timeout() {
            ProtocolError::Timeout(duration_millis(self.timeout))
        } else {
            ProtocolError::Http(err)
        }
    }

    async fn fetch_status(&self, external_id: &str) -> Result<Vec<StatusEntry>, ProtocolError> {
        let url = self.device_url(external_id, "status");

        tracing::debug!(url = %url, "Reading device status");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body = read_body(response).await?;
        let parsed: ApiResponse<Vec<StatusEntry>> = serde_json::from_str(&body)
            .map_err(|e| ProtocolError::InvalidResponse(e.to_string()))?;

        if !parsed.success {
            return Err(ProtocolError::Rejected(
                parsed.msg.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(parsed.result.unwrap_or_default())
    }
}

/// Checks the HTTP status and returns the body text.
async fn read_body(response: reqwest::Response) -> Result<String, ProtocolError> {
    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(ProtocolError::AuthenticationFailed);
    }

    if !response.status().is_success() {
        return Err(ProtocolError::ConnectionFailed(format!(
            "HTTP {} - {}",
            response.status().as_u16(),
            response.status().canonical_reason().unwrap_or("Unknown")
        )));
    }

    let body = response.text().await.map_err(ProtocolError::Http)?;
    tracing::debug!(body = %body, "Received HTTP response");
    Ok(body)
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("api_key", &redacted(self.api_key.as_deref()))
            .field("switch_code", &self.switch_code)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Gateway for HttpGateway {
    async fn set_power(&self, external_id: &str, state: PowerState) -> Result<(), ProtocolError> {
        let url = self.device_url(external_id, "commands");
        let payload = CommandRequest {
            commands: [SwitchCommand {
                code: &self.switch_code,
                value: state.is_on(),
            }],
        };

        tracing::debug!(url = %url, %state, "Sending power command");

        let response = self
            .authorize(self.client.post(&url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body = read_body(response).await?;
        let parsed: ApiResponse<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| ProtocolError::InvalidResponse(e.to_string()))?;

        if parsed.success {
            Ok(())
        } else {
            Err(ProtocolError::Rejected(
                parsed.msg.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    async fn read_power(&self, external_id: &str) -> Option<PowerState> {
        let entries = match self.fetch_status(external_id).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(external_id, error = %e, "Device status unavailable");
                return None;
            }
        };

        let value = entries
            .iter()
            .find(|entry| entry.code == self.switch_code)
            .and_then(|entry| entry.value.as_bool());

        if value.is_none() {
            tracing::debug!(
                external_id,
                switch_code = %self.switch_code,
                "Switch data point missing from status"
            );
        }

        value.map(PowerState::from)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = HttpConfig::new("https://openapi.tuyaeu.com").with_api_key("s3cr3t-key");

        let config_debug = format!("{config:?}");
        assert!(!config_debug.contains("s3cr3t-key"));
        assert!(config_debug.contains("<redacted>"));

        let gateway_debug = format!("{:?}", config.into_gateway().unwrap());
        assert!(!gateway_debug.contains("s3cr3t-key"));
        assert!(gateway_debug.contains("openapi.tuyaeu.com"));
    }

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::default();
        assert_eq!(config.base_url(), "https://openapi.tuyaus.com");
        assert_eq!(config.switch_code(), "switch_1");
        assert!(config.api_key().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn http_config_builder_chain() {
        let config = HttpConfig::new("https://openapi.tuyaeu.com")
            .with_api_key("key")
            .with_switch_code("switch_led")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url(), "https://openapi.tuyaeu.com");
        assert_eq!(config.api_key(), Some("key"));
        assert_eq!(config.switch_code(), "switch_led");
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn from_lookup_requires_api_key() {
        let result = HttpConfig::from_lookup(lookup(&[]));
        assert_eq!(
            result.unwrap_err(),
            ValueError::MissingSetting("HOTELCTL_API_KEY")
        );
    }

    #[test]
    fn from_lookup_applies_overrides() {
        let config = HttpConfig::from_lookup(lookup(&[
            ("HOTELCTL_API_KEY", "abc"),
            ("HOTELCTL_API_BASE", "http://localhost:8080"),
            ("HOTELCTL_SWITCH_CODE", "switch"),
            ("HOTELCTL_TIMEOUT_MS", "1500"),
        ]))
        .unwrap();

        assert_eq!(config.api_key(), Some("abc"));
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.switch_code(), "switch");
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn from_lookup_rejects_bad_timeout() {
        let result = HttpConfig::from_lookup(lookup(&[
            ("HOTELCTL_API_KEY", "abc"),
            ("HOTELCTL_TIMEOUT_MS", "soon"),
        ]));
        assert!(matches!(
            result.unwrap_err(),
            ValueError::InvalidSetting { name: "HOTELCTL_TIMEOUT_MS", .. }
        ));
    }

    #[test]
    fn into_gateway_rejects_missing_scheme() {
        let result = HttpConfig::new("openapi.tuyaus.com").into_gateway();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn device_url_encodes_external_id() {
        let gateway = HttpConfig::new("https://api.example.com/")
            .into_gateway()
            .unwrap();

        assert_eq!(gateway.base_url(), "https://api.example.com");
        assert_eq!(
            gateway.device_url("tuya 005/a", "commands"),
            "https://api.example.com/v1.0/devices/tuya%20005%2Fa/commands"
        );
    }

    #[test]
    fn command_payload_shape() {
        let payload = CommandRequest {
            commands: [SwitchCommand {
                code: "switch_1",
                value: true,
            }],
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"commands": [{"code": "switch_1", "value": true}]})
        );
    }
}
