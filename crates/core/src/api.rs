//! HTTP client for the EDD-style license API

use crate::config::ProductConfig;
use crate::error::{LicenseError, LicenseResult};
use crate::types::ActivationResult;
use std::fmt;
use std::time::Duration;

/// Which license endpoint action to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiAction {
    Activate,
    Deactivate,
}

impl ApiAction {
    /// Value of the `edd_action` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            ApiAction::Activate => "activate_license",
            ApiAction::Deactivate => "deactivate_license",
        }
    }
}

impl fmt::Display for ApiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiAction::Activate => write!(f, "activate"),
            ApiAction::Deactivate => write!(f, "deactivate"),
        }
    }
}

/// Remote license endpoint.
///
/// One call per invocation, no retries.
pub trait LicenseApi {
    fn call(&self, action: ApiAction, license: &str, item_name: &str)
        -> LicenseResult<ActivationResult>;
}

impl<T: LicenseApi + ?Sized> LicenseApi for Box<T> {
    fn call(
        &self,
        action: ApiAction,
        license: &str,
        item_name: &str,
    ) -> LicenseResult<ActivationResult> {
        (**self).call(action, license, item_name)
    }
}

/// Query parameters sent with every call. `reqwest` url-encodes them.
pub fn request_params<'a>(
    action: ApiAction,
    license: &'a str,
    item_name: &'a str,
) -> [(&'static str, &'a str); 3] {
    [
        ("edd_action", action.as_param()),
        ("license", license),
        ("item_name", item_name.trim()),
    ]
}

/// Decodes a response body into an `ActivationResult`.
pub fn parse_response(body: &str) -> LicenseResult<ActivationResult> {
    serde_json::from_str(body).map_err(|e| LicenseError::MalformedResponse(e.to_string()))
}

/// Blocking HTTP implementation of `LicenseApi`.
pub struct HttpLicenseApi {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl HttpLicenseApi {
    pub fn new(api_url: &str, timeout: Duration) -> LicenseResult<Self> {
        // Shops behind self-signed or misconfigured certificates must still be reachable.
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("licman/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LicenseError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }

    pub fn from_config(config: &ProductConfig) -> LicenseResult<Self> {
        config.validate()?;
        Self::new(&config.api_url, Duration::from_secs(config.timeout_secs))
    }
}

impl LicenseApi for HttpLicenseApi {
    fn call(
        &self,
        action: ApiAction,
        license: &str,
        item_name: &str,
    ) -> LicenseResult<ActivationResult> {
        tracing::debug!(action = action.as_param(), url = %self.api_url, "calling license API");

        let resp = self
            .client
            .get(&self.api_url)
            .query(&request_params(action, license, item_name))
            .send()
            .map_err(|e| LicenseError::Transport(e.to_string()))?;

        // The endpoint reports failures in the body, so the status code is not checked.
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| LicenseError::Transport(e.to_string()))?;

        tracing::debug!(status = %status, bytes = body.len(), "license API responded");
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_params() {
        assert_eq!(ApiAction::Activate.as_param(), "activate_license");
        assert_eq!(ApiAction::Deactivate.as_param(), "deactivate_license");
    }

    #[test]
    fn request_params_trim_item_name() {
        let params = request_params(ApiAction::Activate, "abc", "  My Plugin ");
        assert_eq!(params[0], ("edd_action", "activate_license"));
        assert_eq!(params[1], ("license", "abc"));
        assert_eq!(params[2], ("item_name", "My Plugin"));
    }

    #[test]
    fn parse_response_rejects_non_objects() {
        assert!(matches!(
            parse_response("<html>oops</html>"),
            Err(LicenseError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response("null"),
            Err(LicenseError::MalformedResponse(_))
        ));
    }

    #[test]
    fn parse_response_lenient_counters() {
        let result = parse_response(
            r#"{"license":"valid","site_count":"2","license_limit":5,"expires":"lifetime","error":false}"#,
        )
        .unwrap();
        assert_eq!(result.site_count, 2);
        assert_eq!(result.license_limit, 5);
        assert_eq!(result.expires.as_deref(), Some("lifetime"));
        assert!(result.error.is_none());
    }
}
