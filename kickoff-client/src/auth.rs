//! Authorization and default request headers
//!
//! Headers are assembled once when the client is built. Caller-supplied
//! headers are merged flat on top of the defaults: a caller header replaces
//! the default with the same name, every other default is kept.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};

use crate::error::{ClientError, Result};

/// Credentials used to authenticate against the CI server
#[derive(Clone, Default)]
pub enum Credentials {
    /// Send no Authorization header (anonymous access, or the caller supplies one)
    #[default]
    None,
    /// Basic auth derived from a user name and API token
    Basic { username: String, token: String },
}

impl Credentials {
    pub fn basic(username: impl Into<String>, token: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Value for the Authorization header, if these credentials produce one
    pub fn authorization(&self) -> Option<String> {
        match self {
            Credentials::None => None,
            Credentials::Basic { username, token } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", username, token))
            )),
        }
    }
}

// Keeps the token out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::None => f.write_str("None"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Splits a `Name: value` line into its parts
pub fn parse_header_line(line: &str) -> Result<(String, String)> {
    let (name, value) = line.split_once(':').ok_or_else(|| {
        ClientError::InvalidRequest(format!("header '{}' is not in 'Name: value' form", line))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "header '{}' has an empty name",
            line
        )));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

/// Builds the header set sent with every request
///
/// # Arguments
/// * `credentials` - Source of the default Authorization header
/// * `extra` - Caller headers, applied last so they override defaults key by key
pub fn build_headers(credentials: &Credentials, extra: &[(String, String)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(auth) = credentials.authorization() {
        let mut value = HeaderValue::from_str(&auth).map_err(|_| {
            ClientError::InvalidRequest("credentials contain invalid characters".to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::InvalidRequest(format!("header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ClientError::InvalidRequest(format!("header '{}' value: {}", name, e)))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}
