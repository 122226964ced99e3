//! Configuration module
//!
//! Everything the CLI needs is read once (flags, with environment fallbacks)
//! into these structs, validated, and then passed down by reference.

use std::time::Duration;

use anyhow::{Context, Result};
use kickoff_client::auth::parse_header_line;
use kickoff_client::{CiClient, ClientOptions, Credentials};
use kickoff_core::domain::parameters::JobParameters;

/// Connection settings shared by every command
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the CI server
    pub url: String,

    /// Credentials for the default Authorization header
    pub credentials: Credentials,

    /// Caller headers, merged over the defaults key by key
    pub headers: Vec<(String, String)>,

    /// Skip TLS certificate validation
    pub insecure: bool,
}

impl Config {
    /// Builds the configuration from raw CLI values
    ///
    /// # Arguments
    /// * `url` - CI server base URL
    /// * `user` / `api_token` - Must be given together to produce Basic auth
    /// * `header_lines` - `Name: value` strings
    /// * `insecure` - Disable certificate validation
    pub fn new(
        url: String,
        user: Option<String>,
        api_token: Option<String>,
        header_lines: &[String],
        insecure: bool,
    ) -> Result<Self> {
        let credentials = match (user, api_token) {
            (Some(user), Some(token)) => Credentials::basic(user, token),
            (None, None) => Credentials::None,
            (Some(_), None) => anyhow::bail!("--user requires --api-token"),
            (None, Some(_)) => anyhow::bail!("--api-token requires --user"),
        };

        let headers = header_lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| parse_header_line(line))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --header value")?;

        Ok(Self {
            url,
            credentials,
            headers,
            insecure,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            anyhow::bail!("url cannot be empty (set --url or KICKOFF_URL)");
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            anyhow::bail!("url must start with http:// or https://");
        }

        Ok(())
    }

    /// Creates the CI client described by this configuration
    pub fn client(&self) -> Result<CiClient> {
        let options = ClientOptions {
            credentials: self.credentials.clone(),
            headers: self.headers.clone(),
            accept_invalid_certs: self.insecure,
        };

        CiClient::from_options(&self.url, &options).context("Failed to create CI client")
    }
}

/// Settings of one trigger run
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Job to trigger, `/`-separated inside folders
    pub job_name: String,

    /// Build parameters; empty selects the parameterless endpoint
    pub parameters: JobParameters,

    /// Block until the build reaches a terminal state
    pub wait: bool,

    /// Ceiling for the whole operation, trigger included
    pub timeout: Duration,

    /// Pause between status requests
    pub poll_interval: Duration,
}

impl TriggerConfig {
    /// Builds trigger settings from raw CLI values
    ///
    /// `parameters` is a JSON object; absent or blank means no parameters.
    pub fn new(
        job_name: String,
        parameters: Option<&str>,
        wait: bool,
        timeout_secs: u64,
        poll_interval_secs: u64,
    ) -> Result<Self> {
        let parameters = match parameters.map(str::trim) {
            Some(json) if !json.is_empty() => {
                JobParameters::from_json(json).context("Invalid --parameters value")?
            }
            _ => JobParameters::new(),
        };

        Ok(Self {
            job_name,
            parameters,
            wait,
            timeout: Duration::from_secs(timeout_secs),
            poll_interval: Duration::from_secs(poll_interval_secs),
        })
    }

    /// Validates the trigger settings
    pub fn validate(&self) -> Result<()> {
        if self.job_name.trim_matches('/').is_empty() {
            anyhow::bail!("job name cannot be empty");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}
