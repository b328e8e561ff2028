use crate::domain::model::Credentials;
use crate::utils::error::{Result, VsacError};
use crate::utils::validation::{
    validate_endpoint_url, validate_non_empty_string, validate_output_dir,
    validate_required_field, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_TICKET_URL: &str = "https://vsac.nlm.nih.gov/vsac/ws/Ticket";
pub const DEFAULT_RETRIEVE_URL: &str = "https://vsac.nlm.nih.gov/vsac/svs/RetrieveValueSet";
pub const DEFAULT_SERVICE: &str = "http://umlsks.nlm.nih.gov";

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VsacConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub endpoints: EndpointConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_ticket_url")]
    pub ticket_url: String,
    #[serde(default = "default_retrieve_url")]
    pub retrieve_url: String,
    #[serde(default = "default_service")]
    pub service: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ticket_url: default_ticket_url(),
            retrieve_url: default_retrieve_url(),
            service: default_service(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_caching")]
    pub caching: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            caching: default_caching(),
        }
    }
}

fn default_ticket_url() -> String {
    DEFAULT_TICKET_URL.to_string()
}

fn default_retrieve_url() -> String {
    DEFAULT_RETRIEVE_URL.to_string()
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_caching() -> bool {
    true
}

impl VsacConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| VsacError::ConfigError {
            message: format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| VsacError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable; unknown
    /// variables are left in place and rejected by validation.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let username = validate_required_field("auth.username", &self.auth.username)?;
        let password = validate_required_field("auth.password", &self.auth.password)?;
        Ok(Credentials {
            username: username.clone(),
            password: password.clone(),
        })
    }
}

fn reject_unresolved(field: &str, value: &str) -> Result<()> {
    if ENV_VAR.is_match(value) {
        return Err(VsacError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Environment variable is not set".to_string(),
        });
    }
    Ok(())
}

impl Validate for VsacConfig {
    fn validate(&self) -> Result<()> {
        let credentials = self.credentials()?;
        validate_non_empty_string("auth.username", &credentials.username)?;
        validate_non_empty_string("auth.password", &credentials.password)?;
        reject_unresolved("auth.username", &credentials.username)?;
        reject_unresolved("auth.password", &credentials.password)?;

        validate_endpoint_url("endpoints.ticket_url", &self.endpoints.ticket_url)?;
        validate_endpoint_url("endpoints.retrieve_url", &self.endpoints.retrieve_url)?;
        validate_non_empty_string("endpoints.service", &self.endpoints.service)?;

        validate_output_dir("output.path", &self.output.path)?;
        Ok(())
    }
}
