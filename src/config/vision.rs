use crate::utils::error::{MediaError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional TOML configuration for the captioning client, so the API key does
/// not have to live on the command line.
///
/// ```toml
/// [api]
/// endpoint = "https://westus.api.cognitive.microsoft.com/vision/v1.0/describe"
/// key = "${VISION_API_KEY}"
/// max_candidates = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    pub api: ApiSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    pub endpoint: Option<String>,
    pub key: Option<String>,
    pub max_candidates: Option<usize>,
}

impl VisionConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MediaError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MediaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` placeholders with environment values. Unset
    /// variables keep the placeholder text so validation can flag them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.api.endpoint.as_deref()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api.key.as_deref()
    }

    pub fn max_candidates(&self) -> Option<usize> {
        self.api.max_candidates
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoint) = &self.api.endpoint {
            validation::validate_url("api.endpoint", endpoint)?;
        }

        if let Some(key) = &self.api.key {
            validation::validate_non_empty_string("api.key", key)?;
            if key.contains("${") {
                return Err(MediaError::InvalidConfigValueError {
                    field: "api.key".to_string(),
                    value: key.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }

        if let Some(max_candidates) = self.api.max_candidates {
            validation::validate_range("api.max_candidates", max_candidates, 1, 10)?;
        }

        Ok(())
    }
}

impl Validate for VisionConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
