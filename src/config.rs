use std::env;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TABLE_NAME: &str = "Temperatures";
pub const DEFAULT_ID_ATTRIBUTE: &str = "Id";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together")]
    IncompleteCredentials,
}

#[derive(Clone)]
pub struct Config {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub table_name: String,
    pub id_attribute: String,
    pub endpoint_url: Option<String>,
    pub max_attempts: u32,
    pub page_size: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, so tests don't have to touch the process env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id = lookup("AWS_ACCESS_KEY_ID").filter(|v| !v.is_empty());
        let secret_access_key = lookup("AWS_SECRET_ACCESS_KEY").filter(|v| !v.is_empty());
        if access_key_id.is_some() != secret_access_key.is_some() {
            return Err(ConfigError::IncompleteCredentials);
        }

        Ok(Config {
            region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            access_key_id,
            secret_access_key,
            table_name: lookup("TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            id_attribute: lookup("ID_ATTRIBUTE")
                .unwrap_or_else(|| DEFAULT_ID_ATTRIBUTE.to_string()),
            endpoint_url: lookup("DYNAMODB_ENDPOINT_URL"),
            max_attempts: lookup("DYNAMODB_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            page_size: lookup("SCAN_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0),
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(mut self, table_name: Option<String>, region: Option<String>) -> Self {
        if let Some(table_name) = table_name {
            self.table_name = table_name;
        }
        if let Some(region) = region {
            self.region = region;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            region: DEFAULT_REGION.to_string(),
            access_key_id: None,
            secret_access_key: None,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            endpoint_url: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            page_size: None,
        }
    }
}

// Keeps the secret out of log output
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("table_name", &self.table_name)
            .field("id_attribute", &self.id_attribute)
            .field("endpoint_url", &self.endpoint_url)
            .field("max_attempts", &self.max_attempts)
            .field("page_size", &self.page_size)
            .finish()
    }
}
