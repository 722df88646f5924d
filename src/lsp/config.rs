//! Options the client passes as `initializationOptions`.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Language ids whose documents get indexed.
    pub language_ids: Vec<String>,
    /// Forward log events to the client as `window/logMessage`.
    pub log_to_client: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            language_ids: vec!["abnf".to_string()],
            log_to_client: false,
        }
    }
}

impl ServerConfig {
    /// Read the options, falling back to defaults when they are absent or malformed.
    pub fn from_initialization_options(options: Option<serde_json::Value>) -> Self {
        match options {
            None | Some(serde_json::Value::Null) => Self::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|error| {
                tracing::warn!(%error, "Ignoring malformed initializationOptions");
                Self::default()
            }),
        }
    }

    pub fn accepts(&self, language_id: &str) -> bool {
        self.language_ids.iter().any(|id| id == language_id)
    }
}
