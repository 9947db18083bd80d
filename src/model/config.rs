use serde::{Deserialize, Serialize};

/// Client configuration from sharedo.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub user: UserConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fail with NotFound instead of silently ignoring unknown ids
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_item_title")]
    pub new_item_title: String,
    #[serde(default = "default_subtask_title")]
    pub new_subtask_title: String,
    #[serde(default = "default_nested_subtask_title")]
    pub new_nested_subtask_title: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            strict: false,
            new_item_title: default_item_title(),
            new_subtask_title: default_subtask_title(),
            new_nested_subtask_title: default_nested_subtask_title(),
        }
    }
}

fn default_item_title() -> String {
    "New Item".to_string()
}

fn default_subtask_title() -> String {
    "New Subtask".to_string()
}

fn default_nested_subtask_title() -> String {
    "New Nested Subtask".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// EnvFilter directive used when SHAREDO_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

/// Identity used by the offline CLI in place of a login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            id: default_user_id(),
        }
    }
}

fn default_user_id() -> String {
    "local".to_string()
}
