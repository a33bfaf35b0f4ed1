use serde::{Deserialize, Serialize};

use super::nullable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSetting {
    pub setting_key: String,
    #[serde(default, deserialize_with = "nullable")]
    pub setting_value: String,
    #[serde(default, deserialize_with = "nullable")]
    pub setting_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl SiteSetting {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
            setting_type: "text".to_string(),
            description: None,
            updated_by: None,
            updated_at: None,
        }
    }
}
