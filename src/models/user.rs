use serde::{Deserialize, Serialize};

use super::nullable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    #[serde(default, deserialize_with = "nullable")]
    pub role: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewUserProfile<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub role: &'a str,
    pub created_at: String,
}
