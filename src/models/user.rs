use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub clerk_id: String,
    pub expo_push_token: Option<String>,
}
