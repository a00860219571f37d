use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub expo: ExpoConfig,
    pub check_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpoConfig {
    pub push_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "mem://".to_string()),
                username: env::var("DATABASE_USER")
                    .unwrap_or_else(|_| "root".to_string()),
                password: env::var("DATABASE_PASS")
                    .unwrap_or_else(|_| "root".to_string()),
                namespace: env::var("DATABASE_NAMESPACE")
                    .unwrap_or_else(|_| "ridehail".to_string()),
                database: env::var("DATABASE_NAME")
                    .unwrap_or_else(|_| "main".to_string()),
            },

            expo: ExpoConfig {
                push_url: env::var("EXPO_PUSH_URL")
                    .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".to_string()),
            },

            check_interval_secs: env::var("CHECK_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
        }
    }
}
