use crate::error::StoreError;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}

/// Credentials for the spreadsheet backend. Unlike [`Config`], every field
/// here is required and absence is a fatal, named configuration error.
#[derive(Clone)]
pub struct SheetsConfig {
    /// Service-account identity (email) used to sign the auth assertion.
    pub service_account_email: String,
    /// PEM private key. Env files often carry it with literal `\n` escapes,
    /// which are unescaped here.
    pub private_key: String,
    /// Target spreadsheet document id.
    pub spreadsheet_id: String,
}

impl SheetsConfig {
    pub fn from_env() -> Result<Self, StoreError> {
        dotenv().ok();

        let service_account_email = require("GOOGLE_SERVICE_ACCOUNT_EMAIL")?;
        let private_key = require("GOOGLE_PRIVATE_KEY")?.replace("\\n", "\n");
        let spreadsheet_id = require("GOOGLE_SHEET_ID")?;

        Ok(Self {
            service_account_email,
            private_key,
            spreadsheet_id,
        })
    }
}

fn require(name: &str) -> Result<String, StoreError> {
    env::var(name)
        .map_err(|_| StoreError::Config(format!("missing required environment variable {name}")))
}
