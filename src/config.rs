use crate::qr::ErrorCorrectionLevel;
use crate::upi::{UpiApp, UpiLinkGenerator, DEFAULT_CURRENCY};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub qr_error_correction: ErrorCorrectionLevel,
    pub upi_currency: String,
    pub upi_apps: Vec<UpiApp>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let qr_error_correction = env_map
            .get("QR_ERROR_CORRECTION")
            .map(|s| s.as_str())
            .unwrap_or("M")
            .parse::<ErrorCorrectionLevel>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "QR_ERROR_CORRECTION".to_string(),
                    "must be L, M, Q, or H".to_string(),
                )
            })?;

        let upi_currency = env_map
            .get("UPI_CURRENCY")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        if upi_currency.len() != 3 || !upi_currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::InvalidValue(
                "UPI_CURRENCY".to_string(),
                format!("must be a 3-letter uppercase code, got {}", upi_currency),
            ));
        }

        let upi_apps = parse_upi_apps_from_map(&env_map)?;

        Ok(Config {
            port,
            database_path,
            qr_error_correction,
            upi_currency,
            upi_apps,
        })
    }

    pub fn link_generator(&self) -> UpiLinkGenerator {
        UpiLinkGenerator::new(self.upi_currency.clone(), self.upi_apps.clone())
    }
}

fn parse_upi_apps_from_map(env_map: &HashMap<String, String>) -> Result<Vec<UpiApp>, ConfigError> {
    let Some(apps_str) = env_map.get("UPI_APPS") else {
        return Ok(UpiApp::ALL.to_vec());
    };

    let mut apps = Vec::new();
    for name in apps_str.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let app = name.parse::<UpiApp>().map_err(|e| {
            ConfigError::InvalidValue("UPI_APPS".to_string(), e.to_string())
        })?;
        if !apps.contains(&app) {
            apps.push(app);
        }
    }
    Ok(apps)
}
