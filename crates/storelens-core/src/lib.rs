pub mod app_config;
pub mod config;
pub mod insights;

pub use app_config::{AppConfig, Environment, LlmConfig};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_without_database};
pub use insights::{BrandInsights, ContactInfo, Faq, Product, SocialHandle, MAX_CATALOG_PRODUCTS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
