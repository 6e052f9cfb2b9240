pub mod app_config;
pub mod catalog;
pub mod config;
pub mod pricing;
pub mod products;
pub mod query;
pub mod retailers;
pub mod slug;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, SiteConfig};
pub use catalog::{CatalogFilter, SortKey};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::PriceInsight;
pub use products::{
    CategoryEntry, ContactMessage, Paginated, Product, RetailerRecord, ShopRequest,
};
pub use query::{ListQuery, ProductQuery};
pub use retailers::{RetailerDirectory, RetailerInfo, RetailerLookup};
pub use slug::slugify;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read retailers file {path}: {source}")]
    RetailersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse retailers file: {0}")]
    RetailersFileParse(#[from] serde_yaml::Error),

    #[error("retailers file validation failed: {0}")]
    Validation(String),
}
