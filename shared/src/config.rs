//! Configuration management for Lambda functions.

use std::env;

/// Application configuration loaded from environment variables.
///
/// Defaults match the deployed table names.
#[derive(Debug, Clone)]
pub struct Config {
    /// Product catalog table
    pub product_table: String,
    /// Comparison catalog table
    pub compare_table: String,
    /// Order table
    pub order_table: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            product_table: env::var("PRODUCT_TABLE")
                .unwrap_or_else(|_| "Product-Information".to_string()),
            compare_table: env::var("COMPARE_TABLE")
                .unwrap_or_else(|_| "HP-Product-Info".to_string()),
            order_table: env::var("ORDER_TABLE")
                .unwrap_or_else(|_| "Product-Orders".to_string()),
        }
    }
}
