use anyhow::{anyhow, Result};
use std::env;

/// Connection settings for the S3-compatible object store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Base URL under which uploaded objects are publicly reachable
    pub public_base: String,
    pub region: String,
}

impl StoreConfig {
    /// Load store settings from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: required("R2_ENDPOINT")?,
            access_key: required("R2_ACCESS_KEY")?,
            secret_key: required("R2_SECRET_KEY")?,
            bucket: required("R2_BUCKET")?,
            public_base: required("R2_PUBLIC_URL")?,
            region: env::var("R2_REGION").unwrap_or_else(|_| "auto".to_string()),
        })
    }
}

/// Connection settings for the episode record store
#[derive(Debug, Clone)]
pub struct RecordsConfig {
    pub url: String,
    pub service_key: String,
    pub table: String,
}

impl RecordsConfig {
    /// Load record store settings from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: required("SUPABASE_URL")?,
            service_key: required("SUPABASE_SERVICE_KEY")?,
            table: env::var("RECORDS_TABLE").unwrap_or_else(|_| "episodes".to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    let value = env::var(name).map_err(|_| anyhow!("{name} is not set"))?;
    if value.is_empty() {
        return Err(anyhow!("{name} is empty"));
    }
    Ok(value)
}
