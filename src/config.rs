use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid SUPABASE_URL format. Expected: https://PROJECT.supabase.co, got {0}")]
    InvalidSupabaseUrl(String),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub supabase_url: String,
    pub project_ref: String,
    pub supabase_anon_key: String,
    /// Key used for storage writes; falls back to the anon key.
    pub storage_key: String,
    pub storage_bucket: String,
    /// When set, tokens are verified with this HS256 secret instead of the JWKS.
    pub jwt_secret: Option<String>,
    pub redis_url: Option<String>,
    pub port: u16,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = required("DATABASE_URL")?;
        let supabase_url = required("SUPABASE_URL")?;
        let supabase_url = supabase_url.trim_end_matches('/').to_string();
        let project_ref = project_ref(&supabase_url)?;
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;
        let storage_key =
            optional("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_else(|| supabase_anon_key.clone());

        let port = match optional("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: p,
            })?,
            None => 8080,
        };

        Ok(Self {
            database_url,
            supabase_url,
            project_ref,
            supabase_anon_key,
            storage_key,
            storage_bucket: optional("STORAGE_BUCKET")
                .unwrap_or_else(|| "portfolio-images".to_string()),
            jwt_secret: optional("SUPABASE_JWT_SECRET"),
            redis_url: optional("REDIS_URL"),
            port,
            cache: CacheConfig::from_lookup(&lookup),
        })
    }
}

fn project_ref(supabase_url: &str) -> Result<String, ConfigError> {
    supabase_url
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidSupabaseUrl(supabase_url.to_string()))
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub categories_ttl: Duration,
    pub vendor_list_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            categories_ttl: Duration::from_secs(3600), // 1 hour
            vendor_list_ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl CacheConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            categories_ttl: parse_duration_secs(lookup, "CACHE_TTL_CATEGORIES", defaults.categories_ttl),
            vendor_list_ttl: parse_duration_secs(lookup, "CACHE_TTL_VENDORS", defaults.vendor_list_ttl),
        }
    }
}

fn parse_duration_secs<F>(lookup: &F, env_var: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(env_var)
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
