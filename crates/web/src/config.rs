use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use thiserror::Error;

pub const DEFAULT_SITE_URL: &str = "https://biletaavioni.himatravel.com";
pub const DEFAULT_SITE_NAME: &str = "Hima Travel";
pub const DEFAULT_OG_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1436491865332-7a61a109cc05?auto=format&fit=crop&q=80";

#[derive(Debug, Error)]
#[error("invalid value '{value}' for {name}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapConfig {
    /// Rows per request while reading the whole catalog.
    pub batch_size: usize,
    /// Routes per sitemap shard.
    pub shard_size: usize,
    /// Shards listed in the sitemap index.
    pub shard_count: usize,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            shard_size: 10000,
            shard_count: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Absolute base url without trailing slash.
    pub site_url: String,
    pub site_name: String,
    pub og_image_url: String,
    pub bind_address: SocketAddr,
    pub assets_dir: PathBuf,
    pub sitemap: SitemapConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_owned(),
            site_name: DEFAULT_SITE_NAME.to_owned(),
            og_image_url: DEFAULT_OG_IMAGE_URL.to_owned(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            assets_dir: PathBuf::from("./resources/www/assets"),
            sitemap: SitemapConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from `lookup`, falling back to the defaults for
    /// unset or blank variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            site_url: var("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.site_url),
            site_name: var("SITE_NAME").unwrap_or(defaults.site_name),
            og_image_url: var("OG_IMAGE_URL").unwrap_or(defaults.og_image_url),
            bind_address: parse(&var, "BIND_ADDRESS", defaults.bind_address)?,
            assets_dir: var("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            sitemap: SitemapConfig {
                batch_size: positive(&var, "SITEMAP_BATCH_SIZE", defaults.sitemap.batch_size)?,
                shard_size: positive(&var, "SITEMAP_SHARD_SIZE", defaults.sitemap.shard_size)?,
                shard_count: positive(
                    &var,
                    "SITEMAP_SHARD_COUNT",
                    defaults.sitemap.shard_count,
                )?,
            },
        })
    }
}

fn parse<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { name, value }),
        None => Ok(default),
    }
}

fn positive<F>(var: &F, name: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse(var, name, default)?;
    if value == 0 {
        return Err(ConfigError {
            name,
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<SiteConfig, ConfigError> {
        let vars = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        SiteConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_to_unset_variables() {
        let config = config(&[("SITE_NAME", "  ")]).unwrap();
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert_eq!(config.site_name, DEFAULT_SITE_NAME);
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.sitemap, SitemapConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("SITE_URL", "https://example.com/"),
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("SITEMAP_SHARD_COUNT", "3"),
        ])
        .unwrap();
        assert_eq!(config.site_url, "https://example.com");
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:3000");
        assert_eq!(config.sitemap.shard_count, 3);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let error = config(&[("SITEMAP_BATCH_SIZE", "lots")]).unwrap_err();
        assert_eq!(error.name, "SITEMAP_BATCH_SIZE");
        assert!(config(&[("SITEMAP_SHARD_SIZE", "0")]).is_err());
    }
}
