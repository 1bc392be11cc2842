use core::fmt::{Debug, Display};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "workshop-registry.toml";
pub const ENV_PREFIX: &str = "WSR_";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub listen_address: String,
    /// Directory uploaded workshop materials are written to.
    pub materials_dir: String,
}

/// Values used for every key that neither the file nor the environment sets.
/// `database_url` has no default, so [`get_config`] fails on an unconfigured
/// deployment.
#[derive(Serialize)]
struct Defaults {
    listen_address: &'static str,
    materials_dir: &'static str,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:3000",
            materials_dir: "materials",
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[must_use]
pub fn figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Defaults::default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(figment().extract()?)
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::{get_config, Config};

    #[test]
    fn defaults_fill_missing_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("WSR_DATABASE_URL", "postgres://localhost/wsr");

            let config = get_config().map_err(|error| error.to_string())?;
            assert_eq!(
                config,
                Config {
                    database_url: "postgres://localhost/wsr".to_owned(),
                    listen_address: "0.0.0.0:3000".to_owned(),
                    materials_dir: "materials".to_owned(),
                }
            );
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "workshop-registry.toml",
                r#"
                    database_url = "postgres://file/wsr"
                    listen_address = "127.0.0.1:8080"
                "#,
            )?;
            jail.set_env("WSR_LISTEN_ADDRESS", "127.0.0.1:9090");

            let config = get_config().map_err(|error| error.to_string())?;
            assert_eq!(config.database_url, "postgres://file/wsr");
            assert_eq!(config.listen_address, "127.0.0.1:9090");
            Ok(())
        });
    }

    #[test]
    fn missing_database_url_is_an_error() {
        Jail::expect_with(|_jail| {
            assert!(get_config().is_err());
            Ok(())
        });
    }
}
