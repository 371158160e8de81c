// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::{env, fmt, path::Path};

use config::{Config, Environment, File};
use log::{debug, info};
use serde::Deserialize;

use crate::{Error, Result};

pub const DEFAULT_HOST: &str = "https://chaos.qernal.com";

pub const DEFAULT_AUTH_HOST: &str = "https://hydra.qernal.com";

/// Env to point at a configuration file when no path is given explicitly.
pub const CONFIG_PATH_ENV: &str = "QERNAL_CONFIG_PATH";

/// Prefix of the envs which override single fields, i.e. `QERNAL_HOST`,
/// `QERNAL_AUTH_HOST` and `QERNAL_TOKEN`.
const ENV_PREFIX: &str = "QERNAL";

#[derive(Clone, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Base url of the Qernal API, without the `/v1` suffix
    pub host: String,

    /// Base url of the OAuth2 server which issues access tokens
    pub auth_host: String,

    /// Qernal token in the form `<client_id>@<client_secret>`
    pub token: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("auth_host", &self.auth_host)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ProviderConfig {
    /// Load the configuration. Values are layered, later ones win:
    /// built-in defaults, then the config file (`config_path`, or the path
    /// in `QERNAL_CONFIG_PATH`), then `QERNAL_*` envs.
    pub fn new(config_path: Option<String>) -> Result<Self> {
        let config_path = config_path.or_else(|| {
            if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
                debug!("Read provider config path from env: {env_path}");
                return Some(env_path);
            }
            None
        });

        let mut builder = Config::builder()
            .set_default("host", DEFAULT_HOST)
            .and_then(|b| b.set_default("auth_host", DEFAULT_AUTH_HOST))
            .and_then(|b| b.set_default("token", ""))
            .map_err(|e| Error::Config(e.to_string()))?;

        match config_path {
            Some(path) => {
                info!("Use configuration file {path}");
                if !Path::new(&path).exists() {
                    return Err(Error::Config(format!("config file {path} not found")));
                }
                builder = builder.add_source(File::with_name(&path));
            }
            None => info!("No config path specified, use defaults and envs."),
        }

        let config: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config(
                "missing or empty value for the Qernal API host. Set `host` in the \
                configuration or use the QERNAL_HOST environment variable"
                    .into(),
            ));
        }

        if self.auth_host.trim().is_empty() {
            return Err(Error::Config(
                "missing or empty value for the Qernal auth host. Set `auth_host` in the \
                configuration or use the QERNAL_AUTH_HOST environment variable"
                    .into(),
            ));
        }

        if self.token.trim().is_empty() {
            return Err(Error::Config(
                "missing or empty value for the Qernal token. Set `token` in the \
                configuration or use the QERNAL_TOKEN environment variable"
                    .into(),
            ));
        }

        Ok(())
    }
}
