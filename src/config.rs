use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use url::Url;

use crate::error::ConfigError;

/// Hub both tools talk to. Not overridable from the command line.
pub const DEFAULT_HUB_URL: &str = "http://homeassistant.local:8123";

/// Name of the credential file inside the home directory.
pub const ENV_FILE_NAME: &str = ".env";

/// Line prefix the token is read from.
pub const TOKEN_KEY_PREFIX: &str = "API_KEY_HA=";

#[derive(Debug, Clone)]
pub struct HomeAssistantConfig {
    pub url: Url,
    pub token: String,
}

impl HomeAssistantConfig {
    pub fn new(url: &str, token: String) -> Result<Self, ConfigError> {
        let mut url = Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        // `Url::join` replaces the last segment unless the base ends in a slash
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { url, token })
    }

    /// Builds the config for the fixed hub using the token from `~/.env`.
    pub fn from_home() -> Result<Self, ConfigError> {
        Self::new(DEFAULT_HUB_URL, load_token()?)
    }

    pub fn api_url(&self, endpoint: &str) -> Result<Url, url::ParseError> {
        self.url.join(endpoint.trim_start_matches('/'))
    }
}

pub fn env_file_path() -> Result<PathBuf, ConfigError> {
    let dirs = BaseDirs::new().ok_or(ConfigError::HomeDirNotFound)?;
    Ok(dirs.home_dir().join(ENV_FILE_NAME))
}

pub fn load_token() -> Result<String, ConfigError> {
    load_token_from(&env_file_path()?)
}

/// Reads the `API_KEY_HA` token from a `KEY=VALUE` file.
///
/// Lines are matched by literal prefix and the first match wins, even when
/// its value turns out to be empty.
pub fn load_token_from(path: &Path) -> Result<String, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::Missing {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let value = contents
        .lines()
        .find_map(|line| line.strip_prefix(TOKEN_KEY_PREFIX))
        .ok_or_else(|| ConfigError::MissingKey {
            path: path.to_path_buf(),
        })?
        .trim();

    if value.is_empty() {
        return Err(ConfigError::EmptyKey {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(path = %path.display(), "loaded hub token");
    Ok(value.to_string())
}
