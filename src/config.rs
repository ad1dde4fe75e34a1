use std::{env, path::PathBuf};

const DEFAULT_DATA_PATH: &str = "data/trackers.json";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    /// Global cap on insights per tracker summary. `None` keeps each
    /// tracker's own behaviour.
    pub insight_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
            insight_limit: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_path = lookup("APP_DATA_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let port = lookup("PORT")
            .and_then(|port| port.trim().parse().ok())
            .unwrap_or(defaults.port);

        let insight_limit = lookup("INSIGHT_LIMIT")
            .and_then(|limit| limit.trim().parse::<usize>().ok())
            .filter(|limit| *limit > 0);

        Self {
            data_path,
            port,
            insight_limit,
        }
    }
}
