use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

pub const DEFAULT_INDIWTF_BASE_URL: &str = "https://indiwtf.com/api";

/// Typed configuration, sourced from the environment (and `.env` if present).
#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub telegram_bot_token: String,
    pub indiwtf_token: Option<String>,

    // Remote API
    pub indiwtf_base_url: String,
    pub check_timeout: Duration,
    pub check_pacing: Duration,

    // Schedule
    pub check_interval: Duration,
    pub initial_delay: Duration,

    // Persistence
    pub data_file: PathBuf,

    // Telegram limits
    pub telegram_safe_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_bot_token: String::new(),
            indiwtf_token: None,
            indiwtf_base_url: DEFAULT_INDIWTF_BASE_URL.to_string(),
            check_timeout: Duration::from_secs(10),
            check_pacing: Duration::from_secs(1),
            check_interval: Duration::from_secs(30 * 60),
            initial_delay: Duration::from_secs(10),
            data_file: PathBuf::from("domains.json"),
            telegram_safe_limit: 4000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `load()` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .or_else(|| lookup("TELEGRAM_TOKEN").and_then(non_empty))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let indiwtf_token = lookup("INDIWTF_TOKEN").and_then(non_empty);
        let indiwtf_base_url = lookup("INDIWTF_API_BASE_URL")
            .and_then(non_empty)
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.indiwtf_base_url);

        let secs = |key: &str, default: Duration| {
            parse_u64(lookup(key))
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let check_timeout = secs("CHECK_TIMEOUT_SECS", defaults.check_timeout);
        let check_interval = secs("CHECK_INTERVAL_SECS", defaults.check_interval);
        let initial_delay = secs("INITIAL_DELAY_SECS", defaults.initial_delay);
        let check_pacing = parse_u64(lookup("CHECK_PACING_MS"))
            .map(Duration::from_millis)
            .unwrap_or(defaults.check_pacing);

        if check_interval.is_zero() {
            return Err(Error::Config(
                "CHECK_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let data_file = lookup("DATA_FILE")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let telegram_safe_limit = parse_u64(lookup("TELEGRAM_SAFE_LIMIT"))
            .map(|v| v as usize)
            .unwrap_or(defaults.telegram_safe_limit);

        Ok(Self {
            telegram_bot_token,
            indiwtf_token,
            indiwtf_base_url,
            check_timeout,
            check_pacing,
            check_interval,
            initial_delay,
            data_file,
            telegram_safe_limit,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        out.push((key.to_string(), val.to_string()));
    }
    out
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}
