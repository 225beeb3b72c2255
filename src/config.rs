use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub seed_catalog: Option<PathBuf>,
    pub enforce_capacity: bool,
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` reads the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: try_load(&lookup, "HOST", "127.0.0.1".to_string()),
            port: try_load(&lookup, "PORT", 8000),
            static_dir: lookup("STATIC_DIR")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            seed_catalog: lookup("SEED_CATALOG")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            enforce_capacity: load_flag(&lookup, "ENFORCE_CAPACITY"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Port tried when `port` is taken. None at the top of the range, where
    /// wrapping would hand out an ephemeral port.
    pub fn fallback_port(&self) -> Option<u16> {
        self.port.checked_add(1)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}

fn load_flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return false;
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "" | "0" | "false" | "no" | "off" => false,
        other => {
            warn!("Invalid {key} value {other:?}, using default: false");
            false
        }
    }
}
