use std::env;
use std::time::Duration;

use crate::http_client::DEFAULT_TIMEOUT_SECS;
use crate::locale::Locale;
use crate::region::ServerCode;

const DEFAULT_API_BASE: &str = "http://localhost:3000/api";
const MIN_TIMEOUT_SECS: u64 = 2;
const MAX_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub request_timeout: Duration,
    pub locale: Locale,
    pub default_server: ServerCode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            locale: Locale::default(),
            default_server: ServerCode::default(),
        }
    }
}

impl Config {
    /// Reads `MII_*` variables from the process environment. Call after
    /// loading `.env` files.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or unparseable values keep their defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base = get("MII_API_BASE")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base);
        let timeout_secs = get("MII_REQUEST_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        let locale = get("MII_LOCALE")
            .and_then(|val| Locale::from_code(&val))
            .unwrap_or(defaults.locale);
        let default_server = get("MII_DEFAULT_SERVER")
            .and_then(|val| ServerCode::from_code(&val))
            .unwrap_or(defaults.default_server);

        Self {
            api_base,
            request_timeout: Duration::from_secs(timeout_secs),
            locale,
            default_server,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn reads_and_clamps_values() {
        let cfg = config_from(&[
            ("MII_API_BASE", "https://mii.example/api"),
            ("MII_REQUEST_TIMEOUT_SECS", "900"),
            ("MII_LOCALE", "ko-KR"),
            ("MII_DEFAULT_SERVER", "euw"),
        ]);
        assert_eq!(cfg.api_base, "https://mii.example/api");
        assert_eq!(cfg.request_timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
        assert_eq!(cfg.locale, Locale::Ko);
        assert_eq!(cfg.default_server, ServerCode::EUW);
    }

    #[test]
    fn garbage_values_fall_back() {
        let cfg = config_from(&[
            ("MII_REQUEST_TIMEOUT_SECS", "soon"),
            ("MII_LOCALE", "xx"),
            ("MII_DEFAULT_SERVER", "MOON"),
        ]);
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.default_server, ServerCode::NA);
    }
}
