use std::net::SocketAddr;

use site_common::completion::CompletionClientConfig;
use site_common::leaderboard_store::StoreConfig;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Application configuration loaded explicitly from environment variables.
///
/// The source list and the verified handles are not configured here; they are
/// compiled in as [`crate::sources::SourceCatalog::gensyn`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,
    /// Hosted completion endpoint, credential and model parameters.
    pub completion: CompletionClientConfig,
    /// Hosted leaderboard store. `None` leaves the leaderboard routes failing with 500.
    pub store: Option<StoreConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `FIREWORKS_API_KEY`
    ///
    /// Optional:
    /// - `BIND_ADDR` (default `0.0.0.0:3000`)
    /// - `COMPLETION_BASE_URL`, `COMPLETION_MODEL`, `COMPLETION_MAX_ERROR_BODY_BYTES`
    /// - `SUPABASE_URL` + `SUPABASE_ANON_KEY`
    pub fn from_env() -> Result<Self, AppError> {
        let raw_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|e| {
            AppError::Config(format!("BIND_ADDR {raw_addr:?} is not a socket address: {e}"))
        })?;

        let completion = CompletionClientConfig::from_env()?;
        let store = StoreConfig::from_env();

        Ok(Self {
            bind_addr,
            completion,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_common::error::CommonError;

    const VARS: [&str; 7] = [
        "BIND_ADDR",
        "FIREWORKS_API_KEY",
        "COMPLETION_BASE_URL",
        "COMPLETION_MODEL",
        "COMPLETION_MAX_ERROR_BODY_BYTES",
        "SUPABASE_URL",
        "SUPABASE_ANON_KEY",
    ];

    /// Run `f` with exactly `set` present among the variables `Config` reads.
    fn with_env<R>(set: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let vars: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .map(|name| {
                let value = set.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
                (*name, value)
            })
            .collect();
        temp_env::with_vars(vars, f)
    }

    #[test]
    fn defaults_with_only_api_key() {
        let config = with_env(&[("FIREWORKS_API_KEY", "fw-key")], Config::from_env).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.completion.api_key, "fw-key");
        assert_eq!(
            config.completion.base_url,
            site_common::completion::DEFAULT_BASE_URL
        );
        assert!(config.store.is_none());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        for key in [None, Some(""), Some("   ")] {
            let set: Vec<(&str, &str)> = key
                .map(|k| ("FIREWORKS_API_KEY", k))
                .into_iter()
                .collect();
            let err = with_env(&set, Config::from_env).unwrap_err();
            assert!(matches!(
                err,
                AppError::Common(CommonError::MissingEnv("FIREWORKS_API_KEY"))
            ));
        }
    }

    #[test]
    fn store_needs_both_url_and_key() {
        let api = ("FIREWORKS_API_KEY", "fw-key");
        let url = ("SUPABASE_URL", "https://abc.supabase.co/");
        let key = ("SUPABASE_ANON_KEY", "anon");
        let blank_key = ("SUPABASE_ANON_KEY", " ");

        for partial in [vec![api, url], vec![api, key], vec![api, url, blank_key]] {
            let config = with_env(&partial, Config::from_env).unwrap();
            assert!(config.store.is_none());
        }

        let config = with_env(&[api, url, key], Config::from_env).unwrap();
        let store = config.store.unwrap();
        assert_eq!(store.base_url, "https://abc.supabase.co");
        assert_eq!(store.anon_key, "anon");
    }

    #[test]
    fn unparseable_values_are_rejected() {
        let api = ("FIREWORKS_API_KEY", "fw-key");

        let err = with_env(&[api, ("BIND_ADDR", "not-an-addr")], Config::from_env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = with_env(
            &[api, ("COMPLETION_MAX_ERROR_BODY_BYTES", "lots")],
            Config::from_env,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Common(CommonError::InvalidEnv {
                name: "COMPLETION_MAX_ERROR_BODY_BYTES",
                ..
            })
        ));
    }
}
