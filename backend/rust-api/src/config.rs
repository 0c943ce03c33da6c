use serde::Deserialize;
use std::env;

pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 1800;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub environment: String,
    pub bind_addr: String,
    /// When set, visitor sessions live in Redis instead of process memory.
    pub redis_uri: Option<String>,
    pub session_ttl_seconds: u64,
    pub csrf_enabled: bool,
    pub cookie_secure: bool,
    /// `username:password` for the `/metrics` Basic auth guard.
    pub metrics_auth: String,
    /// Fixed seed for question and feedback randomness.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load environment variables from a local .env file, if any
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
        let production = env == "prod";

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables (prefix: APP_)
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        let redis_uri = settings
            .get_string("redis.uri")
            .or_else(|_| env::var("REDIS_URI"))
            .ok()
            .filter(|uri| !uri.trim().is_empty());

        let session_ttl_seconds = settings
            .get_int("session.ttl_seconds")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .or_else(|| {
                env::var("SESSION_TTL_SECONDS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
            })
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS);

        let csrf_enabled = settings
            .get_bool("security.csrf_enabled")
            .unwrap_or(env != "test");

        let cookie_secure = settings
            .get_bool("security.cookie_secure")
            .unwrap_or(production);

        let metrics_auth = match settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
        {
            Ok(value) => value,
            Err(_) if production => {
                return Err(config::ConfigError::Message(
                    "METRICS_AUTH must be set in production".to_string(),
                ))
            }
            Err(_) => {
                eprintln!("WARNING: Using default METRICS_AUTH (dev mode only!)");
                "admin:changeme".to_string()
            }
        };

        let rng_seed = settings
            .get_int("tutor.rng_seed")
            .ok()
            .and_then(|v| u64::try_from(v).ok());

        Ok(Config {
            environment: env,
            bind_addr,
            redis_uri,
            session_ttl_seconds,
            csrf_enabled,
            cookie_secure,
            metrics_auth,
            rng_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "APP_SERVER__BIND_ADDR",
            "APP_SESSION__TTL_SECONDS",
            "APP_SECURITY__CSRF_ENABLED",
            "APP_TUTOR__RNG_SEED",
            "REDIS_URI",
            "BIND_ADDR",
            "SESSION_TTL_SECONDS",
            "METRICS_AUTH",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial_test::serial]
    fn defaults_for_dev() {
        clear_env();
        let config = Config::load().unwrap();
        assert_eq!(config.environment, "dev");
        assert_eq!(config.bind_addr, "127.0.0.1:5000");
        assert_eq!(config.session_ttl_seconds, DEFAULT_SESSION_TTL_SECONDS);
        assert!(config.redis_uri.is_none());
        assert!(config.csrf_enabled);
        assert!(!config.cookie_secure);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    #[serial_test::serial]
    fn environment_overrides() {
        clear_env();
        env::set_var("APP_ENV", "test");
        env::set_var("APP_SERVER__BIND_ADDR", "0.0.0.0:9000");
        env::set_var("APP_SESSION__TTL_SECONDS", "60");
        env::set_var("APP_TUTOR__RNG_SEED", "42");
        env::set_var("METRICS_AUTH", "ops:secret");

        let config = Config::load().unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.session_ttl_seconds, 60);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.metrics_auth, "ops:secret");
        assert!(!config.csrf_enabled);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn production_requires_metrics_auth() {
        clear_env();
        env::set_var("APP_ENV", "prod");

        let err = Config::load().unwrap_err();
        assert!(err.to_string().contains("METRICS_AUTH"));

        env::set_var("METRICS_AUTH", "ops:secret");
        let config = Config::load().unwrap();
        assert!(config.cookie_secure);
        assert!(config.csrf_enabled);
        assert_eq!(config.metrics_auth, "ops:secret");

        clear_env();
    }
}
