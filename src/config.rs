use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub shutdown_grace: Duration,
    pub demo: DemoConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match get("PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {v:?}"))?,
            None => 3000,
        };
        let grace_secs = match get("SHUTDOWN_GRACE_SECS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("SHUTDOWN_GRACE_SECS must be whole seconds, got {v:?}"))?,
            None => 3,
        };

        // Bootstrap bypasses request validation, so a blank name has to stop here.
        let demo_username = get("DEMO_USERNAME").unwrap_or_else(|| "user".into());
        if demo_username.trim().is_empty() {
            anyhow::bail!("DEMO_USERNAME must not be blank");
        }

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite://database.db".into()),
            shutdown_grace: Duration::from_secs(grace_secs),
            demo: DemoConfig {
                username: demo_username,
                password: get("DEMO_PASSWORD").unwrap_or_else(|| "user".into()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = with(&[]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.database_url, "sqlite://database.db");
        assert_eq!(cfg.shutdown_grace, Duration::from_secs(3));
        assert_eq!(cfg.demo.username, "user");
        assert_eq!(cfg.demo.password, "user");
    }

    #[test]
    fn port_from_env() {
        assert_eq!(with(&[("PORT", "8081")]).unwrap().port, 8081);
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(with(&[("PORT", "http")]).is_err());
        assert!(with(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn grace_window_override() {
        let cfg = with(&[("SHUTDOWN_GRACE_SECS", "10")]).unwrap();
        assert_eq!(cfg.shutdown_grace, Duration::from_secs(10));
    }

    #[test]
    fn bad_grace_window_is_an_error() {
        assert!(with(&[("SHUTDOWN_GRACE_SECS", "soon")]).is_err());
        assert!(with(&[("SHUTDOWN_GRACE_SECS", "-1")]).is_err());
    }

    #[test]
    fn blank_demo_username_is_an_error() {
        assert!(with(&[("DEMO_USERNAME", "")]).is_err());
        assert!(with(&[("DEMO_USERNAME", "  ")]).is_err());
        assert_eq!(with(&[("DEMO_USERNAME", "demo")]).unwrap().demo.username, "demo");
    }
}
