use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Placeholder identity secret; accepted for local runs only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub fcm_server_key: Option<String>,
    pub fcm_endpoint: String,
    pub relay_requires_auth: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env_or("BEACON_HOST", "0.0.0.0");
        let port: u16 = env_or("BEACON_PORT", "5000")
            .parse()
            .context("BEACON_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("BEACON_HOST must be an IP address")?;

        let relay_requires_auth = parse_bool(&env_or("BEACON_RELAY_REQUIRE_AUTH", "true"))
            .context("BEACON_RELAY_REQUIRE_AUTH must be true or false")?;

        Ok(Self {
            addr,
            db_path: env_or("BEACON_DB_PATH", "beacon.db").into(),
            jwt_secret: env_or("BEACON_JWT_SECRET", DEV_JWT_SECRET),
            fcm_server_key: std::env::var("BEACON_FCM_SERVER_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            fcm_endpoint: env_or("BEACON_FCM_ENDPOINT", beacon_push::fcm::DEFAULT_ENDPOINT),
            relay_requires_auth,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_boolean_flags() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
