//! Web server configuration

use std::net::SocketAddr;

pub const ENV_ADDR: &str = "MOTORTEST_WEB_ADDR";
pub const ENV_SEED: &str = "MOTORTEST_WEB_SEED";

/// Web server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Listen address
    pub addr: SocketAddr,

    /// Preload the tool and motor catalogs
    pub seed: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            seed: true,
        }
    }
}

impl WebConfig {
    /// Read `MOTORTEST_WEB_ADDR` and `MOTORTEST_WEB_SEED`
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(addr) = lookup(ENV_ADDR).filter(|v| !v.trim().is_empty()) {
            cfg.addr = addr
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("{} is not a socket address ({}): {}", ENV_ADDR, addr, e))?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            cfg.seed = !matches!(seed.trim(), "0" | "false" | "no");
        }

        Ok(cfg)
    }
}
