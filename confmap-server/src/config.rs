use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port to bind the server to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to bind to all interfaces (0.0.0.0) or just localhost
    #[serde(default = "default_bind_all")]
    pub bind_all: bool,

    /// Output directory of confmap-builder
    #[serde(default = "default_site_directory")]
    pub site_directory: String,

    /// Enable CORS for cross-origin requests
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_port() -> u16 {
    8000
}

fn default_bind_all() -> bool {
    false
}

fn default_site_directory() -> String {
    "public".to_string()
}

fn default_enable_cors() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_all: default_bind_all(),
            site_directory: default_site_directory(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when it is absent
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if !std::path::Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        let ip = if self.bind_all {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };
        SocketAddr::new(ip, self.port)
    }
}
