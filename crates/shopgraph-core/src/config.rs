//! Loader configuration.
//!
//! Values are resolved from defaults, then an optional TOML file, then the
//! environment. The CLI applies its own flags last.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ShopGraphError, ShopGraphResult};

/// How BOUGHT_WITH weights behave when derivation runs more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMode {
    /// Add onto existing weights. Re-running doubles them.
    #[default]
    Accumulate,
    /// Drop existing BOUGHT_WITH edges before recomputing.
    Reset,
}

impl FromStr for WeightMode {
    type Err = ShopGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accumulate" => Ok(Self::Accumulate),
            "reset" => Ok(Self::Reset),
            other => Err(ShopGraphError::Config(format!(
                "unknown weight mode '{}' (expected accumulate or reset)",
                other
            ))),
        }
    }
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accumulate => f.write_str("accumulate"),
            Self::Reset => f.write_str("reset"),
        }
    }
}

/// What to do when an edge names an endpoint that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointPolicy {
    /// Abort the load with a missing-endpoint error.
    #[default]
    Reject,
    /// Log, count and create nothing.
    Skip,
}

impl FromStr for EndpointPolicy {
    type Err = ShopGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "skip" => Ok(Self::Skip),
            other => Err(ShopGraphError::Config(format!(
                "unknown endpoint policy '{}' (expected reject or skip)",
                other
            ))),
        }
    }
}

impl fmt::Display for EndpointPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

/// Connection settings for a Neo4j server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub missing_endpoints: EndpointPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveConfig {
    pub weight_mode: WeightMode,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopGraphConfig {
    pub neo4j: Neo4jConfig,
    pub load: LoadConfig,
    pub derive: DeriveConfig,
}

impl ShopGraphConfig {
    /// Parse a TOML document.
    pub fn from_toml(raw: &str) -> ShopGraphResult<Self> {
        toml::from_str(raw).map_err(|e| ShopGraphError::Config(e.to_string()))
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> ShopGraphResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Resolve configuration: defaults, then `path` if given, then the process environment.
    pub fn resolve(path: Option<&Path>) -> ShopGraphResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from environment variables looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> ShopGraphResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("NEO4J_URI") {
            self.neo4j.uri = v;
        }
        if let Some(v) = lookup("NEO4J_USER") {
            self.neo4j.user = v;
        }
        if let Some(v) = lookup("NEO4J_PASS") {
            self.neo4j.password = v;
        }
        if let Some(v) = lookup("NEO4J_DATABASE") {
            self.neo4j.database = v;
        }
        if let Some(v) = lookup("SHOPGRAPH_WEIGHT_MODE") {
            self.derive.weight_mode = v.parse()?;
        }
        if let Some(v) = lookup("SHOPGRAPH_MISSING_ENDPOINTS") {
            self.load.missing_endpoints = v.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ShopGraphConfig::default();
        assert_eq!(config.derive.weight_mode, WeightMode::Accumulate);
        assert_eq!(config.load.missing_endpoints, EndpointPolicy::Reject);
        assert_eq!(config.neo4j.uri, "bolt://localhost:7687");
    }

    #[test]
    fn test_partial_toml() {
        let config = ShopGraphConfig::from_toml(
            "[neo4j]\nuri = \"bolt://db:7687\"\n\n[derive]\nweight_mode = \"reset\"\n",
        )
        .unwrap();
        assert_eq!(config.neo4j.uri, "bolt://db:7687");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.derive.weight_mode, WeightMode::Reset);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = ShopGraphConfig::from_toml("[neo4j]\nuser = \"file\"\n").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([("NEO4J_USER", "env"), ("SHOPGRAPH_MISSING_ENDPOINTS", "skip")]);
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.neo4j.user, "env");
        assert_eq!(config.load.missing_endpoints, EndpointPolicy::Skip);
    }

    #[test]
    fn test_bad_mode_is_config_error() {
        assert!(matches!(
            "sometimes".parse::<WeightMode>(),
            Err(ShopGraphError::Config(_))
        ));
    }
}
