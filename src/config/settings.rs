use crate::core::{Identity, QueryPolicy, TransferPolicy};
use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_NODE_PORT: u16 = 2001;
const DEFAULT_MAX_SESSIONS: usize = 64;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

const SOCKET_KEY: &str = "LEDGER_SOCKET";
const MAX_SESSIONS_KEY: &str = "LEDGER_MAX_SESSIONS";

/// Balance credited to an identity when the node starts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisAllocation {
    pub identity: Identity,
    pub balance: u64,
}

/// Parses the `--fund <hex>:<amount>` form
impl FromStr for GenesisAllocation {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let (identity, balance) = s.split_once(':').ok_or_else(|| {
            LedgerError::Config(format!("Expected <identity>:<amount>, got {s}"))
        })?;
        let identity = Identity::from_hex(identity)?;
        let balance = balance
            .trim()
            .parse::<u64>()
            .map_err(|e| LedgerError::Config(format!("Invalid amount {balance}: {e}")))?;
        Ok(GenesisAllocation { identity, balance })
    }
}

/// Node settings, layered as defaults, then TOML file, then environment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    pub socket: SocketAddr,
    pub max_sessions: usize,
    /// Socket read timeout per session; 0 disables it
    pub idle_timeout_secs: u64,
    pub allow_self_transfer: bool,
    pub query_policy: QueryPolicy,
    pub genesis: Vec<GenesisAllocation>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            socket: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_NODE_PORT)),
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            allow_self_transfer: false,
            query_policy: QueryPolicy::default(),
            genesis: Vec::new(),
        }
    }
}

impl NodeConfig {
    /// Defaults, overlaid with `path` when given, then with the environment
    pub fn load(path: Option<&Path>) -> Result<NodeConfig> {
        let mut config = match path {
            Some(path) => NodeConfig::from_file(path)?,
            None => NodeConfig::default(),
        };
        config.apply_env_from(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<NodeConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        NodeConfig::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<NodeConfig> {
        let config: NodeConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LEDGER_SOCKET` and `LEDGER_MAX_SESSIONS` from `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(socket) = lookup(SOCKET_KEY) {
            self.socket = socket
                .parse()
                .map_err(|e| LedgerError::Config(format!("{SOCKET_KEY}={socket}: {e}")))?;
        }
        if let Some(max) = lookup(MAX_SESSIONS_KEY) {
            self.max_sessions = max
                .parse()
                .map_err(|e| LedgerError::Config(format!("{MAX_SESSIONS_KEY}={max}: {e}")))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_sessions == 0 {
            return Err(LedgerError::Config(
                "max_sessions must be at least 1".to_string(),
            ));
        }
        let total = self
            .genesis
            .iter()
            .try_fold(0u64, |acc, allocation| acc.checked_add(allocation.balance));
        if total.is_none() {
            return Err(LedgerError::Config(
                "Genesis allocations exceed the maximum total supply".to_string(),
            ));
        }
        Ok(())
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.idle_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn transfer_policy(&self) -> TransferPolicy {
        TransferPolicy {
            allow_self_transfer: self.allow_self_transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(config.socket.to_string(), "127.0.0.1:2001");
        assert_eq!(config.max_sessions, 64);
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(60)));
        assert!(!config.transfer_policy().allow_self_transfer);
        assert_eq!(config.query_policy, QueryPolicy::Public);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = format!(
            r#"
            socket = "0.0.0.0:3000"
            idle_timeout_secs = 0
            allow_self_transfer = true
            query_policy = "owner-only"

            [[genesis]]
            identity = "{}"
            balance = 100
            "#,
            "aa".repeat(32)
        );
        let config = NodeConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.socket.port(), 3000);
        assert_eq!(config.idle_timeout(), None);
        assert!(config.allow_self_transfer);
        assert_eq!(config.query_policy, QueryPolicy::OwnerOnly);
        assert_eq!(config.max_sessions, 64);
        assert_eq!(
            config.genesis,
            vec![GenesisAllocation {
                identity: Identity([0xaa; 32]),
                balance: 100
            }]
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = NodeConfig::from_toml_str("sockett = \"127.0.0.1:1\"");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_genesis_overflow_rejected() {
        let toml = format!(
            r#"
            [[genesis]]
            identity = "{a}"
            balance = 18446744073709551615

            [[genesis]]
            identity = "{b}"
            balance = 1
            "#,
            a = "01".repeat(32),
            b = "02".repeat(32)
        );
        assert!(matches!(
            NodeConfig::from_toml_str(&toml),
            Err(LedgerError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("LEDGER_SOCKET", "127.0.0.1:4500"),
            ("LEDGER_MAX_SESSIONS", "3"),
        ]
        .into_iter()
        .collect();
        let mut config = NodeConfig::default();
        config
            .apply_env_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.socket.port(), 4500);
        assert_eq!(config.max_sessions, 3);
    }

    #[test]
    fn test_env_bad_value_rejected() {
        let mut config = NodeConfig::default();
        let result = config.apply_env_from(|key| {
            (key == "LEDGER_MAX_SESSIONS").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_sessions = 5").unwrap();
        let config = NodeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_sessions, 5);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = NodeConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn test_fund_argument_parsing() {
        let parsed: GenesisAllocation = format!("{}:250", "0f".repeat(32)).parse().unwrap();
        assert_eq!(parsed.identity, Identity([0x0f; 32]));
        assert_eq!(parsed.balance, 250);

        assert!("nocolon".parse::<GenesisAllocation>().is_err());
        assert!(format!("{}:-1", "0f".repeat(32))
            .parse::<GenesisAllocation>()
            .is_err());
    }
}
