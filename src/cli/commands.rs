use crate::config::GenesisAllocation;
use crate::core::Identity;
use clap::{ArgGroup, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ledger-node", about = "Run a single-node ledger")]
pub struct NodeOpt {
    #[arg(long, help = "Address to bind and listen on (host:port)")]
    pub socket: Option<SocketAddr>,
    #[arg(long, help = "TOML file with node settings")]
    pub config: Option<PathBuf>,
    #[arg(
        long = "fund",
        value_name = "IDENTITY:AMOUNT",
        help = "Credit an identity at startup; may be repeated"
    )]
    pub fund: Vec<GenesisAllocation>,
}

#[derive(Debug, Parser)]
#[command(name = "ledger-client", about = "Submit transfers and balance queries")]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["transfer_to", "balance", "create_account"])
))]
pub struct ClientOpt {
    #[arg(long, default_value = "127.0.0.1:2001", help = "Node address (host:port)")]
    pub socket: String,
    #[arg(
        long,
        required_unless_present = "create_account",
        help = "Hex-encoded 32-byte private key seed"
    )]
    pub key: Option<String>,
    #[arg(long, requires = "amount", help = "Hex-encoded recipient identity")]
    pub transfer_to: Option<Identity>,
    #[arg(long, requires = "transfer_to", help = "Amount to transfer")]
    pub amount: Option<u64>,
    #[arg(long, help = "Query a balance")]
    pub balance: bool,
    #[arg(long, requires = "balance", help = "Identity to query instead of our own")]
    pub of: Option<Identity>,
    #[arg(long, help = "Print the outcome as JSON")]
    pub json: bool,
    #[arg(long, help = "Generate a new key and print it with its identity")]
    pub create_account: bool,
}

/// The one thing a client invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    CreateAccount,
    Transfer { recipient: Identity, amount: u64 },
    Balance { of: Option<Identity> },
}

impl ClientOpt {
    pub fn action(&self) -> ClientAction {
        if self.create_account {
            return ClientAction::CreateAccount;
        }
        match (self.transfer_to, self.amount) {
            (Some(recipient), Some(amount)) => ClientAction::Transfer { recipient, amount },
            _ => ClientAction::Balance { of: self.of },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(n: u8) -> String {
        format!("{n:02x}").repeat(32)
    }

    #[test]
    fn test_node_flags() {
        let opt = NodeOpt::try_parse_from([
            "ledger-node",
            "--socket",
            "0.0.0.0:2001",
            "--fund",
            &format!("{}:100", hex(1)),
            "--fund",
            &format!("{}:5", hex(2)),
        ])
        .unwrap();
        assert_eq!(opt.socket.unwrap().port(), 2001);
        assert_eq!(opt.fund.len(), 2);
        assert_eq!(opt.fund[1].balance, 5);
        assert!(opt.config.is_none());
    }

    #[test]
    fn test_node_rejects_bad_fund() {
        assert!(NodeOpt::try_parse_from(["ledger-node", "--fund", "abc"]).is_err());
    }

    #[test]
    fn test_client_transfer() {
        let opt = ClientOpt::try_parse_from([
            "ledger-client",
            "--key",
            &hex(9),
            "--transfer-to",
            &hex(2),
            "--amount",
            "30",
        ])
        .unwrap();
        assert_eq!(
            opt.action(),
            ClientAction::Transfer {
                recipient: Identity([2; 32]),
                amount: 30
            }
        );
        assert_eq!(opt.socket, "127.0.0.1:2001");
    }

    #[test]
    fn test_client_balance_of_other() {
        let opt = ClientOpt::try_parse_from([
            "ledger-client",
            "--key",
            &hex(9),
            "--balance",
            "--of",
            &hex(3),
            "--json",
        ])
        .unwrap();
        assert_eq!(
            opt.action(),
            ClientAction::Balance {
                of: Some(Identity([3; 32]))
            }
        );
        assert!(opt.json);
    }

    #[test]
    fn test_client_requires_exactly_one_action() {
        assert!(ClientOpt::try_parse_from(["ledger-client", "--key", &hex(9)]).is_err());
        assert!(ClientOpt::try_parse_from([
            "ledger-client",
            "--key",
            &hex(9),
            "--balance",
            "--transfer-to",
            &hex(2),
            "--amount",
            "1",
        ])
        .is_err());
    }

    #[test]
    fn test_client_transfer_needs_amount() {
        let result =
            ClientOpt::try_parse_from(["ledger-client", "--key", &hex(9), "--transfer-to", &hex(2)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_key_optional_for_create_account() {
        let opt = ClientOpt::try_parse_from(["ledger-client", "--create-account"]).unwrap();
        assert_eq!(opt.action(), ClientAction::CreateAccount);
        assert!(ClientOpt::try_parse_from(["ledger-client", "--balance"]).is_err());
    }
}
