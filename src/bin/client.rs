// This is the entry point for my ledger client
// Every run does exactly one thing: create a key, send one transfer, or ask for one balance
use clap::Parser;
use log::LevelFilter;
use serde_json::json;
use simple_ledger::{
    ClientAction, ClientOpt, Identity, LedgerClient, LedgerError, ProtocolError, RejectReason,
    Response, Result, Wallet, CLIENT_TIMEOUT,
};
use std::process;
use zeroize::Zeroizing;

// I give each kind of failure its own exit code so scripts can tell them apart
const EXIT_OK: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_REJECTED: i32 = 2;
const EXIT_PROTOCOL: i32 = 3;
const EXIT_CONNECTION: i32 = 4;

// What a successful run has to report back to me
enum Outcome {
    AccountCreated {
        seed: Zeroizing<String>,
        identity: Identity,
    },
    Transferred {
        recipient: Identity,
        amount: u64,
        new_sender_balance: u64,
    },
    Balance {
        identity: Identity,
        balance: u64,
    },
}

fn main() {
    // Logs go to stderr, so stdout stays clean for the result (and for --json)
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    // I use try_parse because clap exits with 2 on bad usage, and 2 means "rejected" here
    let opt = match ClientOpt::try_parse() {
        Ok(opt) => opt,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_OK };
            let _ = e.print();
            process::exit(code);
        }
    };

    // I print the outcome myself, then exit with the code that matches it
    let json = opt.json;
    match run_client(&opt) {
        Ok(outcome) => {
            print_outcome(&outcome, json);
            process::exit(EXIT_OK);
        }
        Err(e) => {
            // Rejections and errors both end up here
            print_failure(&e, json);
            process::exit(exit_code(&e));
        }
    }
}

fn run_client(opt: &ClientOpt) -> Result<Outcome> {
    match opt.action() {
        // Creating an account is purely local: a fresh seed and its public key, no node needed
        ClientAction::CreateAccount => {
            let wallet = Wallet::generate()?;
            Ok(Outcome::AccountCreated {
                seed: wallet.seed_hex(),
                identity: wallet.identity(),
            })
        }
        // The client picks a random nonce, so sending the same amount twice is two transfers
        ClientAction::Transfer { recipient, amount } => {
            let (wallet, mut client) = connect(opt)?;
            match client.transfer(&wallet, recipient, amount)? {
                Response::Ack { new_sender_balance } => Ok(Outcome::Transferred {
                    recipient,
                    amount,
                    new_sender_balance,
                }),
                response => Err(unexpected(response)),
            }
        }
        // Without --of I ask for my own balance, signed so it also works on owner-only nodes
        ClientAction::Balance { of } => {
            let (wallet, mut client) = connect(opt)?;
            let identity = of.unwrap_or_else(|| wallet.identity());
            match client.balance(&wallet, of)? {
                Response::BalanceReply { balance } => Ok(Outcome::Balance { identity, balance }),
                response => Err(unexpected(response)),
            }
        }
    }
}

/// Load the key before dialing so a bad key never touches the network
fn connect(opt: &ClientOpt) -> Result<(Wallet, LedgerClient)> {
    let key = opt
        .key
        .as_deref()
        .ok_or_else(|| LedgerError::Crypto("--key is required".to_string()))?;
    let wallet = Wallet::from_hex(key)?;
    let client = LedgerClient::connect(opt.socket.as_str(), CLIENT_TIMEOUT)?;
    Ok((wallet, client))
}

/// Turn anything but the expected success into an error
fn unexpected(response: Response) -> LedgerError {
    match response {
        Response::Reject(reason) => LedgerError::Rejected(reason),
        other => LedgerError::Protocol(ProtocolError::Malformed(format!(
            "unexpected response {other:?}"
        ))),
    }
}

fn exit_code(err: &LedgerError) -> i32 {
    match err {
        LedgerError::Rejected(_) => EXIT_REJECTED,
        LedgerError::Protocol(_) => EXIT_PROTOCOL,
        LedgerError::Connection(_) => EXIT_CONNECTION,
        _ => EXIT_USAGE,
    }
}

fn print_outcome(outcome: &Outcome, json: bool) {
    match outcome {
        Outcome::AccountCreated { seed, identity } => {
            if json {
                println!(
                    "{}",
                    json!({ "key": seed.as_str(), "identity": identity.to_hex() })
                );
            } else {
                println!("Private key: {}", seed.as_str());
                println!("Identity:    {identity}");
            }
        }
        Outcome::Transferred {
            recipient,
            amount,
            new_sender_balance,
        } => {
            if json {
                println!(
                    "{}",
                    json!({
                        "status": "accepted",
                        "recipient": recipient.to_hex(),
                        "amount": amount,
                        "new_sender_balance": new_sender_balance,
                    })
                );
            } else {
                println!("Transferred {amount} to {recipient}");
                println!("New balance: {new_sender_balance}");
            }
        }
        Outcome::Balance { identity, balance } => {
            if json {
                println!(
                    "{}",
                    json!({ "status": "ok", "identity": identity.to_hex(), "balance": balance })
                );
            } else {
                println!("Balance of {identity}: {balance}");
            }
        }
    }
}

fn print_failure(err: &LedgerError, json: bool) {
    if json {
        let body = match err {
            LedgerError::Rejected(reason) => json!({
                "status": "rejected",
                "rejection": rejection_json(reason),
                "message": reason.to_string(),
            }),
            other => json!({ "status": "error", "message": other.to_string() }),
        };
        println!("{body}");
    } else {
        // This goes straight to stderr rather than through the logger,
        // so I still see why a request failed when RUST_LOG is off
        eprintln!("{err}");
    }
}

fn rejection_json(reason: &RejectReason) -> serde_json::Value {
    serde_json::to_value(reason).unwrap_or_else(|_| json!({ "reason": reason.to_string() }))
}
