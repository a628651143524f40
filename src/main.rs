// This is the entry point for my ledger node
// It loads the settings, credits the genesis accounts and serves clients until killed
use clap::Parser;
use log::{error, info, LevelFilter};
use simple_ledger::{LedgerService, NodeConfig, NodeOpt, Result, Server};
use std::process;

fn main() {
    // I log at Info by default so I can see sessions open and close,
    // and RUST_LOG still lets me turn it up or down without a rebuild
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    // I parse the command line with clap - the socket, an optional config file and any --fund flags
    let opt = NodeOpt::parse();

    // If startup fails (bad config, port in use) I log it and exit with code 1
    if let Err(e) = run_node(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

// Here I build the node from its layered settings and hand control to the accept loop
fn run_node(opt: NodeOpt) -> Result<()> {
    // Defaults first, then the TOML file if I gave one, then LEDGER_* environment variables
    let mut config = NodeConfig::load(opt.config.as_deref())?;

    // Command-line flags win over the file and the environment
    if let Some(socket) = opt.socket {
        config.socket = socket;
    }
    // --fund adds to the genesis list instead of replacing it
    config.genesis.extend(opt.fund);
    // I check again because the extra allocations could push supply past u64
    config.validate()?;

    // The service owns the ledger; every genesis allocation goes through credit()
    let service = LedgerService::from_config(&config)?;
    // Binding happens here so a busy port fails before I claim to be ready
    let server = Server::bind(&config, service)?;
    info!(
        "Node ready on {} (max {} sessions, query policy {:?})",
        server.local_addr()?,
        config.max_sessions,
        config.query_policy
    );
    // This blocks for the life of the process, one thread per client session
    server.run()
}
