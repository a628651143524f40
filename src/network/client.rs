use crate::core::{BalanceQuery, Identity, TransferRequest};
use crate::error::{LedgerError, Result};
use crate::network::protocol::{read_frame, write_frame, Request, Response};
use crate::wallet::Wallet;
use log::{debug, info};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default connect, read and write timeout for the client
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// One connection to a ledger node
pub struct LedgerClient {
    stream: TcpStream,
    peer: SocketAddr,
}

impl LedgerClient {
    /// Connect to the first address `addr` resolves to that accepts
    pub fn connect<A: ToSocketAddrs>(addr: A, timeout: Duration) -> Result<Self> {
        let addrs = addr
            .to_socket_addrs()
            .map_err(|e| LedgerError::Connection(format!("Failed to resolve node address: {e}")))?;

        let mut last_error = None;
        for peer in addrs {
            match TcpStream::connect_timeout(&peer, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout)).map_err(|e| {
                        LedgerError::Connection(format!("Failed to set read timeout: {e}"))
                    })?;
                    stream.set_write_timeout(Some(timeout)).map_err(|e| {
                        LedgerError::Connection(format!("Failed to set write timeout: {e}"))
                    })?;
                    info!("Connected to node {peer}");
                    return Ok(Self { stream, peer });
                }
                Err(e) => last_error = Some(format!("Failed to connect to {peer}: {e}")),
            }
        }

        Err(LedgerError::Connection(last_error.unwrap_or_else(|| {
            "Node address resolved to nothing".to_string()
        })))
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Send one request and wait for its response
    pub fn request(&mut self, request: &Request) -> Result<Response> {
        debug!("Sending {request} to {}", self.peer);
        write_frame(&mut self.stream, request)?;

        read_frame::<_, Response>(&mut self.stream)?.ok_or_else(|| {
            LedgerError::Connection(format!("Node {} closed the connection", self.peer))
        })
    }

    /// Sign and send a transfer with a random nonce
    pub fn transfer(&mut self, wallet: &Wallet, recipient: Identity, amount: u64) -> Result<Response> {
        self.transfer_with_nonce(wallet, recipient, amount, rand::random())
    }

    pub fn transfer_with_nonce(
        &mut self,
        wallet: &Wallet,
        recipient: Identity,
        amount: u64,
        nonce: u64,
    ) -> Result<Response> {
        let tx = TransferRequest::new_signed(wallet, recipient, amount, nonce)?;
        info!("Transfer {} prepared: {amount} to {recipient}", tx.id());
        self.request(&Request::Transfer(tx))
    }

    /// Query a balance; the wallet's own balance is always queried with a proof
    pub fn balance(&mut self, wallet: &Wallet, of: Option<Identity>) -> Result<Response> {
        let query = match of {
            Some(identity) if identity != wallet.identity() => BalanceQuery::public(identity),
            _ => BalanceQuery::owned(wallet)?,
        };
        self.request(&Request::BalanceQuery(query))
    }
}
