use crate::config::NodeConfig;
use crate::core::RejectReason;
use crate::error::{LedgerError, Result};
use crate::network::protocol::{write_frame, Response};
use crate::network::{LedgerService, Session, SessionTracker};
use crate::storage::LedgerStore;
use log::{error, info, warn};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// TCP front end of the ledger node: one thread per session
pub struct Server {
    listener: TcpListener,
    service: Arc<LedgerService>,
    tracker: Arc<SessionTracker>,
    idle_timeout: Option<Duration>,
    stop: Arc<AtomicBool>,
}

impl Server {
    /// Bind the listening socket named in `config`
    pub fn bind(config: &NodeConfig, service: LedgerService) -> Result<Self> {
        let listener = TcpListener::bind(config.socket).map_err(|e| {
            LedgerError::Connection(format!("Failed to bind to {}: {e}", config.socket))
        })?;

        Ok(Self {
            listener,
            service: Arc::new(service),
            tracker: Arc::new(SessionTracker::new(config.max_sessions)),
            idle_timeout: config.idle_timeout(),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn service(&self) -> &Arc<LedgerService> {
        &self.service
    }

    /// Accept connections until shut down
    pub fn run(&self) -> Result<()> {
        info!("Server listening on {}", self.local_addr()?);

        for stream in self.listener.incoming() {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }

            match stream {
                Ok(stream) => self.accept(stream),
                Err(e) => {
                    error!("Error accepting connection: {e}");
                }
            }
        }

        info!("Server stopped");
        Ok(())
    }

    /// Run the accept loop on a background thread
    pub fn spawn(self) -> Result<ServerHandle> {
        let addr = self.local_addr()?;
        let stop = Arc::clone(&self.stop);
        let service = Arc::clone(&self.service);
        let join = thread::spawn(move || self.run());

        Ok(ServerHandle {
            addr,
            stop,
            service,
            join,
        })
    }

    fn accept(&self, stream: TcpStream) {
        let peer_addr = match stream.peer_addr() {
            Ok(addr) => addr,
            Err(e) => {
                error!("Failed to get peer address: {e}");
                return;
            }
        };

        let session_id = match self.tracker.try_open(peer_addr) {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!("Rejecting connection from {peer_addr}: session limit reached");
                Self::refuse(stream, RejectReason::ServerBusy);
                return;
            }
            Err(e) => {
                error!("Failed to register session for {peer_addr}: {e}");
                Self::refuse(stream, RejectReason::Internal);
                return;
            }
        };

        if let Err(e) = stream.set_read_timeout(self.idle_timeout) {
            warn!("Failed to set read timeout for {peer_addr}: {e}");
        }

        let service = Arc::clone(&self.service);
        let tracker = Arc::clone(&self.tracker);

        thread::spawn(move || {
            let shutdown_handle = stream.try_clone();
            let session = Session::new(session_id, stream, service);

            match session.run() {
                Ok(handled) => {
                    info!("Session {session_id} finished after {handled} requests");
                }
                Err(LedgerError::Protocol(e)) => {
                    warn!("Session {session_id} from {peer_addr} closed on protocol error: {e}");
                }
                Err(e) => {
                    // resets and timeouts end the session, not the node
                    info!("Session {session_id} from {peer_addr} ended: {e}");
                }
            }

            if let Ok(stream) = shutdown_handle {
                let _ = stream.shutdown(Shutdown::Both);
            }
            if let Err(e) = tracker.close(session_id) {
                warn!("Failed to record session close: {e}");
            }
        });
    }

    fn refuse(mut stream: TcpStream, reason: RejectReason) {
        let _ = write_frame(&mut stream, &Response::Reject(reason));
        let _ = stream.shutdown(Shutdown::Both);
    }
}

/// Handle to a server running on a background thread
pub struct ServerHandle {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    service: Arc<LedgerService>,
    join: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn ledger(&self) -> &Arc<LedgerStore> {
        self.service.ledger()
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    ///
    /// Sessions already running finish on their own threads.
    pub fn shutdown(self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);

        // accept() blocks, so poke it with a throwaway connection
        let wake_addr = match self.addr.ip() {
            IpAddr::V4(ip) if ip.is_unspecified() => {
                SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), self.addr.port())
            }
            IpAddr::V6(ip) if ip.is_unspecified() => {
                SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), self.addr.port())
            }
            _ => self.addr,
        };
        let _ = TcpStream::connect(wake_addr);

        self.join
            .join()
            .map_err(|_| LedgerError::Io("Server thread panicked".to_string()))?
    }
}
