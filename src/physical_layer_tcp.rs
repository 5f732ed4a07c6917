//! A [`PhysicalLayer`] backed by a TCP socket, used by the demo
//! binary in place of the serial line or modem this monitor was
//! originally built to supervise.

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use plm_monitor::physical_layer::{PhysicalLayer, PhysicalLayerEvents};

/// Which side of the TCP handshake the demo plays.
#[derive(Clone, Copy, Debug)]
pub enum Endpoint {
    /// Listen for and accept a single inbound connection.
    Listen(SocketAddr),
    /// Connect out to a remote address.
    Connect(SocketAddr),
}

/// A physical layer that opens by connecting out to, or accepting a
/// connection from, a TCP peer, and considers itself closed the
/// moment a read on the socket returns EOF or an error.
pub struct TcpPhysicalLayer {
    endpoint: Endpoint,
    events: Option<PhysicalLayerEvents>,
    close_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl TcpPhysicalLayer {
    /// Build a layer that will open by listening on or connecting to
    /// `endpoint` each time `async_open` is called.
    pub fn new(endpoint: Endpoint) -> Self {
        TcpPhysicalLayer {
            endpoint,
            events: None,
            close_tx: Arc::new(Mutex::new(None)),
        }
    }
}

async fn accept_or_connect(endpoint: Endpoint) -> io::Result<TcpStream> {
    match endpoint {
        Endpoint::Connect(addr) => TcpStream::connect(addr).await,
        Endpoint::Listen(addr) => {
            let listener = TcpListener::bind(addr).await?;
            let (stream, peer) = listener.accept().await?;
            tracing::info!("accepted connection from {}", peer);
            Ok(stream)
        }
    }
}

async fn run_connection(
    mut stream: TcpStream,
    mut close_rx: oneshot::Receiver<()>,
    events: PhysicalLayerEvents,
) {
    let mut buf = [0u8; 256];
    loop {
        tokio::select! {
            _ = &mut close_rx => {
                // A solicited close: async_close() itself reports `closed`.
                return;
            }
            result = stream.read(&mut buf) => {
                match result {
                    Ok(0) | Err(_) => {
                        events.closed();
                        return;
                    }
                    // This demo only monitors liveness; payloads are discarded.
                    Ok(_) => {}
                }
            }
        }
    }
}

impl PhysicalLayer for TcpPhysicalLayer {
    fn bind(&mut self, events: PhysicalLayerEvents) {
        self.events = Some(events);
    }

    fn async_open(&mut self) {
        let events = self
            .events
            .clone()
            .expect("bind must be called before async_open");
        let endpoint = self.endpoint;
        let close_tx_slot = Arc::clone(&self.close_tx);

        tokio::spawn(async move {
            match accept_or_connect(endpoint).await {
                Ok(stream) => {
                    let (tx, rx) = oneshot::channel();
                    *close_tx_slot.lock().unwrap() = Some(tx);
                    events.open_succeeded();
                    run_connection(stream, rx, events).await;
                }
                Err(err) => {
                    tracing::warn!("failed to open physical layer: {}", err);
                    events.open_failed();
                }
            }
        });
    }

    fn async_close(&mut self) {
        let events = self
            .events
            .clone()
            .expect("bind must be called before async_close");
        let close_tx = self.close_tx.lock().unwrap().take();

        tokio::spawn(async move {
            if let Some(tx) = close_tx {
                // Ignore the error: the receiving end may already have
                // noticed the connection died on its own.
                let _ = tx.send(());
            }
            events.closed();
        });
    }
}
