use crate::error::{AyyError, LinkSnafu};
use log::{debug, info, warn};
use snafu::ResultExt;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::watch;

/// Point-to-point byte channel to another console.
///
/// Socket I/O runs on a background runtime. The emulation side only touches two
/// single-slot handoffs: the latest byte it sent and the latest byte received.
/// Neither [`LinkCable::send`] nor [`LinkCable::poll`] ever blocks.
pub struct LinkCable {
    _runtime: Arc<Runtime>,
    outgoing: watch::Sender<Option<u8>>,
    incoming: watch::Receiver<Option<u8>>,
}

impl LinkCable {
    /// Waits for a single partner to connect on `addr`.
    pub fn listen(addr: &str) -> Result<LinkCable, AyyError> {
        let runtime = Arc::new(runtime()?);
        let stream = runtime
            .block_on(async {
                let listener = TcpListener::bind(addr).await?;
                info!("Waiting for link partner on {}", listener.local_addr()?);
                let (stream, peer) = listener.accept().await?;
                info!("Link partner connected from {}", peer);
                Ok::<TcpStream, std::io::Error>(stream)
            })
            .context(LinkSnafu)?;
        stream.set_nodelay(true).context(LinkSnafu)?;

        Ok(LinkCable::over(runtime, stream))
    }

    pub fn connect(addr: &str) -> Result<LinkCable, AyyError> {
        let runtime = Arc::new(runtime()?);
        let stream = runtime.block_on(TcpStream::connect(addr)).context(LinkSnafu)?;
        stream.set_nodelay(true).context(LinkSnafu)?;
        info!("Connected to link partner at {}", addr);

        Ok(LinkCable::over(runtime, stream))
    }

    /// Two cables plugged into each other in-process.
    pub fn pair() -> Result<(LinkCable, LinkCable), AyyError> {
        let runtime = Arc::new(runtime()?);
        let (left, right) = tokio::io::duplex(64);
        Ok((LinkCable::over(runtime.clone(), left), LinkCable::over(runtime, right)))
    }

    pub fn over<S>(runtime: Arc<Runtime>, stream: S) -> LinkCable
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (outgoing, outgoing_rx) = watch::channel(None);
        let (incoming_tx, incoming) = watch::channel(None);
        let (reader, writer) = tokio::io::split(stream);

        runtime.spawn(send_loop(writer, outgoing_rx));
        runtime.spawn(receive_loop(reader, incoming_tx));

        LinkCable {
            _runtime: runtime,
            outgoing,
            incoming,
        }
    }

    /// Publishes `byte` as the latest sent byte.
    pub fn send(&self, byte: u8) {
        self.outgoing.send_replace(Some(byte));
    }

    /// Returns the latest received byte if one arrived since the previous poll.
    pub fn poll(&mut self) -> Option<u8> {
        match self.incoming.has_changed() {
            Ok(true) => *self.incoming.borrow_and_update(),
            _ => None,
        }
    }

    /// `false` once the partner hung up or the receive side failed.
    pub fn is_connected(&self) -> bool {
        self.incoming.has_changed().is_ok()
    }
}

fn runtime() -> Result<Runtime, AyyError> {
    Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("link-cable")
        .enable_io()
        .build()
        .context(LinkSnafu)
}

async fn send_loop<W: AsyncWrite + Unpin>(mut writer: W, mut outgoing: watch::Receiver<Option<u8>>) {
    while outgoing.changed().await.is_ok() {
        let byte = *outgoing.borrow_and_update();
        let Some(byte) = byte else { continue };

        if let Err(e) = writer.write_u8(byte).await {
            warn!("Link send failed: {}", e);
            break;
        }
        if let Err(e) = writer.flush().await {
            warn!("Link flush failed: {}", e);
            break;
        }
    }
}

async fn receive_loop<R: AsyncRead + Unpin>(mut reader: R, incoming: watch::Sender<Option<u8>>) {
    loop {
        match reader.read_u8().await {
            Ok(byte) => {
                if incoming.send(Some(byte)).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Link closed: {}", e);
                break;
            }
        }
    }
}
