//! TFTP delivery.
//!
//! One delivery attempt walks a fixed phase sequence: reachability probe,
//! staging into a fresh temporary directory, a transient TFTP server the
//! device may pull from, then a WRQ push of the staged file to the
//! device. The staging directory and the server task are released on
//! every exit path.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::net::{lookup_host, UdpSocket};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

use super::{DeliveryEvent, TransportError};
use crate::config::Config;

/// Fixed name of the staged file as seen by the device
pub const CONFIG_FILENAME: &str = "config.txt";

const TFTP_PORT: u16 = 69;
const BLOCK_SIZE: usize = 512;

const OP_RRQ: u16 = 1;
const OP_WRQ: u16 = 2;
const OP_DATA: u16 = 3;
const OP_ACK: u16 = 4;
const OP_ERROR: u16 = 5;

/// TftpPhase tracks where a delivery attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TftpPhase {
    Idle,
    ConnectivityChecked,
    Staged,
    ServerStarting,
    ServerReady,
    Uploading,
    Succeeded,
    Failed,
    CleanedUp,
}

/// TftpDelivery performs one configuration push over TFTP.
/// Instances are single-use per delivery attempt.
pub struct TftpDelivery {
    target_host: String,
    probe_timeout: Duration,
    server_ready_timeout: Duration,
    read_timeout: Duration,
    phase: TftpPhase,
    staging_root: Option<PathBuf>,
    events: Option<mpsc::UnboundedSender<DeliveryEvent>>,
}

impl TftpDelivery {
    pub fn new(target_host: &str, config: &Config) -> Self {
        Self {
            target_host: target_host.to_string(),
            probe_timeout: config.probe_timeout,
            server_ready_timeout: config.server_ready_timeout,
            read_timeout: config.read_timeout,
            phase: TftpPhase::Idle,
            staging_root: None,
            events: None,
        }
    }

    #[cfg(test)]
    fn with_staging_root(mut self, root: PathBuf) -> Self {
        self.staging_root = Some(root);
        self
    }

    /// Wire an event sink for coarse progress reporting
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<DeliveryEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn phase(&self) -> TftpPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: TftpPhase) {
        tracing::debug!("TFTP delivery phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn emit(&self, event: DeliveryEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Every failure exit funnels through here: the phase moves through
    /// `Failed` to `CleanedUp` and the error goes out on the event channel.
    fn fail(&mut self, err: TransportError) -> TransportError {
        self.set_phase(TftpPhase::Failed);
        self.set_phase(TftpPhase::CleanedUp);
        self.emit(DeliveryEvent::Error {
            message: err.to_string(),
        });
        err
    }

    /// Deliver the configuration text to the target device.
    /// Returns a human-readable success message.
    pub async fn deliver(&mut self, config_text: &str) -> Result<String, TransportError> {
        let attempt = uuid::Uuid::new_v4();
        tracing::info!(
            "TFTP delivery {} to {} ({} bytes)",
            attempt,
            self.target_host,
            config_text.len()
        );

        if !probe_connectivity(&self.target_host, self.probe_timeout).await {
            return Err(self.fail(TransportError::Unreachable(format!(
                "switch {} is not reachable on UDP/{}",
                self.target_host, TFTP_PORT
            ))));
        }
        self.set_phase(TftpPhase::ConnectivityChecked);
        self.emit(DeliveryEvent::Progress { fraction: 0.25 });

        // Staging directory is owned by this attempt alone; TempDir
        // removes it on drop, which covers every exit path below.
        let created = {
            let prefix = format!("switchforge-{}-", attempt);
            let mut builder = tempfile::Builder::new();
            builder.prefix(&prefix);
            match &self.staging_root {
                Some(root) => builder.tempdir_in(root),
                None => builder.tempdir(),
            }
        };
        let staging = match created {
            Ok(dir) => dir,
            Err(e) => {
                return Err(self.fail(TransportError::Resource(format!(
                    "cannot create staging dir: {}",
                    e
                ))))
            }
        };
        let staged_path = staging.path().join(CONFIG_FILENAME);
        if let Err(e) = tokio::fs::write(&staged_path, config_text).await {
            return Err(self.fail(TransportError::Resource(format!(
                "cannot stage configuration: {}",
                e
            ))));
        }
        self.set_phase(TftpPhase::Staged);
        self.emit(DeliveryEvent::Progress { fraction: 0.5 });

        self.set_phase(TftpPhase::ServerStarting);
        let (ready_tx, ready_rx) = oneshot::channel();
        let payload = config_text.as_bytes().to_vec();
        let server = tokio::spawn(run_staging_server(payload.clone(), ready_tx, self.read_timeout));

        let result = self.serve_and_upload(ready_rx, &payload).await;

        // Cleanup is unconditional: stop the server, drop the staging dir.
        server.abort();
        drop(staging);

        match result {
            Ok(()) => {
                self.set_phase(TftpPhase::Succeeded);
                self.set_phase(TftpPhase::CleanedUp);
                let message = format!(
                    "Configuration delivered to {} via TFTP as {}",
                    self.target_host, CONFIG_FILENAME
                );
                self.emit(DeliveryEvent::Progress { fraction: 1.0 });
                self.emit(DeliveryEvent::Completed {
                    message: message.clone(),
                });
                tracing::info!("TFTP delivery {} succeeded", attempt);
                Ok(message)
            }
            Err(err) => {
                let err = self.fail(err);
                tracing::error!("TFTP delivery {} failed: {}", attempt, err);
                Err(err)
            }
        }
    }

    async fn serve_and_upload(
        &mut self,
        ready_rx: oneshot::Receiver<Result<(), String>>,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        match timeout(self.server_ready_timeout, ready_rx).await {
            Err(_) => {
                return Err(TransportError::Timeout(
                    "TFTP server did not become ready in time".to_string(),
                ))
            }
            Ok(Err(_)) => {
                return Err(TransportError::Protocol(
                    "TFTP server task ended before signalling readiness".to_string(),
                ))
            }
            Ok(Ok(Err(e))) => {
                return Err(TransportError::Resource(format!(
                    "cannot start TFTP server: {}",
                    e
                )))
            }
            Ok(Ok(Ok(()))) => {}
        }
        self.set_phase(TftpPhase::ServerReady);
        self.emit(DeliveryEvent::Progress { fraction: 0.75 });

        self.set_phase(TftpPhase::Uploading);
        let addr = resolve(&self.target_host, TFTP_PORT).await?;
        upload_to(addr, CONFIG_FILENAME, payload, self.read_timeout).await
    }
}

async fn resolve(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
    lookup_host((host, port))
        .await
        .map_err(|e| TransportError::Unreachable(format!("cannot resolve {}: {}", host, e)))?
        .next()
        .ok_or_else(|| TransportError::Unreachable(format!("no address for {}", host)))
}

/// Probe reachability of the device's TFTP port.
///
/// A connected UDP socket cannot observe an absent listener by itself, so
/// a harmless RRQ is sent and the bounded read watches for an ICMP
/// port-unreachable (surfacing as `ConnectionRefused`). A silent timeout
/// counts as reachable: a filtered network is indistinguishable from a
/// server that ignores the probe.
pub async fn probe_connectivity(host: &str, probe_timeout: Duration) -> bool {
    let addr = match resolve(host, TFTP_PORT).await {
        Ok(a) => a,
        Err(_) => return false,
    };
    probe_addr(addr, probe_timeout).await
}

async fn probe_addr(addr: SocketAddr, probe_timeout: Duration) -> bool {
    let socket = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(s) => s,
        Err(_) => return false,
    };
    if socket.connect(addr).await.is_err() {
        return false;
    }
    let probe = encode_request(OP_RRQ, "probe");
    if socket.send(&probe).await.is_err() {
        return false;
    }
    let mut buf = [0u8; 128];
    match timeout(probe_timeout, socket.recv(&mut buf)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => e.kind() != std::io::ErrorKind::ConnectionRefused,
        Err(_) => true,
    }
}

/// Transient server loop: answer RRQs for the staged file until aborted.
async fn run_staging_server(
    payload: Vec<u8>,
    ready: oneshot::Sender<Result<(), String>>,
    read_timeout: Duration,
) {
    let socket = match UdpSocket::bind((std::net::Ipv4Addr::UNSPECIFIED, TFTP_PORT)).await {
        Ok(s) => {
            let _ = ready.send(Ok(()));
            s
        }
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };
    tracing::debug!("Transient TFTP server listening on {}", TFTP_PORT);

    let mut buf = [0u8; 1024];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("TFTP server recv error: {}", e);
                continue;
            }
        };
        match decode_request(&buf[..len]) {
            Some((OP_RRQ, filename)) if filename == CONFIG_FILENAME => {
                tracing::info!("Device {} pulling {}", peer, filename);
                if let Err(e) = send_blocks(&socket, peer, &payload, read_timeout).await {
                    tracing::warn!("Pull transfer to {} failed: {}", peer, e);
                }
            }
            Some((OP_RRQ, filename)) => {
                tracing::warn!("RRQ for unknown file '{}' from {}", filename, peer);
                let _ = socket
                    .send_to(&encode_error(1, "File not found"), peer)
                    .await;
            }
            _ => {
                // WRQs and stray packets are not served by the staging server
            }
        }
    }
}

/// Push the payload to a TFTP server with a WRQ (client -> device).
async fn upload_to(
    addr: SocketAddr,
    filename: &str,
    payload: &[u8],
    read_timeout: Duration,
) -> Result<(), TransportError> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| TransportError::Resource(format!("cannot bind upload socket: {}", e)))?;

    socket
        .send_to(&encode_request(OP_WRQ, filename), addr)
        .await
        .map_err(|e| TransportError::Protocol(format!("WRQ send failed: {}", e)))?;

    // The server answers from a fresh transfer TID; all DATA goes there.
    let mut buf = [0u8; 1024];
    let (len, peer) = match timeout(read_timeout, socket.recv_from(&mut buf)).await {
        Ok(Ok(r)) => r,
        Ok(Err(e)) => {
            return Err(TransportError::Protocol(format!("WRQ answer read failed: {}", e)))
        }
        Err(_) => {
            return Err(TransportError::Timeout(
                "no answer to write request".to_string(),
            ))
        }
    };
    expect_ack(&buf[..len], 0)?;

    let mut block: u16 = 1;
    let mut offset = 0usize;
    loop {
        let end = (offset + BLOCK_SIZE).min(payload.len());
        let chunk = &payload[offset..end];
        socket
            .send_to(&encode_data(block, chunk), peer)
            .await
            .map_err(|e| TransportError::Protocol(format!("DATA send failed: {}", e)))?;

        let len = match timeout(read_timeout, socket.recv(&mut buf)).await {
            Ok(Ok(len)) => len,
            Ok(Err(e)) => {
                return Err(TransportError::Protocol(format!("ACK read failed: {}", e)))
            }
            Err(_) => {
                return Err(TransportError::Timeout(format!(
                    "no acknowledgement for block {}",
                    block
                )))
            }
        };
        expect_ack(&buf[..len], block)?;

        offset = end;
        // A short (or empty) final block terminates the transfer
        if chunk.len() < BLOCK_SIZE {
            break;
        }
        block = block.wrapping_add(1);
    }
    Ok(())
}

/// Serve the payload as numbered DATA blocks, one ACK per block.
async fn send_blocks(
    socket: &UdpSocket,
    peer: SocketAddr,
    payload: &[u8],
    read_timeout: Duration,
) -> Result<(), TransportError> {
    let mut buf = [0u8; 1024];
    let mut block: u16 = 1;
    let mut offset = 0usize;
    loop {
        let end = (offset + BLOCK_SIZE).min(payload.len());
        let chunk = &payload[offset..end];
        socket
            .send_to(&encode_data(block, chunk), peer)
            .await
            .map_err(|e| TransportError::Protocol(format!("DATA send failed: {}", e)))?;

        let len = match timeout(read_timeout, socket.recv(&mut buf)).await {
            Ok(Ok(len)) => len,
            Ok(Err(e)) => {
                return Err(TransportError::Protocol(format!("ACK read failed: {}", e)))
            }
            Err(_) => {
                return Err(TransportError::Timeout(format!(
                    "no acknowledgement for block {}",
                    block
                )))
            }
        };
        expect_ack(&buf[..len], block)?;

        offset = end;
        if chunk.len() < BLOCK_SIZE {
            return Ok(());
        }
        block = block.wrapping_add(1);
    }
}

fn expect_ack(packet: &[u8], block: u16) -> Result<(), TransportError> {
    if let Some((code, message)) = decode_error(packet) {
        return Err(TransportError::Protocol(format!(
            "TFTP error {}: {}",
            code, message
        )));
    }
    match decode_ack(packet) {
        Some(acked) if acked == block => Ok(()),
        Some(acked) => Err(TransportError::Protocol(format!(
            "unexpected ACK {} while waiting for {}",
            acked, block
        ))),
        None => Err(TransportError::Protocol(
            "malformed packet while waiting for ACK".to_string(),
        )),
    }
}

// --- wire codec -----------------------------------------------------------

fn encode_request(opcode: u16, filename: &str) -> Vec<u8> {
    let mut packet = Vec::with_capacity(filename.len() + 9);
    packet.extend_from_slice(&opcode.to_be_bytes());
    packet.extend_from_slice(filename.as_bytes());
    packet.push(0);
    packet.extend_from_slice(b"octet");
    packet.push(0);
    packet
}

fn encode_data(block: u16, chunk: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(chunk.len() + 4);
    packet.extend_from_slice(&OP_DATA.to_be_bytes());
    packet.extend_from_slice(&block.to_be_bytes());
    packet.extend_from_slice(chunk);
    packet
}

fn encode_error(code: u16, message: &str) -> Vec<u8> {
    let mut packet = Vec::with_capacity(message.len() + 5);
    packet.extend_from_slice(&OP_ERROR.to_be_bytes());
    packet.extend_from_slice(&code.to_be_bytes());
    packet.extend_from_slice(message.as_bytes());
    packet.push(0);
    packet
}

fn opcode_of(packet: &[u8]) -> Option<u16> {
    if packet.len() < 2 {
        return None;
    }
    Some(u16::from_be_bytes([packet[0], packet[1]]))
}

fn decode_request(packet: &[u8]) -> Option<(u16, String)> {
    let opcode = opcode_of(packet)?;
    if opcode != OP_RRQ && opcode != OP_WRQ {
        return None;
    }
    let rest = &packet[2..];
    let end = rest.iter().position(|&b| b == 0)?;
    let filename = String::from_utf8(rest[..end].to_vec()).ok()?;
    Some((opcode, filename))
}

fn decode_ack(packet: &[u8]) -> Option<u16> {
    if opcode_of(packet)? != OP_ACK || packet.len() < 4 {
        return None;
    }
    Some(u16::from_be_bytes([packet[2], packet[3]]))
}

fn decode_error(packet: &[u8]) -> Option<(u16, String)> {
    if opcode_of(packet)? != OP_ERROR || packet.len() < 4 {
        return None;
    }
    let code = u16::from_be_bytes([packet[2], packet[3]]);
    let text = packet[4..]
        .split(|&b| b == 0)
        .next()
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .unwrap_or_default();
    Some((code, text))
}
