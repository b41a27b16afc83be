//! Delivery transports.
//!
//! Two out-of-band channels carry generated configuration text to the
//! device: a TFTP push ([`tftp::TftpDelivery`]) and a paced serial
//! console session ([`serial::SerialConfigSender`]). Both report progress
//! through a [`DeliveryEvent`] channel and fail through the
//! [`TransportError`] taxonomy.

pub mod serial;
pub mod tftp;

use serde::Serialize;

/// DeliveryEvent is the tagged progress stream of one delivery attempt
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryEvent {
    /// Overall completion fraction in [0, 1]
    Progress { fraction: f32 },
    /// One configuration line went out
    LineSent {
        line: String,
        index: usize,
        total: usize,
    },
    Completed { message: String },
    Error { message: String },
}

/// TransportError classifies delivery failures
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Target unreachable before any transfer attempt
    #[error("target unreachable: {0}")]
    Unreachable(String),
    /// Protocol-level negotiation or transfer failure
    #[error("transport protocol error: {0}")]
    Protocol(String),
    /// Staging file or device open failure
    #[error("resource error: {0}")]
    Resource(String),
    /// A bounded wait elapsed
    #[error("timeout: {0}")]
    Timeout(String),
}

/// Capabilities reports which transports this process can offer.
/// Constructed once at startup and passed to callers explicitly.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub tftp: bool,
    pub serial: bool,
}

impl Capabilities {
    pub fn detect() -> Self {
        // TFTP is compiled in; serial requires an enumerable subsystem.
        let serial = serialport::available_ports().is_ok();
        let caps = Self { tftp: true, serial };
        tracing::info!("Transport capabilities: tftp={} serial={}", caps.tftp, caps.serial);
        caps
    }
}
