//! Serial console delivery.
//!
//! Configuration text is pushed line by line over a console session. The
//! paced loop runs on a blocking task so the caller's flow returns
//! immediately; progress flows back over a [`DeliveryEvent`] channel.
//! Cancellation is cooperative and only takes effect at line boundaries.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serialport::SerialPort;
use tokio::sync::mpsc;

use super::{DeliveryEvent, TransportError};

/// Prompt byte the bounded per-line read looks for
const PROMPT_DELIMITER: u8 = b'#';

/// Standard console baud rates offered to the operator
pub fn standard_baud_rates() -> [u32; 5] {
    [9600, 19200, 38400, 57600, 115_200]
}

/// Names of the serial ports present on this host
pub fn available_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            tracing::warn!("Cannot enumerate serial ports: {}", e);
            Vec::new()
        }
    }
}

/// SerialConfigSender pushes one configuration over a console line.
/// Instances are single-use per delivery attempt.
pub struct SerialConfigSender {
    port_name: String,
    baud_rate: u32,
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
    cancel: Arc<AtomicBool>,
}

impl SerialConfigSender {
    pub fn new(port_name: &str, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            port_name: port_name.to_string(),
            baud_rate,
            timeout,
            port: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open the console session: 8 data bits, no parity, 1 stop bit
    pub fn connect(&mut self) -> Result<(), TransportError> {
        let port = serialport::new(&self.port_name, self.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(self.timeout)
            .open()
            .map_err(|e| {
                TransportError::Resource(format!("cannot open {}: {}", self.port_name, e))
            })?;
        tracing::info!("Serial port {} opened at {} baud", self.port_name, self.baud_rate);
        self.port = Some(port);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    pub fn disconnect(&mut self) {
        if self.port.take().is_some() {
            tracing::info!("Serial port {} closed", self.port_name);
        }
    }

    /// Start the asynchronous transfer and return its event stream.
    /// The call returns immediately; the paced loop runs on a blocking
    /// task and owns the port until it finishes.
    pub fn send_configuration(
        &mut self,
        config_text: &str,
        line_delay: Duration,
    ) -> Result<mpsc::UnboundedReceiver<DeliveryEvent>, TransportError> {
        if self.port.is_none() {
            self.connect()?;
        }
        let mut port = self
            .port
            .take()
            .ok_or_else(|| TransportError::Resource("serial port not connected".to_string()))?;

        self.cancel.store(false, Ordering::SeqCst);
        let cancel = self.cancel.clone();
        let text = config_text.to_string();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || {
            run_transfer(&mut port, &text, line_delay, &cancel, &tx);
        });
        Ok(rx)
    }

    /// Request cancellation. Cooperative: a line already in flight
    /// completes its write before the flag is observed.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        tracing::info!("Serial transfer cancellation requested");
    }
}

/// The paced line loop. One line is fully written and its prompt read
/// attempted before the next begins; no pipelining.
fn run_transfer<T: Read + Write>(
    device: &mut T,
    config_text: &str,
    line_delay: Duration,
    cancel: &AtomicBool,
    events: &mpsc::UnboundedSender<DeliveryEvent>,
) {
    let lines: Vec<&str> = config_text.lines().collect();
    let total = lines.len();

    for (i, line) in lines.iter().enumerate() {
        if cancel.load(Ordering::SeqCst) {
            tracing::info!("Serial transfer cancelled after {} of {} lines", i, total);
            return;
        }

        if let Err(e) = device.write_all(format!("{}\r\n", line).as_bytes()) {
            tracing::error!("Serial write failed at line {}: {}", i + 1, e);
            let _ = events.send(DeliveryEvent::Error {
                message: format!("write failed at line {}: {}", i + 1, e),
            });
            return;
        }

        // Best-effort: consume any echo up to the prompt; the content is
        // not validated and a quiet device is fine.
        if let Err(e) = read_until_prompt(device, PROMPT_DELIMITER) {
            tracing::error!("Serial read failed at line {}: {}", i + 1, e);
            let _ = events.send(DeliveryEvent::Error {
                message: format!("read failed at line {}: {}", i + 1, e),
            });
            return;
        }

        let _ = events.send(DeliveryEvent::LineSent {
            line: line.to_string(),
            index: i + 1,
            total,
        });
        let _ = events.send(DeliveryEvent::Progress {
            fraction: (i + 1) as f32 / total.max(1) as f32,
        });

        std::thread::sleep(line_delay);
    }

    if !cancel.load(Ordering::SeqCst) {
        let _ = events.send(DeliveryEvent::Completed {
            message: format!("Configuration sent ({} lines)", total),
        });
    }
}

/// Read byte-wise until the delimiter, end of stream, or the port's
/// timeout. Timeouts are expected, not errors.
fn read_until_prompt<T: Read>(device: &mut T, delimiter: u8) -> std::io::Result<()> {
    let mut byte = [0u8; 1];
    loop {
        match device.read(&mut byte) {
            Ok(0) => return Ok(()),
            Ok(_) => {
                if byte[0] == delimiter {
                    return Ok(());
                }
            }
            Err(e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                return Ok(())
            }
            Err(e) => return Err(e),
        }
    }
}
