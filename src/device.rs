//! Serial instrument feed.
//!
//! The port is read on a dedicated thread that forwards complete lines into a
//! bounded channel; the push-driven loop consumes the other end. Read timeouts
//! are not errors, they only bound how long a single read blocks.

use crate::config::DeviceConfig;
use crate::error::DeviceError;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

const FRAME_CHANNEL_CAPACITY: usize = 64;
const MAX_LINE_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    pub name: String,
    pub kind: String,
}

pub fn available_ports() -> Result<Vec<PortInfo>, DeviceError> {
    let ports = serialport::available_ports().map_err(DeviceError::Enumerate)?;

    Ok(ports
        .into_iter()
        .map(|port| PortInfo {
            kind: port_type_name(&port.port_type).to_string(),
            name: port.port_name,
        })
        .collect())
}

fn port_type_name(port_type: &serialport::SerialPortType) -> &'static str {
    match port_type {
        serialport::SerialPortType::UsbPort(_) => "USB",
        serialport::SerialPortType::BluetoothPort => "Bluetooth",
        serialport::SerialPortType::PciPort => "PCI",
        serialport::SerialPortType::Unknown => "Unknown",
    }
}

/// Opens the instrument and starts the reader thread.
///
/// Failing to open the port is fatal; once open, the feed ends (and the
/// channel closes) only on an unrecoverable read error or when the receiver
/// is dropped.
pub fn open_instrument(config: &DeviceConfig) -> Result<mpsc::Receiver<String>, DeviceError> {
    let port = serialport::new(&config.port, config.baud_rate)
        .timeout(config.read_timeout())
        .flow_control(serialport::FlowControl::None)
        .open()
        .map_err(|source| DeviceError::Open {
            port: config.port.clone(),
            source,
        })?;

    info!("🔌 Instrument open on {} at {} baud", config.port, config.baud_rate);
    spawn_line_reader(port, format!("instrument-{}", config.port))
}

/// Forwards lines from any byte stream with read timeouts into a channel.
pub fn spawn_line_reader<R>(reader: R, name: String) -> Result<mpsc::Receiver<String>, DeviceError>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(FRAME_CHANNEL_CAPACITY);

    thread::Builder::new()
        .name(name)
        .spawn(move || read_lines(BufReader::new(reader), tx))?;

    Ok(rx)
}

fn read_lines<R: BufRead>(mut reader: R, tx: mpsc::Sender<String>) {
    let mut buffer = Vec::with_capacity(MAX_LINE_BYTES);

    loop {
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => {
                if !buffer.is_empty() && !forward(&tx, &mut buffer) {
                    return;
                }
                info!("Instrument stream ended");
                return;
            }
            Ok(_) => {
                if buffer.last() == Some(&b'\n') && !forward(&tx, &mut buffer) {
                    return;
                }
            }
            // Partial data stays in the buffer until the rest of the line arrives
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted) => {}
            Err(e) => {
                error!("Instrument read failed: {}", e);
                return;
            }
        }

        if buffer.len() > MAX_LINE_BYTES {
            warn!("Discarding {} bytes without a line terminator", buffer.len());
            buffer.clear();
        }
    }
}

/// Sends the buffered line. Returns false once the receiver is gone.
fn forward(tx: &mpsc::Sender<String>, buffer: &mut Vec<u8>) -> bool {
    let line = String::from_utf8_lossy(buffer).trim().to_string();
    buffer.clear();

    if line.is_empty() {
        return true;
    }

    debug!("Frame: {}", line);
    tx.blocking_send(line).is_ok()
}
