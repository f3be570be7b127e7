//! Telemetry feed: a TCP line reader on its own thread.
//!
//! The producer side of the engine's single handoff: it connects to the
//! navigation server, reads ASCII lines, parses RMC sentences, and sends
//! whole [`Fix`] values over a channel. Whole-value messages are what
//! guarantee the no-torn-reads requirement: the consumer can never see
//! yesterday's latitude with today's longitude.
//!
//! Connection handling matches shipboard reality: the server vanishes
//! whenever the bridge network blips, so every failure path funnels into
//! a one-second backoff and a reconnect, forever. Transitions are
//! reported on the same channel so the consumer can log them.

use crate::nmea::{parse_rmc, Fix};
use std::io::{BufRead, BufReader};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Messages from the feed thread to the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Connected,
    Disconnected,
    Fix(Fix),
}

/// Spawns the feed thread. It runs until the receiver is dropped.
pub fn spawn(address: String, tx: Sender<FeedMessage>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("pelorus-feed".into())
        .spawn(move || run(&address, &tx))
        .expect("failed to spawn feed thread")
}

fn run(address: &str, tx: &Sender<FeedMessage>) {
    loop {
        match connect(address) {
            Ok(stream) => {
                log::info!("feed connected to {address}");
                if tx.send(FeedMessage::Connected).is_err() {
                    return;
                }
                read_lines(stream, tx);
                log::warn!("feed lost connection to {address}");
                if tx.send(FeedMessage::Disconnected).is_err() {
                    return;
                }
            }
            Err(err) => {
                log::debug!("feed connect to {address} failed: {err}");
            }
        }

        thread::sleep(RECONNECT_BACKOFF);
    }
}

fn connect(address: &str) -> std::io::Result<TcpStream> {
    let mut last_error = None;
    for addr in address.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no addresses resolved")
    }))
}

fn read_lines(stream: TcpStream, tx: &Sender<FeedMessage>) {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => return,
        };
        if let Some(fix) = parse_rmc(&line) {
            if tx.send(FeedMessage::Fix(fix)).is_err() {
                return;
            }
        }
    }
}
