//! Loopback demonstration of `fragwire`.
//!
//! Sends one oversized message through a recording transport, replays the
//! captured fragments into a second connection and checks the result.

mod cli;

use bytes::Bytes;
use clap::Parser;
use fragwire::{BufferedConnection, FragmentationConfig, Transport};
use tracing::info;

#[derive(Debug, Default)]
struct Outbox {
    frames: Vec<Bytes>,
}

impl Transport for Outbox {
    fn send(&mut self, frame: Bytes) { self.frames.push(frame); }

    fn close(&mut self) {}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = cli::Cli::parse();
    let config = FragmentationConfig::for_transport_mtu(cli.mtu)
        .ok_or("mtu is too small to carry a fragment envelope")?;
    let message: String = "abcdefghijklmnopqrstuvwxyz"
        .chars()
        .cycle()
        .take(cli.size)
        .collect();

    let mut sender =
        BufferedConnection::<String, _, _>::with_config(Outbox::default(), |_: String| {}, config);
    sender.send_message(&message, false)?;
    let (outbox, _) = sender.into_parts();
    let largest = outbox.frames.iter().map(Bytes::len).max().unwrap_or_default();
    info!(
        frames = outbox.frames.len(),
        largest,
        cap = config.max_fragment_payload.get(),
        "message encoded"
    );

    let frames = cli.order.apply(outbox.frames);
    let mut received = Vec::new();
    let mut receiver = BufferedConnection::<String, _, _>::with_config(
        Outbox::default(),
        |m: String| received.push(m),
        config,
    );
    for frame in &frames {
        receiver.on_bytes_received(frame)?;
    }
    let pending = receiver.pending_reassemblies();
    drop(receiver);

    let intact = received.len() == 1 && received[0] == message;
    info!(order = ?cli.order, delivered = received.len(), pending, intact, "message rebuilt");
    if intact {
        Ok(())
    } else {
        Err("reassembled message did not match".into())
    }
}
