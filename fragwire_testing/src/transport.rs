//! In-memory [`Transport`] that records every frame it is given.

use bytes::Bytes;
use fragwire::Transport;

/// Transport double capturing outbound frames and close calls.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Vec<Bytes>,
    close_calls: usize,
}

impl RecordingTransport {
    /// Frames sent so far, in transmission order.
    #[must_use]
    pub fn sent(&self) -> &[Bytes] { &self.sent }

    /// Remove and return every recorded frame.
    pub fn take_sent(&mut self) -> Vec<Bytes> { std::mem::take(&mut self.sent) }

    /// Number of times [`Transport::close`] was invoked.
    #[must_use]
    pub fn close_calls(&self) -> usize { self.close_calls }

    /// Largest frame sent so far.
    #[must_use]
    pub fn largest_frame(&self) -> usize { self.sent.iter().map(Bytes::len).max().unwrap_or(0) }

    /// Decode every recorded frame as JSON for structural assertions.
    ///
    /// # Panics
    ///
    /// Panics if a recorded frame is not valid JSON.
    #[must_use]
    pub fn sent_json(&self) -> Vec<serde_json::Value> {
        self.sent
            .iter()
            .map(|frame| serde_json::from_slice(frame).expect("recorded frame is not JSON"))
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, frame: Bytes) { self.sent.push(frame); }

    fn close(&mut self) { self.close_calls += 1; }
}
