//! Data handler that keeps every delivered message.

use fragwire::DataHandler;

/// Collects messages delivered by a connection.
#[derive(Debug)]
pub struct Inbox<M> {
    messages: Vec<M>,
}

impl<M> Default for Inbox<M> {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
        }
    }
}

impl<M> Inbox<M> {
    /// Messages delivered so far, in delivery order.
    #[must_use]
    pub fn messages(&self) -> &[M] { &self.messages }

    /// Number of delivered messages.
    #[must_use]
    pub fn len(&self) -> usize { self.messages.len() }

    /// Whether nothing has been delivered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.messages.is_empty() }
}

impl<M> DataHandler<M> for Inbox<M> {
    fn on_data(&mut self, message: M) { self.messages.push(message); }
}
