//! Buffered connection driving fragmentation in both directions.
//!
//! [`BufferedConnection`] sits between an application and a [`Transport`]
//! that only accepts payloads up to a fixed size. Outbound messages larger
//! than the configured cap are split into fragment envelopes and sent one by
//! one. Inbound deliveries run through the [`MessageRouter`]; complete
//! application messages reach the [`DataHandler`] exactly once, however many
//! fragments carried them.
//!
//! All work happens synchronously on the caller's thread. Each delivery is
//! fully handled, including any reassembly, before
//! [`BufferedConnection::on_bytes_received`] returns.

use std::marker::PhantomData;

use bytes::Bytes;
use log::{debug, info, warn};

use crate::{
    config::SerializationFormat,
    envelope::Envelope,
    error::{ConnectionError, Result},
    fragment::{FragmentationConfig, Fragmenter, Reassembler},
    message::Message,
    router::{MessageRouter, Routed},
};

/// Size-limited transport consumed by a [`BufferedConnection`].
pub trait Transport {
    /// Hand one encoded envelope to the transport.
    ///
    /// Delivery failures are the transport's concern and are not reported
    /// back to the connection.
    fn send(&mut self, frame: Bytes);

    /// Terminate the underlying transport.
    fn close(&mut self);
}

/// Receiver of complete application messages.
///
/// Implemented for any `FnMut(M)` closure.
pub trait DataHandler<M> {
    /// Called once per fully available application message.
    fn on_data(&mut self, message: M);
}

impl<M, F> DataHandler<M> for F
where
    F: FnMut(M),
{
    fn on_data(&mut self, message: M) { self(message) }
}

/// Connection that transparently fragments and reassembles messages.
pub struct BufferedConnection<M, T, H> {
    transport: T,
    handler: H,
    config: FragmentationConfig,
    router: MessageRouter,
    fragmenter: Fragmenter,
    reassembler: Reassembler,
    open: bool,
    _message: PhantomData<fn(M)>,
}

impl<M, T, H> BufferedConnection<M, T, H>
where
    M: Message,
    T: Transport,
    H: DataHandler<M>,
{
    /// Create a connection using the default fragment size and JSON encoding.
    #[must_use]
    pub fn new(transport: T, handler: H) -> Self {
        Self::with_config(transport, handler, FragmentationConfig::default())
    }

    /// Create a connection with an explicit fragmentation setting.
    #[must_use]
    pub fn with_config(transport: T, handler: H, config: FragmentationConfig) -> Self {
        Self {
            transport,
            handler,
            config,
            router: MessageRouter::default(),
            fragmenter: Fragmenter::new(config.max_fragment_payload),
            reassembler: Reassembler::new(),
            open: true,
            _message: PhantomData,
        }
    }

    /// Replace the wire format used in both directions.
    #[must_use]
    pub fn with_format(mut self, format: SerializationFormat) -> Self {
        self.router = MessageRouter::new(format);
        self
    }

    /// Encode `message` and send it, splitting it when it is too large.
    ///
    /// The message is split when its encoded size exceeds the configured
    /// payload cap, unless `already_fragment` marks it as the product of an
    /// earlier split.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Closed`] after [`close`](Self::close),
    /// or an encoding or fragmentation error. Nothing is sent on error.
    pub fn send_message(&mut self, message: &M, already_fragment: bool) -> Result<()> {
        self.ensure_open()?;
        let encoded = self.format().encode_envelope(&Envelope::Plain(message))?;
        self.send_encoded(encoded, already_fragment)
    }

    /// Send a pre-built envelope.
    ///
    /// Fragment and control envelopes are sent as they are; plain envelopes
    /// follow the same size rule as [`send_message`](Self::send_message).
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Closed`] after [`close`](Self::close),
    /// or an encoding or fragmentation error.
    pub fn send_envelope(&mut self, envelope: &Envelope<M>) -> Result<()> {
        self.ensure_open()?;
        let encoded = self.format().encode_envelope(envelope)?;
        self.send_encoded(encoded, !matches!(envelope, Envelope::Plain(_)))
    }

    /// Tell the peer the connection is closing, then close it locally.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Closed`] if the connection is already closed.
    pub fn send_close(&mut self) -> Result<()> {
        self.send_envelope(&Envelope::close())?;
        self.close();
        Ok(())
    }

    /// Entry point for every inbound transport delivery.
    ///
    /// Deliveries arriving after [`close`](Self::close) are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Router`] when the bytes are not a valid
    /// envelope or a fragment does not fit its message. Buffered fragments
    /// of other messages are unaffected.
    pub fn on_bytes_received(&mut self, raw: &[u8]) -> Result<()> {
        if !self.open {
            warn!("dropping {} bytes received after close", raw.len());
            return Ok(());
        }

        match self.router.dispatch::<M>(raw, &mut self.reassembler)? {
            Routed::Data(message) => self.handler.on_data(message),
            Routed::Close => {
                debug!("peer requested close");
                self.close();
            }
            Routed::Pending => {}
        }
        Ok(())
    }

    /// Close the transport and abandon every partially received message.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.transport.close();
        let abandoned = self.reassembler.clear();
        info!(
            "connection closed: abandoned_reassemblies={}",
            abandoned.len()
        );
    }

    /// Report whether the connection still accepts traffic.
    #[must_use]
    pub const fn is_open(&self) -> bool { self.open }

    /// Number of messages with fragments still outstanding.
    #[must_use]
    pub fn pending_reassemblies(&self) -> usize { self.reassembler.buffered_len() }

    /// Return the fragmentation setting.
    #[must_use]
    pub const fn config(&self) -> FragmentationConfig { self.config }

    /// Return the wire format.
    #[must_use]
    pub const fn format(&self) -> SerializationFormat { self.router.format() }

    /// Borrow the transport.
    #[must_use]
    pub const fn transport(&self) -> &T { &self.transport }

    /// Mutably borrow the transport.
    pub fn transport_mut(&mut self) -> &mut T { &mut self.transport }

    /// Borrow the data handler.
    #[must_use]
    pub const fn handler(&self) -> &H { &self.handler }

    /// Consume the connection, returning the transport and handler.
    #[must_use]
    pub fn into_parts(self) -> (T, H) { (self.transport, self.handler) }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(ConnectionError::Closed)
        }
    }

    fn send_encoded(&mut self, encoded: Vec<u8>, already_fragment: bool) -> Result<()> {
        if already_fragment || encoded.len() <= self.config.max_fragment_payload.get() {
            self.transport.send(Bytes::from(encoded));
            return Ok(());
        }

        let batch = self.fragmenter.fragment_bytes(&encoded)?;
        let message_id = batch.message_id();
        let frames = batch
            .into_iter()
            .map(|frame| {
                self.format()
                    .encode_envelope(&Envelope::<M>::Fragment(frame))
                    .map(Bytes::from)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "sending {} fragments: message_id={message_id}, bytes={}",
            frames.len(),
            encoded.len()
        );
        for frame in frames {
            self.transport.send(frame);
        }
        Ok(())
    }
}
