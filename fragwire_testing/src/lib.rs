//! Utilities for exercising [`BufferedConnection`](fragwire::BufferedConnection)
//! in tests without a real transport.
//!
//! ```rust
//! use fragwire::BufferedConnection;
//! use fragwire_testing::{Inbox, RecordingTransport};
//!
//! let mut conn: BufferedConnection<String, _, _> =
//!     BufferedConnection::new(RecordingTransport::default(), Inbox::default());
//! conn.send_message(&"hello".to_owned(), false).unwrap();
//! assert_eq!(conn.transport().sent().len(), 1);
//! ```

pub mod handler;
pub mod logging;
pub mod payloads;
pub mod transport;

pub use handler::Inbox;
pub use logging::{LoggerHandle, logger};
pub use payloads::{patterned_payload, reorder};
pub use transport::RecordingTransport;
