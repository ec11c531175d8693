//! Command line interface for the `fragwire` demonstration binary.
//!
//! The binary splits a synthetic message for a given transport MTU, delivers
//! the fragments to a second connection in a chosen order and reports what
//! was rebuilt.

use clap::{Parser, ValueEnum};

/// Order in which fragments are handed to the receiving connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DeliveryOrder {
    /// Transmission order.
    #[default]
    Forward,
    /// Last fragment first.
    Reverse,
    /// Even positions first, then odd positions.
    EvenOdd,
}

impl DeliveryOrder {
    /// Reorder `frames` according to this delivery order.
    #[must_use]
    pub fn apply<T>(self, mut frames: Vec<T>) -> Vec<T> {
        match self {
            Self::Forward => frames,
            Self::Reverse => {
                frames.reverse();
                frames
            }
            Self::EvenOdd => {
                let (even, odd): (Vec<_>, Vec<_>) = frames
                    .into_iter()
                    .enumerate()
                    .partition(|(position, _)| position % 2 == 0);
                even.into_iter().chain(odd).map(|(_, frame)| frame).collect()
            }
        }
    }
}

/// Command line arguments for the `fragwire` binary.
#[derive(Debug, Parser)]
#[command(
    name = "fragwire",
    version,
    about = "Split a message for a size-limited transport and rebuild it"
)]
pub struct Cli {
    /// Size of the synthetic message in bytes.
    #[arg(short, long, default_value_t = 10_000)]
    pub size: usize,
    /// Largest envelope the transport accepts, in bytes.
    #[arg(short, long, default_value_t = 4_000)]
    pub mtu: usize,
    /// Order in which fragments reach the receiver.
    #[arg(short, long, value_enum, default_value_t = DeliveryOrder::Forward)]
    pub order: DeliveryOrder,
}
