//! Value objects representing immutable domain concepts.

pub mod channel;

// Re-export commonly used types
pub use channel::{Channel, ChannelKind, Email, Phone};
