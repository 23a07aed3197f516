//! parley-session: conversation state and the exchange loop against a relay.
//!
//! This crate provides the client-side controller for a parley chat: the
//! append-only history, the transport seam to the relay endpoint, staged
//! file attachments, and the word-by-word reveal used for presentation.

pub mod attachment;
pub mod conversation;
pub mod error;
pub mod reveal;
pub mod session;
pub mod transport;

pub use attachment::Attachment;
pub use conversation::ChatHistory;
pub use error::{Error, Result};
pub use reveal::WordReveal;
pub use session::Session;
pub use transport::{RelayTransport, Transport};
