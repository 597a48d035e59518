//! Chat session core — transcript store plus single-flight send.
//!
//! ```text
//! ChatSession::send() ──▶ LlmProvider::complete() ──▶ reply appended
//!        │                                              (or error notice
//!        └─ clear() bumps the generation: a reply        + failure notice)
//!           landing after a clear is dropped
//! ```

pub mod message;
pub mod session;

pub use message::{Message, Role};
pub use session::{
    ChatSession, SendFailure, SendOutcome, SessionText, DEFAULT_ERROR_NOTICE, DEFAULT_GREETING,
};
