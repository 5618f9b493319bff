//! Conversational weather assistant for tianqi
//!
//! The user names a day in free text, confirms it, and gets the Taipei
//! forecast for that day. Session state lives outside the engine so a
//! conversation can be resumed from any request.

pub mod keywords;
pub mod resolver;
pub mod reply;
pub mod session;
pub mod engine;
pub mod wire;

pub use engine::ChatEngine;
pub use keywords::{classify_confirmation, Confirmation};
pub use resolver::{date_examples, resolve};
pub use session::{SessionState, Turn};
pub use wire::{ChatInit, ChatRequest, ChatResponse};
