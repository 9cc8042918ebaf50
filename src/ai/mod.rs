//! Chat backend integration module.

pub mod config;
mod provider;
mod providers;
mod router;
mod session;

pub use config::{AiMode, AiSettings};
pub use router::{AiCheckReport, ChatEngine, ChatReply, ai_check_report};
pub use session::{ChatRole, ChatSession, ChatTurn};
