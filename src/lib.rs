//! reconchat — Shodan host lookup with an AI analyst
//!
//! A conversational CLI that routes user input either to a Shodan host
//! lookup or straight to a chat model. Lookup results run through a
//! two-stage data-shaping pipeline:
//! - normalize: raw, partially-optional host record -> fixed-shape record
//! - compose: fixed-shape record -> deterministic analysis prompt
//!
//! The prompt is then handed to a local (Ollama) or cloud (Gemini) chat
//! backend that keeps multi-turn history.

pub mod ai;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod shodan;

pub use ai::{AiCheckReport, AiMode, AiSettings, ChatEngine, ChatReply, ChatRole, ChatSession, ChatTurn, ai_check_report};
pub use analysis::{compose, normalize};
pub use app::{AppContext, OutputHook, UserQuery, classify_query, execute_command_with_context, run};
pub use cli::{CliCommand, parse_cli_args, usage_text, version_text};
pub use config::Settings;
pub use models::{LocationInfo, NormalizedRecord, ServiceEntry, VulnerabilityEntry};
pub use shodan::{HostLookup, LookupError, ShodanClient};

// Re-export logging macros for use across crate
pub use crate::logging::macros;
