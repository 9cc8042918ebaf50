use anyhow::{Context, Result};
use reqwest::Client;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

use crate::ai::{AiSettings, ChatEngine, ChatReply, ai_check_report};
use crate::analysis::{compose, normalize};
use crate::cli::{CliCommand, parse_cli_args, usage_text, version_text};
use crate::config::Settings;
use crate::shodan::{HostLookup, ShodanClient};

const LOOKUP_TIMEOUT_SECS: u64 = 30;

pub type OutputHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Execution context for command dispatch. Tests inject an output hook
/// and a stub lookup capability; production uses stdout and the real
/// Shodan client built from configuration.
#[derive(Clone)]
pub struct AppContext {
    ai_settings: AiSettings,
    output_hook: OutputHook,
    lookup: Option<Arc<dyn HostLookup>>,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AppContext {
    pub fn from_env() -> Self {
        Self {
            ai_settings: AiSettings::from_env(),
            output_hook: Arc::new(|line| println!("{}", line)),
            lookup: None,
        }
    }

    pub fn with_ai_settings(mut self, ai_settings: AiSettings) -> Self {
        self.ai_settings = ai_settings;
        self
    }

    pub fn with_output_hook(mut self, output_hook: OutputHook) -> Self {
        self.output_hook = output_hook;
        self
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn HostLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn ai_settings(&self) -> &AiSettings {
        &self.ai_settings
    }

    pub fn emit_line(&self, line: &str) {
        (self.output_hook)(line);
    }

    /// The injected lookup capability, or the real Shodan client built
    /// from configuration. Built lazily so chat-only sessions never
    /// require a Shodan key.
    fn resolve_lookup(&self) -> Result<Arc<dyn HostLookup>> {
        if let Some(lookup) = &self.lookup {
            return Ok(Arc::clone(lookup));
        }
        let settings = Settings::load()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .context("Failed to build Shodan HTTP client")?;
        Ok(Arc::new(ShodanClient::new(client, settings.api_keys.shodan)))
    }
}

/// Run the app by parsing CLI-style args and dispatching the command.
pub async fn run<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let command = parse_cli_args(args)?;
    let context = AppContext::from_env();
    execute_command_with_context(command, &context).await
}

/// Execute a pre-parsed command with an explicit execution context.
pub async fn execute_command_with_context(command: CliCommand, context: &AppContext) -> Result<()> {
    match command {
        CliCommand::Help => {
            context.emit_line(&usage_text());
            Ok(())
        }
        CliCommand::Version => {
            context.emit_line(&version_text());
            Ok(())
        }
        CliCommand::AiCheck => {
            let report = ai_check_report(context.ai_settings());
            let output = serde_json::to_string_pretty(&report)
                .context("Failed to serialize ai-check report")?;
            context.emit_line(&output);
            Ok(())
        }
        CliCommand::Lookup { host, prompt_only } => {
            handle_lookup(context, &host, prompt_only).await
        }
        CliCommand::Chat => run_chat_loop(context).await,
    }
}

/// One-shot lookup: fetch, normalize, compose, and either print the
/// prompt or hand it to the chat backend.
async fn handle_lookup(context: &AppContext, host: &str, prompt_only: bool) -> Result<()> {
    let lookup = context.resolve_lookup()?;
    let raw = lookup.fetch_host(host).await?;
    let record = normalize(&raw);
    let prompt = compose(&record);

    if prompt_only {
        context.emit_line(&prompt);
        return Ok(());
    }

    let mut engine = ChatEngine::new(context.ai_settings().clone())?;
    let reply = engine.generate(&prompt).await?;
    crate::log_debug!(
        "lookup reply from {} ({})",
        reply.provider,
        reply.model
    );
    context.emit_line(&reply.text);
    Ok(())
}

/// Classification of one line of user input. Exactly one variant per
/// line; the lookup check is a single prefix test.
#[derive(Debug, PartialEq, Eq)]
pub enum UserQuery {
    Help,
    Clear,
    Exit,
    Lookup(String),
    Chat(String),
}

pub fn classify_query(line: &str) -> UserQuery {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "help" => return UserQuery::Help,
        "clear" => return UserQuery::Clear,
        "exit" => return UserQuery::Exit,
        _ => {}
    }

    let bytes = trimmed.as_bytes();
    if bytes.len() >= 7 && bytes[..7].eq_ignore_ascii_case(b"search:") {
        UserQuery::Lookup(trimmed[7..].trim().to_string())
    } else {
        UserQuery::Chat(trimmed.to_string())
    }
}

fn chat_help_text() -> &'static str {
    "\nAvailable commands:\n  \
search:<host>  - Look up and analyze an IP address or hostname\n  \
clear          - Clear the chat history\n  \
help           - Show this help message\n  \
exit           - Exit the program\n\n\
You can also just chat normally with the bot!"
}

/// Interactive read-eval loop. One query at a time; a failed external
/// call aborts that query only and the loop keeps accepting input.
async fn run_chat_loop(context: &AppContext) -> Result<()> {
    let mut engine = ChatEngine::new(context.ai_settings().clone())?;
    let mut lookup: Option<Arc<dyn HostLookup>> = None;

    context.emit_line("\n=== Recon Chat ===");
    context.emit_line(chat_help_text());
    context.emit_line(&format!("\n{}", "=".repeat(50)));

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\nYou: ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            // EOF on stdin
            context.emit_line("\nGoodbye!");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match classify_query(&line) {
            UserQuery::Exit => {
                context.emit_line("\nGoodbye!");
                break;
            }
            UserQuery::Help => context.emit_line(chat_help_text()),
            UserQuery::Clear => {
                engine.reset_history();
                context.emit_line("\nChat history cleared!");
            }
            UserQuery::Lookup(host) => {
                let outcome = lookup_and_analyze(context, &mut engine, &mut lookup, &host).await;
                report_outcome(context, outcome);
            }
            UserQuery::Chat(text) => {
                let outcome = engine.generate(&text).await;
                report_outcome(context, outcome);
            }
        }
    }

    Ok(())
}

async fn lookup_and_analyze(
    context: &AppContext,
    engine: &mut ChatEngine,
    lookup: &mut Option<Arc<dyn HostLookup>>,
    host: &str,
) -> Result<ChatReply> {
    if host.is_empty() {
        anyhow::bail!("search: requires a host, e.g. `search:8.8.8.8`");
    }

    let client = match lookup {
        Some(client) => Arc::clone(client),
        None => {
            let resolved = context.resolve_lookup()?;
            *lookup = Some(Arc::clone(&resolved));
            resolved
        }
    };

    crate::log_stderr!("Looking up host {} via Shodan", host);
    let raw = client.fetch_host(host).await?;
    let record = normalize(&raw);
    let prompt = compose(&record);
    crate::log_debug!("composed analysis prompt for {}:\n{}", host, prompt);

    engine.generate(&prompt).await
}

fn report_outcome(context: &AppContext, outcome: Result<ChatReply>) {
    match outcome {
        Ok(reply) => {
            context.emit_line(&format!("\nBot: {}", reply.text));
            context.emit_line(&"-".repeat(50));
        }
        Err(e) => {
            crate::log_warn!("query failed: {:#}", e);
            context.emit_line(&format!("\nError: {:#}", e));
            context.emit_line("Please try again or type 'help' for available commands.");
        }
    }
}
