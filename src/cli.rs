use anyhow::Result;

#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Interactive chat loop (default)
    Chat,
    /// One-shot host lookup
    Lookup { host: String, prompt_only: bool },
    AiCheck,
    Help,
    Version,
}

pub fn version_text() -> String {
    format!("reconchat {}", env!("CARGO_PKG_VERSION"))
}

pub fn usage_text() -> String {
    format!(
        "{version}
reconchat — Shodan host lookup with an AI analyst

Usage:
  reconchat [chat]
  reconchat lookup <HOST> [--prompt-only]
  reconchat ai-check
  reconchat --help
  reconchat --version

Options:
      --prompt-only  Lookup: print the composed analysis prompt instead of
                     sending it to the chat backend
  -h, --help         Show this help text
  -V, --version      Show version

In chat mode, type `search:<host>` to analyze a host, `clear` to reset
the conversation, `help` for commands, or `exit` to quit.",
        version = version_text()
    )
}

pub fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut host: Option<String> = None;
    let mut prompt_only = false;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "chat" | "lookup" | "ai-check" => {
                if command.as_deref().is_some_and(|existing| existing != arg) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(arg.to_string());
            }
            "--prompt-only" => {
                prompt_only = true;
            }
            _ if arg.starts_with('-') => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
            _ => {
                if command.as_deref() != Some("lookup") {
                    return Err(anyhow::anyhow!(
                        "Unexpected argument: {arg}\n\n{}",
                        usage_text()
                    ));
                }
                if host.is_some() {
                    return Err(anyhow::anyhow!(
                        "lookup takes exactly one host.\n\n{}",
                        usage_text()
                    ));
                }
                host = Some(arg.to_string());
            }
        }
    }

    match command.as_deref().unwrap_or("chat") {
        "chat" => {
            if prompt_only {
                return Err(anyhow::anyhow!(
                    "--prompt-only is only valid with lookup.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::Chat)
        }
        "lookup" => {
            let host = host.ok_or_else(|| {
                anyhow::anyhow!("lookup requires a host argument.\n\n{}", usage_text())
            })?;
            Ok(CliCommand::Lookup { host, prompt_only })
        }
        "ai-check" => {
            if prompt_only {
                return Err(anyhow::anyhow!(
                    "--prompt-only is not valid with ai-check.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::AiCheck)
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_help_flag() {
        let args = ["reconchat", "--help"];
        let parsed = parse_cli_args(args).expect("help args should parse");
        assert_eq!(parsed, CliCommand::Help);
    }

    #[test]
    fn parse_version_flag() {
        let args = ["reconchat", "--version"];
        let parsed = parse_cli_args(args).expect("version args should parse");
        assert_eq!(parsed, CliCommand::Version);
    }

    #[test]
    fn parse_default_chat_command() {
        let args = ["reconchat"];
        let parsed = parse_cli_args(args).expect("default args should parse");
        assert_eq!(parsed, CliCommand::Chat);
    }

    #[test]
    fn parse_explicit_chat_command() {
        let args = ["reconchat", "chat"];
        let parsed = parse_cli_args(args).expect("chat command should parse");
        assert_eq!(parsed, CliCommand::Chat);
    }

    #[test]
    fn parse_lookup_with_host() {
        let args = ["reconchat", "lookup", "8.8.8.8"];
        let parsed = parse_cli_args(args).expect("lookup should parse");
        assert_eq!(
            parsed,
            CliCommand::Lookup {
                host: "8.8.8.8".to_string(),
                prompt_only: false
            }
        );
    }

    #[test]
    fn parse_lookup_prompt_only() {
        let args = ["reconchat", "lookup", "8.8.8.8", "--prompt-only"];
        let parsed = parse_cli_args(args).expect("lookup --prompt-only should parse");
        assert_eq!(
            parsed,
            CliCommand::Lookup {
                host: "8.8.8.8".to_string(),
                prompt_only: true
            }
        );
    }

    #[test]
    fn parse_lookup_without_host_errors() {
        let args = ["reconchat", "lookup"];
        let err = parse_cli_args(args).expect_err("lookup without host should fail");
        assert!(err.to_string().contains("requires a host"));
    }

    #[test]
    fn parse_lookup_rejects_second_host() {
        let args = ["reconchat", "lookup", "1.1.1.1", "2.2.2.2"];
        let err = parse_cli_args(args).expect_err("two hosts should fail");
        assert!(err.to_string().contains("exactly one host"));
    }

    #[test]
    fn parse_ai_check_command() {
        let args = ["reconchat", "ai-check"];
        let parsed = parse_cli_args(args).expect("ai-check command should parse");
        assert_eq!(parsed, CliCommand::AiCheck);
    }

    #[test]
    fn parse_chat_rejects_prompt_only() {
        let args = ["reconchat", "chat", "--prompt-only"];
        let err = parse_cli_args(args).expect_err("chat should reject --prompt-only");
        assert!(err.to_string().contains("only valid with lookup"));
    }

    #[test]
    fn parse_unknown_argument_errors() {
        let args = ["reconchat", "--unknown"];
        let err = parse_cli_args(args).expect_err("unknown flag should fail");
        assert!(err.to_string().contains("Unknown argument"));
    }
}
