//! Command-line parsing

use anyhow::{Result, bail};

use crate::tone::DEFAULT_TONE;
use crate::types::Mode;

/// Help information for a command
#[derive(Debug, Clone)]
pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
}

/// Parsed command from the process arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Serve,
    Generate { tone: String, mode: Mode },
    Tones,
    Help,
}

/// Parse the arguments after the program name
pub fn parse_command(args: &[String]) -> Result<ParsedCommand> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(ParsedCommand::Serve);
    };

    match command.as_str() {
        "serve" => Ok(ParsedCommand::Serve),
        "generate" | "gen" => parse_generate(rest),
        "tones" => Ok(ParsedCommand::Tones),
        "help" | "--help" | "-h" => Ok(ParsedCommand::Help),
        other => bail!("Unknown command: {}", other),
    }
}

fn parse_generate(args: &[String]) -> Result<ParsedCommand> {
    let mut tone = DEFAULT_TONE.to_string();
    let mut mode = Mode::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tone" | "-t" => match iter.next() {
                Some(value) => tone = value.clone(),
                None => bail!("--tone requires a value"),
            },
            "--mode" | "-m" => {
                let Some(value) = iter.next() else {
                    bail!("--mode requires a value");
                };
                mode = match Mode::parse(value) {
                    Some(mode) => mode,
                    None => bail!("Invalid mode '{}' (expected write or rewrite)", value),
                };
            }
            other => bail!("Unexpected argument: {}", other),
        }
    }

    Ok(ParsedCommand::Generate { tone, mode })
}

/// Get all available commands for help display
pub fn available_commands() -> Vec<CommandHelp> {
    vec![
        CommandHelp {
            name: "serve",
            description: "Start the HTTP server (default)",
        },
        CommandHelp {
            name: "generate",
            description: "Read text from stdin and print the email [--tone <name>] [--mode write|rewrite]",
        },
        CommandHelp {
            name: "tones",
            description: "List available tones",
        },
        CommandHelp {
            name: "help",
            description: "Show this help message",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_serves() {
        assert_eq!(parse_command(&[]).unwrap(), ParsedCommand::Serve);
        assert_eq!(parse_command(&args(&["serve"])).unwrap(), ParsedCommand::Serve);
    }

    #[test]
    fn test_generate_defaults_and_flags() {
        assert_eq!(
            parse_command(&args(&["generate"])).unwrap(),
            ParsedCommand::Generate {
                tone: "professional".to_string(),
                mode: Mode::Rewrite,
            }
        );
        assert_eq!(
            parse_command(&args(&["gen", "-t", "casual", "--mode", "write"])).unwrap(),
            ParsedCommand::Generate {
                tone: "casual".to_string(),
                mode: Mode::Write,
            }
        );
    }

    #[test]
    fn test_bad_arguments_are_errors() {
        assert!(parse_command(&args(&["frobnicate"])).is_err());
        assert!(parse_command(&args(&["generate", "--tone"])).is_err());
        assert!(parse_command(&args(&["generate", "--mode", "draft"])).is_err());
        assert!(parse_command(&args(&["generate", "extra"])).is_err());
    }

    #[test]
    fn test_help_aliases() {
        for alias in ["help", "--help", "-h"] {
            assert_eq!(parse_command(&args(&[alias])).unwrap(), ParsedCommand::Help);
        }
    }
}
