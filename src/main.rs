//! keyprompt - Interactive terminal prompts
//!
//! Demo program showing every prompt kind of the library.
//!
//! # Quick Start
//!
//! ```text
//! keyprompt              # Run the whole showcase
//! keyprompt confirm      # Only the yes/no prompts
//! keyprompt --plain ask  # No colors
//! ```
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | Submit |
//! | * | Toggle masking (masked prompts) |
//! | Ctrl+C | Abort |
//! | Ctrl+D | End of input on an empty line |
//! | Ctrl+U/K/W | Kill to start / to end / word |

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use keyprompt::prompt::{formatter, validator, ValidationError, Validator};
use keyprompt::{
    term, Config, ConfirmPrompt, MultilinePrompt, Prompt, PromptError, Prompter, Theme,
};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Which prompts to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Ask,
    Masked,
    Confirm,
    Multiline,
    All,
}

/// Command line options
#[derive(Debug)]
struct Options {
    demo: Demo,
    no_icons: bool,
    plain: bool,
    vim: bool,
    config_path: Option<PathBuf>,
    debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            demo: Demo::All,
            no_icons: false,
            plain: false,
            vim: false,
            config_path: None,
            debug: false,
        }
    }
}

fn print_version() {
    eprintln!("keyprompt {}", VERSION);
}

fn print_help() {
    eprintln!("keyprompt {} - Interactive terminal prompts", VERSION);
    eprintln!();
    eprintln!("Usage: keyprompt [OPTIONS] [DEMO]");
    eprintln!();
    eprintln!("Demos:");
    eprintln!("  all                   Every prompt kind (default)");
    eprintln!("  ask                   Single-line prompts");
    eprintln!("  masked                Masked prompts");
    eprintln!("  confirm               Yes/no prompts");
    eprintln!("  multiline             Multi-line prompts");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --no-icons            Hide the state icons");
    eprintln!("  --plain               No colors or styles");
    eprintln!("  --vim                 vi-style line editing");
    eprintln!("  -c, --config <PATH>   Read settings from PATH");
    eprintln!("  -d, --debug           Debug logging");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Masked prompts: type '*' to show or hide the input");
    eprintln!("Multi-line prompts: two empty lines finish the input");
    eprintln!();
    eprintln!("Themes (config `theme`): {}", Theme::list().join(", "));
    eprintln!();
    eprintln!("Configuration: ~/.keyprompt/config.toml");
    eprintln!("Log file:      ~/.keyprompt/keyprompt.log");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--no-icons" => {
                options.no_icons = true;
            }
            "--plain" => {
                options.plain = true;
            }
            "--vim" => {
                options.vim = true;
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing config path".to_string());
                }
                options.config_path = Some(PathBuf::from(&args[i]));
            }
            "-d" | "--debug" => {
                options.debug = true;
            }
            "all" => options.demo = Demo::All,
            "ask" => options.demo = Demo::Ask,
            "masked" => options.demo = Demo::Masked,
            "confirm" => options.demo = Demo::Confirm,
            "multiline" => options.demo = Demo::Multiline,
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Log to ~/.keyprompt/keyprompt.log; the terminal belongs to the prompts
fn init_logging(debug: bool) {
    let log_path = Config::config_dir()
        .map(|dir| dir.join("keyprompt.log"))
        .unwrap_or_else(|| PathBuf::from("keyprompt.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let level = if debug { Level::DEBUG } else { Level::INFO };
        let filter = EnvFilter::try_from_env("KEYPROMPT_LOG")
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    init_logging(options.debug);
    info!("keyprompt {} starting", VERSION);

    let mut config = match &options.config_path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    if options.no_icons {
        config.no_icons = true;
    }
    if options.vim {
        config.vim_mode = true;
    }
    if options.plain {
        config.theme = "plain".to_string();
    }

    let mut prompter = Prompter::from_config(config);
    run_demo(&mut prompter, options.demo);

    info!("keyprompt finished");
    Ok(())
}

fn run_demo(prompter: &mut Prompter, demo: Demo) {
    if matches!(demo, Demo::Ask | Demo::All) {
        check_error(prompter.ask("easy prompt", "Yepp"));
    }

    if matches!(demo, Demo::Masked | Demo::All) {
        let masked = prompter
            .basic("test masked", "hi there")
            .with_validator(rejects("err"));
        check_error(Prompt::masked(masked, prompter.config().mask).run(prompter));
        check_error(prompter.ask_masked("easy masked prompt", "Yepp"));
    }

    if matches!(demo, Demo::Confirm | Demo::All) {
        let confirm = ConfirmPrompt::new(prompter.basic("test confirm", "y")).with_option("?");
        check_error(confirm.run(prompter));
        check_error(prompter.confirm("easy confirm", "Y", false));
    }

    if matches!(demo, Demo::Multiline | Demo::All) {
        let basic = prompter
            .basic("test multiline", "Request")
            .with_formatter(formatter(capitalize_lines))
            .with_validator(rejects("Err"));
        check_error(MultilinePrompt::new(basic).run(prompter));

        let basic = prompter
            .basic("test multiline onError", "Request")
            .with_validator(rejects("Err"));
        let mut with_callback = MultilinePrompt::new(basic).with_recovery(Box::new(edit_until_declined));
        check_error(with_callback.run(prompter));

        check_error(prompter.multiline("easy multi", "Ready to go"));
    }
}

/// Rejects empty input and `forbidden`.
fn rejects(forbidden: &'static str) -> Validator {
    validator(move |s| {
        if s == forbidden {
            return Err(ValidationError::invalid(format!(
                "input must not be equal to '{}'",
                forbidden.to_lowercase()
            )));
        }
        if s.is_empty() {
            return Err(ValidationError::invalid("input must not be empty string"));
        }
        Ok(())
    })
}

/// Upper-case the first letter of every line
fn capitalize_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let mut chars = line.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recovery callback: offer the editor until the user declines
fn edit_until_declined(prompter: &mut Prompter, mut text: String) -> keyprompt::Result<String> {
    loop {
        let answer = prompter.confirm("Edit test multiline", "", true)?;
        if answer != "Y" {
            break;
        }
        text = prompter
            .external_editor()
            .edit(&text)
            .map_err(|source| PromptError::Editor {
                input: text.clone(),
                source,
            })?;
        prompter.editor().write(&term::clear_up_lines(1))?;
    }
    prompter.editor().write(&term::clear_up_lines(1))?;
    Ok(text)
}

fn check_error(result: keyprompt::Result<String>) {
    match result {
        Ok(res) => println!("User input: {}", res),
        Err(PromptError::Interrupt) => {
            println!();
            std::process::exit(1);
        }
        Err(e) => println!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_lines() {
        assert_eq!(capitalize_lines("request\nbody\n\nécrit"), "Request\nBody\n\nÉcrit");
    }

    #[test]
    fn test_rejects() {
        let check = rejects("Err");
        assert!(check("fine").is_ok());
        assert_eq!(check("Err").unwrap_err().to_string(), "input must not be equal to 'err'");
        assert_eq!(check("").unwrap_err().to_string(), "input must not be empty string");
    }
}
