//! keyprompt - Interactive terminal prompts
//!
//! Single-line, masked, yes/no and multi-line prompts with validation on
//! every keystroke, a state icon in front of the label and a retry loop for
//! rejected input.
//!
//! # Quick Start
//!
//! ```no_run
//! use keyprompt::prompt::{validator, BasicPrompt, Prompt, Prompter, ValidationError};
//!
//! let mut prompter = Prompter::stdio();
//! let name = prompter.ask("Name", "")?;
//!
//! let age = BasicPrompt::new("Age").with_validator(validator(|s| {
//!     s.parse::<u8>()
//!         .map(|_| ())
//!         .map_err(|_| ValidationError::invalid("not a number"))
//! }));
//! let age = Prompt::new(age).run(&mut prompter)?;
//!
//! if prompter.confirm("Save", "y", false)? == "Y" {
//!     println!("{} ({})", name, age);
//! }
//! # Ok::<(), keyprompt::PromptError>(())
//! ```
//!
//! # Layout
//!
//! | Module | Role |
//! |--------|------|
//! | `line` | key decoding and the line editor |
//! | `prompt` | the prompt sessions and `Prompter` |
//! | `theme`, `style` | icons and SGR stylers |
//! | `external` | `$EDITOR` round trip |
//! | `config` | `~/.keyprompt/config.toml` |

pub mod config;
pub mod error;
pub mod external;
pub mod line;
pub mod prompt;
pub mod style;
pub mod term;
pub mod theme;

pub use config::Config;
pub use error::{EditorError, PromptError, ReadError, Result};
pub use prompt::{BasicPrompt, ConfirmPrompt, MultilinePrompt, Prompt, Prompter};
pub use theme::{IconSet, Indicator, Theme};
