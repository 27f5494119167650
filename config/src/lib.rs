//! Groups configurations used by the player binary
//!
//! Options may be given on the command line, through the environment, or in a
//! TOML config file; command line arguments take precedence over the file

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(clippy::needless_pass_by_value)]

mod cli;
mod parsing;
mod validation;

pub use cli::{Cli, PlayerConfig, Supersession};
pub use parsing::{parse_command_line_args, parse_config_from_args, parse_config_from_file};
