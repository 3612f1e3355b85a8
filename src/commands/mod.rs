//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod probe_command;
pub mod identify_command;
pub mod convert_command;

pub use command_traits::{Command, CommandFactory};
pub use probe_command::ProbeCommand;
pub use identify_command::IdentifyCommand;
pub use convert_command::ConvertCommand;

use clap::ArgMatches;
use crate::config::StackConfig;
use crate::tiff::errors::{TiffError, TiffResult};

/// Factory for creating command instances based on CLI arguments
pub struct StackCommandFactory;

impl StackCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        StackCommandFactory
    }
}

impl Default for StackCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the required input path argument
pub(crate) fn input_arg(args: &ArgMatches) -> TiffResult<String> {
    args.get_one::<String>("input")
        .cloned()
        .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))
}

impl<'a> CommandFactory<'a> for StackCommandFactory {
    fn create_command(&self, args: &ArgMatches, config: &'a StackConfig) -> TiffResult<Box<dyn Command + 'a>> {
        if args.get_flag("identify") {
            Ok(Box::new(IdentifyCommand::new(args)?))
        } else if args.get_flag("convert") {
            Ok(Box::new(ConvertCommand::new(args, config)?))
        } else {
            // Default to probe command
            Ok(Box::new(ProbeCommand::new(args)?))
        }
    }
}
