//! Stack conversion command
//!
//! Decodes any supported stack and writes it back as an uncompressed
//! 32-bit float stack.

use clap::ArgMatches;
use log::info;
use std::path::Path;

use crate::api;
use crate::commands::command_traits::Command;
use crate::config::StackConfig;
use crate::tiff::errors::{TiffResult, TiffError};

/// Command for re-encoding a stack as float32
pub struct ConvertCommand<'a> {
    /// Path to the input file
    input_file: String,
    /// Path to the output file
    output_file: String,
    /// Settings, for the overwrite policy
    config: &'a StackConfig,
}

impl<'a> ConvertCommand<'a> {
    /// Create a new convert command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Settings loaded from the configuration file
    pub fn new(args: &ArgMatches, config: &'a StackConfig) -> TiffResult<Self> {
        let input_file = super::input_arg(args)?;

        let output_file = args.get_one::<String>("output")
            .ok_or_else(|| TiffError::GenericError("Missing output file path for conversion".to_string()))?
            .clone();

        if input_file == output_file {
            return Err(TiffError::GenericError("Input and output must be different files".to_string()));
        }

        Ok(ConvertCommand {
            input_file,
            output_file,
            config,
        })
    }
}

impl<'a> Command for ConvertCommand<'a> {
    fn execute(&self) -> TiffResult<()> {
        if !self.config.overwrite && Path::new(&self.output_file).exists() {
            return Err(TiffError::GenericError(format!(
                "{} already exists (set convert.overwrite to replace it)", self.output_file)));
        }

        info!("Converting {} to {}", self.input_file, self.output_file);

        let stack = api::read_stack(&self.input_file)?;
        api::write_stack(&self.output_file, stack.samples(), stack.shape())?;

        info!("Wrote float32 stack {} to {}", stack.shape(), self.output_file);
        Ok(())
    }
}
