//! Container identification command

use clap::ArgMatches;
use log::info;

use crate::api;
use crate::commands::command_traits::Command;
use crate::tiff::errors::TiffResult;

/// Command printing the container kind sniffed from a file's magic bytes
pub struct IdentifyCommand {
    /// Path to the input file
    input_file: String,
}

impl IdentifyCommand {
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        Ok(IdentifyCommand {
            input_file: super::input_arg(args)?,
        })
    }
}

impl Command for IdentifyCommand {
    fn execute(&self) -> TiffResult<()> {
        let kind = api::classify_container(&self.input_file)?;
        info!("Container: {}", kind.map_or("unknown", |k| k.name()));
        Ok(())
    }
}
