//! Stack probing command
//!
//! Reports the container kind, the stack shape and the geometry of
//! every directory without decoding any samples.

use clap::ArgMatches;
use log::info;

use crate::api;
use crate::commands::command_traits::Command;
use crate::stack::StackReader;
use crate::tiff::errors::TiffResult;

/// Command for probing a TIFF stack
pub struct ProbeCommand {
    /// Path to the input file
    input_file: String,
}

impl ProbeCommand {
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        Ok(ProbeCommand {
            input_file: super::input_arg(args)?,
        })
    }
}

impl Command for ProbeCommand {
    fn execute(&self) -> TiffResult<()> {
        let kind = api::classify_container(&self.input_file)?;
        info!("Container: {}", kind.map_or("unknown", |k| k.name()));

        let (shape, descriptors) = StackReader::open(&self.input_file)?.describe()?;

        info!("Shape [slices, rows, cols]: {}", shape);
        for descriptor in &descriptors {
            info!("  {}", descriptor);
        }

        Ok(())
    }
}
