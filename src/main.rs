use clap::{Arg, Command as ClapCommand, ArgAction};
use env_logger::{Builder, Env};
use log::{error, LevelFilter};
use std::process;

use tiffstacks::config::StackConfig;
use tiffstacks::utils::logger::Logger;
use tiffstacks::commands::{CommandFactory, StackCommandFactory};

fn main() {
    let matches = ClapCommand::new("tiffstacks")
        .version("0.1.0")
        .author("Maurice Schilpp")
        .about("Read, probe and convert multi-page TIFF stacks as float32 volumes")
        .arg(
            Arg::new("input")
                .help("Input file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("identify")
                .short('i')
                .long("identify")
                .help("Print the container type detected from the magic bytes")
                .action(ArgAction::SetTrue)
                .conflicts_with("convert"),
        )
        .arg(
            Arg::new("convert")
                .short('c')
                .long("convert")
                .help("Re-encode the stack as uncompressed 32-bit float")
                .action(ArgAction::SetTrue)
                .requires("output"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output TIFF file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => match StackConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration {}: {}", path, e);
                process::exit(1);
            }
        },
        None => StackConfig::default(),
    };

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { config.log_level };
    match &config.log_file {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
        },
        None => {
            Builder::from_env(Env::default().default_filter_or(level.as_str())).init();
        }
    }

    let factory = StackCommandFactory::new();

    let command_result = factory.create_command(&matches, &config);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
