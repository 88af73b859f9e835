use std::path::PathBuf;

use crate::config::ServiceConfig;
use crate::translation::Translator;

pub mod fetch_assets;
pub mod image_to_smiles;
pub mod iupac_to_smiles;
pub mod rest_api_server;
pub mod smiles_to_iupac;

pub mod prelude {
    pub use clap::{Arg, ArgMatches, Command};

    pub use crate::command_line::{config_args, load_config, load_translator};
}

use prelude::*;

/// Arguments shared by every command that touches the model assets.
pub fn config_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .required(false)
                .long("config")
                .short('c')
                .num_args(1)
                .help("JSON service configuration"),
        )
        .arg(
            Arg::new("asset-root")
                .required(false)
                .long("asset-root")
                .short('a')
                .num_args(1)
                .env("STOUT_HOME")
                .help("Directory holding models, vocabularies and the OPSIN jar"),
        )
}

pub fn load_config(matches: &ArgMatches) -> eyre::Result<ServiceConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => ServiceConfig::from_json_file(&PathBuf::from(path))?,
        None => ServiceConfig::default(),
    };

    if let Some(asset_root) = matches.get_one::<String>("asset-root") {
        config.asset_root = PathBuf::from(asset_root);
    }

    Ok(config)
}

pub fn load_translator(config: &ServiceConfig) -> eyre::Result<Translator> {
    log::info!("loading models from {}", config.asset_root.display());
    let translator = Translator::load(config)?;
    Ok(translator)
}
