use std::io::Read;

use crate::command_line::prelude::*;
use crate::translation::split_batch;
use crate::verification::{ResultTable, TableOptions};

pub const NAME: &str = "smiles-to-iupac";

pub fn command() -> Command {
    config_args(
        Command::new(NAME)
            .arg(
                Arg::new("smiles")
                    .required(false)
                    .long("smiles")
                    .short('s')
                    .num_args(1)
                    .help("Newline-separated SMILES; read from stdin when omitted"),
            )
            .arg(
                Arg::new("retranslate")
                    .required(false)
                    .long("retranslate")
                    .short('r')
                    .action(clap::ArgAction::SetTrue)
                    .help("Parse each predicted name back and compare structures"),
            ),
    )
}

pub fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let body = match matches.get_one::<String>("smiles") {
        Some(smiles) => smiles.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let retranslate = matches.get_flag("retranslate");

    let config = load_config(matches)?;
    let translator = load_translator(&config)?;

    let smiles = split_batch(&body);
    if smiles.is_empty() {
        return Err(eyre::eyre!("no SMILES given"));
    }

    let results = translator.translate_batch(&smiles, retranslate);
    let table = ResultTable::build(
        &results,
        TableOptions {
            retranslate,
            visualize: false,
        },
        translator.toolkit(),
    );

    log::info!("{}", serde_json::to_string_pretty(&table.to_json())?);

    Ok(())
}
