use crate::command_line::prelude::*;
use crate::translation::Converter;

pub const NAME: &str = "iupac-to-smiles";

pub fn command() -> Command {
    config_args(
        Command::new(NAME)
            .arg(
                Arg::new("name")
                    .required(true)
                    .long("name")
                    .short('n')
                    .num_args(1),
            )
            .arg(
                Arg::new("converter")
                    .required(false)
                    .long("converter")
                    .num_args(1)
                    .value_parser(["opsin", "stout"])
                    .default_value("opsin"),
            ),
    )
}

pub fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let name = matches
        .get_one::<String>("name")
        .ok_or(eyre::eyre!("Failed to extract name"))?;
    let converter = matches
        .get_one::<String>("converter")
        .ok_or(eyre::eyre!("Failed to extract converter"))?
        .parse::<Converter>()
        .map_err(|e| eyre::eyre!("{e}"))?;

    let config = load_config(matches)?;
    let translator = load_translator(&config)?;

    let smiles = translator.iupac_to_smiles(name, converter)?;
    log::info!("{}", serde_json::json!({"name": name, "smiles": smiles}));

    Ok(())
}
