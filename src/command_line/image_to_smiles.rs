use crate::command_line::prelude::*;

pub const NAME: &str = "image-to-smiles";

pub fn command() -> Command {
    config_args(
        Command::new(NAME).arg(
            Arg::new("image")
                .required(true)
                .long("image")
                .short('i')
                .num_args(1)
                .help("Path to a chemical structure depiction"),
        ),
    )
}

pub fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let image_path = matches
        .get_one::<String>("image")
        .ok_or(eyre::eyre!("Failed to extract image path"))?;
    let bytes = std::fs::read(image_path)?;

    let config = load_config(matches)?;
    let translator = load_translator(&config)?;

    let smiles = translator.image_to_smiles(&bytes)?;
    log::info!("{}", serde_json::json!({"image": image_path, "smiles": smiles}));

    Ok(())
}
