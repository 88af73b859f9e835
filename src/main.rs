use stout::command_line::{
    fetch_assets, image_to_smiles, iupac_to_smiles, rest_api_server, smiles_to_iupac,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = clap::Command::new("stout")
        .version(env!("CARGO_PKG_VERSION"))
        .about("SMILES to IUPAC name translation and chemical structure recognition")
        .subcommand_required(true)
        .subcommand(rest_api_server::command())
        .subcommand(smiles_to_iupac::command())
        .subcommand(iupac_to_smiles::command())
        .subcommand(image_to_smiles::command())
        .subcommand(fetch_assets::command());

    let matches = app.get_matches();

    match matches.subcommand() {
        Some((rest_api_server::NAME, matches)) => rest_api_server::action(matches).await?,
        Some((smiles_to_iupac::NAME, matches)) => smiles_to_iupac::action(matches)?,
        Some((iupac_to_smiles::NAME, matches)) => iupac_to_smiles::action(matches)?,
        Some((image_to_smiles::NAME, matches)) => image_to_smiles::action(matches)?,
        Some((fetch_assets::NAME, matches)) => fetch_assets::action(matches).await?,
        Some((other, _)) => Err(eyre::eyre!("unknown subcommand {}", other))?,
        None => Err(eyre::eyre!("no subcommand given"))?,
    }

    Ok(())
}
