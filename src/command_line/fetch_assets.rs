use crate::assets::ensure_assets;
use crate::command_line::prelude::*;

pub const NAME: &str = "fetch-assets";

pub fn command() -> Command {
    config_args(Command::new(NAME).about("Download the OPSIN jar and model archive if missing"))
}

pub async fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let config = load_config(matches)?;
    ensure_assets(&config).await?;
    log::info!("assets ready under {}", config.asset_root.display());

    Ok(())
}
