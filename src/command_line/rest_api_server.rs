use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::ensure_assets;
use crate::command_line::prelude::*;
use crate::rest_api::openapi_server::{output_spec, run_api_service};

pub const NAME: &str = "rest-api-server";

pub fn command() -> Command {
    config_args(
        Command::new(NAME)
            .arg(
                Arg::new("bind")
                    .num_args(1)
                    .required(false)
                    .short('b')
                    .long("bind")
                    .default_value("localhost:3000"),
            )
            .arg(
                Arg::new("server-url")
                    .num_args(1)
                    .required(false)
                    .short('u')
                    .long("server-url")
                    .default_value("http://localhost:3000"),
            )
            .arg(
                Arg::new("skip-fetch")
                    .action(clap::ArgAction::SetTrue)
                    .required(false)
                    .long("skip-fetch")
                    .help("Do not download missing assets before loading models"),
            )
            .subcommand(
                Command::new("spec").arg(
                    Arg::new("output")
                        .help("Write openapi JSON specific to destination. Useful for building STOUT client implementations.")
                        .required(true)
                        .short('o')
                        .long("output")
                        .num_args(1),
                ),
            ),
    )
}

pub async fn action(matches: &ArgMatches) -> eyre::Result<()> {
    let server_url = matches
        .get_one::<String>("server-url")
        .ok_or(eyre::eyre!("Failed to extract server url"))?;

    match matches.subcommand() {
        None => {
            let bind = matches
                .get_one::<String>("bind")
                .ok_or(eyre::eyre!("Failed to extract bind address"))?;

            let config = load_config(matches)?;
            if !matches.get_flag("skip-fetch") {
                ensure_assets(&config).await?;
            }
            let translator =
                tokio::task::spawn_blocking(move || load_translator(&config)).await??;

            run_api_service(bind, server_url, Arc::new(translator)).await?
        }
        Some(("spec", args)) => {
            let output = args
                .get_one::<String>("output")
                .ok_or(eyre::eyre!("Failed to extract output path"))?;
            output_spec(server_url, &PathBuf::from(output))?
        }
        Some((other, _args)) => Err(eyre::eyre!("can't handle {}", other))?,
    }

    Ok(())
}
