use std::path::Path;
use std::sync::Arc;

use poem::{listener::TcpListener, middleware::Cors, EndpointExt, Route, Server};
use poem_openapi::{ContactObject, OpenApiService};

use crate::rest_api::api::ApiV1;
use crate::translation::Translator;

pub const API_PREFIX: &str = "/api";

pub fn api_service(
    server_url: &str,
    api_prefix: &str,
) -> eyre::Result<OpenApiService<ApiV1, ()>> {
    let api = ApiV1::default();
    let openapi_service = OpenApiService::new(api, "STOUT", "1.0")
        .server(format!("{server_url}{api_prefix}"))
        .description("STOUT: SMILES to IUPAC name translation and image to SMILES recognition")
        .contact(ContactObject::new().url("https://github.com/Kohulan/STOUT-2"));
    Ok(openapi_service)
}

pub async fn run_api_service(
    bind: &str,
    server_url: &str,
    translator: Arc<Translator>,
) -> eyre::Result<()> {
    let api_service = api_service(server_url, API_PREFIX)?;
    let ui = api_service.swagger_ui();

    let spec = api_service.spec();
    log::info!("serving STOUT API on {bind} ({server_url})");
    Server::new(TcpListener::bind(bind))
        .run(
            Route::new()
                .at(
                    "/api/v1/openapi.json",
                    poem::endpoint::make_sync(move |_| spec.clone()),
                )
                .nest(API_PREFIX, api_service)
                .nest("/", ui)
                .with(Cors::new())
                .data(translator),
        )
        .await?;

    Ok(())
}

pub fn output_spec(server_url: &str, output: &Path) -> eyre::Result<()> {
    let api_service = api_service(server_url, API_PREFIX)?;

    let spec = api_service.spec();

    std::fs::write(output, spec)?;

    Ok(())
}
