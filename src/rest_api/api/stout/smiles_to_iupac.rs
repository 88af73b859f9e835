use std::sync::Arc;

use poem_openapi::payload::{Html, Json};

use crate::rest_api::api::{SmilesToIupacHtmlResponse, SmilesToIupacResponse};
use crate::rest_api::models::GenericResponseError;
use crate::translation::{split_batch, Translator};
use crate::verification::{ResultTable, TableOptions};

async fn build_table(
    translator: Arc<Translator>,
    body: String,
    options: TableOptions,
) -> Result<ResultTable, GenericResponseError> {
    tokio::task::spawn_blocking(move || {
        let smiles = split_batch(&body);
        log::info!(
            "translating {} SMILES (retranslate: {})",
            smiles.len(),
            options.retranslate
        );
        let results = translator.translate_batch(&smiles, options.retranslate);
        ResultTable::build(&results, options, translator.toolkit())
    })
    .await
    .map_err(GenericResponseError::from)
}

pub async fn v1_smiles_to_iupac(
    translator: Arc<Translator>,
    body: String,
    options: TableOptions,
) -> SmilesToIupacResponse {
    match build_table(translator, body, options).await {
        Ok(table) => SmilesToIupacResponse::Ok(Json(table.to_data())),
        Err(e) => SmilesToIupacResponse::Err(Json(e)),
    }
}

pub async fn v1_smiles_to_iupac_html(
    translator: Arc<Translator>,
    body: String,
    options: TableOptions,
) -> SmilesToIupacHtmlResponse {
    match build_table(translator, body, options).await {
        Ok(table) => SmilesToIupacHtmlResponse::Ok(Html(table.to_html())),
        Err(e) => SmilesToIupacHtmlResponse::Err(Json(e)),
    }
}
