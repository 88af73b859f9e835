use std::sync::Arc;

use poem_openapi::payload::Json;

use crate::chemistry::Visualization;
use crate::rest_api::api::{GeneratedSmiles, IupacToSmilesResponse};
use crate::rest_api::models::GenericResponseError;
use crate::translation::{Converter, Translator};

pub async fn v1_iupac_to_smiles(
    translator: Arc<Translator>,
    input_text: String,
    converter: Converter,
    visualization: Visualization,
) -> IupacToSmilesResponse {
    let result = tokio::task::spawn_blocking(move || {
        translator
            .iupac_to_smiles(&input_text, converter)
            .map(|smiles| {
                let depiction = translator.depict(&smiles, visualization);
                GeneratedSmiles {
                    smiles,
                    depiction: Some(depiction),
                }
            })
            .map_err(GenericResponseError::from)
    })
    .await;

    match result {
        Ok(Ok(generated)) => IupacToSmilesResponse::Ok(Json(generated)),
        Ok(Err(e)) => IupacToSmilesResponse::Err(Json(e)),
        Err(e) => IupacToSmilesResponse::Err(Json(GenericResponseError::from(e))),
    }
}
