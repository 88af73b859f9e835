use std::sync::Arc;

use poem_openapi::payload::Json;
use poem_openapi::types::multipart::Upload;
use poem_openapi::Multipart;

use crate::chemistry::Visualization;
use crate::rest_api::api::{GeneratedSmiles, ImageToSmilesResponse};
use crate::rest_api::models::GenericResponseError;
use crate::translation::Translator;

#[derive(Multipart, Debug)]
pub struct ImageUpload {
    pub file: Upload,
}

pub async fn v1_image_to_smiles(
    translator: Arc<Translator>,
    upload: ImageUpload,
    visualization: Option<Visualization>,
) -> ImageToSmilesResponse {
    let file_name = upload.file.file_name().map(str::to_string);
    let bytes = match upload.file.into_vec().await {
        Ok(bytes) => bytes,
        Err(e) => return ImageToSmilesResponse::Err(Json(GenericResponseError::from(e))),
    };
    log::info!(
        "recognizing structure in {} ({} bytes)",
        file_name.as_deref().unwrap_or("upload"),
        bytes.len()
    );

    let result = tokio::task::spawn_blocking(move || {
        translator
            .image_to_smiles(&bytes)
            .map(|smiles| {
                let depiction =
                    visualization.map(|visualization| translator.depict(&smiles, visualization));
                GeneratedSmiles { smiles, depiction }
            })
            .map_err(GenericResponseError::from)
    })
    .await;

    match result {
        Ok(Ok(generated)) => ImageToSmilesResponse::Ok(Json(generated)),
        Ok(Err(e)) => ImageToSmilesResponse::Err(Json(e)),
        Err(e) => ImageToSmilesResponse::Err(Json(GenericResponseError::from(e))),
    }
}
