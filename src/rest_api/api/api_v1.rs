use std::sync::Arc;

use crate::chemistry::Visualization;
use crate::rest_api::api::{
    v1_health, v1_image_to_smiles, v1_iupac_to_smiles, v1_smiles_to_iupac,
    v1_smiles_to_iupac_html, HealthResponse, ImageToSmilesResponse, ImageUpload,
    IupacToSmilesResponse, SmilesToIupacHtmlResponse, SmilesToIupacResponse,
};
use crate::translation::{Converter, Translator};
use crate::verification::TableOptions;

use poem::web::Data;
use poem_openapi::{param::Query, payload::PlainText, OpenApi};

#[derive(Default)]
pub struct ApiV1 {}

#[OpenApi]
impl ApiV1 {
    #[oai(path = "/v1/health", method = "get")]
    /// Liveness check
    pub async fn v1_health(&self) -> HealthResponse {
        v1_health().await
    }

    #[oai(path = "/v1/stout/smiles_to_iupac", method = "post")]
    /// Translate newline-separated SMILES to IUPAC names, optionally checking each name by
    /// parsing it back to a structure
    pub async fn v1_smiles_to_iupac(
        &self,
        translator: Data<&Arc<Translator>>,
        smiles: PlainText<String>,
        retranslate: Query<Option<bool>>,
        visualize: Query<Option<bool>>,
    ) -> SmilesToIupacResponse {
        let options = TableOptions {
            retranslate: retranslate.0.unwrap_or(false),
            visualize: visualize.0.unwrap_or(false),
        };
        v1_smiles_to_iupac(translator.0.clone(), smiles.0, options).await
    }

    #[oai(path = "/v1/stout/smiles_to_iupac/html", method = "post")]
    /// Same as smiles_to_iupac, rendered as an HTML table with structure depictions
    pub async fn v1_smiles_to_iupac_html(
        &self,
        translator: Data<&Arc<Translator>>,
        smiles: PlainText<String>,
        retranslate: Query<Option<bool>>,
        visualize: Query<Option<bool>>,
    ) -> SmilesToIupacHtmlResponse {
        let options = TableOptions {
            retranslate: retranslate.0.unwrap_or(false),
            visualize: visualize.0.unwrap_or(true),
        };
        v1_smiles_to_iupac_html(translator.0.clone(), smiles.0, options).await
    }

    #[oai(path = "/v1/stout/iupac_to_smiles", method = "get")]
    /// Convert an IUPAC name to SMILES with OPSIN or the reverse translation model
    pub async fn v1_iupac_to_smiles(
        &self,
        translator: Data<&Arc<Translator>>,
        input_text: Query<String>,
        converter: Query<Option<Converter>>,
        visualize: Query<Option<Visualization>>,
    ) -> IupacToSmilesResponse {
        v1_iupac_to_smiles(
            translator.0.clone(),
            input_text.0,
            converter.0.unwrap_or_default(),
            visualize.0.unwrap_or_default(),
        )
        .await
    }

    #[oai(path = "/v1/decimer/image_to_smiles", method = "post")]
    /// Recognize the chemical structure drawn in an uploaded image
    pub async fn v1_image_to_smiles(
        &self,
        translator: Data<&Arc<Translator>>,
        upload: ImageUpload,
        visualize: Query<Option<Visualization>>,
    ) -> ImageToSmilesResponse {
        v1_image_to_smiles(translator.0.clone(), upload, visualize.0).await
    }
}
