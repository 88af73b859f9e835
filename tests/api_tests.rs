mod common;

use std::sync::Arc;

use poem::test::{TestForm, TestFormField};
use poem::EndpointExt;
use poem::{Endpoint, Route};
use stout::chemistry::{StructureToolkit, INVALID_SMILES_MESSAGE};
use stout::rest_api::api::{GeneratedSmiles, HealthStatus};
use stout::rest_api::openapi_server::{api_service, API_PREFIX};
use stout::translation::Translator;

fn build_test_client() -> eyre::Result<(poem::test::TestClient<impl Endpoint>, Arc<Translator>)> {
    let translator = common::build_translator();
    let test_api = api_service("https://does-not-matter.com", API_PREFIX)?;
    let route = Route::new()
        .nest(API_PREFIX, test_api)
        .data(translator.clone());
    let test_client = poem::test::TestClient::new(route);

    Ok((test_client, translator))
}

#[tokio::test]
async fn test_health() -> eyre::Result<()> {
    let (test_client, _) = build_test_client()?;

    let response = test_client.get("/api/v1/health").send().await;

    response.assert_status_is_ok();
    response
        .assert_json(&HealthStatus {
            status: "OK".to_string(),
        })
        .await;

    Ok(())
}

#[tokio::test]
async fn test_smiles_to_iupac_table() -> eyre::Result<()> {
    let (test_client, _) = build_test_client()?;

    let response = test_client
        .post("/api/v1/stout/smiles_to_iupac")
        .content_type("text/plain")
        .body("CCO\nC1CC(\nCC(C)O\n")
        .query("retranslate", &true)
        .send()
        .await;

    response.assert_status_is_ok();
    response
        .assert_json(&serde_json::json!({
            "columns": [
                "Original SMILES",
                "Predicted IUPAC name",
                "Retranslation",
                "Retranslated SMILES"
            ],
            "data": [
                ["CCO", "ethanol", "same as input", "OCC"],
                ["C1CC(", format!("error: {}", invalid_smiles_error("C1CC(")), "", ""],
                ["CC(C)O", "propan-1-ol", "not same as input", "CCCO"]
            ]
        }))
        .await;

    Ok(())
}

fn invalid_smiles_error(smiles: &str) -> String {
    let translator = common::build_translator();
    match translator.smiles_to_iupac(smiles) {
        Ok(name) => panic!("{smiles} unexpectedly translated to {name}"),
        Err(e) => e.to_string(),
    }
}

#[tokio::test]
async fn test_smiles_to_iupac_html() -> eyre::Result<()> {
    let (test_client, _) = build_test_client()?;

    let response = test_client
        .post("/api/v1/stout/smiles_to_iupac/html")
        .content_type("text/plain")
        .body("CC(=O)O")
        .send()
        .await;

    response.assert_status_is_ok();
    let html = response.0.into_body().into_string().await?;
    assert!(html.contains("class=\"dataframe\""));
    assert!(html.contains("<th>Original Structure</th>"));
    assert!(html.contains("<td>acetic acid</td>"));
    assert!(html.contains("M  END"));

    Ok(())
}

#[tokio::test]
async fn test_iupac_to_smiles() -> eyre::Result<()> {
    let (test_client, translator) = build_test_client()?;

    let response = test_client
        .get("/api/v1/stout/iupac_to_smiles")
        .query("input_text", &"ethanamine")
        .query("converter", &"stout")
        .send()
        .await;

    response.assert_status_is_ok();
    response
        .assert_json(&GeneratedSmiles {
            smiles: "NCC".to_string(),
            depiction: Some(translator.toolkit().mol_block("NCC")?),
        })
        .await;

    Ok(())
}

#[tokio::test]
async fn test_iupac_to_smiles_3d_viewer() -> eyre::Result<()> {
    let (test_client, _) = build_test_client()?;

    let response = test_client
        .get("/api/v1/stout/iupac_to_smiles")
        .query("input_text", &"ethanol")
        .query("visualize", &"3D")
        .send()
        .await;

    response.assert_status_is_ok();
    let json = response.json().await;
    let object = json.value().object();
    object.get("smiles").assert_string("OCC");
    let depiction = object.get("depiction").string().to_string();
    assert!(depiction.contains("3Dmol"));
    assert!(!depiction.contains(INVALID_SMILES_MESSAGE));

    Ok(())
}

#[tokio::test]
async fn test_iupac_to_smiles_unknown_name() -> eyre::Result<()> {
    let (test_client, _) = build_test_client()?;

    let response = test_client
        .get("/api/v1/stout/iupac_to_smiles")
        .query("input_text", &"unobtainium")
        .query("converter", &"opsin")
        .send()
        .await;

    response.assert_status("422".parse()?);
    let json = response.json().await;
    let error = json.value().object().get("error").string().to_string();
    assert!(error.contains("unobtainium"));

    Ok(())
}

#[tokio::test]
async fn test_image_to_smiles() -> eyre::Result<()> {
    let (test_client, _) = build_test_client()?;

    let response = test_client
        .post("/api/v1/decimer/image_to_smiles")
        .multipart(
            TestForm::new().field(
                TestFormField::bytes(common::sample_png(120, 80))
                    .name("file")
                    .filename("structure.png"),
            ),
        )
        .send()
        .await;

    response.assert_status_is_ok();
    response
        .assert_json(&GeneratedSmiles {
            smiles: common::RECOGNIZED_SMILES.to_string(),
            depiction: None,
        })
        .await;

    Ok(())
}

#[tokio::test]
async fn test_image_to_smiles_rejects_non_image() -> eyre::Result<()> {
    let (test_client, _) = build_test_client()?;

    let response = test_client
        .post("/api/v1/decimer/image_to_smiles")
        .multipart(
            TestForm::new().field(
                TestFormField::bytes(b"not an image".to_vec())
                    .name("file")
                    .filename("notes.txt"),
            ),
        )
        .send()
        .await;

    response.assert_status("422".parse()?);

    Ok(())
}
