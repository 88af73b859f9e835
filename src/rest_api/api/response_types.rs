use poem_openapi::payload::{Html, Json};
use poem_openapi::{ApiResponse, Object};

use crate::rest_api::models::GenericResponseError;
use crate::verification::TableData;

// Response types
#[derive(ApiResponse, Debug)]
pub enum HealthResponse {
    #[oai(status = "200", content_type = "application/json")]
    Ok(Json<HealthStatus>),
}

#[derive(ApiResponse, Debug)]
pub enum SmilesToIupacResponse {
    #[oai(status = "200", content_type = "application/json")]
    Ok(Json<TableData>),
    #[oai(status = "500", content_type = "application/json")]
    Err(Json<GenericResponseError>),
}

#[derive(ApiResponse, Debug)]
pub enum SmilesToIupacHtmlResponse {
    #[oai(status = "200", content_type = "text/html")]
    Ok(Html<String>),
    #[oai(status = "500", content_type = "application/json")]
    Err(Json<GenericResponseError>),
}

#[derive(ApiResponse, Debug)]
pub enum IupacToSmilesResponse {
    #[oai(status = "200", content_type = "application/json")]
    Ok(Json<GeneratedSmiles>),
    #[oai(status = "422", content_type = "application/json")]
    Err(Json<GenericResponseError>),
}

#[derive(ApiResponse, Debug)]
pub enum ImageToSmilesResponse {
    #[oai(status = "200", content_type = "application/json")]
    Ok(Json<GeneratedSmiles>),
    #[oai(status = "422", content_type = "application/json")]
    Err(Json<GenericResponseError>),
}

// Relevant structs
#[derive(Object, Debug, PartialEq, Eq, serde::Serialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Object, Debug, PartialEq, Eq, serde::Serialize)]
pub struct GeneratedSmiles {
    pub smiles: String,
    #[oai(skip_serializing_if_is_none)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depiction: Option<String>,
}
