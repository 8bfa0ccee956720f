//! AWS Lambda handler for rectifying filings
//!
//! Accepts a rectification request whose filings are sent inline, keyed by the
//! paths named in `files`, and returns the amended filings as JSON.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use std::collections::BTreeMap;

use ecf_rectifier::rectification::{run_batch, MemoryStore, RectificationRequest, RectifiedFiling};
use ecf_rectifier::RectifierError;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Rectification request with the filing contents attached
#[derive(Debug, Deserialize)]
pub struct LambdaRequest {
    #[serde(flatten)]
    pub request: RectificationRequest,

    /// Filing text by path
    #[serde(default)]
    pub filings: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct LambdaResponse {
    pub success: bool,
    pub files: Vec<RectifiedFiling>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
}

const CORS_ORIGIN: &str = "*";
const CORS_METHODS: &str = "POST, OPTIONS";
const CORS_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::to_string(&ErrorBody { success: false, error: message })?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", CORS_ORIGIN)
        .body(Body::Text(body))?)
}

fn json_response(body: &LambdaResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", CORS_ORIGIN)
        .header("Access-Control-Allow-Methods", CORS_METHODS)
        .header("Access-Control-Allow-Headers", CORS_HEADERS)
        .body(Body::Text(serde_json::to_string(body)?))?)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", CORS_ORIGIN)
            .header("Access-Control-Allow-Methods", CORS_METHODS)
            .header("Access-Control-Allow-Headers", CORS_HEADERS)
            .body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let LambdaRequest { request, filings } = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };
    info!(
        "Request for company {}: {} file(s), {} adjustment(s)",
        request.company_id,
        request.files.len(),
        request.adjustments.len()
    );

    let store: MemoryStore = filings.into_iter().collect();
    let files = match run_batch(&request, &store) {
        Ok(files) => files,
        Err(e @ RectifierError::NothingToProcess) => {
            warn!("{}", e);
            return error_response(400, &e.to_string());
        }
        Err(e) => return error_response(500, &e.to_string()),
    };

    json_response(&LambdaResponse {
        success: true,
        files,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
