//! AWS Lambda handler for tax projections
//!
//! Accepts an investment profile as JSON through an API Gateway HTTP API (or a
//! Lambda Function URL) and returns the computed tax result.

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use fund_tax_system::projection::{EngineConfig, InstallmentRow, TaxEngine, TaxResult};
use fund_tax_system::{InvestmentProfile, TaxRules};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

/// Request body: the profile plus output options
#[derive(Debug, Deserialize)]
pub struct TaxRequest {
    #[serde(flatten)]
    pub profile: InvestmentProfile,

    /// Include the per-installment schedule in the response
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Serialize)]
pub struct TaxResponse {
    pub result: TaxResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub installments: Vec<InstallmentRow>,
    pub execution_time_us: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn respond(status: i64, body: String) -> ApiGatewayV2httpResponse {
    ApiGatewayV2httpResponse {
        status_code: status,
        body: Some(Body::Text(body)),
        ..Default::default()
    }
}

fn error_response(status: i64, message: String) -> ApiGatewayV2httpResponse {
    let body = serde_json::to_string(&ErrorResponse { error: message })
        .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    respond(status, body)
}

fn handle_body(body: &str) -> ApiGatewayV2httpResponse {
    let start = std::time::Instant::now();

    let request: TaxRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return error_response(400, format!("Invalid JSON: {}", e)),
    };
    if let Err(e) = request.profile.validate() {
        return error_response(400, e.to_string());
    }

    let config = EngineConfig {
        detailed_output: request.include_schedule,
        start_date: None,
    };
    let projection = TaxEngine::new(TaxRules::default(), config).project(&request.profile);

    let response = TaxResponse {
        result: projection.result,
        installments: projection.installments,
        execution_time_us: start.elapsed().as_micros() as u64,
    };

    match serde_json::to_string(&response) {
        Ok(json) => respond(200, json),
        Err(e) => error_response(500, format!("Failed to serialize response: {}", e)),
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ApiGatewayV2httpRequest>) -> Result<ApiGatewayV2httpResponse, Error> {
    let body = event.payload.body.as_deref().unwrap_or("{}");
    Ok(handle_body(body))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
