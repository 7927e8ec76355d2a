//! AWS Lambda handler serving the ROI model
//!
//! Accepts a model request as the JSON body of a Lambda Function URL call and
//! returns the full report (timeline, summary, display strings).
//!
//! Request body (all fields optional):
//!   { "variant": "assumption-driven" | "direct-entry",
//!     "assumptions": { "numReps": 50, ... },
//!     "changes": [ { "field": "numReps", "value": 75 }, ... ],
//!     "drivers": { "rampTime": 500000, ... },
//!     "implementationCost": 400000 }

use std::collections::BTreeMap;

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{json, Value};

use roi_model::{AssumptionChange, AssumptionSet, Driver, ModelSession, ModelVariant, RoiReport};

/// Input configuration for one model evaluation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiRequest {
    #[serde(default)]
    pub variant: ModelVariant,

    /// Full assumption set; every driver is derived from it
    #[serde(default)]
    pub assumptions: Option<AssumptionSet>,

    /// Slider moves applied in order after `assumptions`
    #[serde(default)]
    pub changes: Vec<AssumptionChange>,

    /// Driver values set directly
    #[serde(default)]
    pub drivers: BTreeMap<Driver, u64>,

    #[serde(default)]
    pub implementation_cost: Option<u64>,
}

impl RoiRequest {
    fn into_report(self) -> roi_model::error::Result<RoiReport> {
        let mut session = ModelSession::new(self.variant);

        if let Some(set) = self.assumptions {
            session.set_assumptions(set)?;
        }
        for change in self.changes {
            session.apply(change)?;
        }
        for (driver, value) in self.drivers {
            session.set_driver(driver, value)?;
        }
        if let Some(cost) = self.implementation_cost {
            session.set_implementation_cost(cost);
        }

        Ok(session.report())
    }
}

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "POST, OPTIONS",
        "Access-Control-Allow-Headers": "Content-Type",
    })
}

fn error_response(status: u16, message: &str) -> Value {
    json!({
        "statusCode": status,
        "headers": cors_headers(),
        "body": json!({ "error": message }).to_string(),
    })
}

fn json_response(report: &RoiReport) -> Result<Value, Error> {
    Ok(json!({
        "statusCode": 200,
        "headers": cors_headers(),
        "body": serde_json::to_string(report)?,
    }))
}

/// Lambda handler function
async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<Value, Error> {
    let request = event.payload;

    // Handle CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(json!({
            "statusCode": 200,
            "headers": cors_headers(),
            "body": "",
        }));
    }

    if request.is_base64_encoded {
        return Ok(error_response(400, "Request body must be JSON text"));
    }

    let body = request.body.as_deref().unwrap_or("{}");
    let roi_request: RoiRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Rejected request body: {}", e);
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    log::debug!("Evaluating {:?}", roi_request);

    match roi_request.into_report() {
        Ok(report) => json_response(&report),
        Err(e) => Ok(error_response(400, &e.to_string())),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
