// handlers/api/fare_rules.rs - POST /api/fare-rules handler

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::fares;

#[derive(Debug, Deserialize)]
pub struct FareRulesRequest {
    #[serde(default, rename = "pricingInfo")]
    pub pricing_info: Option<Value>,
}

/// POST /api/fare-rules - Extract cancellation, date change and no-show rules
///
/// Expected Input:
/// ```json
/// { "pricingInfo": { "FareInfo": [ ... ], "PTC_FareBreakdowns": { ... } } }
/// ```
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "rules": { "cancellation": {...}, "dateChange": null, "noShow": {...} },
///   "fareBasisCodes": ["YOWBD"]
/// }
/// ```
///
/// Only a missing `pricingInfo` is a client error. Anything that goes wrong
/// afterwards still answers 200 with `success: false`, so the UI always gets
/// a payload it can render its fallback from.
pub async fn fare_rules_post(body: Result<Json<FareRulesRequest>, JsonRejection>) -> Response {
    let body = match body {
        Ok(Json(request)) => Some(request),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return ApiError::from(rejection).into_response();
        }
        Err(_) => None,
    };

    let Some(pricing_info) = body
        .and_then(|request| request.pricing_info)
        .filter(|v| !v.is_null())
    else {
        return ApiError::bad_request("Missing pricingInfo").into_response();
    };

    let extracted = fares::extract(&pricing_info);

    match serde_json::to_value(&extracted) {
        Ok(Value::Object(mut body)) => {
            body.insert("success".to_string(), Value::Bool(true));
            (StatusCode::OK, Json(Value::Object(body))).into_response()
        }
        Ok(other) => soft_failure(format!("unexpected fare rule shape: {}", other)),
        Err(e) => soft_failure(e.to_string()),
    }
}

fn soft_failure(reason: String) -> Response {
    warn!("Fare rule extraction failed: {}", reason);
    (
        StatusCode::OK,
        Json(json!({
            "success": false,
            "error": "Failed to extract fare rules",
            "rules": { "cancellation": null, "dateChange": null, "noShow": null },
            "fareBasisCodes": []
        })),
    )
        .into_response()
}
