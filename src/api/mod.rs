use axum::{
    Router,
    extract::{Json, Path, Query, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Settings;
use crate::core::{
    CalculatorInfo, EvalError, GoalSolveConfig, InputRecord, InputValue, SolveError, calculators,
    evaluate, find_calculator, solve_goal,
};

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct CatalogResponse {
    calculators: Vec<CalculatorInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SolvePayload {
    #[serde(default)]
    inputs: InputRecord,
    field: String,
    output: String,
    target: f64,
    search_min: f64,
    search_max: f64,
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
}

impl SolvePayload {
    fn into_parts(self) -> (InputRecord, GoalSolveConfig) {
        let mut config = GoalSolveConfig::new(
            &self.field,
            &self.output,
            self.target,
            self.search_min,
            self.search_max,
        );
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        (self.inputs, config)
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/api/calculators", get(catalog_handler))
        .route("/api/calculators/:id", get(describe_handler))
        .route(
            "/api/evaluate/:id",
            get(evaluate_get_handler).post(evaluate_post_handler),
        )
        .route("/api/solve/:id", post(solve_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(settings: &Settings) -> std::io::Result<()> {
    let addr = settings.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        addr = %listener.local_addr()?,
        calculators = calculators().count(),
        "calckit HTTP API listening"
    );
    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn catalog_handler() -> Response {
    let body = CatalogResponse {
        calculators: calculators().map(|c| c.info()).collect(),
    };
    json_response(StatusCode::OK, body)
}

async fn describe_handler(Path(id): Path<String>) -> Response {
    match find_calculator(&id) {
        Some(calculator) => json_response(StatusCode::OK, calculator.info()),
        None => error_response(
            StatusCode::NOT_FOUND,
            &EvalError::UnknownCalculator(id).to_string(),
        ),
    }
}

async fn evaluate_get_handler(
    Path(id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let record = params
        .into_iter()
        .map(|(name, raw)| {
            let value = InputValue::parse(&raw);
            (name, value)
        })
        .collect();
    evaluate_handler_impl(&id, &record)
}

async fn evaluate_post_handler(
    Path(id): Path<String>,
    payload: Result<Json<InputRecord>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(record)) => evaluate_handler_impl(&id, &record),
        Err(rejection) => error_response(
            StatusCode::BAD_REQUEST,
            &format!("Invalid JSON inputs: {}", rejection.body_text()),
        ),
    }
}

fn evaluate_handler_impl(id: &str, record: &InputRecord) -> Response {
    match evaluate(id, record) {
        Ok(evaluation) => json_response(StatusCode::OK, evaluation),
        Err(err) => {
            warn!(calculator = id, error = %err, "evaluation rejected");
            error_response(eval_status(&err), &err.to_string())
        }
    }
}

async fn solve_handler(
    Path(id): Path<String>,
    payload: Result<Json<SolvePayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid solve request: {}", rejection.body_text()),
            );
        }
    };
    let (inputs, config) = payload.into_parts();
    match solve_goal(&id, &inputs, &config) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => {
            warn!(calculator = %id, error = %err, "goal seek rejected");
            let status = match &err {
                SolveError::Eval(inner) => eval_status(inner),
                _ => StatusCode::BAD_REQUEST,
            };
            error_response(status, &err.to_string())
        }
    }
}

fn eval_status(err: &EvalError) -> StatusCode {
    match err {
        EvalError::UnknownCalculator(_) => StatusCode::NOT_FOUND,
        EvalError::Validation(_) => StatusCode::BAD_REQUEST,
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn assert_no_store(response: &Response) {
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
    }

    fn query(pairs: &[(&str, &str)]) -> Query<BTreeMap<String, String>> {
        Query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn catalog_lists_every_calculator() {
        let response = catalog_handler().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_no_store(&response);
        let body = body_json(response).await;
        let listed = body["calculators"].as_array().expect("array");
        assert_eq!(listed.len(), calculators().count());
        assert!(listed.iter().any(|c| c["id"] == "bar-to-psi"));
    }

    #[tokio::test]
    async fn describe_reports_fields_and_defaults() {
        let response = describe_handler(Path("future-value".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let periods = body["fields"]
            .as_array()
            .expect("fields")
            .iter()
            .find(|f| f["name"] == "periods_per_year")
            .expect("periods field")
            .clone();
        assert_eq!(periods["default"], json!(12.0));
    }

    #[tokio::test]
    async fn describe_unknown_is_404() {
        let response = describe_handler(Path("nope".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "unknown calculator: nope" }));
    }

    #[tokio::test]
    async fn evaluate_get_parses_query_values() {
        let response = evaluate_get_handler(
            Path("capital-payback".to_string()),
            query(&[
                ("initial_investment", "1000"),
                ("flow", "uneven"),
                ("cash_flows", "200,300,500"),
            ]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_no_store(&response);
        let body = body_json(response).await;
        let payback = body["outputs"]
            .as_array()
            .expect("outputs")
            .iter()
            .find(|o| o["name"] == "payback_years")
            .expect("payback_years")
            .clone();
        assert_eq!(payback["value"], json!(3.0));
    }

    #[tokio::test]
    async fn evaluate_post_returns_null_net_worth() {
        let record = InputRecord::new()
            .with_number("total_assets", 0.0)
            .with_number("total_liabilities", 0.0);
        let response = evaluate_post_handler(Path("net-worth".to_string()), Ok(Json(record))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["outputs"][0]["name"], "net_worth");
        assert_eq!(body["outputs"][0]["value"], Value::Null);
    }

    #[tokio::test]
    async fn evaluate_validation_failure_is_400() {
        let response = evaluate_get_handler(
            Path("bar-to-psi".to_string()),
            query(&[("bar", "lots")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().expect("message").contains("bar"));
    }

    #[tokio::test]
    async fn evaluate_unknown_calculator_is_404() {
        let response = evaluate_get_handler(Path("nope".to_string()), query(&[])).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn solve_finds_discount_percent() {
        let payload: SolvePayload = serde_json::from_value(json!({
            "inputs": { "original_price": 80 },
            "field": "discount_percent",
            "output": "final_price",
            "target": 60,
            "searchMin": 0,
            "searchMax": 100
        }))
        .expect("payload");
        let response = solve_handler(Path("discount".to_string()), Ok(Json(payload))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["feasible"], json!(true));
        let solved = body["solvedValue"].as_f64().expect("solved");
        assert!((solved - 25.0).abs() < 1e-4, "solved {solved}");
    }

    #[tokio::test]
    async fn solve_bad_bounds_is_400() {
        let payload: SolvePayload = serde_json::from_value(json!({
            "field": "bar",
            "output": "psi",
            "target": 10,
            "searchMin": 5,
            "searchMax": 1
        }))
        .expect("payload");
        let response = solve_handler(Path("bar-to-psi".to_string()), Ok(Json(payload))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn solve_payload_rejects_unknown_keys() {
        let parsed = serde_json::from_value::<SolvePayload>(json!({
            "field": "bar",
            "output": "psi",
            "target": 10,
            "searchMin": 0,
            "searchMax": 1,
            "guess": 3
        }));
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "Not found" }));
    }
}
