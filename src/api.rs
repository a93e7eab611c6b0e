// 🌐 HTTP API - the tip pipeline over axum
// Handlers never fail: every pair of input strings has a tip.

use crate::calculator::{Tip, TipCalculator, TipInput};
use crate::currency::{CurrencyFormat, SUPPORTED_FORMATS};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub calculator: TipCalculator,
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Query string for GET /api/tip; absent parameters are empty input
#[derive(Debug, Default, Deserialize)]
pub struct TipQuery {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub tip: String,
}

#[derive(Serialize)]
pub struct LocaleResponse {
    pub locale: &'static str,
    pub currency_code: &'static str,
    pub sample: String,
}

impl From<&'static CurrencyFormat> for LocaleResponse {
    fn from(format: &'static CurrencyFormat) -> Self {
        Self {
            locale: format.locale,
            currency_code: format.currency_code,
            sample: format.format(Decimal::new(123456789, 2)),
        }
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/tip?amount=..&tip=..
async fn get_tip(
    State(state): State<AppState>,
    Query(query): Query<TipQuery>,
) -> Json<ApiResponse<Tip>> {
    let input = TipInput::new(query.amount, query.tip);
    Json(ApiResponse::ok(state.calculator.calculate(&input)))
}

/// POST /api/tip with a TipInput body
async fn post_tip(
    State(state): State<AppState>,
    Json(input): Json<TipInput>,
) -> Json<ApiResponse<Tip>> {
    Json(ApiResponse::ok(state.calculator.calculate(&input)))
}

/// GET /api/locales - Supported locales with a formatted sample
async fn get_locales() -> Json<ApiResponse<Vec<LocaleResponse>>> {
    let locales = SUPPORTED_FORMATS.iter().map(LocaleResponse::from).collect();
    Json(ApiResponse::ok(locales))
}

/// Build the full router
pub fn router(calculator: TipCalculator) -> Router {
    let state = AppState { calculator };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/tip", get(get_tip).post(post_tip))
        .route("/locales", get(get_locales))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::EmptyTipPolicy;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn us_router() -> Router {
        router(TipCalculator::new(CurrencyFormat::lookup("en_US").unwrap()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(us_router(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_get_tip() {
        let (status, body) = send(us_router(), get("/api/tip?amount=50&tip=15")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["formatted"], "$7.50");
        assert_eq!(body["data"]["locale"], "en_US");
    }

    #[tokio::test]
    async fn test_get_tip_missing_and_garbage_params() {
        let (_, body) = send(us_router(), get("/api/tip?amount=100")).await;
        assert_eq!(body["data"]["formatted"], "$0.00");

        let (_, body) = send(us_router(), get("/api/tip?amount=abc&tip=10")).await;
        assert_eq!(body["data"]["formatted"], "$0.00");

        let (status, body) = send(us_router(), get("/api/tip")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["formatted"], "$0.00");
    }

    #[tokio::test]
    async fn test_post_tip() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/tip")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"amount": "33.33", "tip_percent": "18"}"#))
            .unwrap();

        let (status, body) = send(us_router(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["formatted"], "$6.00");
        assert_eq!(body["data"]["tip"], "5.9994");
    }

    #[tokio::test]
    async fn test_post_tip_uses_empty_tip_policy() {
        let calculator = TipCalculator::new(CurrencyFormat::lookup("en_US").unwrap())
            .with_empty_tip_policy(EmptyTipPolicy::Default);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/tip")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"amount": "100"}"#))
            .unwrap();

        let (_, body) = send(router(calculator), request).await;
        assert_eq!(body["data"]["formatted"], "$15.00");
    }

    #[tokio::test]
    async fn test_locales() {
        let (status, body) = send(us_router(), get("/api/locales")).await;
        assert_eq!(status, StatusCode::OK);

        let locales = body["data"].as_array().unwrap();
        assert_eq!(locales.len(), SUPPORTED_FORMATS.len());
        assert_eq!(locales[0]["locale"], "en_US");
        assert_eq!(locales[0]["sample"], "$1,234,567.89");
    }
}
