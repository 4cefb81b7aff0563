use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    handler::{ApiError, ApiResult},
    predict::{PredictionRequest, PredictionResponse},
    state::AppState,
};

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;
    let prediction = state.predictor.predict(&request).await?;
    Ok(Json(prediction))
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        Router,
        body::Body,
        http::{Request, header::CONTENT_TYPE},
        routing::post,
    };
    use energy_db::memory::MemoryAccountStore;
    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    use crate::{api::router, auth::AuthService, predict::PredictionClient};

    use super::*;

    /// Stands in for the model: answers 100 kWh per square meter.
    async fn spawn_upstream() -> String {
        async fn model(Json(request): Json<PredictionRequest>) -> Json<PredictionResponse> {
            Json(PredictionResponse {
                predicted_energy_kwh: request.square_meters * 100.0,
            })
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().route("/predict", post(model)))
                .await
                .unwrap();
        });
        format!("http://{addr}/predict")
    }

    fn app(prediction_url: &str) -> Router {
        let state = AppState {
            auth: AuthService::new(Arc::new(MemoryAccountStore::new()), Duration::from_secs(5))
                .unwrap(),
            predictor: PredictionClient::new(prediction_url, Duration::from_secs(2)).unwrap(),
        };
        router(state)
    }

    async fn send(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::post("/predict")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn building() -> Value {
        json!({
            "square_meters": 12.5,
            "year_built": 1990,
            "primary_use": 5,
            "date": "2017-06-15",
        })
    }

    #[tokio::test]
    async fn test_relays_prediction() {
        let upstream = spawn_upstream().await;
        let (status, body) = send(app(&upstream), building()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"predicted_energy_kwh": 1250.0}));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_upstream() {
        // upstream is unreachable, so a 400 proves validation ran first
        let app = app("http://127.0.0.1:9/predict");

        let mut body = building();
        body["square_meters"] = json!(-3.0);
        let (status, body) = send(app.clone(), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "square_meters must be a positive number");

        let mut body = building();
        body["primary_use"] = json!(12);
        let (status, body) = send(app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("primary_use"));
    }

    #[tokio::test]
    async fn test_upstream_down() {
        let (status, body) = send(app("http://127.0.0.1:9/predict"), building()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({"detail": "Prediction service unavailable"}));
    }
}
