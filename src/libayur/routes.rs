use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::{
    db::{Herb, NewHerb},
    error::{AppError, HERB_NOT_FOUND},
    remedy::answer_query,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Deserialize)]
pub struct QueryRequest {
    user_input: String,
}

/// Mistyped fields grade as a soft failure, not a rejected body.
#[derive(Deserialize)]
pub struct AnswerRequest {
    question_id: Option<Value>,
    selected_option: Option<Value>,
}

impl AnswerRequest {
    /// Integral numbers only; `1.0` names question 1, `"1"` names nothing.
    fn question_id(&self) -> Option<i64> {
        let id = self.question_id.as_ref()?;
        id.as_i64().or_else(|| {
            id.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        })
    }

    fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_ref().and_then(Value::as_str)
    }
}

#[derive(Deserialize)]
pub struct Pagination {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Response {
    debug!("[Query] {:?}", payload.user_input);
    let response = answer_query(&state.symptoms, &payload.user_input);
    if response.is_success() {
        debug!("[Query] Returning {} remedy records", response.data().len());
    } else {
        debug!("[Query] No remedy found");
    }
    Json(response).into_response()
}

pub async fn quiz_start_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(state.quiz.start()).into_response()
}

pub async fn quiz_answer_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnswerRequest>,
) -> Response {
    let result = state
        .quiz
        .answer(payload.question_id(), payload.selected_option());
    Json(result).into_response()
}

pub async fn list_herbs_handler(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Herb>>, AppError> {
    let herbs = state
        .with_herbs(move |conn| Herb::get_page(conn, page.skip, page.limit))
        .await?;
    Ok(Json(herbs))
}

pub async fn get_herb_handler(
    State(state): State<Arc<AppState>>,
    Path(herb_id): Path<i64>,
) -> Result<Json<Herb>, AppError> {
    state
        .with_herbs(move |conn| Herb::get_by_id(conn, herb_id))
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(HERB_NOT_FOUND))
}

pub async fn create_herb_handler(
    State(state): State<Arc<AppState>>,
    Json(herb): Json<NewHerb>,
) -> Result<Json<Herb>, AppError> {
    let herb = state.with_herbs(move |conn| Herb::add(conn, herb)).await?;
    Ok(Json(herb))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/query", post(query_handler))
        .route("/quiz/start", get(quiz_start_handler))
        .route("/quiz/answer", post(quiz_answer_handler))
        .route("/herbs", get(list_herbs_handler).post(create_herb_handler))
        .route("/herbs/", get(list_herbs_handler).post(create_herb_handler))
        .route("/herbs/:herb_id", get(get_herb_handler))
        .with_state(state)
}

pub fn cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(Duration::from_secs(60 * 10))
}
