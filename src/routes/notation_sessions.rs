use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::extractors::JsonBody;
use crate::response::{created, no_content, ok, AppError};
use crate::state::AppState;
use crate::store::operations::notation_records::NotationRecord;
use crate::store::RecordQuery;
use crate::validation::{validate_accuracy, validate_drill_type, validate_notes, validate_timing};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNotationSessionRequest {
    session_date: DateTime<Utc>,
    drill_type: String,
    #[serde(default)]
    attempts: Vec<serde_json::Value>,
    total_pieces: u32,
    correct_count: u32,
    accuracy: f64,
    average_time: f64,
    total_time: Option<f64>,
    notes: Option<String>,
}

fn validate_create(req: &CreateNotationSessionRequest) -> Result<(), AppError> {
    let invalid = |msg: &str| AppError::bad_request("SESSION_INVALID", msg);

    validate_drill_type(&req.drill_type).map_err(|m| invalid(m))?;
    validate_accuracy(req.accuracy).map_err(|m| invalid(m))?;
    validate_timing(req.average_time).map_err(|m| invalid(m))?;
    if let Some(total_time) = req.total_time {
        validate_timing(total_time).map_err(|m| invalid(m))?;
    }
    if req.correct_count > req.total_pieces {
        return Err(invalid("Correct count cannot exceed total pieces"));
    }
    if let Some(ref notes) = req.notes {
        validate_notes(notes).map_err(|m| invalid(m))?;
    }
    Ok(())
}

async fn create_session(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateNotationSessionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_create(&req)?;

    let record = NotationRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        session_date: req.session_date,
        drill_type: req.drill_type.trim().to_string(),
        attempts: req.attempts,
        total_pieces: req.total_pieces,
        correct_count: req.correct_count,
        accuracy: req.accuracy,
        average_time: req.average_time,
        total_time: req.total_time,
        notes: req.notes,
        created_at: Utc::now(),
    };

    state.store().create_notation_record(&record)?;
    Ok(created(record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSessionsQuery {
    skip: Option<usize>,
    limit: Option<usize>,
    drill_type: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl ListSessionsQuery {
    fn into_record_query(self) -> RecordQuery {
        RecordQuery {
            drill_type: self.drill_type,
            start_date: self.start_date,
            end_date: self.end_date,
            skip: self.skip.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

async fn list_sessions(
    auth: AuthUser,
    Query(query): Query<ListSessionsQuery>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let records = state
        .store()
        .query_user_notation_records(&auth.user_id, &query.into_record_query())?;
    Ok(ok(records))
}

async fn get_session(
    auth: AuthUser,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let record = state
        .store()
        .get_user_notation_record(&auth.user_id, &session_id)?
        .ok_or_else(|| AppError::not_found("Session not found"))?;
    Ok(ok(record))
}

async fn delete_session(
    auth: AuthUser,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if !state
        .store()
        .delete_notation_record(&auth.user_id, &session_id)?
    {
        return Err(AppError::not_found("Session not found"));
    }
    Ok(no_content())
}
