use axum::extract::State;
use axum::routing::get;
use axum::Router;

use chrono::Utc;

use crate::auth::AuthUser;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::stats::{population, user};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_user_stats))
        .route("/population", get(get_population_stats))
}

async fn get_user_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let practice = state.store().list_user_practice_records(&auth.user_id)?;
    let notation = state.store().list_user_notation_records(&auth.user_id)?;

    // "Today" is resolved here so the engine itself stays clock-free.
    let today = Utc::now().date_naive();
    Ok(ok(user::user_stats(&practice, &notation, today)))
}

/// Public endpoint: aggregate figures only, no per-user data. Lets
/// unregistered visitors see how they would compare to the community.
async fn get_population_stats(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let user_count = state.store().count_users()?;
    let practice = state.store().list_all_practice_records()?;
    let notation = state.store().list_all_notation_records()?;

    match population::population_stats(
        user_count,
        &practice,
        &notation,
        state.config().stats.min_users,
    ) {
        Some(stats) => Ok(ok(stats)),
        None => Err(AppError::service_unavailable(
            "STATS_UNAVAILABLE",
            "Population statistics not available yet: not enough recorded data",
        )),
    }
}
