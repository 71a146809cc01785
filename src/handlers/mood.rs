use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Local;

use crate::error::AppResult;
use crate::models::mood::{MoodLoggedResponse, MoodRequest, MoodSubmission};
use crate::AppState;

pub async fn submit_mood(
    State(state): State<AppState>,
    payload: Result<Json<MoodRequest>, JsonRejection>,
) -> AppResult<Json<MoodLoggedResponse>> {
    let Json(body) = payload?;

    // Validation failures return here, before the notifier is involved.
    let submission = MoodSubmission::from_request(body, Local::now().date_naive())?;

    tracing::debug!(
        name = %submission.name,
        mood_count = submission.moods.len(),
        date = %submission.date,
        "Mood submission accepted"
    );

    state
        .notifier
        .deliver(&submission.name, &submission.moods, &submission.date)
        .await?;

    Ok(Json(MoodLoggedResponse::success()))
}
