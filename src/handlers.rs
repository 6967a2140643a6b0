use crate::errors::AppError;
use crate::keys::KeyCommand;
use crate::models::{
    KeyRequest, PhrasesResponse, PressEvent, PressRequest, ResetAllRequest, SelectPhraseRequest,
    SessionSnapshot,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Json,
};
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let tasbih = state.tasbih.lock().await;
    Html(render_index(tasbih.catalog(), &tasbih.snapshot()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.touch().await;
    let tasbih = state.tasbih.lock().await;
    Json(tasbih.snapshot())
}

pub async fn get_phrases(State(state): State<AppState>) -> Json<PhrasesResponse> {
    let tasbih = state.tasbih.lock().await;
    Json(PhrasesResponse {
        phrases: tasbih.catalog().iter().cloned().collect(),
    })
}

pub async fn select_phrase(
    State(state): State<AppState>,
    Json(payload): Json<SelectPhraseRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut tasbih = state.tasbih.lock().await;
    tasbih.select_phrase(&payload.id)?;
    Ok(Json(tasbih.snapshot()))
}

pub async fn click(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut tasbih = state.tasbih.lock().await;
    tasbih.primary_action();
    Json(tasbih.snapshot())
}

pub async fn press(
    State(state): State<AppState>,
    Json(payload): Json<PressRequest>,
) -> Json<SessionSnapshot> {
    debug!(event = ?payload.event, "press event");
    match payload.event {
        PressEvent::Start => state.press_start().await,
        PressEvent::End => state.press_end(false).await,
        PressEvent::Cancel => state.press_end(true).await,
    }
    let tasbih = state.tasbih.lock().await;
    Json(tasbih.snapshot())
}

pub async fn key(
    State(state): State<AppState>,
    Json(payload): Json<KeyRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let command = KeyCommand::from_key(&payload.code, &payload.key)
        .ok_or_else(|| AppError::bad_request("key is not bound to a command"))?;
    let mut tasbih = state.tasbih.lock().await;
    tasbih.key_press(command);
    Ok(Json(tasbih.snapshot()))
}

pub async fn reset_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut tasbih = state.tasbih.lock().await;
    tasbih.reset_session();
    Json(tasbih.snapshot())
}

pub async fn reset_all(
    State(state): State<AppState>,
    Json(payload): Json<ResetAllRequest>,
) -> Json<SessionSnapshot> {
    let mut tasbih = state.tasbih.lock().await;
    tasbih.reset_all(|| payload.confirmed);
    Json(tasbih.snapshot())
}

pub async fn tap(State(state): State<AppState>) -> Redirect {
    state.tasbih.lock().await.primary_action();
    Redirect::to("/")
}

pub async fn reset_form(State(state): State<AppState>) -> Redirect {
    state.tasbih.lock().await.reset_session();
    Redirect::to("/")
}
