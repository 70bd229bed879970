use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use crate::basecamp::{BasecampError, Card, CardUpdate, NewCard};
use crate::chat::{sanitize_text, ChatEvent, ChatMessage};
use crate::directory::{resolve_assignees, resolve_project};
use crate::parser::parse_task_input;

use super::state::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "basecamp bridge is running")
}

/// One webhook call, one response: the request is processed fully before
/// the status goes out, so the 200/500 reflects the real outcome.
pub async fn handle_chat_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> impl IntoResponse {
    let event: ChatEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, Json(json!({"text": "bad json"})));
        }
    };
    let message = event.into_message();

    match process_message(&state, &message).await {
        Ok(card) => (
            StatusCode::OK,
            Json(json!({
                "text": format!("Task created in Basecamp: {}", card.title)
            })),
        ),
        Err(err) => {
            error!("webhook processing failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "text": format!("Failed to create Basecamp card: {}", err)
                })),
            )
        }
    }
}

/// Parse the message, resolve names against the directory, create the card,
/// then attach assignees. Update failure after a successful create leaves
/// the card in place without assignees; there is no compensating delete.
pub async fn process_message(
    state: &AppState,
    message: &ChatMessage,
) -> Result<Card, BasecampError> {
    let raw_text = message.text.as_deref().unwrap_or("No message text");
    let text = sanitize_text(raw_text);
    let draft = parse_task_input(&text);

    let message_time = message
        .create_time
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    info!(
        "task draft from {} <{}> space={} at {}: title=\"{}\" due_on={}",
        message.sender_name(),
        message.sender_email(),
        message.space_uri(),
        message_time,
        draft.title,
        draft.due_on
    );

    let people = state.directory.people().await?;
    let assignee_ids = match draft.assignee_names.as_deref() {
        Some(names) => resolve_assignees(names, &people),
        None => Vec::new(),
    };

    let mut project_id = state.config.default_project_id;
    let mut list_id = state.config.default_list_id;
    if let Some(fragment) = draft.project_name.as_deref() {
        let projects = state.directory.projects().await?;
        match resolve_project(fragment, &projects) {
            Some(project) => match state.config.list_routes.list_for(&project.name) {
                Some(mapped_list_id) => {
                    info!(
                        "routing to project \"{}\" ({}) list {}",
                        project.name, project.id, mapped_list_id
                    );
                    project_id = project.id;
                    list_id = mapped_list_id;
                }
                None => {
                    info!(
                        "no list mapped for project \"{}\", using default list",
                        project.name
                    );
                }
            },
            None => {
                info!("no matching project for \"{}\", using defaults", fragment);
            }
        }
    }

    let card = state
        .basecamp
        .create_card(
            project_id,
            list_id,
            &NewCard {
                title: draft.title.clone(),
                content: draft.notes.clone(),
                due_on: draft.due_on.clone(),
            },
        )
        .await?;
    info!(
        "created card {} (\"{}\") in project {}",
        card.id, card.title, project_id
    );

    // an empty assignee list skips the update entirely
    if !assignee_ids.is_empty() {
        state
            .basecamp
            .update_card(
                project_id,
                card.id,
                &CardUpdate {
                    assignee_ids,
                    due_on: draft.due_on,
                },
            )
            .await?;
        info!("updated card {} with assignees", card.id);
    }

    Ok(card)
}
