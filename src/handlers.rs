use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::chat::{ChatModel, ChatTurn, Role, TurnPart};
use crate::translate::TranslationApi;

pub const NO_ANSWER_PLACEHOLDER: &str =
    "(No answer generated, possibly due to safety filters or empty response)";

type ApiResponse = (StatusCode, Json<Value>);

fn snippet(text: &str) -> String {
    text.chars().take(100).collect()
}

fn bad_request(message: &str) -> ApiResponse {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

/// Core of `POST /ask`: parse, validate, filter history, call the model.
/// The entry-point gate guarantees the model handle is present.
pub async fn handle_ask(model: &dyn ChatModel, body: &[u8]) -> ApiResponse {
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(value) if value.is_object() => value,
        _ => {
            warn!("Rejected /ask request: body is not a JSON object");
            return bad_request("Invalid request format");
        }
    };

    let question = match payload
        .get("question")
        .and_then(|v| v.as_str())
        .filter(|q| !q.is_empty())
    {
        Some(q) => q,
        None => {
            warn!("Rejected /ask request: 'question' missing or empty");
            return bad_request("Missing 'question' in request body");
        }
    };

    let history = filter_history(payload.get("history"));
    info!(
        "Asking AI tutor ({} history turns): {}...",
        history.len(),
        snippet(question)
    );

    let mut session = model.start_session(history);
    match session.send(question).await {
        Ok(reply) => {
            let answer = if reply.parts.is_empty() {
                warn!("Received empty response parts from the model");
                match reply.block_reason {
                    Some(reason) => format!("{NO_ANSWER_PLACEHOLDER} Block reason: {reason}"),
                    None => NO_ANSWER_PLACEHOLDER.to_string(),
                }
            } else {
                reply.text()
            };
            info!("Received answer: {}...", snippet(&answer));
            (StatusCode::OK, Json(json!({ "answer": answer })))
        }
        Err(e) => {
            error!("Chat upstream call failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to get answer from AI Tutor. Error: {}", e.summary())
                })),
            )
        }
    }
}

/// Malformed history entries are dropped with a warning, never turned into a
/// request error. `history` present but not an array is treated as empty.
fn filter_history(history: Option<&Value>) -> Vec<ChatTurn> {
    let Some(entries) = history.and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    let mut turns = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match validate_turn(entry) {
            Some(turn) => turns.push(turn),
            None => warn!("Dropping malformed history entry {index}"),
        }
    }
    turns
}

/// A turn is kept when its role is known, its parts are a non-empty array,
/// and the first part has a string `text`. Later parts without one are
/// skipped rather than dropping the whole turn.
fn validate_turn(entry: &Value) -> Option<ChatTurn> {
    let role = match entry.get("role").and_then(|v| v.as_str()) {
        Some("user") => Role::User,
        Some("model") => Role::Model,
        _ => return None,
    };

    let parts = entry.get("parts")?.as_array()?;
    parts.first()?.get("text")?.as_str()?;

    let parts = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .map(|text| TurnPart {
            text: text.to_string(),
        })
        .collect();

    Some(ChatTurn { role, parts })
}

/// Core of `POST /translate`.
pub async fn handle_translate(translator: &dyn TranslationApi, body: &[u8]) -> ApiResponse {
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(value) if value.is_object() => value,
        _ => {
            warn!("Rejected /translate request: body is not a JSON object");
            return bad_request("Invalid request format");
        }
    };

    let text = non_empty_str(&payload, "text");
    let target_lang = non_empty_str(&payload, "target_lang");
    let source_lang = non_empty_str(&payload, "source_lang");

    let (text, target_lang) = match (text, target_lang) {
        (Some(text), Some(target)) => (text, target),
        (text, target) => {
            let mut missing = Vec::new();
            if text.is_none() {
                missing.push("'text'");
            }
            if target.is_none() {
                missing.push("'target_lang'");
            }
            let missing = missing.join(", ");
            warn!("Rejected /translate request: missing {missing}");
            return bad_request(&format!(
                "Missing required fields in request body: {missing}"
            ));
        }
    };

    // "en-US" goes upstream as "en"; the response echoes the original.
    let upstream_source = source_lang.map(|lang| lang.split('-').next().unwrap_or(lang));
    info!(
        "Translating to {target_lang} (source: {upstream_source:?}): {}...",
        snippet(text)
    );

    match translator.translate(text, upstream_source, target_lang).await {
        Ok(result) => {
            let detected = source_lang
                .map(str::to_string)
                .or(result.detected_source_lang);
            info!(
                "Translation successful (source: {detected:?}): {}...",
                snippet(&result.text)
            );
            (
                StatusCode::OK,
                Json(json!({
                    "translated_text": result.text,
                    "detected_source_lang": detected
                })),
            )
        }
        Err(e) if e.is_api_error() => {
            error!("DeepL API error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Translation failed: {}", e.summary()) })),
            )
        }
        Err(e) => {
            error!("Unexpected error during translation: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!(
                        "An unexpected error occurred during translation: {}",
                        e.summary()
                    )
                })),
            )
        }
    }
}

fn non_empty_str<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}
