//! Bot registry endpoints.

use axum::extract::{Json, Multipart, State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorBody, Result};
use crate::state::{AppState, Bot, NewBot};

/// Listing of every registered bot.
#[derive(Debug, Serialize, ToSchema)]
pub struct BotsResponse {
    pub bots: Vec<Bot>,
}

/// Metadata for an uploaded knowledge-base file.
#[derive(Debug, Serialize, ToSchema)]
pub struct KnowledgeFile {
    pub filename: String,
    pub size: u64,
}

/// The created bot together with its knowledge-base metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedBot {
    #[serde(flatten)]
    pub bot: Bot,
    pub knowledge_base: Vec<KnowledgeFile>,
}

/// Response for a successful bot creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBotResponse {
    pub bot: CreatedBot,
    pub message: String,
}

/// List every registered bot.
#[utoipa::path(
    get,
    path = "/api/my-bots",
    responses(
        (status = 200, description = "Registered bots", body = BotsResponse),
    ),
    tag = "bots"
)]
pub async fn my_bots_handler(State(state): State<AppState>) -> Json<BotsResponse> {
    Json(BotsResponse {
        bots: state.bots.list().await,
    })
}

/// Register a bot from a multipart form.
///
/// `name`, `base_bot`, and `prompt` are required text fields. The checkbox
/// fields are true only for the literal string `true`. Any number of
/// `knowledge_base` file parts may be attached; only their metadata is
/// echoed back.
#[utoipa::path(
    post,
    path = "/api/create-bot",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Bot fields plus optional `knowledge_base` file parts"),
    responses(
        (status = 200, description = "Bot registered", body = CreateBotResponse),
        (status = 400, description = "Missing required field", body = ErrorBody),
    ),
    tag = "bots"
)]
pub async fn create_bot_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CreateBotResponse>> {
    let mut name = None;
    let mut base_bot = None;
    let mut prompt = None;
    let mut public_access = false;
    let mut related_bots = false;
    let mut show_prompt = false;
    let mut knowledge_base = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        if field_name == "knowledge_base" {
            let filename = field.file_name().unwrap_or("unnamed").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(format!("Failed to read upload: {}", e)))?;
            knowledge_base.push(KnowledgeFile {
                filename,
                size: bytes.len() as u64,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to read field: {}", e)))?;

        match field_name.as_str() {
            "name" => name = Some(value),
            "base_bot" => base_bot = Some(value),
            "prompt" => prompt = Some(value),
            // Checkbox semantics: anything but the literal "true" is false.
            "public_access" => public_access = value == "true",
            "related_bots" => related_bots = value == "true",
            "show_prompt" => show_prompt = value == "true",
            _ => {}
        }
    }

    let missing =
        |field: &str| ApiError::InvalidRequest(format!("Missing required field: {}", field));

    let bot = state
        .bots
        .add(NewBot {
            name: name.ok_or_else(|| missing("name"))?,
            base_bot: base_bot.ok_or_else(|| missing("base_bot"))?,
            prompt: prompt.ok_or_else(|| missing("prompt"))?,
            public_access,
            related_bots,
            show_prompt,
        })
        .await;

    tracing::info!(bot_id = bot.id, name = %bot.name, "Bot created");

    Ok(Json(CreateBotResponse {
        bot: CreatedBot {
            bot,
            knowledge_base,
        },
        message: "Bot created successfully!".to_string(),
    }))
}
