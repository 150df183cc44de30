//! Text generation endpoints.
//!
//! Every endpoint here renders one fixed prompt template, runs it through
//! the completion backend, and wraps the answer in a single-key JSON body.
//! Endpoints differ only in the required input field, the template, the
//! token budget, and whether the completion is returned whole or split
//! into lines.

use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorBody, Result};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Request and response bodies
// ─────────────────────────────────────────────────────────────────────────────

/// Body for the endpoints keyed on a `text` field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Body for the task automation endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TaskRequest {
    #[serde(default)]
    pub task: Option<String>,
}

/// Body for the free-form query endpoint.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HighlightsResponse {
    pub highlights: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SentimentResponse {
    pub sentiment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AutomatedStepsResponse {
    pub automated_steps: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopicsResponse {
    pub topics: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubtopicsResponse {
    pub subtopics: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModulesResponse {
    pub modules: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub overview: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuizResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkflowResponse {
    pub workflow: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared plumbing
// ─────────────────────────────────────────────────────────────────────────────

fn unwrap_body<T: Default>(body: Option<Json<T>>) -> T {
    body.map(|Json(inner)| inner).unwrap_or_default()
}

fn required<T>(field: Option<T>, name: &str) -> Result<T> {
    field.ok_or_else(|| ApiError::InvalidRequest(format!("Missing required field: {}", name)))
}

/// The curriculum endpoints refuse an absent or empty JSON body outright.
fn provided(body: Option<Json<Value>>) -> Result<Value> {
    let value = body.map(|Json(inner)| inner).unwrap_or(Value::Null);
    let empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Err(ApiError::InvalidRequest("No input data provided".to_string()));
    }
    Ok(value)
}

fn str_field(value: &Value, name: &str) -> String {
    value
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn module_list(value: &Value) -> Vec<String> {
    value
        .get("modules")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Completion text as trimmed lines.
fn lines(completion: &str) -> Vec<String> {
    completion.trim().split('\n').map(str::to_string).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Summarize a block of text.
#[utoipa::path(
    post,
    path = "/api/summarize",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Summary produced", body = SummaryResponse),
        (status = 400, description = "Missing text field", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn summarize_handler(
    State(state): State<AppState>,
    body: Option<Json<TextRequest>>,
) -> Result<Json<SummaryResponse>> {
    let text = required(unwrap_body(body).text, "text")?;
    let prompt = format!("Summarize the following text:\n\n{}", text);
    let completion = state.backend.complete(&prompt, 50).await?;

    Ok(Json(SummaryResponse {
        summary: completion.trim().to_string(),
    }))
}

/// Pull the key points out of a block of text.
#[utoipa::path(
    post,
    path = "/api/highlight",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Key points produced", body = HighlightsResponse),
        (status = 400, description = "Missing text field", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn highlight_handler(
    State(state): State<AppState>,
    body: Option<Json<TextRequest>>,
) -> Result<Json<HighlightsResponse>> {
    let text = required(unwrap_body(body).text, "text")?;
    let prompt = format!("Highlight the key points in the following text:\n\n{}", text);
    let completion = state.backend.complete(&prompt, 50).await?;

    Ok(Json(HighlightsResponse {
        highlights: lines(&completion),
    }))
}

/// Judge the sentiment of a block of text.
#[utoipa::path(
    post,
    path = "/api/sentiment-analysis",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Sentiment produced", body = SentimentResponse),
        (status = 400, description = "Missing text field", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn sentiment_analysis_handler(
    State(state): State<AppState>,
    body: Option<Json<TextRequest>>,
) -> Result<Json<SentimentResponse>> {
    let text = required(unwrap_body(body).text, "text")?;
    let prompt = format!(
        "Perform a sentiment analysis on the following text:\n\n{}",
        text
    );
    let completion = state.backend.complete(&prompt, 50).await?;

    Ok(Json(SentimentResponse {
        sentiment: completion.trim().to_string(),
    }))
}

/// Break a task into automated steps.
#[utoipa::path(
    post,
    path = "/api/automate-task",
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Steps produced", body = AutomatedStepsResponse),
        (status = 400, description = "Missing task field", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn automate_task_handler(
    State(state): State<AppState>,
    body: Option<Json<TaskRequest>>,
) -> Result<Json<AutomatedStepsResponse>> {
    let task = required(unwrap_body(body).task, "task")?;
    let prompt = format!("Automate the following task step-by-step:\n\n{}", task);
    let completion = state.backend.complete(&prompt, 150).await?;

    Ok(Json(AutomatedStepsResponse {
        automated_steps: lines(&completion),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Curriculum endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Generate topics around a subject.
#[utoipa::path(
    post,
    path = "/api/generate-topics",
    responses(
        (status = 200, description = "Topics produced", body = TopicsResponse),
        (status = 400, description = "No input data provided", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn generate_topics_handler(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<TopicsResponse>> {
    let data = provided(body)?;
    let topic = str_field(&data, "topic");
    let prompt = format!("Generate topics related to: {}", topic);
    let completion = state.backend.complete(&prompt, 100).await?;

    Ok(Json(TopicsResponse {
        topics: lines(&completion),
    }))
}

/// Generate subtopics for a topic.
#[utoipa::path(
    post,
    path = "/api/generate-subtopics",
    responses(
        (status = 200, description = "Subtopics produced", body = SubtopicsResponse),
        (status = 400, description = "No input data provided", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn generate_subtopics_handler(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<SubtopicsResponse>> {
    let data = provided(body)?;
    let topic = str_field(&data, "topic");
    let prompt = format!("Generate a list of subtopics for the topic: {}", topic);
    let completion = state.backend.complete(&prompt, 150).await?;

    Ok(Json(SubtopicsResponse {
        subtopics: lines(&completion),
    }))
}

/// Generate course modules for a subtopic.
#[utoipa::path(
    post,
    path = "/api/generate-modules",
    responses(
        (status = 200, description = "Modules produced", body = ModulesResponse),
        (status = 400, description = "No input data provided", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn generate_modules_handler(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<ModulesResponse>> {
    let data = provided(body)?;
    let subtopic = str_field(&data, "subtopic");
    let num_modules = data
        .get("num_modules")
        .and_then(Value::as_u64)
        .unwrap_or(1);
    let prompt = format!(
        "Generate {} modules for the subtopic: {}",
        num_modules, subtopic
    );
    let completion = state.backend.complete(&prompt, 150).await?;

    Ok(Json(ModulesResponse {
        modules: lines(&completion),
    }))
}

/// Generate an overview covering a list of modules.
#[utoipa::path(
    post,
    path = "/api/generate-overview",
    responses(
        (status = 200, description = "Overview produced", body = OverviewResponse),
        (status = 400, description = "No input data provided", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn generate_overview_handler(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<OverviewResponse>> {
    let data = provided(body)?;
    let modules = module_list(&data);
    let prompt = format!(
        "Generate an overview for the following modules: {:?}",
        modules
    );
    let completion = state.backend.complete(&prompt, 150).await?;

    Ok(Json(OverviewResponse {
        overview: completion.trim().to_string(),
    }))
}

/// Generate quiz questions covering a list of modules.
#[utoipa::path(
    post,
    path = "/api/generate-quiz",
    responses(
        (status = 200, description = "Questions produced", body = QuizResponse),
        (status = 400, description = "No input data provided", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn generate_quiz_handler(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<QuizResponse>> {
    let data = provided(body)?;
    let modules = module_list(&data);
    let prompt = format!(
        "Generate quiz questions for the following modules: {:?}",
        modules
    );
    let completion = state.backend.complete(&prompt, 150).await?;

    Ok(Json(QuizResponse {
        questions: lines(&completion),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Free-form endpoints
// ─────────────────────────────────────────────────────────────────────────────

/// Answer a free-form query.
#[utoipa::path(
    post,
    path = "/api/query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer produced", body = QueryResponse),
        (status = 400, description = "Missing query field", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn query_handler(
    State(state): State<AppState>,
    body: Option<Json<QueryRequest>>,
) -> Result<Json<QueryResponse>> {
    let query = required(unwrap_body(body).query, "query")?;
    let prompt = format!("Answer the following query:\n\n{}", query);
    let completion = state.backend.complete(&prompt, 150).await?;

    Ok(Json(QueryResponse {
        response: completion.trim().to_string(),
    }))
}

/// Turn a task description into a daily workflow.
#[utoipa::path(
    post,
    path = "/api/generate-workflow",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Workflow produced", body = WorkflowResponse),
        (status = 400, description = "Missing text field", body = ErrorBody),
        (status = 502, description = "Completion backend failed", body = ErrorBody),
    ),
    tag = "generate"
)]
pub async fn generate_workflow_handler(
    State(state): State<AppState>,
    body: Option<Json<TextRequest>>,
) -> Result<Json<WorkflowResponse>> {
    let text = required(unwrap_body(body).text, "text")?;
    let prompt = format!("Generate a daily workflow for the following task:\n\n{}", text);
    let completion = state.backend.complete(&prompt, 200).await?;

    Ok(Json(WorkflowResponse {
        workflow: completion.trim().to_string(),
    }))
}
