//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{auth, bots, content, events, generate, health};
use crate::error::ErrorBody;
use crate::state::Bot;

/// OpenAPI documentation for the Gwydion API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gwydion API",
        description = "Calendar scheduling, text generation, and content backend",
        version = "1.0.0",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Local server"),
    ),
    paths(
        // Health
        health::health,
        // Authorization flow
        auth::authorize_handler,
        auth::callback_handler,
        // Calendar
        events::create_event_handler,
        events::schedule_workflow_handler,
        // Generation
        generate::summarize_handler,
        generate::highlight_handler,
        generate::sentiment_analysis_handler,
        generate::automate_task_handler,
        generate::generate_topics_handler,
        generate::generate_subtopics_handler,
        generate::generate_modules_handler,
        generate::generate_overview_handler,
        generate::generate_quiz_handler,
        generate::query_handler,
        generate::generate_workflow_handler,
        // Content
        content::retrieve_content_handler,
        content::upload_file_handler,
        // Bots
        bots::my_bots_handler,
        bots::create_bot_handler,
    ),
    components(
        schemas(
            ErrorBody,
            // Health
            health::HealthResponse,
            // Calendar
            events::ScheduleRequest,
            events::EventResponse,
            // Generation
            generate::TextRequest,
            generate::TaskRequest,
            generate::QueryRequest,
            generate::SummaryResponse,
            generate::HighlightsResponse,
            generate::SentimentResponse,
            generate::AutomatedStepsResponse,
            generate::TopicsResponse,
            generate::SubtopicsResponse,
            generate::ModulesResponse,
            generate::OverviewResponse,
            generate::QuizResponse,
            generate::QueryResponse,
            generate::WorkflowResponse,
            // Content
            content::RetrieveContentRequest,
            content::ContentResponse,
            content::ExtractResponse,
            // Bots
            Bot,
            bots::BotsResponse,
            bots::KnowledgeFile,
            bots::CreatedBot,
            bots::CreateBotResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Google authorization flow"),
        (name = "calendar", description = "Workflow scheduling"),
        (name = "generate", description = "Text generation"),
        (name = "content", description = "Wikipedia retrieval and uploads"),
        (name = "bots", description = "Bot registry"),
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_api_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/health",
            "/api/authorize",
            "/api/callback",
            "/api/create-event",
            "/api/schedule-workflow",
            "/api/summarize",
            "/api/highlight",
            "/api/sentiment-analysis",
            "/api/automate-task",
            "/api/generate-topics",
            "/api/generate-subtopics",
            "/api/generate-modules",
            "/api/generate-overview",
            "/api/generate-quiz",
            "/api/query",
            "/api/generate-workflow",
            "/api/retrieve-content",
            "/api/upload-file",
            "/api/my-bots",
            "/api/create-bot",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }
}
