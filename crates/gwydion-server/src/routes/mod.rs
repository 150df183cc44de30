//! API routes.

pub mod auth;
pub mod bots;
pub mod content;
pub mod events;
pub mod generate;
pub mod health;
pub mod openapi;

pub use auth::{CallbackQuery, authorize_handler, callback_handler};
pub use bots::{
    BotsResponse, CreateBotResponse, CreatedBot, KnowledgeFile, create_bot_handler,
    my_bots_handler,
};
pub use content::{
    ContentResponse, ExtractResponse, RetrieveContentRequest, retrieve_content_handler,
    upload_file_handler,
};
pub use events::{
    EVENT_SUMMARY, EventResponse, ScheduleRequest, create_event_handler,
    schedule_workflow_handler,
};
pub use generate::{
    AutomatedStepsResponse, HighlightsResponse, ModulesResponse, OverviewResponse, QueryRequest,
    QueryResponse, QuizResponse, SentimentResponse, SubtopicsResponse, SummaryResponse,
    TaskRequest, TextRequest, TopicsResponse, WorkflowResponse, automate_task_handler,
    generate_modules_handler, generate_overview_handler, generate_quiz_handler,
    generate_subtopics_handler, generate_topics_handler, generate_workflow_handler,
    highlight_handler, query_handler, sentiment_analysis_handler, summarize_handler,
};
pub use health::{HealthResponse, LANDING_TEXT, health_routes, index};
pub use openapi::{ApiDoc, swagger_ui};
