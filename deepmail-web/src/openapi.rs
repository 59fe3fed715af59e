//! OpenAPI specification for the Deepmail web server

use utoipa::OpenApi;

use crate::handlers::{
    ConversationSummaryResponse, ErrorResponse, HealthResponse, MessageResponse,
    QuestionsRequest, QuestionsResponse, ResearchRunRequest, SimulateRequest, SimulateResponse,
    WebhookForm, WebhookResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Deepmail Web API",
        version = "0.1.0",
        description = "SDR email auto-reply webhook and deep research service",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::handlers::receive_email,
        crate::handlers::simulate_email,

        crate::handlers::list_conversations,
        crate::handlers::get_conversation,

        crate::handlers::research_questions,
        crate::handlers::research_run,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            WebhookForm,
            WebhookResponse,
            SimulateRequest,
            SimulateResponse,
            ConversationSummaryResponse,
            MessageResponse,
            QuestionsRequest,
            QuestionsResponse,
            ResearchRunRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "SDR", description = "Inbound email handling and automatic replies"),
        (name = "Conversations", description = "Stored email threads"),
        (name = "Research", description = "Deep research pipeline"),
    )
)]
pub struct ApiDoc;

/// Get the OpenAPI specification as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Get the OpenAPI specification as YAML
pub fn get_openapi_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}
