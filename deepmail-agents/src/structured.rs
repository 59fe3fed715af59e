//! Parsing of structured agent answers

use deepmail_core::{agent_error, AgentRuntime, AgentSpec, DeepmailResult};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Locate the outermost JSON object in a model answer.
///
/// Models often wrap JSON in a markdown code fence or add a sentence around
/// it; everything outside the first `{` and the last `}` is ignored.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Run `agent` and deserialize its answer into `T`
pub async fn run_structured<T: DeserializeOwned>(
    runtime: &dyn AgentRuntime,
    agent: &AgentSpec,
    input: &str,
) -> DeepmailResult<T> {
    let output = runtime.run(agent, input).await?;

    let json = extract_json(&output).ok_or_else(|| {
        agent_error!(
            format!("{} did not answer with a JSON object", agent.name),
            agent.name
        )
    })?;

    debug!(agent = %agent.name, bytes = json.len(), "Parsing structured output");

    serde_json::from_str(json).map_err(|e| {
        agent_error!(
            format!("{} returned malformed output: {}", agent.name, e),
            agent.name,
            e
        )
    })
}
