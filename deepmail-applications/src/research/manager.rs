//! Research manager - drives one research run from plan to email

use crate::research::types::{ResearchSession, ResearchUpdate};
use crate::{ApplicationError, ApplicationResult};
use deepmail_agents::agents::{
    email_agent, planner_agent, query_agent, search_agent, writer_agent,
};
use deepmail_agents::{
    run_structured, EmailDraft, FollowUpQuestions, ReportData, WebSearchItem, WebSearchPlan,
};
use deepmail_core::{
    collect_as_completed, log_operation_error, log_operation_start, log_operation_success,
    with_timeout, AgentRuntime, EmailConfig, EmailContentType, EmailReceipt, EmailSender,
    OutboundEmail, ResearchConfig,
};
use futures::Stream;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

pub const BLANK_QUERY_MESSAGE: &str = "Please enter a research topic first.";

/// Orchestrates the research agents.
///
/// Cloning is cheap; every clone shares the same runtime and sender.
#[derive(Clone)]
pub struct ResearchManager {
    runtime: Arc<dyn AgentRuntime>,
    email_sender: Arc<dyn EmailSender>,
    config: ResearchConfig,
    email: EmailConfig,
}

impl ResearchManager {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        email_sender: Arc<dyn EmailSender>,
        config: ResearchConfig,
        email: EmailConfig,
    ) -> Self {
        Self {
            runtime,
            email_sender,
            config,
            email,
        }
    }

    /// Ask the query agent for follow-up questions.
    ///
    /// At most `max_questions` non-blank questions are returned.
    pub async fn generate_questions(&self, query: &str) -> ApplicationResult<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApplicationError::validation(BLANK_QUERY_MESSAGE));
        }

        info!("Generating follow-up questions...");
        let output: FollowUpQuestions = run_structured(
            self.runtime.as_ref(),
            &query_agent(),
            &format!("Query: {}", query),
        )
        .await?;

        let mut questions: Vec<String> = output
            .questions
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        questions.truncate(self.config.max_questions);

        if questions.len() < self.config.min_questions {
            warn!(
                count = questions.len(),
                expected = self.config.min_questions,
                "Query agent returned fewer questions than requested"
            );
        }

        info!("Generated {} questions", questions.len());
        Ok(questions)
    }

    /// Run the full pipeline, yielding status lines and finally the report.
    ///
    /// A planning or writing failure yields [`ResearchUpdate::Failed`] and ends
    /// the stream. Failed searches are dropped and a failed email delivery is
    /// reported as a status line; neither stops the run.
    pub fn run(
        &self,
        query: String,
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> impl Stream<Item = ResearchUpdate> + Send + 'static {
        let manager = self.clone();

        async_stream::stream! {
            let session = ResearchSession::new(query, questions, answers);
            let span = info_span!("research", session_id = %session.id);

            span.in_scope(|| {
                log_operation_start!("research_run", query = %session.query);
            });
            yield ResearchUpdate::Status(format!("Research session: {}", session.id));

            let plan = match manager.plan_searches(&session).instrument(span.clone()).await {
                Ok(plan) => plan,
                Err(e) => {
                    span.in_scope(|| {
                        log_operation_error!("research_run", e, stage = "plan");
                    });
                    yield ResearchUpdate::Failed(format!("Search planning failed: {}", e));
                    return;
                }
            };
            yield ResearchUpdate::Status("Searches planned, starting to search...".to_string());

            let results = manager.perform_searches(&plan).instrument(span.clone()).await;
            yield ResearchUpdate::Status("Searches complete, writing report...".to_string());

            let report = match manager
                .write_report(&session.query, &results)
                .instrument(span.clone())
                .await
            {
                Ok(report) => report,
                Err(e) => {
                    span.in_scope(|| {
                        log_operation_error!("research_run", e, stage = "write");
                    });
                    yield ResearchUpdate::Failed(format!("Report writing failed: {}", e));
                    return;
                }
            };
            yield ResearchUpdate::Status("Report written, sending email...".to_string());

            match manager.send_email(&report).instrument(span.clone()).await {
                Ok(_) => {
                    yield ResearchUpdate::Status("Email sent, research complete".to_string());
                }
                Err(e) => {
                    span.in_scope(|| {
                        warn!(error = %e, "Report email was not delivered");
                    });
                    yield ResearchUpdate::Status(format!("Email delivery failed: {}", e));
                }
            }

            span.in_scope(|| {
                log_operation_success!(
                    "research_run",
                    searches = plan.searches.len(),
                    results = results.len()
                );
            });
            yield ResearchUpdate::Report(report.markdown_report);
        }
    }

    /// Turn the query and the user's answers into a search plan
    pub async fn plan_searches(
        &self,
        session: &ResearchSession,
    ) -> ApplicationResult<WebSearchPlan> {
        info!("Planning searches based on user answers...");
        let plan: WebSearchPlan = run_structured(
            self.runtime.as_ref(),
            &planner_agent(self.config.how_many_searches),
            &session.planner_input(),
        )
        .await?;

        info!("Will perform {} searches", plan.searches.len());
        Ok(plan)
    }

    /// Run every planned search concurrently and keep the ones that succeeded,
    /// in completion order
    pub async fn perform_searches(&self, plan: &WebSearchPlan) -> Vec<String> {
        info!("Searching...");

        let results = collect_as_completed(
            plan.searches.clone(),
            self.config.max_concurrent_searches,
            |item: WebSearchItem| async move { Ok(self.search(&item).await) },
            |completed, total| info!("Searching... {}/{} completed", completed, total),
        )
        .await;

        info!("Finished searching");
        results
    }

    /// Summarize one search. Any failure, including a timeout, yields `None`.
    pub async fn search(&self, item: &WebSearchItem) -> Option<String> {
        let input = format!(
            "Search term: {}\nReason for searching: {}",
            item.query, item.reason
        );
        let agent = search_agent();

        match with_timeout(
            self.runtime.run(&agent, &input),
            Duration::from_secs(self.config.search_timeout_secs),
            "search",
        )
        .await
        {
            Ok(Ok(summary)) => {
                debug!(query = %item.query, chars = summary.len(), "Search finished");
                Some(summary)
            }
            Ok(Err(e)) | Err(e) => {
                warn!(query = %item.query, error = %e, "Search failed");
                None
            }
        }
    }

    /// Write the report from the summarized results
    pub async fn write_report(
        &self,
        query: &str,
        results: &[String],
    ) -> ApplicationResult<ReportData> {
        info!("Thinking about report...");
        let input = format!(
            "Original query: {}\nSummarized search results: {}",
            query,
            serde_json::to_string(results)?
        );

        let report: ReportData =
            run_structured(self.runtime.as_ref(), &writer_agent(), &input).await?;

        info!("Finished writing report");
        Ok(report)
    }

    /// Format the report as HTML and deliver it to the research recipient
    pub async fn send_email(&self, report: &ReportData) -> ApplicationResult<EmailReceipt> {
        let recipient = self
            .email
            .research_recipient
            .clone()
            .ok_or_else(|| ApplicationError::config("No research report recipient configured"))?;

        info!("Writing email...");
        let draft: EmailDraft =
            run_structured(self.runtime.as_ref(), &email_agent(), &report.markdown_report).await?;

        let receipt = self
            .email_sender
            .send(&OutboundEmail {
                from: self.email.from_address.clone(),
                to: recipient,
                subject: draft.subject,
                body: draft.html_body,
                content_type: EmailContentType::Html,
            })
            .await?;

        info!("Email sent");
        Ok(receipt)
    }
}
