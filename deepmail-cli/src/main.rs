//! Deepmail CLI - Command-line interface for Deepmail
//!
//! Runs deep research from the terminal and inspects SDR conversations

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use deepmail_agents::{create_email_sender, LlmAgentRuntime};
use deepmail_applications::{ResearchManager, ResearchUpdate, SqliteConversationStore};
use deepmail_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success,
    performance::measure_async, ConversationStore, DeepmailConfig,
};
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "deepmail")]
#[command(about = "Deep research reports and SDR email conversations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a topic and email the report
    Research {
        /// What to research
        query: String,

        /// Answers to the follow-up questions, in order; asked interactively when omitted
        #[arg(short, long)]
        answers: Vec<String>,

        /// Write the markdown report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the follow-up questions for a research topic
    Questions {
        /// What to research
        query: String,
    },

    /// List SDR conversations or show one thread
    Conversations {
        /// Thread id to print
        #[arg(short, long)]
        thread: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config {
            show,
            init,
            validate,
        } => handle_config(config_path, show, init, validate),
        Commands::Research {
            query,
            answers,
            output,
        } => {
            let config = startup(config_path, cli.verbose)?;
            handle_research(&config, query, answers, output).await
        }
        Commands::Questions { query } => {
            let config = startup(config_path, cli.verbose)?;
            handle_questions(&config, &query).await
        }
        Commands::Conversations { thread } => {
            let config = startup(config_path, cli.verbose)?;
            handle_conversations(&config, thread).await
        }
    }
}

/// Load configuration and start logging for the commands that do real work
fn startup(config_path: Option<&Path>, verbose: bool) -> anyhow::Result<DeepmailConfig> {
    let config = DeepmailConfig::load(config_path).context("Failed to load configuration")?;

    let mut logging_config = config.logging.clone();
    if verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config).map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting Deepmail CLI v{}", env!("CARGO_PKG_VERSION"));
    Ok(config)
}

async fn research_manager(config: &DeepmailConfig) -> anyhow::Result<ResearchManager> {
    let runtime = LlmAgentRuntime::new(config.llm.clone())
        .await
        .context("Failed to create LLM client (check your API key)")?;
    let sender = create_email_sender(&config.email);

    Ok(ResearchManager::new(
        Arc::new(runtime),
        sender,
        config.research.clone(),
        config.email.clone(),
    ))
}

async fn handle_questions(config: &DeepmailConfig, query: &str) -> anyhow::Result<()> {
    let manager = research_manager(config).await?;
    let questions = measure_async("generate_questions", manager.generate_questions(query)).await?;

    println!(
        "Please answer the {} questions below to help focus the research:",
        questions.len()
    );
    for (i, question) in questions.iter().enumerate() {
        println!("  {}. {}", i + 1, question);
    }
    Ok(())
}

async fn handle_research(
    config: &DeepmailConfig,
    query: String,
    answers: Vec<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    log_operation_start!("cli_research", query = %query);
    let manager = research_manager(config).await?;

    println!("🤔 Generating follow-up questions...");
    let questions =
        measure_async("generate_questions", manager.generate_questions(&query)).await?;

    let answers = if answers.is_empty() {
        ask_questions(&questions).await?
    } else {
        answers
    };

    let report = match follow_updates(manager.run(query, questions, answers)).await {
        Ok(report) => report,
        Err(e) => {
            log_operation_error!("cli_research", e);
            return Err(e);
        }
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, &report)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("📄 Report saved to {}", path.display());
        }
        None => println!("\n{}", report),
    }

    log_operation_success!("cli_research", chars = report.len());
    Ok(())
}

/// Print status lines until the run finishes, returning the report
async fn follow_updates(updates: impl Stream<Item = ResearchUpdate>) -> anyhow::Result<String> {
    let mut updates = std::pin::pin!(updates);

    while let Some(update) = updates.next().await {
        match update {
            ResearchUpdate::Status(line) => println!("⏳ {}", line),
            ResearchUpdate::Report(markdown) => return Ok(markdown),
            ResearchUpdate::Failed(message) => bail!(message),
        }
    }

    bail!("Research ended without a report")
}

/// Prompt for each question on stdin; an empty line is an empty answer
async fn ask_questions(questions: &[String]) -> anyhow::Result<Vec<String>> {
    if questions.is_empty() {
        return Ok(Vec::new());
    }

    println!(
        "Please answer the {} questions below to help focus the research:",
        questions.len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut answers = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        println!("\n{}. {}", i + 1, question);
        print!("> ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let answer = lines.next_line().await?.unwrap_or_default();
        answers.push(answer.trim().to_string());
    }

    Ok(answers)
}

async fn handle_conversations(
    config: &DeepmailConfig,
    thread: Option<String>,
) -> anyhow::Result<()> {
    let store = SqliteConversationStore::connect(&config.storage.database_url)
        .await
        .context("Failed to open conversation database")?;

    if let Some(thread_id) = thread {
        let messages = store.conversation_history(&thread_id).await?;
        if messages.is_empty() {
            println!("No messages in thread {}", thread_id);
            return Ok(());
        }

        for message in messages {
            let label = match message.direction {
                deepmail_core::Direction::Inbound => "📥 PROSPECT",
                deepmail_core::Direction::Outbound => "📤 SDR",
            };
            println!(
                "{} [{}] {} -> {}",
                label,
                message.timestamp.format("%Y-%m-%d %H:%M:%S"),
                message.sender,
                message.recipient
            );
            if let Some(subject) = &message.subject {
                println!("Subject: {}", subject);
            }
            println!("{}\n", message.body);
        }
        return Ok(());
    }

    let conversations = store.list_conversations().await?;
    if conversations.is_empty() {
        println!("No conversations yet.");
        return Ok(());
    }

    println!("📋 Conversations:");
    for conversation in conversations {
        println!(
            "  {}  {:<32} {:>3} msgs  {}",
            conversation.thread_id,
            conversation.prospect_email,
            conversation.message_count,
            conversation.subject.unwrap_or_default()
        );
    }
    Ok(())
}

fn handle_config(
    config_path: Option<&Path>,
    show: bool,
    init: bool,
    validate: bool,
) -> anyhow::Result<()> {
    if init {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => DeepmailConfig::default_paths()
                .into_iter()
                .next()
                .context("Cannot determine a configuration directory")?,
        };

        if path.exists() {
            println!("⚠️  Configuration already exists at: {}", path.display());
        } else {
            DeepmailConfig::default().save_to_file(&path)?;
            println!("✅ Configuration initialized at: {}", path.display());
            println!("📝 Please edit the file to add your API keys and sender address.");
        }
    }

    if show {
        let config = DeepmailConfig::load(config_path)?;
        println!("📋 Current configuration:");
        println!("{}", toml::to_string_pretty(&redacted(config))?);
    }

    if validate {
        match DeepmailConfig::load(config_path) {
            Ok(_) => println!("✅ Configuration is valid"),
            Err(e) => {
                println!("❌ Configuration validation failed: {}", e);
                bail!(e);
            }
        }
    }

    if !(init || show || validate) {
        println!("Nothing to do. Use --show, --init or --validate.");
    }

    Ok(())
}

/// Hide secrets before printing
fn redacted(mut config: DeepmailConfig) -> DeepmailConfig {
    let mask = |key: &mut Option<String>| {
        if key.is_some() {
            *key = Some("********".to_string());
        }
    };
    mask(&mut config.llm.api_key);
    mask(&mut config.email.api_key);
    config
}
