//! Deepmail Web Server
//!
//! Webhook receiver for SDR auto-replies and the deep research API.

use clap::Parser;
use deepmail_web::server::DeepmailServerBuilder;
use deepmail_web::{init_logging, WebConfig};

/// Deepmail Web Server - SDR email auto-reply and deep research
#[derive(Parser)]
#[command(name = "deepmail-web")]
#[command(about = "Webhook server for SDR auto-replies and deep research")]
#[command(version)]
struct Args {
    /// Server host to bind to [env: DEEPMAIL_HOST, default 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on [env: DEEPMAIL_PORT, default 5000]
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Conversation database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Deepmail configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn apply(self, mut config: WebConfig) -> WebConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config.dev_mode |= self.dev;
        if self.database_url.is_some() {
            config.database_url = self.database_url;
        }
        if self.config.is_some() {
            config.config_path = self.config;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var(
            "RUST_LOG",
            format!(
                "deepmail_web={level},deepmail_applications={level},deepmail_agents={level},tower_http=debug",
                level = args.log_level
            ),
        );
    }
    init_logging();

    let config = args.apply(WebConfig::from_env());

    println!("🚀 Starting Deepmail Web Server");
    println!("📍 Server: http://{}", config.address());
    println!("🔧 Development mode: {}", config.dev_mode);
    if let Some(db_url) = &config.database_url {
        println!("🗄️  Database: {}", db_url);
    }

    let mut builder = DeepmailServerBuilder::new()
        .host(config.host.clone())
        .port(config.port)
        .dev_mode(config.dev_mode);
    if let Some(db_url) = config.database_url.clone() {
        builder = builder.database_url(db_url);
    }
    if let Some(path) = config.config_path.clone() {
        builder = builder.config_path(path);
    }

    let server = match builder.build().await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed: {}", e);
        std::process::exit(1);
    }

    println!("✅ Server shut down gracefully");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["deepmail-web"]);
        assert!(args.host.is_none());
        assert!(args.port.is_none());
        assert!(!args.dev);
        assert_eq!(args.log_level, "info");

        let args = Args::parse_from([
            "deepmail-web",
            "--host",
            "127.0.0.1",
            "--port",
            "8000",
            "--dev",
            "--config",
            "deepmail.toml",
        ]);
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(8000));
        assert!(args.dev);
        assert_eq!(args.config.as_deref(), Some("deepmail.toml"));
    }

    #[test]
    fn test_args_override_env_config() {
        let args = Args::parse_from(["deepmail-web", "--port", "9000"]);
        let config = args.apply(WebConfig::default());
        assert_eq!(config.address(), "0.0.0.0:9000");
        assert!(config.config_path.is_none());
    }
}
