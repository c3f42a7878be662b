pub mod command;
pub mod format;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use reqwest::Url;

pub use command::{Command, FormArgs};
pub use format::OutputFormat;

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Backend base URL
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000")]
    backend: Url,
    /// Your `session` cookie, sent with every request
    #[arg(long, env = "SESSION", hide_env_values = true)]
    session: Option<String>,
    /// How the page is printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub const fn backend(&self) -> &Url {
        &self.backend
    }
    /// The session cookie, as a `Cookie` header value
    pub fn session(&self) -> Option<String> {
        let session = self.session.as_deref()?.trim();
        if session.is_empty() {
            None
        } else if session.contains('=') {
            Some(session.to_string())
        } else {
            Some(format!("session={}", session))
        }
    }
    pub const fn format(&self) -> OutputFormat {
        self.format
    }
    pub const fn command(&self) -> &Command {
        &self.command
    }
}
