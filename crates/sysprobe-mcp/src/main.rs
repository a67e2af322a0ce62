//! sysprobe MCP server entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use sysprobe_mcp::tools::default_tools;
use sysprobe_mcp::types::{InitializeResult, McpError};
use sysprobe_mcp::{CancelToken, McpServer, ServerConfig, StdioTransport};

#[derive(Parser)]
#[command(
    name = "sysprobe-mcp",
    about = "MCP server exposing host load, memory and uptime over stdio",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Server name advertised during initialization.
    #[arg(long)]
    name: Option<String>,

    /// Server version advertised during initialization.
    #[arg(long)]
    server_version: Option<String>,

    /// Exit when a response cannot be written instead of logging and continuing.
    #[arg(long)]
    strict_writes: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   sysprobe-mcp completions bash > ~/.local/share/bash-completion/completions/sysprobe-mcp
    ///   sysprobe-mcp completions zsh > ~/.zfunc/_sysprobe-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    // stdout carries protocol traffic only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::default()
        .with_server_info(cli.name.as_deref(), cli.server_version.as_deref())
        .with_strict_writes(cli.strict_writes);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let server = McpServer::builder()
                .config(config)
                .tools(default_tools())
                .build()?;
            let transport = StdioTransport::new(server);

            let cancel = CancelToken::new();
            let signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupt received, shutting down");
                    signal.cancel();
                }
            });

            match transport.run(&cancel).await {
                Ok(()) => {}
                Err(McpError::Cancelled) => {
                    // The stdin reader thread may still be blocked and would hold
                    // the runtime open on shutdown.
                    std::process::exit(0);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Info => {
            let result = InitializeResult::for_server(&config.server_info);
            let tools: Vec<String> = default_tools()
                .into_iter()
                .map(|(definition, _)| definition.name)
                .collect();
            let info = serde_json::json!({
                "server": result.server_info,
                "protocol_version": result.protocol_version,
                "capabilities": result.capabilities,
                "tool_count": tools.len(),
                "tools": tools,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sysprobe-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            let server = McpServer::builder()
                .config(config)
                .tools(default_tools())
                .build()?;
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || sysprobe_mcp::repl::run(&server, runtime))
                .await??;
        }
    }

    Ok(())
}
