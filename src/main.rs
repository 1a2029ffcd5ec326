//! MCP explorer command-line driver.
//!
//! Each subcommand is one self-contained demonstration: list the tools a
//! server exposes, call a tool directly, or route a prompt through a quiet
//! agent that may call tools on its own. Nothing is shared between
//! invocations except the environment loaded from `.env`.

use mimalloc::MiMalloc;

/// Global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mcp_explorer::agent::{Agent, AgentDefinition, AgentOptions, load_agent_config};
use mcp_explorer::config::{Cli, Commands, ExplorerConfig};
use mcp_explorer::credentials;
use mcp_explorer::llm::LlmSettings;
use mcp_explorer::mcp::{self, McpConfig, connector};

const DEFAULT_INSTRUCTION: &str =
    "You are a helpful assistant. Use the available tools when they help you answer.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let cli = Cli::parse();

    // Credentials first: everything after this reads the environment.
    let _ = match &cli.env_file {
        Some(path) => credentials::load_from(Path::new(path)),
        None => credentials::load(),
    };

    let config = ExplorerConfig::load(&cli).context("failed to resolve explorer configuration")?;

    match cli.command {
        Commands::Tools { server } => cmd_tools(&config, server.as_deref()).await,
        Commands::Call {
            server,
            tool,
            args,
            raw,
        } => cmd_call(&config, &server, &tool, &args, raw).await,
        Commands::Ask {
            prompt,
            agent,
            servers,
            instruction,
            model,
        } => cmd_ask(&config, &prompt, agent.as_deref(), servers, instruction, model).await,
    }
}

/// `tools`: list each server's catalog as a table.
async fn cmd_tools(config: &ExplorerConfig, only: Option<&str>) -> anyhow::Result<()> {
    let catalog = mcp::load_mcp_config(&config.paths.servers_file)?;

    let names: Vec<&str> = match only {
        Some(name) => vec![name],
        None => catalog.server_names(),
    };

    for name in names {
        let server = catalog.get(name)?;
        let tools = connector::list_tools(name, server).await?;
        let summaries: Vec<_> = tools.iter().map(mcp::summarize).collect();

        println!("{name}: {} tools", summaries.len());
        print!("{}", mcp::render_table(&summaries));
        println!();
    }

    Ok(())
}

/// `call`: invoke one tool over a connection scoped to this invocation.
async fn cmd_call(
    config: &ExplorerConfig,
    server: &str,
    tool: &str,
    args: &str,
    raw: bool,
) -> anyhow::Result<()> {
    let catalog = mcp::load_mcp_config(&config.paths.servers_file)?;
    let server_config = catalog.get(server)?;

    let arguments: serde_json::Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;

    let result = connector::call_tool(server, server_config, tool, arguments).await?;

    if raw {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match mcp::first_text(&result) {
            Some(text) => println!("{text}"),
            None => println!("{}", serde_json::to_string_pretty(&result)?),
        }
    }

    Ok(())
}

/// `ask`: run a quiet agent over the declared servers and print its answer.
async fn cmd_ask(
    config: &ExplorerConfig,
    prompt: &str,
    agent_name: Option<&str>,
    servers: Vec<String>,
    instruction: Option<String>,
    model: Option<String>,
) -> anyhow::Result<()> {
    let settings = LlmSettings::from_env().map_err(|msg| anyhow::anyhow!(msg))?;

    let (mut definition, server_catalog): (AgentDefinition, McpConfig) = match agent_name {
        Some(name) => {
            let file = load_agent_config(&config.paths.agents_file)?;
            (file.definition(name)?, file.mcp_config())
        }
        None => {
            let definition = AgentDefinition {
                name: "explorer".to_string(),
                instruction: instruction.unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string()),
                model: None,
                servers,
            };
            (definition, mcp::load_mcp_config(&config.paths.servers_file)?)
        }
    };

    if model.is_some() {
        definition.model = model;
    }

    let agent = Agent::new(definition, settings, AgentOptions::default());
    let mut session = agent.run(&server_catalog).await?;

    let answer = session.ask(prompt).await;

    // Release connections regardless of how the turn went.
    if let Err(err) = session.close().await {
        tracing::debug!(error = %err, "agent session shutdown failed");
    }

    println!("{}", answer?);
    Ok(())
}
