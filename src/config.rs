use clap::{Parser, Subcommand};
use config::{Config, Environment};
use serde::Deserialize;

/// Command-line interface of the explorer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// MCP server catalog file
    #[arg(long, env = "MCP_SERVERS_FILE")]
    pub servers_file: Option<String>,

    /// Agent declarations file
    #[arg(long, env = "AGENTS_FILE")]
    pub agents_file: Option<String>,

    /// Credentials file loaded before anything else reads the environment
    #[arg(long, env = "ENV_FILE")]
    pub env_file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// The explorer's operations; each one is self-contained.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List and tabulate tools exposed by configured MCP servers
    Tools {
        /// Only this server (default: every configured server)
        #[arg(long)]
        server: Option<String>,
    },

    /// Call one tool directly
    Call {
        /// Server name from the catalog
        server: String,
        /// Tool name as the server reports it
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
        /// Print the full result payload instead of the first text block
        #[arg(long)]
        raw: bool,
    },

    /// Route a prompt through an agent that may call tools
    Ask {
        /// The prompt to answer
        prompt: String,
        /// Named agent from the agents file
        #[arg(long)]
        agent: Option<String>,
        /// Servers for an ad-hoc agent (comma separated)
        #[arg(long, value_delimiter = ',')]
        servers: Vec<String>,
        /// Instruction for an ad-hoc agent
        #[arg(long)]
        instruction: Option<String>,
        /// Model override
        #[arg(long)]
        model: Option<String>,
    },
}

/// Resolved explorer settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ExplorerConfig {
    pub paths: PathsConfig,
}

/// Where the declarative config files live.
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    pub servers_file: String,
    pub agents_file: String,
}

impl ExplorerConfig {
    /// Resolve settings: defaults, then `EXPLORER_*` environment variables,
    /// then CLI flags, highest last.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("paths.servers_file", "mcp.json")?
            .set_default("paths.agents_file", "agents.yaml")?;

        // E.g. EXPLORER_PATHS__SERVERS_FILE=conf/mcp.json
        builder = builder.add_source(
            Environment::with_prefix("EXPLORER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(path) = &cli.servers_file {
            builder = builder.set_override("paths.servers_file", path.clone())?;
        }
        if let Some(path) = &cli.agents_file {
            builder = builder.set_override("paths.agents_file", path.clone())?;
        }

        builder.build()?.try_deserialize()
    }
}
