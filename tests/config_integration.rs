use clap::Parser;
use mcp_explorer::config::{Cli, ExplorerConfig};
use mcp_explorer::credentials;
use mcp_explorer::mcp;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("EXPLORER_PATHS__SERVERS_FILE");
        env::remove_var("EXPLORER_PATHS__AGENTS_FILE");
        env::remove_var("MCP_SERVERS_FILE");
        env::remove_var("AGENTS_FILE");
        env::remove_var("ENV_FILE");
    }
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("CLI args should parse")
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = ExplorerConfig::load(&cli(&["mcp-explorer", "tools"])).expect("load defaults");
    assert_eq!(config.paths.servers_file, "mcp.json");
    assert_eq!(config.paths.agents_file, "agents.yaml");
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("EXPLORER_PATHS__SERVERS_FILE", "conf/custom.json");
    }

    let config = ExplorerConfig::load(&cli(&["mcp-explorer", "tools"])).expect("load with env");
    assert_eq!(config.paths.servers_file, "conf/custom.json");
    assert_eq!(config.paths.agents_file, "agents.yaml");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_flag_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("EXPLORER_PATHS__SERVERS_FILE", "from_env.json");
    }

    let config = ExplorerConfig::load(&cli(&[
        "mcp-explorer",
        "--servers-file",
        "from_flag.json",
        "tools",
    ]))
    .expect("load with flag");
    assert_eq!(config.paths.servers_file, "from_flag.json");

    clear_env_vars();
}

#[test]
#[serial]
fn test_servers_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mcp.json");
    fs::write(
        &path,
        r#"{
            "mcpServers": {
                "search": {
                    "command": "npx",
                    "args": ["-y", "@modelcontextprotocol/server-brave-search"],
                    "env": { "BRAVE_API_KEY": "${BRAVE_API_KEY}" }
                }
            }
        }"#,
    )
    .expect("write mcp.json");

    let catalog = mcp::load_mcp_config(&path).expect("load mcp.json");
    assert_eq!(catalog.server_names(), vec!["search"]);
    assert_eq!(catalog.get("search").unwrap().command, "npx");

    assert!(mcp::load_mcp_config(dir.path().join("absent.json")).is_err());
}

#[test]
#[serial]
fn test_env_file_load_is_additive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "# test credentials\nMCPX_TEST_PRESET=from_file\n\nMCPX_TEST_FRESH=loaded\n",
    )
    .expect("write .env");

    unsafe {
        env::set_var("MCPX_TEST_PRESET", "original");
        env::remove_var("MCPX_TEST_FRESH");
    }

    let loaded = credentials::load_from(&path);
    assert!(loaded.is_some());

    // pre-existing value wins, new value lands
    assert_eq!(env::var("MCPX_TEST_PRESET").unwrap(), "original");
    assert_eq!(env::var("MCPX_TEST_FRESH").unwrap(), "loaded");

    unsafe {
        env::remove_var("MCPX_TEST_PRESET");
        env::remove_var("MCPX_TEST_FRESH");
    }
}

#[test]
#[serial]
fn test_missing_env_file_is_a_noop() {
    assert!(credentials::load_from(Path::new("/definitely/not/here/.env")).is_none());
}
