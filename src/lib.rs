//! MCP Explorer
//!
//! A small crate for exploring Model Context Protocol (MCP) tool servers:
//! call tools directly over a scoped stdio connection, or route a prompt
//! through an LLM-backed agent that decides on its own which tools to call.
//!
//! # Modules
//!
//! - [`credentials`]: additive `.env` loading
//! - [`mcp`]: server catalog, scoped connections, tool descriptor display
//! - [`llm`]: LLM driver trait and the Chat Completions implementation
//! - [`agent`]: quiet agents and their scoped sessions
//! - [`config`]: CLI and resolved explorer settings

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod agent;
pub mod config;
pub mod credentials;
pub mod llm;
pub mod mcp;
