//! Tool definitions and their execution
//!
//! Provides the HTTP `get` tool exposed over the MCP protocol.

pub mod tools;
