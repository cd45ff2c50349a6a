//! Model Context Protocol message handling
//!
//! JSON-RPC framing helpers, request routing and the audit log redaction.

pub mod audit;
pub mod rpc;
pub mod server;
