//! Standard input/output transport for the Model Context Protocol

pub mod stdio;
