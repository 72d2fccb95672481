pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod mcp;
pub mod retry;
pub mod ui;
pub mod workflows;

pub use error::{ChatError, DecodeError, Result, ToolError};
pub use mcp::{ClientOptions, ToolSessionClient};
