pub mod client;
pub mod decode;
pub mod probe;
pub mod tools;
pub mod types;

pub use client::{ClientOptions, ToolSessionClient};
pub use decode::decode_response;
pub use probe::{probe, probe_with_health_url, ProbeOutcome};
pub use tools::validate_arguments;
pub use types::{ClientInfo, McpTool, ToolCall};
