pub const SLIDES_SERVER_URL: &str = "http://agentgw.mcp.svc.cluster.local:3000/mcp";
pub const GITHUB_SERVER_URL: &str = "http://agentgateway.mcp.svc.cluster.local:3000/mcp";
pub const SLIDES_CLIENT_NAME: &str = "voice-llama-client";
pub const GITHUB_CLIENT_NAME: &str = "engagement-analyzer-client";

pub const LLM_BASE_URL: &str = "http://localhost:11434";
pub const LLM_MODEL: &str = "llama3.2";

pub fn default_tool_timeout_secs() -> u64 {
    60
}

pub fn default_handshake_timeout_secs() -> u64 {
    30
}

pub fn default_slow_tool_timeout_secs() -> u64 {
    120
}

/// Source-control operations that routinely exceed the default timeout.
pub fn github_slow_tools() -> &'static [&'static str] {
    &["create_branch", "create_or_update_file", "list_branches"]
}

pub fn default_repo() -> String {
    "gen-ai-demo".to_string()
}

pub fn default_base_branch() -> String {
    "main".to_string()
}

pub fn default_branch_retries() -> u32 {
    2
}
