use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mcp-tool")]
#[command(about = "Call MCP tool servers over streamable HTTP", long_about = None)]
pub struct Args {
    #[arg(short = 'v', long = "verbose", global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        long = "server",
        value_enum,
        default_value_t = ServerKind::Slides,
        global = true,
        help = "Which configured MCP server to talk to"
    )]
    pub server: ServerKind,

    #[arg(long = "url", global = true, help = "Override the MCP server URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerKind {
    Slides,
    Github,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the tools a server exposes
    Tools,

    /// Call a single tool
    Call {
        #[arg(help = "Tool name")]
        name: String,

        #[arg(long = "args", default_value = "{}", help = "Tool arguments as a JSON object")]
        arguments: String,

        #[arg(long = "validate", help = "Check arguments against the tool's input schema first")]
        validate: bool,
    },

    /// Check that a server is reachable
    Probe,

    /// Create a slide deck about a place
    Slides {
        #[arg(help = "Place the deck is about")]
        place: Vec<String>,

        #[arg(long = "title", help = "Presentation title (default: Discover <Place>)")]
        title: Option<String>,
    },

    /// Commit a file to a repository through the GitHub tool server
    Commit {
        #[arg(long = "branch", help = "Target branch, created if missing")]
        branch: String,

        #[arg(long = "path", help = "Path of the file in the repository")]
        path: String,

        #[arg(long = "file", conflicts_with = "content", help = "Local file to upload")]
        file: Option<PathBuf>,

        #[arg(long = "content", help = "Inline file content")]
        content: Option<String>,

        #[arg(long = "message", help = "Commit message")]
        message: Option<String>,
    },

    /// Ask the LLM a one-shot question
    Chat {
        #[arg(help = "Prompt to send")]
        prompt: Vec<String>,
    },
}
