use std::fs;
use std::process;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use toolsession::cli::{Args, Command, ServerKind};
use toolsession::config::{Config, ServerConfig};
use toolsession::llm::{ChatClient, Message};
use toolsession::mcp::{self, probe};
use toolsession::ui;
use toolsession::workflows::{self, repo, FileUpload, RepoTarget};

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load(args.verbose) {
        Ok(config) => config,
        Err(e) => {
            ui::display_error("loading configuration", &format!("{:#}", e));
            process::exit(1);
        }
    };

    init_tracing(config.verbose);

    if let Err(e) = run(args, config).await {
        ui::display_error("command failed", &format!("{:#}", e));
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "toolsession=debug,mcp_tool=debug,warn"
    } else {
        "toolsession=info,mcp_tool=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn server_config(args: &Args, config: &Config) -> Result<ServerConfig> {
    let server = match args.server {
        ServerKind::Slides => config.slides.clone(),
        ServerKind::Github => config.github_server.clone(),
    };
    server.with_url_override(args.url.as_deref())
}

async fn run(args: Args, config: Config) -> Result<()> {
    let server = server_config(&args, &config)?;

    match args.command {
        Command::Tools => {
            let client = server.connect()?;
            let tools = client.list_tools().await?;
            ui::display_tools(&tools);
        }
        Command::Call {
            ref name,
            ref arguments,
            validate,
        } => {
            let arguments: Value = serde_json::from_str(arguments)
                .with_context(|| format!("--args is not valid JSON: {}", arguments))?;
            let client = server.connect()?;

            if validate {
                let tools = client.list_tools().await?;
                let tool = mcp::tools::find_tool(&tools, name)
                    .ok_or_else(|| anyhow!("Tool '{}' not found on {}", name, client.endpoint()))?;
                mcp::validate_arguments(tool, &arguments)
                    .map_err(|e| anyhow!("Tool '{}' argument validation failed: {}", name, e))?;
            }

            let content = client.call_tool(name, arguments).await?;
            ui::display_tool_result(name, &content);
        }
        Command::Probe => {
            let http = reqwest::Client::new();
            let outcome = probe(&http, &server.url, PROBE_TIMEOUT).await;
            ui::display_probe(&server.url, &outcome);
            if !outcome.is_reachable() {
                bail!("MCP server at {} is not reachable", server.url);
            }
        }
        Command::Slides { ref place, ref title } => {
            let place = place.join(" ");
            if place.trim().is_empty() {
                bail!("a place is required, e.g. `mcp-tool slides paris`");
            }
            let title = title
                .clone()
                .unwrap_or_else(|| workflows::slides::default_title(&place));
            workflows::ensure_reachable("slides", &server.url, PROBE_TIMEOUT).await?;
            let client = server.connect()?;
            let deck = workflows::create_deck(&client, &title, &place).await?;
            ui::display_deck(&deck);
        }
        Command::Commit {
            ref branch,
            ref path,
            ref file,
            ref content,
            ref message,
        } => {
            // Commits always go to the GitHub tool server unless --url points elsewhere.
            let server = config
                .github_server
                .clone()
                .with_url_override(args.url.as_deref())?;

            let content = match (file, content) {
                (Some(file), _) => fs::read_to_string(file)
                    .with_context(|| format!("Failed to read {}", file.display()))?,
                (None, Some(content)) => content.clone(),
                (None, None) => bail!("either --file or --content is required"),
            };
            let owner = config
                .github
                .owner
                .clone()
                .ok_or_else(|| anyhow!("GitHub owner not configured (set GITHUB_OWNER or github.owner)"))?;

            let target = RepoTarget {
                owner,
                repo: config.github.repo.clone(),
                branch: repo::branch_for(branch),
                base_branch: config.github.base_branch.clone(),
            };
            let upload = FileUpload {
                path: path.clone(),
                content,
                message: message.clone().unwrap_or_else(|| {
                    format!("Add {} ({})", path, Local::now().format("%Y-%m-%d %H:%M:%S"))
                }),
            };

            workflows::ensure_reachable("GitHub", &server.url, PROBE_TIMEOUT).await?;
            let client = server.connect()?;
            let policy = repo::default_retry_policy(config.github.branch_retries);
            let report = workflows::commit_files(&client, &target, &[upload], &policy).await?;
            ui::display_commit_report(&report);
            if !report.is_success() {
                bail!("{} file(s) failed to upload", report.errors.len());
            }
        }
        Command::Chat { ref prompt } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                bail!("a prompt is required");
            }
            let chat = ChatClient::new(&config.llm.base_url, &config.llm.model);
            let date = Local::now().format("%A, %B %d, %Y");
            let messages = vec![
                Message::system(format!("Today's date is {}.", date)),
                Message::user(prompt),
            ];
            let reply = chat.chat(&messages).await?;
            println!("{}", reply);
        }
    }

    Ok(())
}
