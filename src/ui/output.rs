use colored::*;
use serde_json::Value;

use crate::extract::content_text;
use crate::mcp::{McpTool, ProbeOutcome};
use crate::workflows::{CommitReport, DeckSummary};

/// Text items are printed as-is; anything else as pretty JSON.
pub fn render_content(content: &Value) -> String {
    content_text(content)
        .unwrap_or_else(|| serde_json::to_string_pretty(content).unwrap_or_else(|_| content.to_string()))
}

pub fn display_tool_result(name: &str, content: &Value) {
    eprintln!("{}", format!("✓ {} succeeded", name).green());
    println!("{}", render_content(content));
}

pub fn display_error(context: &str, error: &dyn std::fmt::Display) {
    eprintln!("{} {}: {}", "Error:".red(), context, error);
}

pub fn display_tools(tools: &[McpTool]) {
    if tools.is_empty() {
        println!("{}", "No tools found".dimmed());
        return;
    }
    for tool in tools {
        let description = tool.description.as_deref().unwrap_or("No description");
        println!("  {} {}", tool.name.cyan(), format!("- {}", description).dimmed());
    }
}

pub fn display_probe(endpoint: &str, outcome: &ProbeOutcome) {
    match outcome {
        ProbeOutcome::Healthy => println!("{} {}", "✓ healthy:".green(), endpoint),
        ProbeOutcome::InitializeOk => {
            println!("{} {} {}", "✓ reachable:".green(), endpoint, "(initialize ok)".dimmed())
        }
        ProbeOutcome::Unreachable(reason) => {
            println!("{} {} ({})", "✗ unreachable:".red(), endpoint, reason)
        }
    }
}

pub fn display_deck(deck: &DeckSummary) {
    println!("{}", format!("✓ Created presentation '{}'", deck.title).green());
    println!("  Presentation ID: {}", deck.presentation_id);
    println!("  {}", deck.url.cyan());
}

pub fn display_commit_report(report: &CommitReport) {
    println!("Branch: {}", report.branch.cyan());
    for path in &report.uploaded {
        println!("  {} {}", "✓".green(), path);
    }
    for error in &report.errors {
        println!("  {} {}", "✗".red(), error);
    }
}
