pub mod output;

pub use output::{
    display_commit_report, display_deck, display_error, display_probe, display_tool_result,
    display_tools,
};
