use jsonschema::JSONSchema;
use serde_json::Value;

use super::types::McpTool;

/// Check tool arguments against the tool's advertised `inputSchema`.
pub fn validate_arguments(tool: &McpTool, arguments: &Value) -> Result<(), String> {
    let schema = match JSONSchema::compile(&tool.input_schema) {
        Ok(s) => s,
        Err(e) => return Err(format!("Invalid tool schema: {}", e)),
    };

    if let Err(errors) = schema.validate(arguments) {
        let error_messages: Vec<String> = errors
            .map(|e| format!("{}: {}", e.instance_path, e))
            .collect();
        return Err(error_messages.join("; "));
    }

    Ok(())
}

pub fn find_tool<'a>(tools: &'a [McpTool], name: &str) -> Option<&'a McpTool> {
    tools.iter().find(|t| t.name == name)
}
