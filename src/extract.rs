//! Best-effort readers for loosely shaped tool results.
//!
//! Tool servers answer with free-form `content` items whose text format is
//! not part of any contract. These helpers return `None` or an empty list
//! when the shape is not recognized.

use serde_json::Value;

const ID_MARKER: &str = "ID: ";

/// Join every `{"type": "text"}` item of a `content` list.
pub fn content_text(content: &Value) -> Option<String> {
    let items = content.as_array()?;
    let texts: Vec<&str> = items
        .iter()
        .filter(|item| item.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

/// Pull the presentation id out of a `create_presentation` result.
pub fn presentation_id(content: &Value) -> Option<String> {
    let info = match content {
        Value::Array(items) => items.first()?,
        other => other,
    };

    let id = match info {
        Value::Object(map) => {
            if let Some(id) = map.get("presentationId").and_then(|v| v.as_str()) {
                Some(id.to_string())
            } else {
                map.get("text")
                    .and_then(|t| t.as_str())
                    .and_then(id_after_marker)
            }
        }
        Value::String(text) => id_after_marker(text),
        _ => None,
    };

    id.filter(|id| !id.is_empty())
}

fn id_after_marker(text: &str) -> Option<String> {
    let (_, tail) = text.rsplit_once(ID_MARKER)?;
    let id = tail.lines().next().unwrap_or("").trim();
    Some(id.to_string())
}

/// Branch names mentioned in a `list_branches` result.
///
/// Lines of the form `name: <branch>` are authoritative. Otherwise an item
/// mentioning `wanted` counts as that branch, and as a last resort the first
/// word of the item is taken.
pub fn branch_names(content: &Value, wanted: &str) -> Vec<String> {
    let Some(items) = content.as_array() else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for text in items
        .iter()
        .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
    {
        if text.to_lowercase().contains("name:") {
            for line in text.lines() {
                let line = line.trim();
                if line.to_lowercase().starts_with("name:") {
                    if let Some((_, name)) = line.split_once(':') {
                        names.push(name.trim().to_string());
                    }
                }
            }
        } else if !wanted.is_empty() && text.contains(wanted) {
            names.push(wanted.to_string());
        } else if let Some(word) = text.split_whitespace().next() {
            names.push(word.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_text_joins_text_items() {
        let content = json!([
            {"type": "text", "text": "first"},
            {"type": "image", "data": "..."},
            {"type": "text", "text": "second"}
        ]);
        assert_eq!(content_text(&content).as_deref(), Some("first\nsecond"));
        assert_eq!(content_text(&json!({})), None);
    }

    #[test]
    fn test_presentation_id_field() {
        let content = json!([{"presentationId": "abc123", "title": "Discover Paris"}]);
        assert_eq!(presentation_id(&content).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_presentation_id_from_text() {
        let content = json!([{
            "type": "text",
            "text": "Created presentation 'Discover Paris'\nID: 1AbC-xyz\nURL: https://example"
        }]);
        assert_eq!(presentation_id(&content).as_deref(), Some("1AbC-xyz"));
    }

    #[test]
    fn test_presentation_id_uses_last_marker() {
        let content = json!("Layout ID: default\nPresentation ID: real-id");
        assert_eq!(presentation_id(&content).as_deref(), Some("real-id"));
    }

    #[test]
    fn test_presentation_id_missing() {
        assert_eq!(presentation_id(&json!([])), None);
        assert_eq!(presentation_id(&json!([{"type": "text", "text": "no id here"}])), None);
        assert_eq!(presentation_id(&json!(42)), None);
        assert_eq!(presentation_id(&json!("ID: ")), None);
    }

    #[test]
    fn test_branch_names_from_name_lines() {
        let content = json!([{"type": "text", "text": "name: main\nsha: 123\nName: events-2025"}]);
        assert_eq!(branch_names(&content, "events-2025"), vec!["main", "events-2025"]);
    }

    #[test]
    fn test_branch_names_substring_and_first_word() {
        let content = json!([
            {"type": "text", "text": "branches include apidays-paris-2025 and main"},
            {"type": "text", "text": "feature-x (protected)"}
        ]);
        assert_eq!(
            branch_names(&content, "apidays-paris-2025"),
            vec!["apidays-paris-2025", "feature-x"]
        );
    }

    #[test]
    fn test_branch_names_unexpected_shape() {
        assert!(branch_names(&json!({"text": "main"}), "main").is_empty());
    }
}
