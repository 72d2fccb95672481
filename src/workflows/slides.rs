use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::extract::presentation_id;
use crate::mcp::ToolSessionClient;

const PRESENTATION_URL: &str = "https://docs.google.com/presentation/d/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckSummary {
    pub presentation_id: String,
    pub title: String,
    pub url: String,
}

pub fn default_title(place: &str) -> String {
    format!("Discover {}", title_case(place))
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn slug(place: &str) -> String {
    place.to_lowercase().replace(' ', "_")
}

/// `createSlide` requests for a title slide followed by a content slide.
pub fn slide_requests(place: &str) -> Value {
    let slug = slug(place);
    json!([
        {
            "createSlide": {
                "objectId": format!("slide_title_{}", slug),
                "insertionIndex": 1,
                "slideLayoutReference": {"predefinedLayout": "TITLE"}
            }
        },
        {
            "createSlide": {
                "objectId": format!("slide_content_{}", slug),
                "insertionIndex": 2,
                "slideLayoutReference": {"predefinedLayout": "TITLE_AND_BODY"}
            }
        }
    ])
}

/// Create a presentation about `place` and add its title and content slides.
pub async fn create_deck(client: &ToolSessionClient, title: &str, place: &str) -> Result<DeckSummary> {
    info!(%title, %place, "creating presentation");
    let created = client
        .call_tool("create_presentation", json!({"title": title}))
        .await
        .context("Failed to create presentation")?;

    let presentation_id = presentation_id(&created)
        .ok_or_else(|| anyhow!("Failed to get presentation ID from response: {}", created))?;
    info!(%presentation_id, "presentation created");

    client
        .call_tool(
            "batch_update_presentation",
            json!({
                "presentationId": presentation_id,
                "requests": slide_requests(place),
            }),
        )
        .await
        .with_context(|| {
            format!(
                "Created presentation but failed to add slides. Presentation ID: {}",
                presentation_id
            )
        })?;
    info!(%presentation_id, "slides added");

    Ok(DeckSummary {
        url: format!("{}{}", PRESENTATION_URL, presentation_id),
        presentation_id,
        title: title.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_title() {
        assert_eq!(default_title("new york"), "Discover New York");
        assert_eq!(default_title("PARIS"), "Discover Paris");
    }

    #[test]
    fn test_slide_requests_object_ids() {
        let requests = slide_requests("New York");
        assert_eq!(requests[0]["createSlide"]["objectId"], "slide_title_new_york");
        assert_eq!(requests[1]["createSlide"]["objectId"], "slide_content_new_york");
        assert_eq!(
            requests[1]["createSlide"]["slideLayoutReference"]["predefinedLayout"],
            "TITLE_AND_BODY"
        );
    }
}
