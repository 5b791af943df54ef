//! Prompt catalog and rendering.
//!
//! Prompts are static content templates: `listPrompts` advertises them
//! and `getPrompt` renders the selected one into an assistant/user
//! message pair, substituting whatever argument values the caller sent.
//! No WordPress traffic is involved.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{BridgeError, Result};

/// An argument a prompt accepts.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    /// Argument name as it appears in the rendered message.
    pub name: &'static str,
    /// What the argument is for.
    pub description: &'static str,
    /// Whether the client should always supply it.
    pub required: bool,
}

/// A prompt advertisement: name, description and accepted arguments.
#[derive(Debug, Clone, Serialize)]
pub struct PromptSpec {
    /// Name the prompt is requested under.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Arguments, in advertisement order.
    pub arguments: &'static [PromptArgument],
}

/// The advertised prompt list.
pub static PROMPTS: &[PromptSpec] = &[
    PromptSpec {
        name: "create-blog-post",
        description: "Generate a blog post with SEO optimization",
        arguments: &[
            PromptArgument {
                name: "topic",
                description: "Main topic or subject of the blog post",
                required: true,
            },
            PromptArgument {
                name: "keywords",
                description: "Target SEO keywords (comma-separated)",
                required: true,
            },
            PromptArgument {
                name: "tone",
                description: "Writing tone (e.g. professional, casual, technical)",
                required: false,
            },
        ],
    },
    PromptSpec {
        name: "analyze-post-seo",
        description: "Analyze a post's SEO and suggest improvements",
        arguments: &[
            PromptArgument {
                name: "post_id",
                description: "ID of the post to analyze",
                required: true,
            },
            PromptArgument {
                name: "target_keywords",
                description: "Target keywords to check against",
                required: true,
            },
        ],
    },
    PromptSpec {
        name: "bulk-update-posts",
        description: "Plan and execute bulk updates to multiple posts",
        arguments: &[
            PromptArgument {
                name: "criteria",
                description: "Criteria to select posts for update (JSON)",
                required: true,
            },
            PromptArgument {
                name: "updates",
                description: "Updates to apply to selected posts (JSON)",
                required: true,
            },
        ],
    },
];

/// Look up a prompt by name.
pub fn find(name: &str) -> Option<&'static PromptSpec> {
    PROMPTS.iter().find(|p| p.name == name)
}

/// Resolve and render a prompt.
pub fn get(name: &str, args: Option<&Value>) -> Result<Value> {
    let prompt = find(name).ok_or_else(|| BridgeError::UnknownPrompt(name.to_string()))?;
    Ok(render(prompt, args))
}

fn render(prompt: &PromptSpec, args: Option<&Value>) -> Value {
    let lines: Vec<String> = prompt
        .arguments
        .iter()
        .map(|arg| {
            let value = args.and_then(|a| a.get(arg.name));
            format!("{}: {}", arg.name, render_value(value))
        })
        .collect();
    json!({
        "description": prompt.description,
        "messages": [
            {
                "role": "assistant",
                "content": {
                    "type": "text",
                    "text": format!(
                        "I am a WordPress content expert, ready to help you with {}.",
                        prompt.name
                    )
                }
            },
            {
                "role": "user",
                "content": {
                    "type": "text",
                    "text": format!(
                        "Please help me with {} using these arguments:\n{}",
                        prompt.name,
                        lines.join("\n")
                    )
                }
            }
        ]
    })
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "(not provided)".to_string(),
        Some(Value::String(s)) if s.is_empty() => "(not provided)".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let names: Vec<&str> = PROMPTS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["create-blog-post", "analyze-post-seo", "bulk-update-posts"]
        );
    }

    #[test]
    fn test_find_known_and_unknown() {
        assert!(find("analyze-post-seo").is_some());
        assert!(find("analyze_post_seo").is_none());
    }

    #[test]
    fn test_get_unknown_prompt() {
        let err = get("write-haiku", None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown prompt: write-haiku");
    }

    #[test]
    fn test_render_with_arguments() {
        let args = json!({"topic": "coffee", "keywords": "espresso, roast"});
        let rendered = get("create-blog-post", Some(&args)).unwrap();
        assert_eq!(
            rendered["description"],
            json!("Generate a blog post with SEO optimization")
        );
        let user_text = rendered["messages"][1]["content"]["text"]
            .as_str()
            .unwrap();
        assert!(user_text.contains("topic: coffee"));
        assert!(user_text.contains("keywords: espresso, roast"));
        assert!(user_text.contains("tone: (not provided)"));
    }

    #[test]
    fn test_render_assistant_intro() {
        let rendered = get("bulk-update-posts", None).unwrap();
        assert_eq!(
            rendered["messages"][0]["content"]["text"],
            json!("I am a WordPress content expert, ready to help you with bulk-update-posts.")
        );
    }

    #[test]
    fn test_render_non_string_and_empty_values() {
        let args = json!({"post_id": 42, "target_keywords": ""});
        let rendered = get("analyze-post-seo", Some(&args)).unwrap();
        let user_text = rendered["messages"][1]["content"]["text"]
            .as_str()
            .unwrap();
        assert!(user_text.contains("post_id: 42"));
        assert!(user_text.contains("target_keywords: (not provided)"));
    }
}
