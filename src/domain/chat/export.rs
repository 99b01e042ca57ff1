//! Markdown export of a chat thread.

use std::fmt::Write;

use super::ChatMessage;
use crate::domain::settings::Settings;

/// Render a thread as a markdown document.
///
/// Display settings decide what accompanies each message: timestamps, the
/// model tag on assistant messages, and the thinking trace (as a quote).
pub fn thread_to_markdown(title: &str, messages: &[ChatMessage], settings: &Settings) -> String {
    let mut out = String::new();
    let title = title.trim();
    let _ = writeln!(out, "# {}", if title.is_empty() { "Chat export" } else { title });

    for message in messages {
        out.push('\n');
        let _ = write!(out, "## {}", message.role.label());

        if settings.show_model_tag {
            if let Some(model) = message.model.as_deref().filter(|m| !m.is_empty()) {
                let _ = write!(out, " `{model}`");
            }
        }
        out.push('\n');

        if settings.show_timestamps {
            if let Some(at) = message.created_at {
                let _ = writeln!(out, "_{}_", at.format("%Y-%m-%d %H:%M UTC"));
            }
        }

        if settings.show_thinking {
            if let Some(thinking) = message.thinking.as_deref().filter(|t| !t.trim().is_empty()) {
                out.push('\n');
                for line in thinking.lines() {
                    if line.is_empty() {
                        out.push_str(">\n");
                    } else {
                        let _ = writeln!(out, "> {line}");
                    }
                }
            }
        }

        out.push('\n');
        out.push_str(message.content.trim_end());
        out.push('\n');
    }

    out
}
