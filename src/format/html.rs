//! HTML rendering for Telegram's HTML parse mode and for email bodies.
//!
//! Text content escapes `&`, `<` and `>`. Link targets additionally escape
//! `"` since they sit inside an attribute.

use std::fmt::Write;

use super::{MAX_LISTED_FILES, details_line, list_files};
use crate::types::{ChangeKind, EventKind, NotificationMessage};

/// Escapes text for HTML content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for a double-quoted attribute value.
fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Renders a message for Telegram's `HTML` parse mode.
pub fn render_telegram_html(message: &NotificationMessage) -> String {
    let mut lines = vec![
        format!("📦 <b>{}</b>", message.event_kind.label()),
        String::new(),
        format!("📁 Repository: {}", escape_html(message.repo.as_str())),
        format!("🌿 Branch: {}", escape_html(&message.branch)),
        format!("👤 Author: {}", escape_html(&message.author)),
        String::new(),
        "📝 Details:".to_string(),
        escape_html(&details_line(message)),
    ];

    if let Some(files) = message.non_empty_files() {
        let listing = list_files(files, MAX_LISTED_FILES);
        lines.push(String::new());
        lines.push(format!("📄 Changed files ({}):", listing.total));
        for (kind, path) in &listing.shown {
            lines.push(format!("<i>{} {}</i>", kind.marker(), escape_html(path)));
        }
        if listing.hidden > 0 {
            lines.push(format!("<i>... and {} more files</i>", listing.hidden));
        }
    }

    if let Some(patterns) = message.non_empty_patterns() {
        let rendered: Vec<String> = patterns
            .iter()
            .map(|p| format!("<code>{}</code>", escape_html(p)))
            .collect();
        lines.push(String::new());
        lines.push(format!("🔍 Matched patterns: {}", rendered.join(", ")));
    }

    if let Some(url) = &message.url {
        lines.push(String::new());
        lines.push(format!("🔗 <a href=\"{}\">View details</a>", escape_attr(url)));
    }

    lines.join("\n")
}

/// Subject line for a notification email.
pub fn email_subject(message: &NotificationMessage) -> String {
    format!("[{}] {}", message.repo, message.title)
}

fn event_color(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Push => "#2ea44f",
        EventKind::BranchCreate => "#1f6feb",
        EventKind::BranchDelete => "#cf222e",
    }
}

fn change_color(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "#1a7f37",
        ChangeKind::Modified => "#9a6700",
        ChangeKind::Removed => "#cf222e",
    }
}

/// Renders a message as a standalone HTML email document.
pub fn render_email_html(message: &NotificationMessage) -> String {
    let color = event_color(message.event_kind);
    let mut sections = String::new();

    if let Some(files) = message.non_empty_files() {
        let listing = list_files(files, MAX_LISTED_FILES);
        let mut items = String::new();
        for (kind, path) in &listing.shown {
            let _ = write!(
                items,
                r#"<div style="color: {}; padding: 4px 0;">{} {}</div>"#,
                change_color(*kind),
                kind.marker(),
                escape_html(path)
            );
        }
        if listing.hidden > 0 {
            let _ = write!(
                items,
                r#"<div style="color: #57606a; padding: 4px 0;">... and {} more files</div>"#,
                listing.hidden
            );
        }
        let _ = write!(
            sections,
            r#"
      <div style="margin-top: 20px;">
        <div style="font-weight: 600; margin-bottom: 10px; color: #24292f;">Changed files ({})</div>
        <div style="background: #f6f8fa; padding: 12px; border-radius: 6px; font-family: monospace; font-size: 13px;">{}</div>
      </div>"#,
            listing.total, items
        );
    }

    if let Some(patterns) = message.non_empty_patterns() {
        let rendered: Vec<String> = patterns
            .iter()
            .map(|p| format!("<code>{}</code>", escape_html(p)))
            .collect();
        let _ = write!(
            sections,
            r#"
      <div style="margin-top: 16px; color: #57606a; font-size: 13px;">Matched patterns: {}</div>"#,
            rendered.join(", ")
        );
    }

    if let Some(url) = &message.url {
        let _ = write!(
            sections,
            r#"
      <div style="margin-top: 24px;">
        <a href="{}" style="display: inline-block; background: {}; color: #ffffff; padding: 10px 20px; border-radius: 6px; text-decoration: none; font-size: 14px; font-weight: 500;">View details</a>
      </div>"#,
            escape_attr(url),
            color
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin: 0; padding: 0; background: #f6f8fa; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;">
  <div style="max-width: 560px; margin: 20px auto; background: #ffffff; border-radius: 12px; overflow: hidden;">
    <div style="background: {color}; padding: 20px 24px;">
      <div style="color: rgba(255,255,255,0.9); font-size: 13px; margin-bottom: 4px;">{label}</div>
      <div style="color: #ffffff; font-size: 18px; font-weight: 600;">{repo}</div>
    </div>
    <div style="padding: 24px;">
      <div style="background: #f6f8fa; padding: 16px; border-radius: 8px; border-left: 4px solid {color};">
        <div style="font-size: 15px; color: #24292f; font-weight: 500;">{details}</div>
      </div>
      <div style="margin-top: 20px;">
        <div style="color: #57606a; font-size: 12px;">Branch</div>
        <div style="color: #24292f; font-size: 14px; font-weight: 500;">{branch}</div>
        <div style="color: #57606a; font-size: 12px; margin-top: 12px;">Author</div>
        <div style="color: #24292f; font-size: 14px; font-weight: 500;">{author}</div>
      </div>{sections}
    </div>
    <div style="padding: 16px 24px; background: #f6f8fa; border-top: 1px solid #d0d7de;">
      <div style="color: #57606a; font-size: 12px;">Sent automatically by git-notify</div>
    </div>
  </div>
</body>
</html>
"#,
        color = color,
        label = message.event_kind.label(),
        repo = escape_html(message.repo.as_str()),
        details = escape_html(&details_line(message)),
        branch = escape_html(&message.branch),
        author = escape_html(&message.author),
        sections = sections,
    )
}
