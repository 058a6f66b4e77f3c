//! Telegram MarkdownV2 rendering.
//!
//! MarkdownV2 rejects a message outright if any reserved character appears
//! unescaped outside an entity, so every piece of text, static or not, goes
//! through [`escape_markdown_v2`].

use super::{MAX_LISTED_FILES, details_line, list_files};
use crate::types::NotificationMessage;

const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

/// Escapes every MarkdownV2 reserved character with a backslash.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inside `(...)` of an inline link only `)` and `\` need escaping.
fn escape_link_target(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if c == ')' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Renders a message for Telegram's `MarkdownV2` parse mode.
pub fn render_markdown_v2(message: &NotificationMessage) -> String {
    let mut lines = vec![
        format!("📦 *{}*", escape_markdown_v2(message.event_kind.label())),
        String::new(),
        format!("📁 Repository: {}", escape_markdown_v2(message.repo.as_str())),
        format!("🌿 Branch: {}", escape_markdown_v2(&message.branch)),
        format!("👤 Author: {}", escape_markdown_v2(&message.author)),
        String::new(),
        "📝 Details:".to_string(),
        escape_markdown_v2(&details_line(message)),
    ];

    if let Some(files) = message.non_empty_files() {
        let listing = list_files(files, MAX_LISTED_FILES);
        lines.push(String::new());
        lines.push(format!("📄 Changed files \\({}\\):", listing.total));
        for (kind, path) in &listing.shown {
            let entry = format!("{} {}", kind.marker(), path);
            lines.push(format!("_{}_", escape_markdown_v2(&entry)));
        }
        if listing.hidden > 0 {
            let more = format!("... and {} more files", listing.hidden);
            lines.push(format!("_{}_", escape_markdown_v2(&more)));
        }
    }

    if let Some(patterns) = message.non_empty_patterns() {
        let rendered: Vec<String> = patterns
            .iter()
            .map(|p| format!("`{}`", escape_markdown_v2(p)))
            .collect();
        lines.push(String::new());
        lines.push(format!("🔍 Matched patterns: {}", rendered.join(", ")));
    }

    if let Some(url) = &message.url {
        lines.push(String::new());
        lines.push(format!("🔗 [View details]({})", escape_link_target(url)));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventKind, FileChangeSet, RepoName};
    use proptest::prelude::*;

    fn message() -> NotificationMessage {
        NotificationMessage {
            repo: RepoName::new("my-org/my.repo"),
            repo_url: "https://github.com/my-org/my.repo".to_string(),
            event_kind: EventKind::BranchCreate,
            branch: "feature/x_y".to_string(),
            author: "dev".to_string(),
            title: "Branch feature/x_y created".to_string(),
            details: "Branch feature/x_y was created by dev".to_string(),
            files: None,
            matched_patterns: None,
            url: None,
        }
    }

    #[test]
    fn escapes_reserved_characters() {
        assert_eq!(escape_markdown_v2("a_b*c"), "a\\_b\\*c");
        assert_eq!(escape_markdown_v2("v1.2-rc!"), "v1\\.2\\-rc\\!");
        assert_eq!(escape_markdown_v2("(x)[y]{z}"), "\\(x\\)\\[y\\]\\{z\\}");
        assert_eq!(escape_markdown_v2("a\\b"), "a\\\\b");
        assert_eq!(escape_markdown_v2("plain text"), "plain text");
    }

    #[test]
    fn renders_header_and_escaped_fields() {
        let text = render_markdown_v2(&message());

        assert!(text.starts_with("📦 *Branch created*"));
        assert!(text.contains("📁 Repository: my\\-org/my\\.repo"));
        assert!(text.contains("🌿 Branch: feature/x\\_y"));
    }

    #[test]
    fn lists_files_in_italics_with_escaped_markers() {
        let mut msg = message();
        msg.files = Some(FileChangeSet::from_lists(
            vec!["docs/read_me.md"],
            vec!["src/app.ts"],
            vec!["old.txt"],
        ));

        let text = render_markdown_v2(&msg);

        assert!(text.contains("📄 Changed files \\(3\\):"));
        assert!(text.contains("_\\+ docs/read\\_me\\.md_"));
        assert!(text.contains("_\\~ src/app\\.ts_"));
        assert!(text.contains("_\\- old\\.txt_"));
    }

    #[test]
    fn summarises_hidden_files() {
        let mut msg = message();
        let added: Vec<String> = (0..15).map(|i| format!("f{:02}", i)).collect();
        msg.files = Some(FileChangeSet::from_lists(added, Vec::new(), Vec::new()));

        let text = render_markdown_v2(&msg);

        assert!(text.contains("_\\.\\.\\. and 5 more files_"));
    }

    #[test]
    fn link_target_escapes_only_paren_and_backslash() {
        let mut msg = message();
        msg.url = Some("https://example.com/tree/a_(b)".to_string());

        let text = render_markdown_v2(&msg);

        assert!(text.ends_with("🔗 [View details](https://example.com/tree/a_(b\\))"));
    }

    #[test]
    fn omits_absent_sections() {
        let text = render_markdown_v2(&message());

        assert!(!text.contains("Changed files"));
        assert!(!text.contains("Matched patterns"));
        assert!(!text.contains("View details"));
    }

    proptest! {
        #[test]
        fn escaped_text_has_no_bare_reserved_characters(s in ".{0,64}") {
            let escaped = escape_markdown_v2(&s);
            let mut chars = escaped.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    let next = chars.next();
                    prop_assert!(next.is_some_and(|n| RESERVED.contains(&n)));
                } else {
                    prop_assert!(!RESERVED.contains(&c));
                }
            }
        }
    }
}
