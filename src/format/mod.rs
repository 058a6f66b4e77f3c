//! Rendering notification messages into channel markup.
//!
//! - [`html`]: Telegram HTML mode and email bodies
//! - [`markdown`]: Telegram MarkdownV2
//!
//! Both renderers escape every user-controlled string (repository, branch,
//! author, details, paths, patterns), show only the first line of the details
//! truncated to [`MAX_DETAILS_CHARS`], and list at most [`MAX_LISTED_FILES`]
//! files. Optional sections (files, patterns, link) are omitted when absent.

pub mod html;
pub mod markdown;

use crate::types::{ChangeKind, FileChangeSet, NotificationMessage};

pub use html::{email_subject, escape_html, render_email_html, render_telegram_html};
pub use markdown::{escape_markdown_v2, render_markdown_v2};

/// Longest details line rendered, in characters, including the ellipsis.
pub const MAX_DETAILS_CHARS: usize = 200;

/// Most files listed before summarising the rest.
pub const MAX_LISTED_FILES: usize = 10;

const ELLIPSIS: &str = "...";

/// Truncates to at most `max_chars` characters, ending with `...` when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// The details line as rendered: first line only, truncated.
pub fn details_line(message: &NotificationMessage) -> String {
    truncate_chars(message.details_headline(), MAX_DETAILS_CHARS)
}

/// The files a renderer lists, plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListing<'a> {
    pub total: usize,
    pub shown: Vec<(ChangeKind, &'a str)>,
    pub hidden: usize,
}

/// Picks the first `max` files, added before modified before removed.
pub fn list_files(files: &FileChangeSet, max: usize) -> FileListing<'_> {
    let total = files.len();
    let shown: Vec<_> = files.iter().take(max).collect();
    let hidden = total - shown.len();
    FileListing {
        total,
        shown,
        hidden,
    }
}
