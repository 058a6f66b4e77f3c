//! Shared test doubles and fixtures.

use std::sync::{Arc, Mutex};

use crate::config::ParseMode;
use crate::notify::{ChannelError, ChatTransport, MailTransport, OutgoingMail};
use crate::types::{EventKind, FileChangeSet, NotificationMessage, RepoName};

/// Records every mail it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentChat {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: ParseMode,
}

/// Records every chat message it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingChat {
    sent: Arc<Mutex<Vec<SentChat>>>,
}

impl RecordingChat {
    pub fn sent(&self) -> Vec<SentChat> {
        self.sent.lock().unwrap().clone()
    }
}

impl ChatTransport for RecordingChat {
    async fn send(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(SentChat {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode,
        });
        Ok(())
    }
}

pub struct FailingMailer;

impl MailTransport for FailingMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), ChannelError> {
        Err(ChannelError::Transport("connection refused".to_string()))
    }
}

pub struct FailingChat;

impl ChatTransport for FailingChat {
    async fn send(&self, _: &str, _: &str, _: ParseMode) -> Result<(), ChannelError> {
        Err(ChannelError::Rejected("Bad Request: chat not found".to_string()))
    }
}

pub struct PanickingChat;

impl ChatTransport for PanickingChat {
    async fn send(&self, _: &str, _: &str, _: ParseMode) -> Result<(), ChannelError> {
        panic!("chat transport exploded")
    }
}

pub fn sample_message() -> NotificationMessage {
    NotificationMessage {
        repo: RepoName::new("octocat/hello-world"),
        repo_url: "https://github.com/octocat/hello-world".to_string(),
        event_kind: EventKind::Push,
        branch: "main".to_string(),
        author: "octocat".to_string(),
        title: "1 new commit pushed to main".to_string(),
        details: "Update README".to_string(),
        files: Some(FileChangeSet::from_lists(
            vec!["README.md"],
            Vec::new(),
            Vec::new(),
        )),
        matched_patterns: None,
        url: Some("https://github.com/octocat/hello-world/commit/abc123".to_string()),
    }
}

/// A minimal `push` webhook body.
pub fn push_payload(repo: &str, git_ref: &str, added: &[&str], modified: &[&str]) -> String {
    serde_json::json!({
        "ref": git_ref,
        "repository": {
            "full_name": repo,
            "html_url": format!("https://github.com/{}", repo),
        },
        "pusher": { "name": "octocat" },
        "head_commit": {
            "id": "0123456789abcdef0123456789abcdef01234567",
            "message": "Update docs\n\nLonger body",
            "url": format!("https://github.com/{}/commit/0123456", repo),
            "author": { "name": "Octo Cat" },
            "added": added,
            "modified": modified,
            "removed": [],
        },
        "commits": [{
            "id": "0123456789abcdef0123456789abcdef01234567",
            "message": "Update docs\n\nLonger body",
            "url": format!("https://github.com/{}/commit/0123456", repo),
            "author": { "name": "Octo Cat" },
            "added": added,
            "modified": modified,
            "removed": [],
        }],
    })
    .to_string()
}

/// A minimal `create`/`delete` webhook body.
pub fn branch_payload(repo: &str, branch: &str, ref_type: &str) -> String {
    serde_json::json!({
        "ref": branch,
        "ref_type": ref_type,
        "repository": {
            "full_name": repo,
            "html_url": format!("https://github.com/{}", repo),
        },
        "sender": { "login": "octocat" },
    })
    .to_string()
}
