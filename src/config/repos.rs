//! Per-repository monitor configuration and its resolution.
//!
//! Resolution layers three sources, each overriding the one below it key by
//! key:
//!
//! 1. Built-in defaults (push and branch events on, Telegram on, email off)
//! 2. The `defaults` block of the config file
//! 3. The repository's own monitor entry
//!
//! `events` and `notify` merge field by field; `files` comes from the
//! repository entry alone.

use serde::Deserialize;

use super::notify::{EffectiveNotify, NotifyConfig, TelegramSetting};
use crate::monitor::FilePattern;
use crate::types::RepoName;

/// Which event kinds produce notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventsConfig {
    pub push: bool,
    pub branch: bool,
}

impl EventsConfig {
    /// Built-in default: every supported event kind is enabled.
    pub const ALL: Self = Self {
        push: true,
        branch: true,
    };
}

/// An `events` block whose absent keys inherit from the layer below.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EventsOverride {
    #[serde(default)]
    pub push: Option<bool>,
    #[serde(default)]
    pub branch: Option<bool>,
}

impl EventsOverride {
    /// Overlays `self` on `base`.
    pub fn merged_over(&self, base: EventsOverride) -> EventsOverride {
        EventsOverride {
            push: self.push.or(base.push),
            branch: self.branch.or(base.branch),
        }
    }

    /// Fills any remaining gaps from `fallback`.
    pub fn resolve(&self, fallback: EventsConfig) -> EventsConfig {
        EventsConfig {
            push: self.push.unwrap_or(fallback.push),
            branch: self.branch.unwrap_or(fallback.branch),
        }
    }
}

/// The `defaults` block of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub events: EventsOverride,

    #[serde(default)]
    pub notify: NotifyConfig,
}

/// One entry of the `monitors` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorConfig {
    /// Repository full name; matched case-insensitively.
    pub repo: RepoName,

    #[serde(default)]
    pub events: EventsOverride,

    /// Glob patterns filtering push notifications; empty means everything.
    #[serde(default)]
    pub files: Vec<FilePattern>,

    #[serde(default)]
    pub notify: NotifyConfig,
}

/// The full monitoring configuration, fixed for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub monitors: Vec<MonitorConfig>,
}

/// The configuration that applies to one repository after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub repo: RepoName,
    pub events: EventsConfig,
    pub files: Vec<FilePattern>,
    pub notify: EffectiveNotify,
}

/// Built-in notify defaults: Telegram on, email off.
fn builtin_notify() -> NotifyConfig {
    NotifyConfig {
        email: None,
        telegram: Some(TelegramSetting::Toggle(true)),
    }
}

impl AppConfig {
    /// Finds the monitor entry for a repository, ignoring case.
    ///
    /// When a name is listed twice the first entry wins.
    pub fn find(&self, repo: &str) -> Option<&MonitorConfig> {
        self.monitors.iter().find(|m| m.repo.matches(repo))
    }

    /// True if the repository is listed in `monitors`.
    pub fn is_monitored(&self, repo: &str) -> bool {
        self.find(repo).is_some()
    }

    /// Resolves the effective configuration for a repository.
    ///
    /// Returns `None` when the repository is not monitored. Pure: repeated
    /// calls give the same answer.
    pub fn resolve(&self, repo: &str) -> Option<EffectiveConfig> {
        let monitor = self.find(repo)?;

        let events = monitor
            .events
            .merged_over(self.defaults.events)
            .resolve(EventsConfig::ALL);

        let notify = monitor
            .notify
            .merged_over(&self.defaults.notify.merged_over(&builtin_notify()))
            .resolve();

        Some(EffectiveConfig {
            repo: monitor.repo.clone(),
            events,
            files: monitor.files.clone(),
            notify,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::notify::{ChannelSetting, ParseMode};

    fn parse(yaml: &str) -> AppConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let config = parse("monitors:\n  - repo: Org/Repo\n");
        assert_eq!(config.is_monitored("Org/Repo"), config.is_monitored("org/repo"));
        assert!(config.is_monitored("ORG/REPO"));
    }

    #[test]
    fn unlisted_repo_is_not_monitored() {
        let config = parse("monitors:\n  - repo: org/repo\n");
        assert!(!config.is_monitored("org/other"));
        assert!(config.resolve("org/other").is_none());
    }

    #[test]
    fn events_merge_per_field() {
        let config = parse(
            "defaults:\n  events: { push: true, branch: true }\n\
             monitors:\n  - repo: org/repo\n    events: { branch: false }\n",
        );

        let effective = config.resolve("org/repo").unwrap();

        assert_eq!(
            effective.events,
            EventsConfig {
                push: true,
                branch: false
            }
        );
    }

    #[test]
    fn builtin_defaults_apply_without_defaults_block() {
        let config = parse("monitors:\n  - repo: org/repo\n");

        let effective = config.resolve("org/repo").unwrap();

        assert_eq!(effective.events, EventsConfig::ALL);
        assert!(effective.notify.telegram.is_enabled());
        assert_eq!(effective.notify.email, ChannelSetting::Disabled);
        assert!(effective.files.is_empty());
    }

    #[test]
    fn partial_defaults_keep_builtin_values_for_missing_keys() {
        let config = parse(
            "defaults:\n  events: { push: false }\n  notify: { email: [ops@example.com] }\n\
             monitors:\n  - repo: org/repo\n",
        );

        let effective = config.resolve("org/repo").unwrap();

        assert!(!effective.events.push);
        assert!(effective.events.branch);
        assert!(effective.notify.email.is_enabled());
        assert!(effective.notify.telegram.is_enabled());
    }

    #[test]
    fn repo_notify_overrides_defaults_per_key() {
        let config = parse(
            "defaults:\n  notify: { email: [ops@example.com], telegram: true }\n\
             monitors:\n  - repo: org/repo\n    notify:\n      telegram: { chat_id: \"42\", parse_mode: markdown_v2 }\n",
        );

        let effective = config.resolve("org/repo").unwrap();

        assert_eq!(
            effective.notify.email,
            ChannelSetting::Enabled(vec!["ops@example.com".to_string()])
        );
        let telegram = effective.notify.telegram.options().unwrap();
        assert_eq!(telegram.chat_id.as_deref(), Some("42"));
        assert_eq!(telegram.parse_mode, ParseMode::MarkdownV2);
    }

    #[test]
    fn files_pass_through_from_repo_entry() {
        let config = parse(
            "monitors:\n  - repo: org/repo\n    files:\n      - pattern: \"src/**\"\n      - \"*.md\"\n",
        );

        let effective = config.resolve("org/repo").unwrap();

        let patterns: Vec<_> = effective.files.iter().map(|p| p.as_str()).collect();
        assert_eq!(patterns, vec!["src/**", "*.md"]);
    }

    #[test]
    fn resolve_is_stable() {
        let config = parse("monitors:\n  - repo: org/repo\n    events: { push: false }\n");
        assert_eq!(config.resolve("org/repo"), config.resolve("ORG/repo"));
    }

    #[test]
    fn first_duplicate_entry_wins() {
        let config = parse(
            "monitors:\n  - repo: org/repo\n    events: { push: false }\n  - repo: ORG/REPO\n",
        );
        assert!(!config.resolve("org/repo").unwrap().events.push);
    }

    #[test]
    fn effective_config_keeps_configured_repo_name() {
        let config = parse("monitors:\n  - repo: Org/Repo\n");
        assert_eq!(config.resolve("org/repo").unwrap().repo.as_str(), "Org/Repo");
    }

    #[test]
    fn numeric_chat_id_is_read_as_text() {
        let config = parse(
            "monitors:\n  - repo: org/repo\n    notify:\n      telegram:\n        chat_id: -1001234567890\n        parse_mode: markdown_v2\n",
        );

        let notify = config.resolve("org/repo").unwrap().notify;
        let options = notify.telegram.options().unwrap();
        assert_eq!(options.chat_id.as_deref(), Some("-1001234567890"));
        assert_eq!(options.parse_mode, ParseMode::MarkdownV2);
    }

    #[test]
    fn quoted_chat_id_is_kept_verbatim() {
        let config = parse(
            "monitors:\n  - repo: org/repo\n    notify:\n      telegram: { chatId: \"@release_channel\" }\n",
        );

        let notify = config.resolve("org/repo").unwrap().notify;
        assert_eq!(
            notify.telegram.options().unwrap().chat_id.as_deref(),
            Some("@release_channel")
        );
    }
}
