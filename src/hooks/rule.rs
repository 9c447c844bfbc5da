//! Hook registration entries in the host `settings.json`.
//!
//! Format: `{"matcher": "...", "hooks": [{"type": "command", "command": "..."}]}`

use serde::{Deserialize, Serialize};

/// One rule under an event key such as `hooks.UserPromptSubmit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    pub hooks: Vec<HookAction>,
}

/// A single hook action within a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookAction {
    #[serde(rename = "type")]
    pub hook_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl HookAction {
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            hook_type: "command".into(),
            command: Some(command.into()),
            timeout: None,
        }
    }

    /// The shell command, when this is a `command` action.
    pub fn command_line(&self) -> Option<&str> {
        if self.hook_type != "command" {
            return None;
        }
        self.command.as_deref()
    }
}

impl HookRule {
    /// A rule without matcher running a single command.
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            matcher: None,
            hooks: vec![HookAction::command(command)],
        }
    }

    pub fn runs(&self, command: &str) -> bool {
        self.hooks.iter().any(|a| a.command_line() == Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_rule_serde() {
        let json = r#"{"matcher":"*","hooks":[{"type":"command","command":"fmt.sh","timeout":10}]}"#;
        let rule: HookRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.matcher.as_deref(), Some("*"));
        assert_eq!(rule.hooks[0].command_line(), Some("fmt.sh"));
        assert_eq!(rule.hooks[0].timeout, Some(10));
    }

    #[test]
    fn test_command_rule_shape() {
        let rule = HookRule::command("/home/u/.claude/hooks/ai-dev-kit hook");
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "hooks": [{"type": "command", "command": "/home/u/.claude/hooks/ai-dev-kit hook"}]
            })
        );
    }

    #[test]
    fn test_runs() {
        let rule = HookRule::command("a hook");
        assert!(rule.runs("a hook"));
        assert!(!rule.runs("b hook"));

        let prompt_rule = HookRule {
            matcher: None,
            hooks: vec![HookAction {
                hook_type: "prompt".into(),
                command: Some("a hook".into()),
                timeout: None,
            }],
        };
        assert!(!prompt_rule.runs("a hook"));
    }
}
