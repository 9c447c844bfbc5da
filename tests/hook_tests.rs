//! End-to-end hook tests: payload in, rewritten prompt out.
//!
//! Run: cargo nextest run --test hook_tests

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use ai_dev_kit::{ClaudeHome, hooks};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEMPLATE: &str = "Generate $count different solutions for: $instruction";

fn payload(prompt: &str) -> String {
    json!({
        "session_id": "e2e",
        "transcript_path": "/tmp/transcript.jsonl",
        "cwd": "/work",
        "hook_event_name": "UserPromptSubmit",
        "prompt": prompt,
    })
    .to_string()
}

/// Runs the hook with the process environment hidden, so a developer's own
/// `LINEAR_API_KEY` never reaches the pipeline.
async fn run(prompt: &str, home: &ClaudeHome) -> Result<String, hooks::HookError> {
    hooks::run_in(&payload(prompt), home, |_| None).await
}

fn setup_home() -> (TempDir, ClaudeHome) {
    let dir = TempDir::new().unwrap();
    let home = ClaudeHome::from_root(dir.path());
    std::fs::create_dir_all(home.prompts_dir()).unwrap();
    std::fs::write(home.variations_template_path(), TEMPLATE).unwrap();
    (dir, home)
}

fn issue(identifier: &str, title: &str) -> serde_json::Value {
    json!({
        "data": {
            "issue": {
                "id": format!("id-{}", identifier),
                "identifier": identifier,
                "title": title,
                "url": format!("https://linear.app/acme/issue/{}", identifier)
            }
        }
    })
}

async fn linear_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "id": "ENG-1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue("ENG-1", "Login broken")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "id": "ops-7" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue("OPS-7", "Rotate keys")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "id": "ENG-404" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Entity not found: Issue" }]
        })))
        .mount(&server)
        .await;
    server
}

fn configure_linear(home: &ClaudeHome, server: &MockServer) {
    std::fs::write(home.env_path(), "LINEAR_API_KEY=lin_api_test\n").unwrap();
    let settings = json!({
        "linear": { "endpoint": format!("{}/graphql", server.uri()), "timeoutSecs": 5 }
    });
    std::fs::write(home.settings_path(), settings.to_string()).unwrap();
}

// =============================================================================
// Library entry point
// =============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_literal_scenarios() {
        let (_dir, home) = setup_home();

        let cases = [
            ("Hello World :zh", "将以下内容翻译成中文：Hello World"),
            (
                "Implement sorting algorithm v(3)",
                "Generate 3 different solutions for: Implement sorting algorithm",
            ),
            (
                "Design API v(5) :plan",
                "Generate 5 different solutions for: 针对以下内容，制定详细的分步计划：Design API",
            ),
            ("Just a regular prompt", "Just a regular prompt"),
            (
                "Some text :zh :en",
                "Translate the following into natural English: Some text :zh",
            ),
        ];

        for (input, expected) in cases {
            let out = run(input, &home).await.unwrap();
            assert_eq!(out, expected, "input: {input}");
        }
    }

    #[tokio::test]
    async fn test_user_command_from_settings() {
        let (_dir, home) = setup_home();
        std::fs::write(
            home.settings_path(),
            json!({
                "commands": {
                    ":fr": { "prefix": "Traduire en français : ", "description": "French" },
                    ":zh": { "prefix": "ignored duplicate" }
                }
            })
            .to_string(),
        )
        .unwrap();

        let out = run("Good morning :fr", &home).await.unwrap();
        assert_eq!(out, "Traduire en français : Good morning");

        let out = run("Good morning :zh", &home).await.unwrap();
        assert_eq!(out, "将以下内容翻译成中文：Good morning");
    }

    #[tokio::test]
    async fn test_issue_references_expanded() {
        let (_dir, home) = setup_home();
        let server = linear_server().await;
        configure_linear(&home, &server);

        let out = run("Fix linear(ENG-1) after ops(7) :code", &home)
            .await
            .unwrap();

        assert!(out.starts_with("为以下需求编写代码：Fix {"));
        assert!(out.contains("\"identifier\": \"ENG-1\""));
        assert!(out.contains("\"title\": \"Login broken\""));
        assert!(out.contains("\"identifier\": \"OPS-7\""));
        assert!(!out.contains("linear(ENG-1)"));
        assert!(!out.contains("ops(7)"));
    }

    #[tokio::test]
    async fn test_failed_reference_left_in_place() {
        let (_dir, home) = setup_home();
        let server = linear_server().await;
        configure_linear(&home, &server);

        let out = run("See linear(ENG-404) and linear(ENG-1)", &home)
            .await
            .unwrap();

        assert!(out.starts_with("See linear(ENG-404) and {"));
        assert!(out.contains("\"identifier\": \"ENG-1\""));
    }

    #[tokio::test]
    async fn test_linear_disabled_in_settings() {
        let (_dir, home) = setup_home();
        let server = linear_server().await;
        std::fs::write(home.env_path(), "LINEAR_API_KEY=lin_api_test\n").unwrap();
        std::fs::write(
            home.settings_path(),
            json!({
                "processors": [{ "name": "linear", "enabled": false }],
                "linear": { "endpoint": format!("{}/graphql", server.uri()) }
            })
            .to_string(),
        )
        .unwrap();

        let out = run("Fix linear(ENG-1)", &home).await.unwrap();
        assert_eq!(out, "Fix linear(ENG-1)");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_linear_disabled_with_broken_env_file() {
        let (_dir, home) = setup_home();
        std::fs::write(home.env_path(), "this is not dotenv\n").unwrap();
        std::fs::write(
            home.settings_path(),
            json!({ "processors": [{ "name": "linear", "enabled": false }] }).to_string(),
        )
        .unwrap();

        let out = run("Hello World :zh", &home).await.unwrap();
        assert_eq!(out, "将以下内容翻译成中文：Hello World");
    }

    #[tokio::test]
    async fn test_missing_template_falls_back() {
        let dir = TempDir::new().unwrap();
        let home = ClaudeHome::from_root(dir.path());

        let err = run("Sort numbers v(2)", &home)
            .await
            .unwrap_err();
        assert_eq!(err.fallback_output(), "Sort numbers v(2)");
    }
}

// =============================================================================
// Binary
// =============================================================================

mod binary_tests {
    use super::*;

    fn run_binary(home: &Path, args: &[&str], stdin: &str) -> Output {
        let mut child = Command::new(env!("CARGO_BIN_EXE_ai-dev-kit"))
            .args(args)
            .env("CLAUDE_HOME", home)
            .env("AI_DEV_KIT_LOG", "off")
            .env_remove("LINEAR_API_KEY")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();
        child.wait_with_output().unwrap()
    }

    #[test]
    fn test_hook_rewrites_prompt() {
        let (dir, _home) = setup_home();
        let output = run_binary(dir.path(), &["hook"], &payload("Hello World :zh"));

        assert!(output.status.success());
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "将以下内容翻译成中文：Hello World"
        );
    }

    #[test]
    fn test_default_subcommand_is_hook() {
        let (dir, _home) = setup_home();
        let output = run_binary(dir.path(), &[], &payload("Just a regular prompt"));

        assert!(output.status.success());
        assert_eq!(output.stdout, b"Just a regular prompt");
    }

    #[test]
    fn test_processing_error_passes_prompt_through() {
        let dir = TempDir::new().unwrap();
        let output = run_binary(dir.path(), &["hook"], &payload("Sort v(3)"));

        assert!(output.status.success());
        assert_eq!(output.stdout, b"Sort v(3)");
    }

    #[test]
    fn test_whitespace_prompt_echoed() {
        let (dir, _home) = setup_home();
        let output = run_binary(dir.path(), &["hook"], &payload("  \n"));

        assert!(output.status.success());
        assert_eq!(output.stdout, b"  \n");
    }

    #[test]
    fn test_invalid_payload_exits_non_zero() {
        let dir = TempDir::new().unwrap();
        let output = run_binary(dir.path(), &["hook"], "{\"text\": 1}");

        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_commands_listing() {
        let dir = TempDir::new().unwrap();
        let output = run_binary(dir.path(), &["commands"], "");

        assert!(output.status.success());
        let listing = String::from_utf8(output.stdout).unwrap();
        let tokens: Vec<&str> = listing
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(tokens.len(), 14);
        assert_eq!(tokens.first(), Some(&":code"));
        assert!(tokens.contains(&":zh"));
    }

    #[test]
    fn test_install_then_hook() {
        let dir = TempDir::new().unwrap();
        let output = run_binary(dir.path(), &["install", "--processors", "command"], "");
        assert!(output.status.success());

        let home = ClaudeHome::from_root(dir.path());
        assert!(home.hooks_dir().join("ai-dev-kit").exists());
        assert!(home.variations_template_path().exists());

        let host: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(home.host_settings_path()).unwrap())
                .unwrap();
        assert_eq!(
            host["hooks"]["UserPromptSubmit"].as_array().unwrap().len(),
            1
        );

        // Only the command processor is enabled now.
        let output = run_binary(dir.path(), &["hook"], &payload("Sort v(3) :zh"));
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "将以下内容翻译成中文：Sort v(3)"
        );
    }
}
