//! Variation templating.
//!
//! `Sort algorithm v(3)` is wrapped in the variations template with
//! `$count = 3` and `$instruction = Sort algorithm`.

use std::path::PathBuf;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::Processor;
use crate::Error;

pub const COUNT_PLACEHOLDER: &str = "$count";
pub const INSTRUCTION_PLACEHOLDER: &str = "$instruction";

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"v\((\d+)\)").expect("valid variation regex"))
}

/// The first `v(N)` marker of a prompt and the text around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationRequest {
    pub raw_marker: String,
    /// Digits as written; never parsed.
    pub count: String,
    pub instruction: String,
}

impl VariationRequest {
    pub fn parse(prompt: &str) -> Option<Self> {
        let caps = marker_regex().captures(prompt)?;
        let raw_marker = caps.get(0)?.as_str().to_string();
        let count = caps.get(1)?.as_str().to_string();
        let instruction = prompt.replacen(&raw_marker, "", 1).trim().to_string();

        Some(Self {
            raw_marker,
            count,
            instruction,
        })
    }

    /// Fill the first `$count` and the first `$instruction` of `template`.
    pub fn render(&self, template: &str) -> String {
        template
            .replacen(COUNT_PLACEHOLDER, &self.count, 1)
            .replacen(INSTRUCTION_PLACEHOLDER, &self.instruction, 1)
    }
}

pub struct VariationProcessor {
    template_path: PathBuf,
}

impl VariationProcessor {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    pub fn template_path(&self) -> &std::path::Path {
        &self.template_path
    }

    async fn read_template(&self) -> crate::Result<String> {
        tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|source| Error::Template {
                path: self.template_path.clone(),
                source,
            })
    }
}

#[async_trait]
impl Processor for VariationProcessor {
    fn name(&self) -> &str {
        "variation"
    }

    async fn process(&self, prompt: &str) -> crate::Result<String> {
        let Some(request) = VariationRequest::parse(prompt) else {
            return Ok(prompt.to_string());
        };

        if request.instruction.is_empty() {
            return Ok(prompt.to_string());
        }

        let template = self.read_template().await?;
        tracing::debug!(count = %request.count, "Applying variation template");
        Ok(request.render(&template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = "Generate $count different solutions for: $instruction";

    fn setup() -> (TempDir, VariationProcessor) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("variations.md");
        std::fs::write(&path, TEMPLATE).unwrap();
        (temp_dir, VariationProcessor::new(path))
    }

    #[test]
    fn test_parse_first_marker_only() {
        let request = VariationRequest::parse("a v(2) b v(7)").unwrap();
        assert_eq!(request.raw_marker, "v(2)");
        assert_eq!(request.count, "2");
        assert_eq!(request.instruction, "a  b v(7)");
    }

    #[test]
    fn test_parse_requires_digits() {
        assert!(VariationRequest::parse("v() v(x) v(-1)").is_none());
        assert!(VariationRequest::parse("plain prompt").is_none());
    }

    #[test]
    fn test_count_kept_as_text() {
        let request = VariationRequest::parse("task v(000123456789012345678901234567890)").unwrap();
        assert_eq!(request.count, "000123456789012345678901234567890");
    }

    #[test]
    fn test_render_first_placeholder_only() {
        let request = VariationRequest {
            raw_marker: "v(2)".into(),
            count: "2".into(),
            instruction: "task".into(),
        };
        assert_eq!(
            request.render("$count/$count $instruction/$instruction"),
            "2/$count task/$instruction"
        );
    }

    #[tokio::test]
    async fn test_process_applies_template() {
        let (_dir, processor) = setup();
        let out = processor
            .process("Implement sorting algorithm v(3)")
            .await
            .unwrap();
        assert_eq!(
            out,
            "Generate 3 different solutions for: Implement sorting algorithm"
        );
    }

    #[tokio::test]
    async fn test_marker_in_middle() {
        let (_dir, processor) = setup();
        let out = processor.process("  Optimize v(4) database queries ").await.unwrap();
        assert_eq!(
            out,
            "Generate 4 different solutions for: Optimize  database queries"
        );
    }

    #[tokio::test]
    async fn test_no_marker_passthrough() {
        let processor = VariationProcessor::new("/nonexistent/variations.md");
        let out = processor.process("Just a regular prompt").await.unwrap();
        assert_eq!(out, "Just a regular prompt");
    }

    #[tokio::test]
    async fn test_marker_only_returns_original() {
        let processor = VariationProcessor::new("/nonexistent/variations.md");
        assert_eq!(processor.process("  v(3) ").await.unwrap(), "  v(3) ");
    }

    #[tokio::test]
    async fn test_missing_template_is_error() {
        let processor = VariationProcessor::new("/nonexistent/variations.md");
        let err = processor.process("task v(3)").await.unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[tokio::test]
    async fn test_idempotent_once_consumed() {
        let (_dir, processor) = setup();
        let once = processor.process("Design API v(5)").await.unwrap();
        assert_eq!(processor.process(&once).await.unwrap(), once);
    }
}
