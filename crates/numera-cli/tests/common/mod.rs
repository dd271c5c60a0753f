//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

pub const CATEGORIES: [&str; 12] = [
    "insight",
    "reflection",
    "contemplation",
    "manifestation",
    "challenge",
    "physical_practice",
    "shadow",
    "archetype",
    "energy_check",
    "numerical_context",
    "astrological_context",
    "mental_wellness",
];

/// Test context with temporary directory
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(".numera").join("config.yaml");

        Self {
            temp_dir,
            config_path,
        }
    }

    /// Write `.numera/config.yaml`
    pub fn with_config(self, config: &str) -> Self {
        std::fs::create_dir_all(self.config_path.parent().unwrap()).expect("Failed to create config dir");
        std::fs::write(&self.config_path, config).expect("Failed to write config");
        self
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file relative to the temp directory, creating parents.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    pub fn write_record(&self, relative: &str, record: &Value) -> PathBuf {
        self.write(relative, &serde_json::to_string_pretty(record).unwrap())
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("numera").expect("Binary not found");
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1") // Disable colors for predictable output
            .env_remove("NUMERA_CONFIG")
            .env_remove("NUMERA_CONTENT_ROOT")
            .env_remove("NUMERA_LOG_LEVEL")
            .env_remove("NUMERA_ENV");
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A well-formed record with `per_category` entries in every category.
pub fn record(number: u32, per_category: usize, batch_size: u64) -> Value {
    let mut record = json!({
        "number": number,
        "generation_info": {
            "date": "2025-08-05",
            "time_context": "universal",
            "theme": format!("theme of {number}"),
            "batch_size": batch_size,
        }
    });
    for category in CATEGORIES {
        let entries: Vec<String> = (0..per_category)
            .map(|i| format!("{number} {category} entry {i}"))
            .collect();
        record[category] = json!(entries);
    }
    record
}

/// Essay text with the full conventional outline.
pub fn essay(number: u32) -> String {
    let sections = [
        "Core Essence",
        "Archetype",
        "Mystical Significance",
        "Modern Life Application",
        "Numerology Profile",
        "Shadow and Light",
        "Modern Culture",
        "Relationship Compatibility",
        "Affirmations",
        "Rituals",
        "Chakra Resonance",
        "Symbolic Correspondences",
        "Frequency Data",
        "Myths and Quotes",
        "Conclusion",
    ];
    let mut text = format!("# Number {number}: An Essay\n\nIntro.\n");
    for (i, section) in sections.iter().enumerate() {
        text.push_str(&format!("\n### {}. {section}\n\nBody of {section}.\n", i + 1));
    }
    text
}

/// Assert helpers for CLI output
pub trait OutputAssertions {
    fn assert_success(&self);
    fn assert_failure(&self);
    fn assert_stdout_contains(&self, text: &str);
    fn assert_stderr_contains(&self, text: &str);
    fn assert_exit_code(&self, code: i32);
}

impl OutputAssertions for Output {
    fn assert_success(&self) {
        assert!(
            self.status.success(),
            "Command failed with status: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stderr)
        );
    }

    fn assert_failure(&self) {
        assert!(
            !self.status.success(),
            "Command succeeded unexpectedly\nstdout: {}",
            String::from_utf8_lossy(&self.stdout)
        );
    }

    fn assert_stdout_contains(&self, text: &str) {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(
            stdout.contains(text),
            "stdout did not contain '{}'\nstdout: {}",
            text,
            stdout
        );
    }

    fn assert_stderr_contains(&self, text: &str) {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(
            stderr.contains(text),
            "stderr did not contain '{}'\nstderr: {}",
            text,
            stderr
        );
    }

    fn assert_exit_code(&self, code: i32) {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Expected exit code {}, got {:?}",
            code,
            self.status.code()
        );
    }
}

/// JSON output assertions
pub mod json {
    use serde_json::Value;

    pub fn parse_output(output: &[u8]) -> Value {
        serde_json::from_slice(output).expect("Failed to parse JSON output")
    }

    pub fn assert_error(json: &Value, code: &str) {
        assert_eq!(
            json.get("error")
                .and_then(|e| e.get("code"))
                .and_then(|c| c.as_str()),
            Some(code),
            "Expected error code: {code}"
        );
    }
}
