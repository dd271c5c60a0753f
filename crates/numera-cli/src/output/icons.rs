//! Status icons for CLI output.

use std::env;

use numera_content::{LintSeverity, Severity, ValidationStatus};

/// Status icons
pub struct Icons;

impl Icons {
    pub const CHECK: &'static str = "✓";
    pub const CROSS: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";
    pub const BULLET: &'static str = "•";

    /// Fallback ASCII versions
    pub const CHECK_ASCII: &'static str = "[ok]";
    pub const CROSS_ASCII: &'static str = "[err]";
    pub const WARNING_ASCII: &'static str = "[warn]";
    pub const INFO_ASCII: &'static str = "[info]";
    pub const BULLET_ASCII: &'static str = "*";
}

/// Icon context that handles unicode support detection
#[derive(Debug, Clone, Copy)]
pub struct IconContext {
    unicode: bool,
}

impl IconContext {
    pub fn new() -> Self {
        Self {
            unicode: detect_unicode_support(),
        }
    }

    pub fn check(&self) -> &'static str {
        if self.unicode { Icons::CHECK } else { Icons::CHECK_ASCII }
    }

    pub fn cross(&self) -> &'static str {
        if self.unicode { Icons::CROSS } else { Icons::CROSS_ASCII }
    }

    pub fn warning(&self) -> &'static str {
        if self.unicode { Icons::WARNING } else { Icons::WARNING_ASCII }
    }

    pub fn info(&self) -> &'static str {
        if self.unicode { Icons::INFO } else { Icons::INFO_ASCII }
    }

    pub fn bullet(&self) -> &'static str {
        if self.unicode { Icons::BULLET } else { Icons::BULLET_ASCII }
    }

    pub fn status(&self, status: ValidationStatus) -> &'static str {
        match status {
            ValidationStatus::Valid => self.check(),
            ValidationStatus::ValidWithWarnings => self.warning(),
            ValidationStatus::Invalid => self.cross(),
        }
    }

    pub fn severity(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Error => self.cross(),
            Severity::Warning => self.warning(),
        }
    }

    pub fn lint_severity(&self, severity: LintSeverity) -> &'static str {
        match severity {
            LintSeverity::Warning => self.warning(),
            LintSeverity::Info => self.info(),
        }
    }
}

impl Default for IconContext {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_unicode_support() -> bool {
    env::var("TERM")
        .map(|t| !t.contains("linux") && t != "dumb")
        .unwrap_or(true)
        && env::var("LANG")
            .map(|l| l.to_uppercase().contains("UTF"))
            .unwrap_or(true)
}
