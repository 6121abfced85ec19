//! Review agent roster.
//!
//! Each agent is a data profile: a role for the prompt, review objectives,
//! and a glob table selecting the files it cares about. The orchestrator
//! runs every profile over its own diff subset; an agent with an empty
//! subset is skipped.

use crate::diff::filter::PatternSet;
use crate::errors::PrResult;

/// Stable identifier per agent, used in logs and published section titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    CodeQuality,
    Documentation,
    TestCoverage,
    Dependencies,
    Security,
}

impl AgentKind {
    pub fn display_name(self) -> &'static str {
        match self {
            AgentKind::CodeQuality => "Code Quality",
            AgentKind::Documentation => "Documentation",
            AgentKind::TestCoverage => "Test Coverage",
            AgentKind::Dependencies => "Dependencies",
            AgentKind::Security => "Security",
        }
    }
}

/// One agent's static profile plus its compiled pattern table.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub kind: AgentKind,
    pub role: &'static str,
    pub mission: &'static str,
    pub objectives: &'static str,
    pub patterns: PatternSet,
}

const SOURCE_GLOBS: &[&str] = &[
    "*.rs", "*.py", "*.ts", "*.tsx", "*.js", "*.jsx", "*.go", "*.java", "*.kt", "*.swift", "*.c",
    "*.cpp", "*.h", "*.rb", "*.dart",
];

const MANIFEST_GLOBS: &[&str] = &[
    "requirements.txt",
    "pyproject.toml",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "Cargo.toml",
    "Cargo.lock",
    "go.mod",
    "go.sum",
    "Gemfile",
    "Gemfile.lock",
    "pom.xml",
    "build.gradle",
    "pubspec.yaml",
];

impl AgentProfile {
    /// Builds the full roster, compiling every glob table once.
    pub fn roster() -> PrResult<Vec<AgentProfile>> {
        Ok(vec![
            AgentProfile {
                kind: AgentKind::CodeQuality,
                role: "code quality reviewer",
                mission: "Your task is to analyze code changes and suggest improvements.",
                objectives: "\
- Complex logic that needs simplification.
- Potential bugs, performance issues, and code duplication.
- Inconsistent naming or styling.
",
                patterns: PatternSet::compile(SOURCE_GLOBS)?,
            },
            AgentProfile {
                kind: AgentKind::Documentation,
                role: "documentation reviewer",
                mission: "Your task is to ensure that all code changes are properly documented.",
                objectives: "\
- Check if new or modified code includes appropriate inline comments.
- Ensure README and docs reflect significant changes or new features.
- Verify adherence to the project's documentation standards.
",
                // Documentation review looks at the whole diff.
                patterns: PatternSet::compile(&["*"])?,
            },
            AgentProfile {
                kind: AgentKind::TestCoverage,
                role: "test coverage reviewer",
                mission: "Your task is to ensure adequate test coverage for code changes.",
                objectives: "\
- New functionality without tests.
- Modified code without corresponding test updates.
- Edge cases that should be tested.
",
                patterns: PatternSet::compile(SOURCE_GLOBS)?,
            },
            AgentProfile {
                kind: AgentKind::Dependencies,
                role: "dependency reviewer",
                mission: "Your task is to analyze dependency changes for security and compatibility issues.",
                objectives: "\
- Security implications of dependency changes.
- Version compatibility and breaking changes in major updates.
- Best practices for dependency management.
",
                patterns: PatternSet::compile(MANIFEST_GLOBS)?,
            },
            AgentProfile {
                kind: AgentKind::Security,
                role: "security reviewer",
                mission: "Your task is to find security vulnerabilities and unsafe patterns in code changes.",
                objectives: "\
- Hardcoded secrets, tokens or credentials.
- Injection risks (SQL, shell, eval) and unsanitized input handling.
- Weak cryptography and insecure defaults.
",
                // Anything in the diff can leak a secret.
                patterns: PatternSet::compile(&["*"])?,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffDocument;

    #[test]
    fn roster_compiles_and_covers_five_agents() {
        let roster = AgentProfile::roster().unwrap();
        assert_eq!(roster.len(), 5);
    }

    #[test]
    fn dependency_agent_only_sees_manifests() {
        let doc = DiffDocument::parse(
            "\
diff --git a/src/main.rs b/src/main.rs
@@ -1,1 +1,2 @@
 fn main() {}
+// touched
diff --git a/Cargo.toml b/Cargo.toml
@@ -1,1 +1,2 @@
 [package]
+name = \"x\"",
        );
        let roster = AgentProfile::roster().unwrap();
        let deps = roster
            .iter()
            .find(|p| p.kind == AgentKind::Dependencies)
            .unwrap();
        let selected = doc.select(&deps.patterns);
        assert_eq!(selected.len(), 1);
        assert!(selected.get("Cargo.toml").is_some());
    }
}
