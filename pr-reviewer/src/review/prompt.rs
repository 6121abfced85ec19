//! Prompt builders for the review agents.
//!
//! Keep prompts compact; every agent shares one skeleton so the output
//! follows the comment convention the extractor understands.

use crate::review::agents::AgentProfile;

/// The literal output convention the extractor parses: description,
/// suggestion fence, file annotation, line annotation, in that order.
pub const COMMENT_FORMAT: &str = "\
Format your review as follows.
For each issue:
- **Issue description**

```suggestion
Your suggested code change
```

**File:** `path/to/file`

**Line:** line_number
";

/// Builds the full prompt for one agent over the rendered diff subset.
pub fn build_agent_prompt(profile: &AgentProfile, diff: &str, previous_comments: &str) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "You are an expert {}. {}\n",
        profile.role, profile.mission
    ));
    s.push_str("\n**Review Objectives:**\n");
    s.push_str(profile.objectives);
    s.push_str("\n**Context:**\nPrevious comments on this pull request:\n");
    if previous_comments.trim().is_empty() {
        s.push_str("(none)\n");
    } else {
        s.push_str(previous_comments);
        s.push('\n');
    }
    s.push_str("\n**Code Diff for Review:**\n");
    s.push_str(diff);
    s.push_str("\n**Instructions:**\n");
    s.push_str("- Identify concrete issues; reference the changed lines, not the whole file.\n");
    s.push_str("- Provide specific suggestions using suggestion blocks.\n");
    s.push_str("- Prioritize by severity and explain why each change is recommended.\n\n");
    s.push_str(COMMENT_FORMAT);
    s.push_str("\nPlease provide your review below:\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::agents::AgentProfile;

    #[test]
    fn prompt_carries_diff_context_and_format() {
        let roster = AgentProfile::roster().unwrap();
        let prompt = build_agent_prompt(&roster[0], "File: a.py\n```\n+x\n```\n", "looks fine");
        assert!(prompt.contains("**Code Diff for Review:**"));
        assert!(prompt.contains("File: a.py"));
        assert!(prompt.contains("looks fine"));
        assert!(prompt.contains("```suggestion"));
        assert!(prompt.contains("**Line:**"));
    }

    #[test]
    fn empty_previous_comments_render_placeholder() {
        let roster = AgentProfile::roster().unwrap();
        let prompt = build_agent_prompt(&roster[0], "diff", "  ");
        assert!(prompt.contains("(none)"));
    }
}
