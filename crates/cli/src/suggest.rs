//! Contextual follow-up suggestions shown after each answer.

use sysward_core::PatternId;

/// Keyword- and pattern-driven follow-ups, plus a note when memory
/// holds similar past questions.
pub fn suggestions(question: &str, pattern: PatternId, related_count: usize) -> Vec<String> {
    let q = question.to_lowercase();
    let mut out = Vec::new();

    match pattern {
        PatternId::MultiAgent => {
            out.push("Multi-agent analysis combines insights from specialists".to_string())
        }
        PatternId::PlanExecute => {
            out.push("Plan-Execute breaks complex tasks into ordered steps".to_string())
        }
        _ => {}
    }

    if ["cpu", "memory", "performance"].iter().any(|k| q.contains(k)) {
        out.push("Try: 'Perform a comprehensive system health check'".to_string());
        out.push("Consider regular performance monitoring".to_string());
    } else if ["error", "problem", "issue"].iter().any(|k| q.contains(k)) {
        out.push("Try: 'Check system logs for issues'".to_string());
        out.push("Consider running system diagnostics".to_string());
    } else if ["security", "vulnerability"].iter().any(|k| q.contains(k)) {
        out.push("Try: 'Perform a basic security scan'".to_string());
        out.push("Consider regular security updates".to_string());
    }

    if related_count > 0 {
        out.push(format!(
            "Related: you asked similar questions {related_count} time(s) before"
        ));
    }

    if out.is_empty() {
        out.push("Tip: type 'questions' to see all available options".to_string());
        out.push("Try different agent patterns for varied approaches".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_questions_get_health_check_hint() {
        let s = suggestions("why is my cpu pegged", PatternId::React, 0);
        assert!(s.iter().any(|l| l.contains("health check")));
    }

    #[test]
    fn related_count_is_surfaced() {
        let s = suggestions("disk space", PatternId::React, 2);
        assert!(s.iter().any(|l| l.contains("2 time(s)")));
    }

    #[test]
    fn fallback_tips_when_nothing_matches() {
        let s = suggestions("hello there", PatternId::React, 0);
        assert!(s.iter().any(|l| l.contains("questions")));
    }

    #[test]
    fn pattern_note_for_multi_agent() {
        let s = suggestions("hello", PatternId::MultiAgent, 0);
        assert!(s[0].contains("Multi-agent"));
    }
}
