//! The numbered quick-question catalogue.

pub struct Category {
    pub name: &'static str,
    /// (number, question) pairs; numbers are globally unique 1..=20.
    pub questions: &'static [(u8, &'static str)],
}

pub const CATEGORIES: [Category; 4] = [
    Category {
        name: "Performance",
        questions: &[
            (1, "What's my current CPU and memory usage?"),
            (2, "Show me the top processes consuming resources"),
            (3, "Perform a comprehensive system health check"),
            (4, "What's my disk space and I/O performance?"),
            (5, "How can I optimize my system performance?"),
        ],
    },
    Category {
        name: "Security",
        questions: &[
            (6, "Perform a basic security scan"),
            (7, "Check for any security concerns or recommendations"),
            (8, "What security services are running?"),
            (9, "Show me recent security-related events"),
            (10, "Are there any open network ports I should know about?"),
        ],
    },
    Category {
        name: "Troubleshooting",
        questions: &[
            (11, "Are there any recent system errors or warnings?"),
            (12, "Help me diagnose a system problem"),
            (13, "What services are currently running?"),
            (14, "Check system logs for issues"),
            (15, "Why is my system running slowly?"),
        ],
    },
    Category {
        name: "Information",
        questions: &[
            (16, "Show me my network configuration and status"),
            (17, "What's my system uptime and basic information?"),
            (18, "What software is installed on my system?"),
            (19, "Show me system temperature and thermal status"),
            (20, "Display battery status (if applicable)"),
        ],
    },
];

/// Expand a bare catalogue number ("7") into its question text.
pub fn lookup(input: &str) -> Option<&'static str> {
    let number: u8 = input.trim().parse().ok()?;
    CATEGORIES
        .iter()
        .flat_map(|c| c.questions.iter())
        .find(|(n, _)| *n == number)
        .map(|(_, q)| *q)
}

/// Render the full catalogue, grouped by category.
pub fn render() -> String {
    let mut out = String::from("Available questions:\n");
    for category in &CATEGORIES {
        out.push_str(&format!("\n  {}\n", category.name));
        for (number, question) in category.questions {
            out.push_str(&format!("    {number:>2}. {question}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_twenty_numbers_resolve() {
        for n in 1..=20u8 {
            assert!(lookup(&n.to_string()).is_some(), "question {n} missing");
        }
        assert!(lookup("21").is_none());
        assert!(lookup("0").is_none());
        assert!(lookup("not a number").is_none());
    }

    #[test]
    fn numbers_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for category in &CATEGORIES {
            for (n, _) in category.questions {
                assert!(seen.insert(*n), "duplicate question number {n}");
            }
        }
        assert_eq!(seen.len(), 20);
    }

    #[test]
    fn render_lists_each_category() {
        let text = render();
        for category in &CATEGORIES {
            assert!(text.contains(category.name));
        }
    }
}
