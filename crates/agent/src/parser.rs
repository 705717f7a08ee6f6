//! Model-response parsing for the think/act/observe loop.
//!
//! The model is asked to answer in the marker format
//! (`Thought:` / `Action:` / `Action Input:` / `Final Answer:`).
//! Parsing is typed and total: any response that fits neither the
//! continue shape nor the final shape comes back as [`Parsed::Malformed`]
//! and the loop records a recovery observation instead of failing.

/// The typed outcome of parsing one model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// The model chose a tool; the loop continues.
    Continue {
        thought: String,
        action: String,
        input: String,
    },
    /// The model produced a terminal answer.
    Final { thought: String, answer: String },
    /// Neither shape matched.
    Malformed,
}

/// Parse one raw model response.
pub fn parse_response(text: &str) -> Parsed {
    let text = text.trim();
    if text.is_empty() {
        return Parsed::Malformed;
    }

    if let Some(idx) = text.find("Final Answer:") {
        let answer = text[idx + "Final Answer:".len()..].trim().to_string();
        if answer.is_empty() {
            return Parsed::Malformed;
        }
        return Parsed::Final {
            thought: thought_before(text, idx),
            answer,
        };
    }

    let Some(action_idx) = text.find("Action:") else {
        return Parsed::Malformed;
    };
    let after_action = &text[action_idx + "Action:".len()..];

    let (action, input) = match after_action.find("Action Input:") {
        Some(input_idx) => {
            let action = after_action[..input_idx].trim();
            let rest = after_action[input_idx + "Action Input:".len()..].trim();
            // A model that pre-fills an Observation line stops mattering there.
            let input = match rest.find("Observation:") {
                Some(obs_idx) => rest[..obs_idx].trim(),
                None => rest,
            };
            (action, input)
        }
        None => (after_action.lines().next().unwrap_or("").trim(), ""),
    };

    if action.is_empty() || action.lines().count() > 1 {
        return Parsed::Malformed;
    }

    Parsed::Continue {
        thought: thought_before(text, action_idx),
        action: action.to_string(),
        input: input.to_string(),
    }
}

/// The `Thought:` text preceding position `end`, or the raw prefix.
fn thought_before(text: &str, end: usize) -> String {
    let prefix = &text[..end];
    match prefix.find("Thought:") {
        Some(idx) => prefix[idx + "Thought:".len()..].trim().to_string(),
        None => prefix.trim().to_string(),
    }
}
