//! Target IR: the central repository of UI locators with stable ids.

use crate::model::records::Strategy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetIR {
    pub target_id: String,
    /// `element` for now; components and frames reserve richer kinds.
    #[serde(rename = "type")]
    pub target_type: String,
    pub context: TargetContext,
    pub semantic: TargetSemantic,
    pub selector_strategies: Vec<SelectorStrategy>,
    pub preferred_strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetContext {
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSemantic {
    /// ARIA-ish role guessed from the symbolic name.
    pub role: String,
    /// Human-readable name derived from the camelCase identifier.
    pub business_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorStrategy {
    pub strategy: Strategy,
    pub value: String,
    pub stability_score: f64,
}

impl TargetIR {
    /// The preferred selector's value, used when steps inline a selector.
    pub fn preferred_selector(&self) -> Option<&str> {
        self.selector_strategies
            .iter()
            .find(|s| s.strategy == self.preferred_strategy)
            .map(|s| s.value.as_str())
    }
}

/// Guess a semantic role from the symbolic name's suffix.
pub fn role_for_name(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    if lowered.ends_with("input") || lowered.ends_with("field") {
        "textbox"
    } else if lowered.ends_with("button") || lowered.ends_with("btn") {
        "button"
    } else if lowered.ends_with("link") {
        "link"
    } else if lowered.ends_with("checkbox") {
        "checkbox"
    } else if lowered.ends_with("select") || lowered.ends_with("dropdown") {
        "combobox"
    } else if lowered.ends_with("message") || lowered.ends_with("label") || lowered.ends_with("text")
    {
        "text"
    } else {
        "element"
    }
}

/// `emailInput` → `Email Input`.
pub fn humanize(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(current.clone());
            current.clear();
        }
        if c == '_' {
            if !current.is_empty() {
                words.push(current.clone());
                current.clear();
            }
            continue;
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_name_suffixes() {
        assert_eq!(role_for_name("emailInput"), "textbox");
        assert_eq!(role_for_name("loginButton"), "button");
        assert_eq!(role_for_name("registerLink"), "link");
        assert_eq!(role_for_name("welcomeMessage"), "text");
        assert_eq!(role_for_name("mysteryThing"), "element");
    }

    #[test]
    fn humanize_splits_camel_case() {
        assert_eq!(humanize("emailInput"), "Email Input");
        assert_eq!(humanize("loginButton"), "Login Button");
        assert_eq!(humanize("first_name"), "First Name");
    }
}
