/**
 * Surgical Edits
 *
 * The edit-analysis call returns a list of `{target, replacement, context}`
 * changes. Each change is applied inside its context window when the
 * context is found, otherwise at the first occurrence of the target.
 */

use serde::Deserialize;

/// Characters past the end of the context still searched for the target
pub const CONTEXT_WINDOW: usize = 200;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SurgicalChange {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub replacement: String,
    #[serde(default)]
    pub context: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct EditPlan {
    #[serde(default)]
    pub changes: Vec<SurgicalChange>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Largest char boundary in `s` not after `index`
fn floor_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Apply one change, returning the input unchanged when nothing matches
pub fn apply_change(html: &str, change: &SurgicalChange) -> String {
    if change.target.is_empty() || change.replacement.is_empty() {
        return html.to_string();
    }

    if !change.context.is_empty() {
        if let Some(ctx_start) = html.find(&change.context) {
            let window_end = floor_boundary(html, ctx_start + change.context.len() + CONTEXT_WINDOW);
            let window = &html[ctx_start..window_end];
            if let Some(offset) = window.find(&change.target) {
                let at = ctx_start + offset;
                return splice(html, at, change.target.len(), &change.replacement);
            }
            return html.to_string();
        }
    }

    match html.find(&change.target) {
        Some(at) => splice(html, at, change.target.len(), &change.replacement),
        None => html.to_string(),
    }
}

fn splice(html: &str, at: usize, len: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(html.len() + replacement.len());
    out.push_str(&html[..at]);
    out.push_str(replacement);
    out.push_str(&html[at + len..]);
    out
}

/// Apply every change in order
pub fn apply_plan(html: &str, plan: &EditPlan) -> String {
    plan.changes
        .iter()
        .fold(html.to_string(), |acc, change| apply_change(&acc, change))
}

/// A change counts as landed when its target is gone or its replacement is present
pub fn changes_landed(html: &str, plan: &EditPlan) -> bool {
    plan.changes
        .iter()
        .all(|c| !html.contains(&c.target) || html.contains(&c.replacement))
}
