//! Interactive Fix Prompt
//!
//! Asks on stderr, one `dialoguer::Select` per fix target.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use tracing::warn;

use crate::domain::ports::{FixDecision, FixPrompt, FixPromptContext};

/// Menu entries, in display order.
const CHOICES: [(&str, FixDecision); 4] = [
    ("Apply", FixDecision::Apply),
    ("Skip", FixDecision::Skip),
    ("Apply to all remaining fixes of this kind", FixDecision::ApplyAllOfKind),
    ("Quit (skip everything left)", FixDecision::Quit),
];

/// Interactive prompt using dialoguer.
///
/// Only used when stdin is a terminal. A prompt that cannot be shown
/// (closed terminal, Ctrl-C inside the menu) ends the session.
#[derive(Default)]
pub struct InteractivePrompt {
    theme: ColorfulTheme,
}

impl InteractivePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    fn question(context: &FixPromptContext) -> String {
        format!(
            "[{}/{}] {} {}: {} on {}?",
            context.index,
            context.total,
            context.check_id,
            context.title,
            context.kind.describe(),
            context.target.label
        )
    }
}

/// Decision for a selected menu index. Anything out of range quits.
fn decision_for(index: Option<usize>) -> FixDecision {
    index
        .and_then(|i| CHOICES.get(i))
        .map(|(_, decision)| *decision)
        .unwrap_or(FixDecision::Quit)
}

impl FixPrompt for InteractivePrompt {
    fn decide(&self, context: &FixPromptContext) -> FixDecision {
        let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt(Self::question(context))
            .items(&labels)
            .default(1)
            .interact_opt();

        match selection {
            Ok(index) => decision_for(index),
            Err(e) => {
                warn!(error = %e, "prompt failed; ending fix session");
                FixDecision::Quit
            }
        }
    }
}
