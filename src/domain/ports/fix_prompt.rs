//! Fix Prompt Port
//!
//! Asks the operator what to do with one pending API fix in interactive
//! mode. The engine owns "apply to all" bookkeeping; prompts only report
//! the choice.

use crate::domain::entities::{FixKind, FixTarget};

/// Operator's choice for one pending fix target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixDecision {
    Apply,
    Skip,
    /// Apply this and every remaining target of the same kind.
    ApplyAllOfKind,
    /// Stop the session; nothing further is applied.
    Quit,
}

/// Context shown to the operator.
#[derive(Debug, Clone)]
pub struct FixPromptContext<'a> {
    pub check_id: &'a str,
    pub title: &'a str,
    pub kind: FixKind,
    pub target: &'a FixTarget,
    /// 1-based position among the session's pending targets.
    pub index: usize,
    pub total: usize,
}

pub trait FixPrompt: Send + Sync {
    fn decide(&self, context: &FixPromptContext) -> FixDecision;
}

/// Declines everything. Used when no terminal is attached.
pub struct DeclinePrompt;

impl FixPrompt for DeclinePrompt {
    fn decide(&self, _context: &FixPromptContext) -> FixDecision {
        FixDecision::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Mutation;

    #[test]
    fn decline_prompt_always_skips() {
        let target = FixTarget {
            id: "k1".into(),
            label: "k1".into(),
            mutation: Mutation::DeleteKey { key_id: "k1".into() },
        };
        let ctx = FixPromptContext {
            check_id: "AUTH-001",
            title: "Reusable auth keys exist",
            kind: FixKind::RevokeAuthKey,
            target: &target,
            index: 1,
            total: 1,
        };
        assert_eq!(DeclinePrompt.decide(&ctx), FixDecision::Skip);
    }
}
