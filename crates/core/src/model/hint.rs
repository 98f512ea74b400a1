use std::fmt;

use crate::model::question::OPTION_COUNT;

/// The three lifelines, each usable once per playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HintKind {
    FiftyFifty,
    CallFriend,
    AudienceHelp,
}

impl HintKind {
    pub const ALL: [HintKind; 3] = [
        HintKind::FiftyFifty,
        HintKind::CallFriend,
        HintKind::AudienceHelp,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            HintKind::FiftyFifty => "50:50",
            HintKind::CallFriend => "Call a friend",
            HintKind::AudienceHelp => "Ask the audience",
        }
    }

    fn bit(self) -> u8 {
        match self {
            HintKind::FiftyFifty => 0b001,
            HintKind::CallFriend => 0b010,
            HintKind::AudienceHelp => 0b100,
        }
    }
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hints consumed during the current playthrough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsedHints(u8);

impl UsedHints {
    #[must_use]
    pub fn contains(self, kind: HintKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Marks `kind` as used. Returns `false` if it was already used.
    pub fn mark(&mut self, kind: HintKind) -> bool {
        if self.contains(kind) {
            return false;
        }
        self.0 |= kind.bit();
        true
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    #[must_use]
    pub fn remaining(self) -> Vec<HintKind> {
        HintKind::ALL
            .into_iter()
            .filter(|kind| !self.contains(*kind))
            .collect()
    }
}

/// How sure the friend on the phone sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    Confident,
    Uncertain,
}

/// Data a hint hands back to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintPayload {
    /// Option indices to disable; always two wrong options.
    FiftyFifty { eliminated: [usize; 2] },
    /// The option the friend suggests.
    CallFriend {
        suggestion: usize,
        confidence: Confidence,
    },
    /// Rounded vote percentages per option. May not sum to exactly 100.
    AudienceHelp { percentages: [u32; OPTION_COUNT] },
}

impl HintPayload {
    #[must_use]
    pub fn kind(&self) -> HintKind {
        match self {
            HintPayload::FiftyFifty { .. } => HintKind::FiftyFifty,
            HintPayload::CallFriend { .. } => HintKind::CallFriend,
            HintPayload::AudienceHelp { .. } => HintKind::AudienceHelp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn used_hints_mark_once() {
        let mut used = UsedHints::default();
        assert!(used.mark(HintKind::CallFriend));
        assert!(!used.mark(HintKind::CallFriend));
        assert!(used.contains(HintKind::CallFriend));
        assert!(!used.contains(HintKind::FiftyFifty));
        assert_eq!(
            used.remaining(),
            vec![HintKind::FiftyFifty, HintKind::AudienceHelp]
        );

        used.clear();
        assert_eq!(used.remaining().len(), 3);
    }
}
