//! Fixed prize ladder and safe checkpoints.

/// Number of questions (and rungs) in one ladder.
pub const LADDER_LEVELS: u32 = 15;

/// Level reached after answering every question of a set.
pub const COMPLETED_LEVEL: u32 = LADDER_LEVELS + 1;

/// Levels that bank a guaranteed prize on a loss.
pub const SAFE_LEVELS: [u32; 2] = [5, 10];

const PRIZES: [u64; LADDER_LEVELS as usize] = [
    500, 1_000, 2_000, 3_000, 5_000, 10_000, 20_000, 30_000, 40_000, 50_000, 100_000, 200_000,
    300_000, 500_000, 1_000_000,
];

/// How a rung should be highlighted when the ladder is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RungKind {
    Current,
    Safe,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderRung {
    pub level: u32,
    pub prize: u64,
    pub kind: RungKind,
}

/// Lookup table for the 15 prize levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrizeLadder;

impl PrizeLadder {
    /// Prize for a 1-based level; zero outside `1..=15`.
    #[must_use]
    pub fn prize(level: u32) -> u64 {
        level
            .checked_sub(1)
            .and_then(|idx| PRIZES.get(idx as usize))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn top_prize() -> u64 {
        Self::prize(LADDER_LEVELS)
    }

    #[must_use]
    pub fn is_safe_level(level: u32) -> bool {
        SAFE_LEVELS.contains(&level)
    }

    /// Prize banked on a loss while standing on `level`.
    #[must_use]
    pub fn guaranteed_prize(level: u32) -> u64 {
        SAFE_LEVELS
            .iter()
            .rev()
            .find(|safe| level >= **safe)
            .map_or(0, |safe| Self::prize(*safe))
    }

    /// Rungs from the top prize down, ready to render.
    #[must_use]
    pub fn rungs(current_level: u32) -> Vec<LadderRung> {
        (1..=LADDER_LEVELS)
            .rev()
            .map(|level| {
                let kind = if level == current_level {
                    RungKind::Current
                } else if Self::is_safe_level(level) {
                    RungKind::Safe
                } else {
                    RungKind::Plain
                };
                LadderRung {
                    level,
                    prize: Self::prize(level),
                    kind,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_bounds() {
        assert_eq!(PrizeLadder::prize(1), 500);
        assert_eq!(PrizeLadder::prize(5), 5_000);
        assert_eq!(PrizeLadder::prize(10), 50_000);
        assert_eq!(PrizeLadder::top_prize(), 1_000_000);
        assert_eq!(PrizeLadder::prize(0), 0);
        assert_eq!(PrizeLadder::prize(16), 0);
    }

    #[test]
    fn ladder_is_strictly_increasing() {
        let prizes: Vec<u64> = (1..=LADDER_LEVELS).map(PrizeLadder::prize).collect();
        assert!(prizes.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn guaranteed_prize_follows_checkpoints() {
        for level in 1..=LADDER_LEVELS {
            let expected = if level >= 10 {
                PrizeLadder::prize(10)
            } else if level >= 5 {
                PrizeLadder::prize(5)
            } else {
                0
            };
            assert_eq!(PrizeLadder::guaranteed_prize(level), expected, "level {level}");
        }
    }

    #[test]
    fn rungs_mark_current_and_safe() {
        let rungs = PrizeLadder::rungs(7);
        assert_eq!(rungs.len(), 15);
        assert_eq!(rungs[0].level, 15);
        let kind_of = |level: u32| rungs.iter().find(|r| r.level == level).unwrap().kind;
        assert_eq!(kind_of(7), RungKind::Current);
        assert_eq!(kind_of(5), RungKind::Safe);
        assert_eq!(kind_of(10), RungKind::Safe);
        assert_eq!(kind_of(1), RungKind::Plain);
    }
}
