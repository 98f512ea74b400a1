//! Lifeline payloads. Each function draws only from the supplied RNG, so a
//! seeded generator replays the same hints.

use quiz_core::model::{Confidence, HintKind, HintPayload, OPTION_COUNT, Question};
use rand::Rng;

/// Probability that the friend names the right option.
pub const FRIEND_ACCURACY: f64 = 0.8;

const AUDIENCE_BASE_VOTES: std::ops::RangeInclusive<u32> = 5..=25;
const AUDIENCE_BONUS_VOTES: std::ops::RangeInclusive<u32> = 30..=60;

pub fn generate<R: Rng>(kind: HintKind, question: &Question, rng: &mut R) -> HintPayload {
    match kind {
        HintKind::FiftyFifty => fifty_fifty(question, rng),
        HintKind::CallFriend => call_friend(question, rng),
        HintKind::AudienceHelp => audience_help(question, rng),
    }
}

/// Keeps one random wrong option and eliminates the other two.
pub fn fifty_fifty<R: Rng>(question: &Question, rng: &mut R) -> HintPayload {
    let mut wrong = question.incorrect_options();
    wrong.remove(rng.random_range(0..wrong.len()));
    HintPayload::FiftyFifty {
        eliminated: [wrong[0], wrong[1]],
    }
}

pub fn call_friend<R: Rng>(question: &Question, rng: &mut R) -> HintPayload {
    if rng.random_bool(FRIEND_ACCURACY) {
        return HintPayload::CallFriend {
            suggestion: question.correct_answer(),
            confidence: Confidence::Confident,
        };
    }
    let wrong = question.incorrect_options();
    HintPayload::CallFriend {
        suggestion: wrong[rng.random_range(0..wrong.len())],
        confidence: Confidence::Uncertain,
    }
}

/// Rounded vote shares; the total is left as rounding leaves it.
pub fn audience_help<R: Rng>(question: &Question, rng: &mut R) -> HintPayload {
    let mut votes = [0_u32; OPTION_COUNT];
    for vote in &mut votes {
        *vote = rng.random_range(AUDIENCE_BASE_VOTES);
    }
    votes[question.correct_answer()] += rng.random_range(AUDIENCE_BONUS_VOTES);

    let total = f64::from(votes.iter().sum::<u32>());
    let percentages =
        votes.map(|vote| (f64::from(vote) / total * 100.0).round() as u32);
    HintPayload::AudienceHelp { percentages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(correct: usize) -> Question {
        Question::new(
            "Q",
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
        )
        .unwrap()
    }

    #[test]
    fn fifty_fifty_removes_two_wrong_options() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let correct = (seed % 4) as usize;
            let HintPayload::FiftyFifty { eliminated } = fifty_fifty(&question(correct), &mut rng)
            else {
                panic!("wrong payload");
            };
            assert_ne!(eliminated[0], eliminated[1]);
            assert!(!eliminated.contains(&correct));
            assert!(eliminated.iter().all(|idx| *idx < OPTION_COUNT));
        }
    }

    #[test]
    fn fifty_fifty_can_keep_any_wrong_option() {
        let mut kept = std::collections::HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let HintPayload::FiftyFifty { eliminated } = fifty_fifty(&question(0), &mut rng)
            else {
                panic!("wrong payload");
            };
            let survivor = (1..4).find(|idx| !eliminated.contains(idx)).unwrap();
            kept.insert(survivor);
        }
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn friend_is_usually_right() {
        let mut rng = StdRng::seed_from_u64(7);
        let q = question(2);
        let mut right = 0;
        for _ in 0..1_000 {
            match call_friend(&q, &mut rng) {
                HintPayload::CallFriend {
                    suggestion,
                    confidence: Confidence::Confident,
                } => {
                    assert_eq!(suggestion, 2);
                    right += 1;
                }
                HintPayload::CallFriend {
                    suggestion,
                    confidence: Confidence::Uncertain,
                } => assert_ne!(suggestion, 2),
                other => panic!("unexpected payload {other:?}"),
            }
        }
        assert!((700..=900).contains(&right), "right answers: {right}");
    }

    #[test]
    fn audience_favors_correct_option() {
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let HintPayload::AudienceHelp { percentages } = audience_help(&question(3), &mut rng)
            else {
                panic!("wrong payload");
            };
            let best = percentages.iter().enumerate().max_by_key(|(_, p)| **p).unwrap().0;
            assert_eq!(best, 3);
            let sum: u32 = percentages.iter().sum();
            assert!((98..=102).contains(&sum), "sum {sum}");
        }
    }

    #[test]
    fn same_seed_same_hint() {
        let q = question(1);
        let a = generate(HintKind::AudienceHelp, &q, &mut StdRng::seed_from_u64(42));
        let b = generate(HintKind::AudienceHelp, &q, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
