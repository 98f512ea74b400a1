mod app_settings;
mod hint;
mod leaderboard;
mod prize;
mod question;

pub use app_settings::{AppSettings, DEFAULT_MUSIC_VOLUME, SettingsError, Theme};
pub use hint::{Confidence, HintKind, HintPayload, UsedHints};
pub use leaderboard::{ANONYMOUS_NAME, LEADERBOARD_CAPACITY, Leaderboard, LeaderboardEntry};
pub use prize::{
    COMPLETED_LEVEL, LADDER_LEVELS, LadderRung, PrizeLadder, RungKind, SAFE_LEVELS,
};
pub use question::{OPTION_COUNT, Question, QuestionError, QuestionSet, set_name};
