use async_trait::async_trait;
use quiz_core::model::{
    Confidence, HintKind, HintPayload, LadderRung, OPTION_COUNT, RungKind, Theme,
};
use quiz_core::time::format_record_date;
use services::game::QuestionView;
use services::{AppContext, GameEvent, GameHost, MenuAction, dispatch};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::Instant;

const OPTION_LABELS: [char; OPTION_COUNT] = ['A', 'B', 'C', 'D'];

/// Line-oriented terminal front end.
pub struct ConsoleHost {
    ctx: AppContext,
    input: Lines<BufReader<Stdin>>,
    running: bool,
}

/// One line of player input on the question screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionInput {
    Answer(usize),
    Hint(HintKind),
    Quit,
}

fn parse_question_input(line: &str) -> Option<QuestionInput> {
    let line = line.trim().to_ascii_lowercase();
    let input = match line.as_str() {
        "a" | "1" => QuestionInput::Answer(0),
        "b" | "2" => QuestionInput::Answer(1),
        "c" | "3" => QuestionInput::Answer(2),
        "d" | "4" => QuestionInput::Answer(3),
        "f" | "50" => QuestionInput::Hint(HintKind::FiftyFifty),
        "p" | "call" => QuestionInput::Hint(HintKind::CallFriend),
        "h" | "audience" => QuestionInput::Hint(HintKind::AudienceHelp),
        "q" | "quit" => QuestionInput::Quit,
        _ => return None,
    };
    Some(input)
}

/// Where a result screen leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenExit {
    NextSet,
    /// Replay the same set, banked winnings kept.
    Retry,
    /// Back to the menu after saving the score.
    Record(u64),
    Menu,
}

/// Yes/no question shown on a result screen, if it has one.
fn follow_up_question(event: &GameEvent) -> Option<&'static str> {
    match event {
        GameEvent::SetWon {
            has_next_set: true, ..
        } => Some("Continue to the next set? [Y/n] "),
        GameEvent::SetLost { .. } => Some("Retry this set? [Y/n] "),
        _ => None,
    }
}

/// Declining the follow-up question (or having none) stops the game, and a
/// stopped game offers its banked score for the records.
fn screen_exit(event: &GameEvent, accepted: bool) -> ScreenExit {
    match event {
        GameEvent::SetWon {
            has_next_set: true, ..
        } if accepted => ScreenExit::NextSet,
        GameEvent::SetLost { .. } if accepted => ScreenExit::Retry,
        _ => event.banked_score().map_or(ScreenExit::Menu, ScreenExit::Record),
    }
}

fn hint_key(kind: HintKind) -> &'static str {
    match kind {
        HintKind::FiftyFifty => "f",
        HintKind::CallFriend => "p",
        HintKind::AudienceHelp => "h",
    }
}

fn render_ladder(ladder: &[LadderRung]) {
    for rung in ladder {
        let marker = match rung.kind {
            RungKind::Current => ">",
            RungKind::Safe => "*",
            RungKind::Plain => " ",
        };
        println!("  {marker} {:>2}  {:>9}", rung.level, rung.prize);
    }
}

fn render_question(view: &QuestionView) {
    println!();
    if let Some(info) = &view.set_info {
        println!(
            "Set {}/{} ({})",
            info.current_set, info.total_sets, info.set_name
        );
    }
    render_ladder(&view.ladder);
    println!(
        "Question {} for {}  (won so far: {}, safe: {})",
        view.level, view.prize, view.winnings, view.guaranteed_prize
    );
    println!("{}", view.question.prompt());
    for (label, option) in OPTION_LABELS.iter().zip(view.question.options()) {
        println!("  {label}) {option}");
    }
    let hints: Vec<String> = view
        .remaining_hints
        .iter()
        .map(|kind| format!("{} [{}]", kind.label(), hint_key(*kind)))
        .collect();
    if !hints.is_empty() {
        println!("Hints: {}", hints.join(", "));
    }
    println!("Answer with A-D, or q to leave.");
}

fn render_hint(payload: &HintPayload) {
    match payload {
        HintPayload::FiftyFifty { eliminated } => println!(
            "50/50 removed {} and {}",
            OPTION_LABELS[eliminated[0]], OPTION_LABELS[eliminated[1]]
        ),
        HintPayload::CallFriend {
            suggestion,
            confidence,
        } => {
            let label = OPTION_LABELS[*suggestion];
            match confidence {
                Confidence::Confident => println!("Friend: \"It's {label}, I'm sure.\""),
                Confidence::Uncertain => println!("Friend: \"Maybe {label}? Not sure.\""),
            }
        }
        HintPayload::AudienceHelp { percentages } => {
            println!("Audience:");
            for (label, pct) in OPTION_LABELS.iter().zip(percentages) {
                println!("  {label} {:<20} {pct}%", "#".repeat((*pct / 5) as usize));
            }
        }
    }
}

impl ConsoleHost {
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            input: BufReader::new(tokio::io::stdin()).lines(),
            running: true,
        }
    }

    /// Main menu loop until the player exits or input closes.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if stdin cannot be read.
    pub async fn run(&mut self) -> std::io::Result<()> {
        while self.running {
            let theme = self.ctx.settings().theme().await;
            println!();
            println!("=== Quiz Ladder ({theme}) ===");
            for (idx, action) in MenuAction::ALL.iter().enumerate() {
                println!("  {}. {action}", idx + 1);
            }
            let Some(line) = self.prompt("> ").await? else {
                self.on_exit().await;
                break;
            };
            match line.trim().parse().ok().and_then(MenuAction::from_choice) {
                Some(action) => {
                    if !dispatch(self, action).await {
                        break;
                    }
                }
                None => println!("Pick 1-{}.", MenuAction::ALL.len()),
            }
        }
        Ok(())
    }

    async fn prompt(&mut self, text: &str) -> std::io::Result<Option<String>> {
        print!("{text}");
        std::io::Write::flush(&mut std::io::stdout())?;
        self.input.next_line().await
    }

    /// Read input lines until a usable one arrives. `Quit` on end of input.
    async fn read_question_input(&mut self) -> QuestionInput {
        loop {
            match self.prompt("> ").await {
                Ok(Some(line)) => match parse_question_input(&line) {
                    Some(input) => return input,
                    None => println!("Unknown input."),
                },
                Ok(None) => {
                    self.running = false;
                    return QuestionInput::Quit;
                }
                Err(err) => {
                    tracing::error!(%err, "failed to read input");
                    self.running = false;
                    return QuestionInput::Quit;
                }
            }
        }
    }

    /// Play from `event` until the game leaves the game screens.
    async fn play(&mut self, first: GameEvent) {
        let mut current = Some(first);
        while let Some(event) = current.take() {
            self.on_outcome(&event).await;
            if matches!(event, GameEvent::QuestionPosed(_)) {
                current = self.ask().await;
                continue;
            }

            let accepted = match follow_up_question(&event) {
                Some(question) => self.confirm(question).await,
                None => false,
            };
            current = match screen_exit(&event, accepted) {
                ScreenExit::NextSet => Some(self.ctx.game_mut().continue_session()),
                ScreenExit::Retry => Some(self.ctx.game_mut().start(false)),
                ScreenExit::Record(score) => {
                    self.record_score(score).await;
                    None
                }
                ScreenExit::Menu => None,
            };
        }
        self.ctx.game_mut().leave();
    }

    /// Handle the question screen until an answer leads somewhere else.
    async fn ask(&mut self) -> Option<GameEvent> {
        loop {
            match self.read_question_input().await {
                QuestionInput::Quit => return None,
                QuestionInput::Hint(kind) => match self.ctx.game_mut().hint(kind) {
                    Some(event) => self.on_outcome(&event).await,
                    None => println!("{} is not available.", kind.label()),
                },
                QuestionInput::Answer(option) => {
                    let game = self.ctx.game_mut();
                    let Some(feedback) = game.answer(option, Instant::now()) else {
                        continue;
                    };
                    self.on_outcome(&feedback).await;
                    return self.wait_for_transition().await;
                }
            }
        }
    }

    async fn wait_for_transition(&mut self) -> Option<GameEvent> {
        let deadline = self.ctx.game().next_deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.ctx.game_mut().poll(Instant::now()).into_iter().next()
    }

    async fn confirm(&mut self, text: &str) -> bool {
        match self.prompt(text).await {
            Ok(Some(line)) => !line.trim().eq_ignore_ascii_case("n"),
            _ => false,
        }
    }

    async fn record_score(&mut self, score: u64) {
        let name = match self.prompt("Your name for the records: ").await {
            Ok(Some(line)) => line,
            _ => String::new(),
        };
        let (entry, rank) = self.ctx.records().add_record(&name, score).await;
        match rank {
            Some(rank) => println!("{} placed #{} with {}.", entry.name(), rank + 1, score),
            None => println!("{score} did not make the top ten."),
        }
    }
}

#[async_trait(?Send)]
impl GameHost for ConsoleHost {
    async fn on_start_game(&mut self, is_new_session: bool) {
        let event = self.ctx.game_mut().start(is_new_session);
        self.play(event).await;
    }

    async fn on_show_records(&mut self) {
        let records = self.ctx.records().list_records().await;
        println!();
        if records.is_empty() {
            println!("No records yet.");
            return;
        }
        for (idx, entry) in records.iter().enumerate() {
            println!(
                "{:>2}. {:<20} {:>9}  {}  {}",
                idx + 1,
                entry.name(),
                entry.score(),
                format_record_date(entry.recorded_at()),
                entry.theme()
            );
        }
    }

    async fn on_switch_theme(&mut self) {
        let theme = self.ctx.settings().toggle_theme().await;
        println!("Theme: {theme}");
    }

    async fn on_show_settings(&mut self) {
        let settings = self.ctx.settings();
        let current = settings.current().await;
        println!();
        println!("Theme: {}", current.theme());
        println!("Music volume: {:.0}%", current.music_volume() * 100.0);

        let Ok(Some(line)) = self.prompt("New volume 0-100 (empty keeps it): ").await else {
            return;
        };
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match line.parse::<f32>() {
            Ok(percent) => {
                let updated = settings.set_music_volume(percent / 100.0).await;
                println!("Music volume: {:.0}%", updated.music_volume() * 100.0);
            }
            Err(_) => println!("Not a number: {line}"),
        }
        if let Ok(Some(line)) = self.prompt("Theme dark/light (empty keeps it): ").await {
            match line.trim() {
                "" => {}
                raw => match raw.parse::<Theme>() {
                    Ok(theme) => {
                        settings.set_theme(theme).await;
                    }
                    Err(err) => println!("{err}"),
                },
            }
        }
    }

    async fn on_exit(&mut self) {
        self.ctx.game_mut().leave();
        self.running = false;
        println!("Bye.");
    }

    async fn on_outcome(&mut self, event: &GameEvent) {
        match event {
            GameEvent::QuestionPosed(view) => render_question(view),
            GameEvent::Continue {
                chosen, winnings, ..
            } => println!(
                "{} is correct! Winnings: {winnings}",
                OPTION_LABELS[*chosen]
            ),
            GameEvent::WrongAnswer {
                chosen,
                correct_answer,
            } => println!(
                "{} is wrong. The answer was {}.",
                OPTION_LABELS.get(*chosen).copied().unwrap_or('?'),
                OPTION_LABELS[*correct_answer]
            ),
            GameEvent::Hint(payload) => render_hint(payload),
            GameEvent::SetWon {
                set_prize,
                total_prize,
                has_next_set,
            } => {
                println!("Set complete! Set prize: {set_prize}. Total: {total_prize}.");
                if !has_next_set {
                    println!("No more sets.");
                }
            }
            GameEvent::FinalWon { total_prize } => {
                println!("You beat every set! Total prize: {total_prize}.");
            }
            GameEvent::SetLost {
                guaranteed_prize,
                total_prize,
            } => println!("Game over. Safe prize: {guaranteed_prize}. Total: {total_prize}."),
            GameEvent::NoContent => {
                println!("No questions available. Check the questions directory.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_input_accepts_letters_and_digits() {
        assert_eq!(parse_question_input(" b "), Some(QuestionInput::Answer(1)));
        assert_eq!(parse_question_input("4"), Some(QuestionInput::Answer(3)));
        assert_eq!(
            parse_question_input("F"),
            Some(QuestionInput::Hint(HintKind::FiftyFifty))
        );
        assert_eq!(parse_question_input("q"), Some(QuestionInput::Quit));
        assert_eq!(parse_question_input("e"), None);
    }

    #[test]
    fn stopping_after_a_won_set_records_the_total() {
        let won = GameEvent::SetWon {
            set_prize: 1_000_000,
            total_prize: 3_000_000,
            has_next_set: true,
        };
        assert!(follow_up_question(&won).is_some());
        assert_eq!(screen_exit(&won, true), ScreenExit::NextSet);
        assert_eq!(screen_exit(&won, false), ScreenExit::Record(3_000_000));
    }

    #[test]
    fn lost_set_offers_retry_before_recording() {
        let lost = GameEvent::SetLost {
            guaranteed_prize: 5_000,
            total_prize: 1_005_000,
        };
        assert!(follow_up_question(&lost).is_some());
        assert_eq!(screen_exit(&lost, true), ScreenExit::Retry);
        assert_eq!(screen_exit(&lost, false), ScreenExit::Record(1_005_000));
    }

    #[test]
    fn final_win_records_without_asking() {
        let won = GameEvent::FinalWon {
            total_prize: 7_000_000,
        };
        assert_eq!(follow_up_question(&won), None);
        assert_eq!(screen_exit(&won, false), ScreenExit::Record(7_000_000));
        assert_eq!(screen_exit(&GameEvent::NoContent, false), ScreenExit::Menu);
    }
}
