//! Contract between the game services and whatever draws the screens.

use std::fmt;

use async_trait::async_trait;

use crate::game::GameEvent;

/// Presentation layer callbacks. One implementation drives the whole app.
#[async_trait(?Send)]
pub trait GameHost {
    /// Start a playthrough; `is_new_session` drops banked winnings.
    async fn on_start_game(&mut self, is_new_session: bool);
    async fn on_show_records(&mut self);
    async fn on_switch_theme(&mut self);
    async fn on_show_settings(&mut self);
    async fn on_exit(&mut self);
    /// Render one game event.
    async fn on_outcome(&mut self, event: &GameEvent);
}

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewGame,
    ContinueGame,
    Records,
    SwitchTheme,
    Settings,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::NewGame,
        MenuAction::ContinueGame,
        MenuAction::Records,
        MenuAction::SwitchTheme,
        MenuAction::Settings,
        MenuAction::Exit,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::NewGame => "New game",
            MenuAction::ContinueGame => "Continue",
            MenuAction::Records => "Records",
            MenuAction::SwitchTheme => "Switch theme",
            MenuAction::Settings => "Settings",
            MenuAction::Exit => "Exit",
        }
    }

    /// Menu entry for a 1-based choice.
    #[must_use]
    pub fn from_choice(choice: usize) -> Option<Self> {
        choice
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx).copied())
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Route a menu choice to the host. Returns `false` once the app should stop.
pub async fn dispatch<H: GameHost + ?Sized>(host: &mut H, action: MenuAction) -> bool {
    tracing::debug!(%action, "menu action");
    match action {
        MenuAction::NewGame => host.on_start_game(true).await,
        MenuAction::ContinueGame => host.on_start_game(false).await,
        MenuAction::Records => host.on_show_records().await,
        MenuAction::SwitchTheme => host.on_switch_theme().await,
        MenuAction::Settings => host.on_show_settings().await,
        MenuAction::Exit => {
            host.on_exit().await;
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        calls: Vec<String>,
    }

    #[async_trait(?Send)]
    impl GameHost for RecordingHost {
        async fn on_start_game(&mut self, is_new_session: bool) {
            self.calls.push(format!("start:{is_new_session}"));
        }
        async fn on_show_records(&mut self) {
            self.calls.push("records".into());
        }
        async fn on_switch_theme(&mut self) {
            self.calls.push("theme".into());
        }
        async fn on_show_settings(&mut self) {
            self.calls.push("settings".into());
        }
        async fn on_exit(&mut self) {
            self.calls.push("exit".into());
        }
        async fn on_outcome(&mut self, event: &GameEvent) {
            self.calls.push(format!("{event:?}"));
        }
    }

    #[tokio::test]
    async fn dispatch_routes_every_action() {
        let mut host = RecordingHost::default();
        for action in MenuAction::ALL {
            let keep_running = dispatch(&mut host, action).await;
            assert_eq!(keep_running, action != MenuAction::Exit);
        }
        assert_eq!(
            host.calls,
            vec!["start:true", "start:false", "records", "theme", "settings", "exit"]
        );
    }

    #[test]
    fn menu_choices_are_one_based() {
        assert_eq!(MenuAction::from_choice(0), None);
        assert_eq!(MenuAction::from_choice(1), Some(MenuAction::NewGame));
        assert_eq!(MenuAction::from_choice(6), Some(MenuAction::Exit));
        assert_eq!(MenuAction::from_choice(7), None);
    }
}
