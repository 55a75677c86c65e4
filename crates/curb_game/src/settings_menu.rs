use curb_core::canvas::{Canvas, Color};
use curb_core::frame::FrameContext;
use curb_core::input::Key;
use curb_core::scheduler::{LateUpdatable, Updatable};
use curb_core::settings::{GameState, SettingsPatch};
use glam::Vec2;

use crate::menu::{label_or, MenuList};
use crate::screens::MAIN_MENU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Sound,
    Language,
    Difficulty,
    Back,
}

const ROWS: [Row; 4] = [Row::Sound, Row::Language, Row::Difficulty, Row::Back];

pub struct SettingsMenu {
    list: MenuList,
}

impl SettingsMenu {
    pub fn new(view: Vec2) -> Self {
        Self {
            list: MenuList::new(ROWS.len(), Vec2::new(view.x / 2.0, 300.0)),
        }
    }
}

/// The language after the current one among those the locale file lists
/// under `languages`. Stays put when there is nothing to cycle through.
fn next_language(game: &GameState) -> Option<String> {
    let languages: Vec<&str> = game
        .texts
        .children("languages")
        .into_iter()
        .map(|(code, _)| code)
        .collect();
    if languages.is_empty() {
        return None;
    }
    let current = &game.settings.language;
    let next = match languages.iter().position(|code| *code == current.as_str()) {
        Some(i) => languages[(i + 1) % languages.len()],
        None => languages[0],
    };
    (next != current.as_str()).then(|| next.to_string())
}

fn row_label(game: &GameState, row: Row) -> String {
    let settings = &game.settings;
    let (key, fallback, value) = match row {
        Row::Sound => ("settings.sound", "Sound", settings.sound.as_str().to_string()),
        Row::Language => {
            let code = settings.language.as_str();
            let name = game.text(&format!("languages.{code}"));
            ("settings.language", "Language", label_or(name, code))
        }
        Row::Difficulty => {
            let level = settings.difficulty.as_str();
            let name = game.text(&format!("difficulty.{level}"));
            ("settings.difficulty", "Difficulty", label_or(name, level))
        }
        Row::Back => return label_or(game.text("settings.back"), "Back"),
    };
    format!("{}: {value}", label_or(game.text(key), fallback))
}

impl Updatable for SettingsMenu {
    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        if ctx.input.is_pressed(Key::Escape) {
            ctx.switch_screen(MAIN_MENU);
            return;
        }
        let Some(index) = self.list.handle(ctx.input) else {
            return;
        };
        let settings = &ctx.game.settings;
        let patch = match ROWS[index] {
            Row::Sound => SettingsPatch::sound(settings.sound.toggled()),
            Row::Difficulty => SettingsPatch::difficulty(settings.difficulty.next()),
            Row::Language => match next_language(ctx.game) {
                Some(language) => SettingsPatch::language(language),
                None => return,
            },
            Row::Back => {
                ctx.switch_screen(MAIN_MENU);
                return;
            }
        };
        ctx.update_settings(patch);
    }
}

impl LateUpdatable for SettingsMenu {
    fn late_update(&mut self, ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas) {
        canvas.clear(Color::GRAY);
        let labels: Vec<String> = ROWS.iter().map(|row| row_label(ctx.game, *row)).collect();
        self.list.draw(canvas, &labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curb_core::canvas::DrawList;
    use curb_core::frame::{FrameInput, FrameRequest};
    use curb_core::locale::Texts;
    use curb_core::settings::{Difficulty, Settings, Toggle};
    use serde_json::json;

    fn game(language: &str) -> GameState {
        let texts = Texts::from_json(
            language,
            &json!({
                "settings": { "sound": "Sound", "language": "Language",
                              "difficulty": "Difficulty", "back": "Back" },
                "difficulty": { "easy": "Easy", "medium": "Medium", "hard": "Hard" },
                "languages": { "en": "English", "pt": "Português" }
            }),
        );
        let settings = Settings {
            language: language.to_string(),
            ..Settings::default()
        };
        GameState::new(settings, texts)
    }

    fn activate(menu: &mut SettingsMenu, game: &GameState, row: usize) -> Vec<FrameRequest> {
        for _ in 0..row {
            let input = FrameInput::idle(0.016).pressing(Key::Down);
            let mut requests = Vec::new();
            menu.update(&mut FrameContext::new(&input, game, &mut requests));
        }
        let input = FrameInput::idle(0.016).pressing(Key::Enter);
        let mut requests = Vec::new();
        menu.update(&mut FrameContext::new(&input, game, &mut requests));
        requests
    }

    #[test]
    fn rows_show_current_values() {
        let game = game("en");
        let mut menu = SettingsMenu::new(Vec2::new(1280.0, 720.0));
        let input = FrameInput::idle(0.016);
        let mut requests = Vec::new();
        let mut canvas = DrawList::new(1280.0, 720.0);
        menu.late_update(&mut FrameContext::new(&input, &game, &mut requests), &mut canvas);
        assert_eq!(
            canvas.texts().collect::<Vec<_>>(),
            vec!["Sound: on", "Language: English", "Difficulty: Medium", "Back"]
        );
    }

    #[test]
    fn sound_and_difficulty_cycle_through_patches() {
        let game = game("en");
        let mut menu = SettingsMenu::new(Vec2::new(1280.0, 720.0));
        assert_eq!(
            activate(&mut menu, &game, 0),
            vec![FrameRequest::UpdateSettings(SettingsPatch::sound(Toggle::Off))]
        );
        assert_eq!(
            activate(&mut menu, &game, 2),
            vec![FrameRequest::UpdateSettings(SettingsPatch::difficulty(Difficulty::Hard))]
        );
    }

    #[test]
    fn language_wraps_over_listed_languages() {
        assert_eq!(next_language(&game("en")).as_deref(), Some("pt"));
        assert_eq!(next_language(&game("pt")).as_deref(), Some("en"));
        assert_eq!(next_language(&GameState::default()), None);
    }

    #[test]
    fn back_and_escape_return_to_main_menu() {
        let game = game("en");
        let mut menu = SettingsMenu::new(Vec2::new(1280.0, 720.0));
        assert_eq!(
            activate(&mut menu, &game, 3),
            vec![FrameRequest::SwitchScreen(MAIN_MENU.to_string())]
        );

        let input = FrameInput::idle(0.016).pressing(Key::Escape);
        let mut requests = Vec::new();
        menu.update(&mut FrameContext::new(&input, &game, &mut requests));
        assert_eq!(requests, vec![FrameRequest::SwitchScreen(MAIN_MENU.to_string())]);
    }
}
