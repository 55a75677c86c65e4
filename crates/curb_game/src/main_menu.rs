use curb_core::canvas::{Canvas, Color};
use curb_core::frame::FrameContext;
use curb_core::scheduler::{LateUpdatable, Updatable};
use glam::Vec2;

use crate::menu::{label_or, MenuList};
use crate::screens::{CHARACTER_SELECT, SETTINGS, STREET};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    StartGame,
    Settings,
    CharacterSelect,
    Exit,
}

const CHOICES: [(Choice, &str, &str); 4] = [
    (Choice::StartGame, "menu.start_game", "Start Game"),
    (Choice::Settings, "menu.settings", "Settings"),
    (Choice::CharacterSelect, "menu.character_select", "Select Character"),
    (Choice::Exit, "menu.exit", "Exit"),
];

pub struct MainMenu {
    list: MenuList,
}

impl MainMenu {
    pub fn new(view: Vec2) -> Self {
        Self {
            list: MenuList::new(CHOICES.len(), Vec2::new(view.x / 2.0, 300.0)),
        }
    }
}

impl Updatable for MainMenu {
    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(index) = self.list.handle(ctx.input) else {
            return;
        };
        let (choice, _, _) = CHOICES[index];
        log::info!("Main menu: {choice:?}");
        match choice {
            Choice::StartGame => ctx.switch_screen(STREET),
            Choice::Settings => ctx.switch_screen(SETTINGS),
            Choice::CharacterSelect => ctx.switch_screen(CHARACTER_SELECT),
            Choice::Exit => ctx.quit(),
        }
    }
}

impl LateUpdatable for MainMenu {
    fn late_update(&mut self, ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas) {
        canvas.clear(Color::BLACK);
        let labels: Vec<String> = CHOICES
            .iter()
            .map(|(_, key, fallback)| label_or(ctx.game.text(key), fallback))
            .collect();
        self.list.draw(canvas, &labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curb_core::canvas::DrawList;
    use curb_core::frame::{FrameInput, FrameRequest};
    use curb_core::input::Key;
    use curb_core::locale::Texts;
    use curb_core::settings::{GameState, Settings};
    use std::collections::BTreeMap;

    fn run(menu: &mut MainMenu, game: &GameState, input: FrameInput) -> (Vec<FrameRequest>, DrawList) {
        let mut requests = Vec::new();
        let mut canvas = DrawList::new(1280.0, 720.0);
        let mut ctx = FrameContext::new(&input, game, &mut requests);
        menu.update(&mut ctx);
        menu.late_update(&mut ctx, &mut canvas);
        (requests, canvas)
    }

    #[test]
    fn labels_come_from_locale_with_fallbacks() {
        let texts = Texts::new(
            "pt",
            BTreeMap::from([("menu.start_game".to_string(), "Iniciar".to_string())]),
        );
        let game = GameState::new(Settings::default(), texts);
        let mut menu = MainMenu::new(Vec2::new(1280.0, 720.0));
        let (_, canvas) = run(&mut menu, &game, FrameInput::idle(0.016));
        assert_eq!(
            canvas.texts().collect::<Vec<_>>(),
            vec!["Iniciar", "Settings", "Select Character", "Exit"]
        );
    }

    #[test]
    fn each_option_queues_its_request() {
        let game = GameState::default();
        let mut menu = MainMenu::new(Vec2::new(1280.0, 720.0));
        let enter = || FrameInput::idle(0.016).pressing(Key::Enter);
        let down = || FrameInput::idle(0.016).pressing(Key::Down);

        let mut seen = Vec::new();
        for _ in 0..CHOICES.len() {
            seen.extend(run(&mut menu, &game, enter()).0);
            run(&mut menu, &game, down());
        }
        assert_eq!(
            seen,
            vec![
                FrameRequest::SwitchScreen(STREET.to_string()),
                FrameRequest::SwitchScreen(SETTINGS.to_string()),
                FrameRequest::SwitchScreen(CHARACTER_SELECT.to_string()),
                FrameRequest::Quit,
            ]
        );
    }
}
