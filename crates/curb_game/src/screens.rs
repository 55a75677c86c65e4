//! Screen ids and the factory the director builds them with.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use curb_core::assets::SpriteLoader;
use curb_core::director::ScreenFactory;
use curb_core::registry::CharacterRegistry;
use curb_core::scheduler::Subscriber;
use curb_core::settings::GameState;
use curb_core::sprite::SpriteFrame;
use curb_core::{Result, RuntimeError};
use glam::Vec2;

use crate::character_select::CharacterSelect;
use crate::main_menu::MainMenu;
use crate::main_scene::StreetScene;
use crate::settings_menu::SettingsMenu;

pub const MAIN_MENU: &str = "main_menu";
pub const SETTINGS: &str = "settings";
pub const CHARACTER_SELECT: &str = "character_select";
pub const STREET: &str = "street";

const SELECT_BACKGROUND: &str = "sprites/luxurious_building/character-selection-background.png";

pub struct Screens {
    loader: Rc<dyn SpriteLoader>,
    registry: CharacterRegistry,
    stage_path: PathBuf,
    view: Vec2,
}

impl Screens {
    pub fn new(
        loader: Rc<dyn SpriteLoader>,
        registry: CharacterRegistry,
        stage_path: PathBuf,
        view: Vec2,
    ) -> Self {
        Self {
            loader,
            registry,
            stage_path,
            view,
        }
    }

    /// The saved character when it still exists, else the first registered.
    fn player_id(&self, game: &GameState) -> Result<&'static str> {
        let saved = game.selected_character();
        if let Some(id) = saved.and_then(|s| self.registry.ids().find(|id| *id == s)) {
            return Ok(id);
        }
        if let Some(stale) = saved {
            log::warn!("Saved character '{stale}' is not registered, using the default");
        }
        self.registry
            .ids()
            .next()
            .ok_or_else(|| RuntimeError::UnknownCharacter {
                id: saved.unwrap_or_default().to_string(),
            })
    }

    fn select_background(&self) -> Option<SpriteFrame> {
        match self.loader.load_sheet(Path::new(SELECT_BACKGROUND)) {
            Ok(sheet) => Some(SpriteFrame::new((*sheet).clone())),
            Err(e) => {
                log::warn!("Character select without background: {e}");
                None
            }
        }
    }
}

impl ScreenFactory for Screens {
    fn build(&mut self, id: &str, game: &GameState) -> Result<Subscriber> {
        match id {
            MAIN_MENU => Ok(Subscriber::with_late(MainMenu::new(self.view))),
            SETTINGS => Ok(Subscriber::with_late(SettingsMenu::new(self.view))),
            CHARACTER_SELECT => {
                let roster = self.registry.build_all(self.loader.as_ref());
                Ok(Subscriber::with_late(CharacterSelect::new(
                    self.view,
                    roster,
                    game.selected_character(),
                    self.select_background(),
                )))
            }
            STREET => {
                let player_id = self.player_id(game)?;
                let player = self.registry.build(player_id, self.loader.as_ref())?;
                let street = StreetScene::new(
                    Rc::clone(&self.loader),
                    self.stage_path.clone(),
                    self.view,
                    player,
                    game.settings.difficulty,
                )?;
                Ok(Subscriber::with_late(street))
            }
            _ => Err(RuntimeError::UnknownScreen { id: id.to_string() }),
        }
    }
}
