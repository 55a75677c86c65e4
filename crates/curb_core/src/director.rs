//! Top-level frame driver.
//!
//! The director owns the scheduler, the fade controller and the game state.
//! Each frame it either runs the fade (dispatch suspended) or runs both
//! scheduler phases, and then applies the requests subscribers queued.

use crate::canvas::Canvas;
use crate::error::Result;
use crate::frame::{FrameContext, FrameInput, FrameRequest};
use crate::locale::TextProvider;
use crate::scheduler::{FrameScheduler, Subscriber};
use crate::settings::{GameState, SettingsPatch, SettingsStore};
use crate::transition::{FadeEvent, FadeState, MenuTransition};

/// Builds screens by id. Called at the frame boundary, never mid-dispatch.
pub trait ScreenFactory {
    fn build(&mut self, id: &str, game: &GameState) -> Result<Subscriber>;
}

pub struct Director<F: ScreenFactory> {
    scheduler: FrameScheduler,
    transition: MenuTransition,
    game: GameState,
    settings: Box<dyn SettingsStore>,
    texts: Box<dyn TextProvider>,
    factory: F,
    active_screen: Option<String>,
    requests: Vec<FrameRequest>,
    quit: bool,
}

impl<F: ScreenFactory> Director<F> {
    /// Load settings and the matching texts. A store that cannot be read
    /// falls back to default settings.
    pub fn new(
        factory: F,
        settings: Box<dyn SettingsStore>,
        texts: Box<dyn TextProvider>,
        fade_step: u8,
    ) -> Self {
        let loaded = settings.load().unwrap_or_else(|e| {
            log::error!("{e}; using default settings");
            Default::default()
        });
        let game = GameState::new(loaded.clone(), texts.load(&loaded.language));
        Self {
            scheduler: FrameScheduler::new(),
            transition: MenuTransition::new(fade_step),
            game,
            settings,
            texts,
            factory,
            active_screen: None,
            requests: Vec::new(),
            quit: false,
        }
    }

    /// Subscribe the first screen immediately, without a fade.
    pub fn start(&mut self, screen: &str) -> Result<()> {
        let subscriber = self.factory.build(screen, &self.game)?;
        if let Some(old) = self.active_screen.take() {
            self.scheduler.unsubscribe(&old);
        }
        self.scheduler.subscribe(screen, subscriber);
        self.active_screen = Some(screen.to_string());
        log::info!("Director: started on '{screen}'");
        Ok(())
    }

    pub fn frame(&mut self, input: &FrameInput, canvas: &mut dyn Canvas) {
        if self.transition.is_active() {
            if let Some(FadeEvent::Swapped(key)) = self.transition.tick(&mut self.scheduler, canvas) {
                self.active_screen = Some(key);
            }
        } else {
            let mut ctx = FrameContext::new(input, &self.game, &mut self.requests);
            self.scheduler.update(&mut ctx);
            self.scheduler.late_update(&mut ctx, canvas);
        }
        self.apply_requests();
    }

    fn apply_requests(&mut self) {
        for request in std::mem::take(&mut self.requests) {
            match request {
                FrameRequest::SwitchScreen(id) => self.switch_screen(&id),
                FrameRequest::UpdateSettings(patch) => self.update_settings(patch),
                FrameRequest::SelectCharacter(id) => {
                    log::info!("Director: selected character '{id}'");
                    self.update_settings(SettingsPatch::selected_character(id));
                }
                FrameRequest::Quit => {
                    log::info!("Director: quit requested");
                    self.quit = true;
                }
            }
        }
    }

    fn switch_screen(&mut self, id: &str) {
        if self.transition.is_active() {
            log::warn!("Director: ignoring switch to '{id}' during a fade");
            return;
        }
        match self.factory.build(id, &self.game) {
            Ok(subscriber) => {
                log::info!("Director: switching to '{id}'");
                self.transition
                    .start(self.active_screen.clone(), id, subscriber);
            }
            Err(e) => log::error!("Director: cannot switch to '{id}': {e}"),
        }
    }

    fn update_settings(&mut self, patch: SettingsPatch) {
        let language_changed = patch
            .language
            .as_ref()
            .is_some_and(|lang| *lang != self.game.settings.language);
        self.game.settings.apply(&patch);
        if language_changed {
            self.game.texts = self.texts.load(&self.game.settings.language);
        }
        if let Err(e) = self.settings.save(&patch) {
            log::error!("Director: settings not persisted: {e}");
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn fade_state(&self) -> FadeState {
        self.transition.state()
    }

    pub fn fade_opacity(&self) -> u8 {
        self.transition.opacity()
    }

    pub fn active_screen(&self) -> Option<&str> {
        self.active_screen.as_deref()
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
