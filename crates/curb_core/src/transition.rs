//! Fade-out / swap / fade-in between screens.
//!
//! While a fade runs the director calls [`MenuTransition::tick`] instead of
//! dispatching to subscribers, so neither the outgoing nor the incoming
//! screen sees input until the fade completes.

use crate::canvas::{Canvas, Color, Rect};
use crate::scheduler::{FrameScheduler, Subscriber};

pub const MAX_OPACITY: u8 = 255;
pub const DEFAULT_FADE_STEP: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    Idle,
    FadingOut,
    FadingIn,
}

/// Reported by [`MenuTransition::tick`] on the ticks where something changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FadeEvent {
    /// The successor was subscribed under this key.
    Swapped(String),
    Finished,
}

struct Pending {
    outgoing: Option<String>,
    key: String,
    successor: Subscriber,
}

pub struct MenuTransition {
    state: FadeState,
    opacity: u8,
    step: u8,
    pending: Option<Pending>,
}

impl MenuTransition {
    pub fn new(step: u8) -> Self {
        Self {
            state: FadeState::Idle,
            opacity: 0,
            step: step.max(1),
            pending: None,
        }
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn is_active(&self) -> bool {
        self.state != FadeState::Idle
    }

    /// Ticks one full fade takes, out and back in.
    pub fn total_ticks(&self) -> u32 {
        2 * u32::from(MAX_OPACITY).div_ceil(u32::from(self.step))
    }

    /// Begin fading from `outgoing` to `successor`. Refused while another
    /// fade is in flight.
    pub fn start(
        &mut self,
        outgoing: Option<String>,
        key: impl Into<String>,
        successor: Subscriber,
    ) -> bool {
        if self.is_active() {
            log::warn!("Transition: fade already in progress, request ignored");
            return false;
        }
        let key = key.into();
        log::info!(
            "Transition: fading out {} -> {key}",
            outgoing.as_deref().unwrap_or("<none>")
        );
        self.pending = Some(Pending {
            outgoing,
            key,
            successor,
        });
        self.state = FadeState::FadingOut;
        true
    }

    /// One fade tick: move the opacity, swap subscribers at full black, and
    /// draw the overlay.
    pub fn tick(
        &mut self,
        scheduler: &mut FrameScheduler,
        canvas: &mut dyn Canvas,
    ) -> Option<FadeEvent> {
        let event = match self.state {
            FadeState::Idle => return None,
            FadeState::FadingOut => {
                self.opacity = self.opacity.saturating_add(self.step);
                if self.opacity == MAX_OPACITY {
                    self.state = FadeState::FadingIn;
                    self.swap(scheduler)
                } else {
                    None
                }
            }
            FadeState::FadingIn => {
                self.opacity = self.opacity.saturating_sub(self.step);
                if self.opacity == 0 {
                    self.state = FadeState::Idle;
                    log::info!("Transition: fade complete");
                    Some(FadeEvent::Finished)
                } else {
                    None
                }
            }
        };
        self.draw(canvas);
        event
    }

    fn swap(&mut self, scheduler: &mut FrameScheduler) -> Option<FadeEvent> {
        let pending = self.pending.take()?;
        if let Some(outgoing) = &pending.outgoing {
            scheduler.unsubscribe(outgoing);
        }
        let key = pending.key;
        scheduler.subscribe(key.clone(), pending.successor);
        log::info!("Transition: swapped in {key}, fading in");
        Some(FadeEvent::Swapped(key))
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if self.opacity == 0 {
            return;
        }
        let size = canvas.size();
        canvas.fill_rect(
            Rect::new(0.0, 0.0, size.x, size.y),
            Color::BLACK.with_alpha(f32::from(self.opacity) / f32::from(MAX_OPACITY)),
        );
    }
}

impl Default for MenuTransition {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_STEP)
    }
}
