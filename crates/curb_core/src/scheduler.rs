//! Two-phase frame dispatch.
//!
//! Every tick runs `update` on all subscribers, in subscription order, and
//! only then `late_update`. Subscribers that draw implement
//! [`LateUpdatable`]; the rest are registered as [`Subscriber::UpdateOnly`]
//! and skipped in the second phase.
//!
//! The subscriber list is never touched while a phase iterates. Anything a
//! subscriber wants to change goes through
//! [`FrameContext::request`](crate::frame::FrameContext::request) and is
//! applied at the frame boundary.

use crate::canvas::Canvas;
use crate::frame::FrameContext;

pub trait Updatable {
    fn update(&mut self, ctx: &mut FrameContext<'_>);

    /// Live entity count, reported by the debug overlay.
    fn entity_count(&self) -> usize {
        0
    }
}

pub trait LateUpdatable: Updatable {
    fn late_update(&mut self, ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas);
}

pub enum Subscriber {
    UpdateOnly(Box<dyn Updatable>),
    WithLate(Box<dyn LateUpdatable>),
}

impl Subscriber {
    pub fn update_only(subscriber: impl Updatable + 'static) -> Self {
        Self::UpdateOnly(Box::new(subscriber))
    }

    pub fn with_late(subscriber: impl LateUpdatable + 'static) -> Self {
        Self::WithLate(Box::new(subscriber))
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) {
        match self {
            Self::UpdateOnly(inner) => inner.update(ctx),
            Self::WithLate(inner) => inner.update(ctx),
        }
    }

    /// No-op for update-only subscribers.
    pub fn late_update(&mut self, ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas) {
        if let Self::WithLate(inner) = self {
            inner.late_update(ctx, canvas);
        }
    }

    pub fn has_late_update(&self) -> bool {
        matches!(self, Self::WithLate(_))
    }

    pub fn entity_count(&self) -> usize {
        match self {
            Self::UpdateOnly(inner) => inner.entity_count(),
            Self::WithLate(inner) => inner.entity_count(),
        }
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpdateOnly(_) => f.write_str("Subscriber::UpdateOnly"),
            Self::WithLate(_) => f.write_str("Subscriber::WithLate"),
        }
    }
}

/// Ordered, duplicate-free set of subscribers keyed by name.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    subscribers: Vec<(String, Subscriber)>,
    revision: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false, dropping `subscriber`, if `key` is already present.
    pub fn subscribe(&mut self, key: impl Into<String>, subscriber: Subscriber) -> bool {
        let key = key.into();
        if self.contains(&key) {
            log::warn!("Scheduler: '{key}' is already subscribed");
            return false;
        }
        log::debug!("Scheduler: subscribed '{key}'");
        self.subscribers.push((key, subscriber));
        self.revision += 1;
        true
    }

    pub fn unsubscribe(&mut self, key: &str) -> Option<Subscriber> {
        let index = self.subscribers.iter().position(|(k, _)| k == key)?;
        let (_, subscriber) = self.subscribers.remove(index);
        log::debug!("Scheduler: unsubscribed '{key}'");
        self.revision += 1;
        Some(subscriber)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.subscribers.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.subscribers.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Bumped by every successful subscribe or unsubscribe.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn entity_count(&self) -> usize {
        self.subscribers.iter().map(|(_, s)| s.entity_count()).sum()
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber.update(ctx);
        }
    }

    pub fn late_update(&mut self, ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber.late_update(ctx, canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;
    use crate::frame::FrameInput;
    use crate::settings::GameState;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Updatable for Recorder {
        fn update(&mut self, _ctx: &mut FrameContext<'_>) {
            self.log.borrow_mut().push(format!("{}.update", self.name));
        }
    }

    impl LateUpdatable for Recorder {
        fn late_update(&mut self, _ctx: &mut FrameContext<'_>, _canvas: &mut dyn Canvas) {
            self.log.borrow_mut().push(format!("{}.late", self.name));
        }
    }

    fn run_frame(scheduler: &mut FrameScheduler) {
        let input = FrameInput::idle(1.0 / 60.0);
        let game = GameState::default();
        let mut requests = Vec::new();
        let mut ctx = FrameContext::new(&input, &game, &mut requests);
        let mut canvas = DrawList::new(10.0, 10.0);
        scheduler.update(&mut ctx);
        scheduler.late_update(&mut ctx, &mut canvas);
    }

    #[test]
    fn all_updates_run_before_any_late_update() {
        let log: Log = Rc::default();
        let mut scheduler = FrameScheduler::new();
        for name in ["menu", "scene"] {
            scheduler.subscribe(
                name,
                Subscriber::with_late(Recorder {
                    name,
                    log: Rc::clone(&log),
                }),
            );
        }
        run_frame(&mut scheduler);
        assert_eq!(
            *log.borrow(),
            vec!["menu.update", "scene.update", "menu.late", "scene.late"]
        );
    }

    #[test]
    fn update_only_subscribers_are_skipped_in_late_phase() {
        let log: Log = Rc::default();
        let mut scheduler = FrameScheduler::new();
        scheduler.subscribe(
            "audio",
            Subscriber::update_only(Recorder {
                name: "audio",
                log: Rc::clone(&log),
            }),
        );
        run_frame(&mut scheduler);
        assert_eq!(*log.borrow(), vec!["audio.update"]);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let log: Log = Rc::default();
        let mut scheduler = FrameScheduler::new();
        let make = || {
            Subscriber::with_late(Recorder {
                name: "menu",
                log: Rc::clone(&log),
            })
        };
        assert!(scheduler.subscribe("menu", make()));
        assert!(!scheduler.subscribe("menu", make()));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.revision(), 1);

        assert!(scheduler.unsubscribe("menu").is_some());
        assert!(scheduler.unsubscribe("menu").is_none());
        assert_eq!(scheduler.revision(), 2);
        assert!(scheduler.is_empty());
    }
}
