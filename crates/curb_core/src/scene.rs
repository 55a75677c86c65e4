//! Ordered entity container.
//!
//! Insertion order is update order and draw order: later entities draw on
//! top. There is no other dependency ordering between entities.

use crate::canvas::Canvas;
use crate::collision::Collider;
use crate::entity::{Entity, EntityId, UpdateParams};
use crate::frame::{FrameContext, FrameInput};
use crate::scheduler::{LateUpdatable, Updatable};

#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<(EntityId, Entity)>,
    next_id: u64,
    scroll_dx: f32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity. Every call yields a fresh id, so adding equal
    /// entities twice gives two independent members.
    pub fn add_object(&mut self, entity: Entity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        log::debug!("Scene: added '{}' as {id}", entity.name);
        self.entities.push((id, entity));
        id
    }

    pub fn remove_object(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|(e, _)| *e == id)?;
        let (_, entity) = self.entities.remove(index);
        log::debug!("Scene: removed '{}' ({id})", entity.name);
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|(e, _)| *e == id).map(|(_, entity)| entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|(e, _)| *e == id)
            .map(|(_, entity)| entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, entity)| (*id, entity))
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Parallax offset handed to vehicles on the next update.
    pub fn set_scroll(&mut self, scroll_dx: f32) {
        self.scroll_dx = scroll_dx;
    }

    pub fn colliders(&self) -> Vec<Collider> {
        self.entities
            .iter()
            .filter_map(|(id, entity)| entity.collider(*id))
            .collect()
    }

    /// Update every entity in insertion order, then drop expired ones.
    ///
    /// Colliders are captured once before the pass, so every entity resolves
    /// against the same snapshot regardless of its position in the order.
    pub fn update(&mut self, input: &FrameInput) {
        let colliders = self.colliders();
        let params = UpdateParams {
            input,
            colliders: &colliders,
            scroll_dx: self.scroll_dx,
        };
        for (id, entity) in &mut self.entities {
            entity.update(*id, &params);
        }

        self.entities.retain(|(id, entity)| {
            let expired = entity.is_expired();
            if expired {
                log::debug!("Scene: '{}' ({id}) expired", entity.name);
            }
            !expired
        });
    }

    pub fn late_update(&mut self, canvas: &mut dyn Canvas) {
        for (_, entity) in &mut self.entities {
            entity.late_update(canvas);
        }
    }
}

impl Updatable for Scene {
    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        Scene::update(self, ctx.input);
    }

    fn entity_count(&self) -> usize {
        self.len()
    }
}

impl LateUpdatable for Scene {
    fn late_update(&mut self, _ctx: &mut FrameContext<'_>, canvas: &mut dyn Canvas) {
        Scene::late_update(self, canvas);
    }
}
