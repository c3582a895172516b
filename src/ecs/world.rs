//! World - central registry for entities and their components

use crate::components::Category;
use crate::error::{Error, Result};

use super::component::{Column, Component, ComponentStore};
use super::entity::EntityAllocator;
use super::Entity;

/// Owns all entities and component columns of one simulation instance.
///
/// Worlds are plain values: independent instances never share state, and
/// all access is single-threaded. Callers that read component state while
/// a tick is running must serialize externally.
#[derive(Default)]
pub struct World {
    entities: EntityAllocator,
    components: ComponentStore,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Destroy an entity and detach all its components. Idempotent:
    /// returns `false` for a dead or stale handle.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        self.components.remove_all(entity.index());
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    /// Attach a component. Fails with [`Error::DuplicateComponent`] when the
    /// entity already carries one of this type, and [`Error::NoSuchEntity`]
    /// when the handle is dead.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<()> {
        if !self.entities.is_alive(entity) {
            return Err(Error::NoSuchEntity);
        }
        T::column_mut(&mut self.components).insert(entity, component, T::NAME)
    }

    /// Look up a component. `None` for absent components and dead handles.
    pub fn component<T: Component>(&self, entity: Entity) -> Option<&T> {
        T::column(&self.components).get(entity)
    }

    pub fn component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        T::column_mut(&mut self.components).get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        T::column(&self.components).has(entity)
    }

    /// Detach a component. Idempotent; `false` when nothing was attached.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> bool {
        T::column_mut(&mut self.components).remove(entity)
    }

    /// Direct access to a component column, for systems that sweep a whole
    /// type per tick.
    pub fn column<T: Component>(&self) -> &Column<T> {
        T::column(&self.components)
    }

    pub fn column_mut<T: Component>(&mut self) -> &mut Column<T> {
        T::column_mut(&mut self.components)
    }

    /// All live entities whose component set satisfies the category.
    pub fn entities_of_category(&self, category: Category) -> Vec<Entity> {
        self.entities
            .iter()
            .filter(|&entity| category.matches(self, entity))
            .collect()
    }

    /// Collect category members into a reusable buffer, avoiding a fresh
    /// allocation per tick.
    pub fn entities_of_category_into(&self, category: Category, out: &mut Vec<Entity>) {
        out.clear();
        out.extend(
            self.entities
                .iter()
                .filter(|&entity| category.matches(self, entity)),
        );
    }
}
