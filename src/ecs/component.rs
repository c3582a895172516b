//! Component storage: one dense column per component type
//!
//! The component set is closed. Each type gets its own generation-checked
//! column inside [`ComponentStore`], indexed by entity slot, instead of a
//! type-erased `TypeId` map. Lookups are compile-time typed and iteration
//! walks a single contiguous column.

use crate::components::{CircleBound, Particle};
use crate::error::{Error, Result};

use super::Entity;

/// Marker trait wiring a component type to its column in the store.
///
/// Implemented only by the crate's component types; the set is closed by
/// construction.
pub trait Component: Sized + 'static {
    /// Human-readable type tag used in duplicate-component errors.
    const NAME: &'static str;

    fn column(store: &ComponentStore) -> &Column<Self>;
    fn column_mut(store: &mut ComponentStore) -> &mut Column<Self>;
}

struct Cell<T> {
    generation: u32,
    value: T,
}

/// Per-type storage column, indexed by entity slot.
///
/// Each cell remembers the generation it was written for, so stale handles
/// miss even after their slot has been recycled.
pub struct Column<T> {
    cells: Vec<Option<Cell<T>>>,
    len: usize,
}

impl<T> Default for Column<T> {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Column<T> {
    /// Insert a value for the entity. At most one value per entity;
    /// a second insert fails instead of overwriting.
    pub fn insert(&mut self, entity: Entity, value: T, type_name: &'static str) -> Result<()> {
        let index = entity.index() as usize;
        if index >= self.cells.len() {
            self.cells.resize_with(index + 1, || None);
        }
        if let Some(cell) = &self.cells[index] {
            if cell.generation == entity.generation() {
                return Err(Error::DuplicateComponent { type_name });
            }
        }
        // A leftover cell from a stale generation is replaced, not counted.
        let previous = self.cells[index].replace(Cell {
            generation: entity.generation(),
            value,
        });
        if previous.is_none() {
            self.len += 1;
        }
        Ok(())
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.cells
            .get(entity.index() as usize)?
            .as_ref()
            .filter(|cell| cell.generation == entity.generation())
            .map(|cell| &cell.value)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.cells
            .get_mut(entity.index() as usize)?
            .as_mut()
            .filter(|cell| cell.generation == entity.generation())
            .map(|cell| &mut cell.value)
    }

    pub fn has(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Remove the entity's value. Idempotent.
    pub fn remove(&mut self, entity: Entity) -> bool {
        if let Some(slot) = self.cells.get_mut(entity.index() as usize) {
            if slot.as_ref().map(|cell| cell.generation) == Some(entity.generation()) {
                *slot = None;
                self.len -= 1;
                return true;
            }
        }
        false
    }

    /// Detach whatever occupies the slot, regardless of generation.
    /// Used when an entity is destroyed and its handle is already stale.
    pub(crate) fn remove_slot(&mut self, index: u32) {
        if let Some(slot) = self.cells.get_mut(index as usize) {
            if slot.take().is_some() {
                self.len -= 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.cells.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|cell| (Entity::new(index as u32, cell.generation), &cell.value))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.cells
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_mut()
                    .map(|cell| (Entity::new(index as u32, cell.generation), &mut cell.value))
            })
    }
}

/// The closed set of component columns owned by a world.
#[derive(Default)]
pub struct ComponentStore {
    pub(crate) particles: Column<Particle>,
    pub(crate) bounds: Column<CircleBound>,
}

impl ComponentStore {
    /// Detach every component occupying the given slot.
    pub(crate) fn remove_all(&mut self, index: u32) {
        self.particles.remove_slot(index);
        self.bounds.remove_slot(index);
    }
}

impl Component for Particle {
    const NAME: &'static str = "particle";

    fn column(store: &ComponentStore) -> &Column<Self> {
        &store.particles
    }

    fn column_mut(store: &mut ComponentStore) -> &mut Column<Self> {
        &mut store.particles
    }
}

impl Component for CircleBound {
    const NAME: &'static str = "circle_bound";

    fn column(store: &ComponentStore) -> &Column<Self> {
        &store.bounds
    }

    fn column_mut(store: &mut ComponentStore) -> &mut Column<Self> {
        &mut store.bounds
    }
}
