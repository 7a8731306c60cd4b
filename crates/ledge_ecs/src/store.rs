//! Typed component storage.
//!
//! The [`ComponentStore`] maps each [`ComponentTypeId`] to a homogeneous
//! column holding every instance of that type, and keeps a per-entity index
//! of which types are present. Columns are dense: values sit in a `Vec` with
//! a parallel entity list and an entity-to-row map, and removal swap-removes
//! the row so iteration never walks holes.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityRegistry};
use crate::error::EcsError;

/// Type-erased view of a column, used for whole-entity removal.
trait ErasedColumn: Any {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for one component type.
struct Column<T> {
    /// `entities[i]` owns `values[i]`.
    entities: Vec<Entity>,
    values: Vec<T>,
    rows: HashMap<Entity, usize>,
}

impl<T: Component> Column<T> {
    fn new() -> Self {
        Self {
            entities: Vec::new(),
            values: Vec::new(),
            rows: HashMap::new(),
        }
    }

    fn contains(&self, entity: Entity) -> bool {
        self.rows.contains_key(&entity)
    }

    /// Insert or overwrite, returning the previous value.
    fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(&row) = self.rows.get(&entity) {
            return Some(std::mem::replace(&mut self.values[row], value));
        }
        self.rows.insert(entity, self.values.len());
        self.entities.push(entity);
        self.values.push(value);
        None
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        self.rows.get(&entity).map(|&row| &self.values[row])
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.rows.get(&entity).map(|&row| &mut self.values[row])
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        let row = self.rows.remove(&entity)?;
        self.entities.swap_remove(row);
        let value = self.values.swap_remove(row);
        if let Some(&moved) = self.entities.get(row) {
            self.rows.insert(moved, row);
        }
        Some(value)
    }

    fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.values.iter())
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.values.iter_mut())
    }
}

impl<T: Component> ErasedColumn for Column<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns every entity and every component instance in a simulation.
///
/// Lookups for a component an entity does not have return `None`; callers
/// treat that as "this entity does not take part" rather than as a failure.
/// Borrowing rules make it impossible to mutate a column while iterating it;
/// systems that need to write other types while walking one take a snapshot
/// of ids with [`ComponentStore::entities_with`].
pub struct ComponentStore {
    registry: EntityRegistry,
    columns: HashMap<ComponentTypeId, Box<dyn ErasedColumn>>,
    /// Which component types each live entity holds.
    entity_types: HashMap<Entity, BTreeSet<ComponentTypeId>>,
    /// Entities queued for removal at the next [`ComponentStore::apply_deferred`].
    pending_destroy: Vec<Entity>,
}

impl ComponentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: EntityRegistry::new(),
            columns: HashMap::new(),
            entity_types: HashMap::new(),
            pending_destroy: Vec::new(),
        }
    }

    /// Issue a new entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.registry.create();
        self.entity_types.insert(entity, BTreeSet::new());
        entity
    }

    /// Returns the entity registry.
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Returns `true` if the entity exists and has not been destroyed.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.registry.is_alive(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Attach a component to an entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::NoSuchEntity`] if the entity is not alive,
    /// [`EcsError::DuplicateComponent`] if it already holds a `T`, and
    /// [`EcsError::TypeNameCollision`] if another type already claimed `T`'s
    /// type name.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        let column = self.prepare_column::<T>(entity)?;
        if column.contains(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: T::type_name(),
            });
        }
        column.insert(entity, component);
        self.index(entity, T::component_type_id());
        Ok(())
    }

    /// Attach or overwrite a component, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`EcsError::NoSuchEntity`] or [`EcsError::TypeNameCollision`], as for
    /// [`ComponentStore::add_component`].
    pub fn replace_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<Option<T>, EcsError> {
        let previous = self.prepare_column::<T>(entity)?.insert(entity, component);
        self.index(entity, T::component_type_id());
        Ok(previous)
    }

    fn prepare_column<T: Component>(&mut self, entity: Entity) -> Result<&mut Column<T>, EcsError> {
        if !self.registry.is_alive(entity) {
            return Err(EcsError::NoSuchEntity(entity));
        }
        self.columns
            .entry(T::component_type_id())
            .or_insert_with(|| Box::new(Column::<T>::new()))
            .as_any_mut()
            .downcast_mut::<Column<T>>()
            .ok_or(EcsError::TypeNameCollision(T::type_name()))
    }

    fn index(&mut self, entity: Entity, type_id: ComponentTypeId) {
        self.entity_types.entry(entity).or_default().insert(type_id);
    }

    fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.columns
            .get(&T::component_type_id())?
            .as_any()
            .downcast_ref::<Column<T>>()
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut Column<T>> {
        self.columns
            .get_mut(&T::component_type_id())?
            .as_any_mut()
            .downcast_mut::<Column<T>>()
    }

    /// The entity's `T`, if it has one.
    #[must_use]
    pub fn component_for<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.column::<T>()?.get(entity)
    }

    /// Mutable access to the entity's `T`, if it has one.
    pub fn component_for_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(entity)
    }

    /// Returns `true` if the entity holds a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.column::<T>().is_some_and(|c| c.contains(entity))
    }

    /// Every `(entity, component)` pair of type `T`. The order is the
    /// column's dense order and is stable for the duration of the borrow.
    pub fn all_with<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.column::<T>().into_iter().flat_map(Column::iter)
    }

    /// Mutable variant of [`ComponentStore::all_with`].
    pub fn all_with_mut<T: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.column_mut::<T>().into_iter().flat_map(Column::iter_mut)
    }

    /// Snapshot of the entities holding a `T`, in the same order as
    /// [`ComponentStore::all_with`].
    #[must_use]
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.column::<T>()
            .map(|c| c.entities.clone())
            .unwrap_or_default()
    }

    /// Number of `T` instances stored.
    #[must_use]
    pub fn count<T: Component>(&self) -> usize {
        self.column::<T>().map_or(0, |c| c.len())
    }

    /// Component types currently attached to an entity.
    #[must_use]
    pub fn component_types(&self, entity: Entity) -> Vec<ComponentTypeId> {
        self.entity_types
            .get(&entity)
            .map(|types| types.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Detach and return the entity's `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let removed = self.column_mut::<T>()?.remove(entity)?;
        if let Some(types) = self.entity_types.get_mut(&entity) {
            types.remove(&T::component_type_id());
        }
        Some(removed)
    }

    /// Remove an entity and all its components immediately.
    ///
    /// Returns `true` if the entity was alive.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.registry.destroy(entity) {
            return false;
        }
        if let Some(types) = self.entity_types.remove(&entity) {
            for type_id in types {
                if let Some(column) = self.columns.get_mut(&type_id) {
                    column.remove_entity(entity);
                }
            }
        }
        debug!(%entity, "entity destroyed");
        true
    }

    /// Queue an entity for removal at the start of the next tick.
    ///
    /// Systems use this instead of [`ComponentStore::destroy_entity`] so that
    /// no column shrinks under another system's id snapshot mid-tick.
    pub fn defer_destroy(&mut self, entity: Entity) {
        if self.registry.is_alive(entity) && !self.pending_destroy.contains(&entity) {
            self.pending_destroy.push(entity);
        }
    }

    /// Apply every queued removal. Returns how many entities were destroyed.
    pub fn apply_deferred(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_destroy);
        pending
            .into_iter()
            .filter(|&entity| self.destroy_entity(entity))
            .count()
    }
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instances: usize = self.columns.values().map(|c| c.len()).sum();
        f.debug_struct("ComponentStore")
            .field("entities", &self.registry.len())
            .field("columns", &self.columns.len())
            .field("instances", &instances)
            .field("pending_destroy", &self.pending_destroy.len())
            .finish()
    }
}
