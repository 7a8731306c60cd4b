//! # ledge_ecs
//!
//! The entity-component core of the ledge engine. Components are plain data,
//! systems are ordered behaviour, and the [`ComponentStore`] is the only
//! shared state between them.
//!
//! This crate provides:
//!
//! - [`Entity`] and [`EntityRegistry`]: opaque identifiers and their lifetime.
//! - [`Component`] trait and [`ComponentTypeId`]: the contract all ECS data
//!   must satisfy.
//! - [`ComponentStore`]: typed storage keyed by entity and component type.
//! - [`System`] and [`Scheduler`]: priority-ordered, single-threaded tick
//!   execution with a frame-time clamp.
//! - [`EcsError`]: construction-time configuration errors.

pub mod component;
pub mod entity;
pub mod error;
pub mod schedule;
pub mod store;

pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityRegistry};
pub use error::EcsError;
pub use schedule::{DEFAULT_MAX_DT, Scheduler, System};
pub use store::ComponentStore;
