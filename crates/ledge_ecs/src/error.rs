//! ECS configuration errors.
//!
//! These surface when a level is being built or a schedule is being
//! assembled. Nothing inside a tick returns them: a missing component there
//! simply means the entity does not take part.

use crate::entity::Entity;

/// Errors raised while populating a store or assembling a schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The entity was never created or has been destroyed.
    #[error("{0} does not exist")]
    NoSuchEntity(Entity),

    /// The entity already holds a component of this type.
    #[error("{entity} already has a {component} component")]
    DuplicateComponent {
        /// The entity that was targeted.
        entity: Entity,
        /// The component's type name.
        component: &'static str,
    },

    /// Two distinct Rust types report the same component type name.
    #[error("component type name {0:?} is used by more than one type")]
    TypeNameCollision(&'static str),

    /// A system with the same name is already scheduled.
    #[error("a system named {0:?} is already scheduled")]
    DuplicateSystem(String),
}
