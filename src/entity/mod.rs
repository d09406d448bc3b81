//! The member/team entity model.
//!
//! Entities are plain records; the `*Table` handles are what queries are
//! written against. A handle is `Copy` and carries the alias it is queried
//! under, so the same entity can appear twice in one statement:
//!
//! ```ignore
//! let member = MemberTable::new();
//! let member_sub = MemberTable::aliased("memberSub");
//! ```

mod member;
mod team;

pub use member::{Member, MemberTable};
pub use team::{Team, TeamTable};

use teamql_core::Entity;

/// A many-to-one reference from one entity to another.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Association<T> {
    /// No related entity.
    #[default]
    Unassigned,
    /// Only the identity of the related entity is known.
    Reference(i64),
    /// The related entity was loaded with its owner.
    Loaded(Box<T>),
}

impl<T: Entity> Association<T> {
    /// Identity of the related entity, if assigned and persisted.
    pub fn id(&self) -> Option<i64> {
        match self {
            Association::Unassigned => None,
            Association::Reference(id) => Some(*id),
            Association::Loaded(entity) => entity.id(),
        }
    }

    /// The related entity, when it was fetched together with its owner.
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Association::Loaded(entity) => Some(entity),
            _ => None,
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Association::Loaded(_))
    }
}
