// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity identity and the fixed scheduling hierarchy.
//!
//! The hierarchy is exactly four levels deep:
//!
//! ```text
//! Semester
//!   └── GameSessionSchedule
//!         └── GameSession
//!               └── Booking
//! ```
//!
//! Every child holds exactly one reference to its parent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Generates a typed row id newtype.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database row id.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw database row id.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", $label, self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`crate::Semester`].
    SemesterId,
    "semester"
);
entity_id!(
    /// Identifier of a [`crate::GameSessionSchedule`].
    ScheduleId,
    "schedule"
);
entity_id!(
    /// Identifier of a [`crate::GameSession`].
    GameSessionId,
    "game session"
);
entity_id!(
    /// Identifier of a [`crate::Booking`].
    BookingId,
    "booking"
);

/// The four entity types of the scheduling hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Semester,
    Schedule,
    GameSession,
    Booking,
}

impl EntityKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Semester => "semester",
            Self::Schedule => "schedule",
            Self::GameSession => "game session",
            Self::Booking => "booking",
        }
    }

    /// Returns the kind of the parent entity, or `None` for the root.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Semester => None,
            Self::Schedule => Some(Self::Semester),
            Self::GameSession => Some(Self::Schedule),
            Self::Booking => Some(Self::GameSession),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type-erased reference to a single entity, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl EntityRef {
    #[must_use]
    pub const fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

impl From<SemesterId> for EntityRef {
    fn from(id: SemesterId) -> Self {
        Self::new(EntityKind::Semester, id.value())
    }
}

impl From<ScheduleId> for EntityRef {
    fn from(id: ScheduleId) -> Self {
        Self::new(EntityKind::Schedule, id.value())
    }
}

impl From<GameSessionId> for EntityRef {
    fn from(id: GameSessionId) -> Self {
        Self::new(EntityKind::GameSession, id.value())
    }
}

impl From<BookingId> for EntityRef {
    fn from(id: BookingId) -> Self {
        Self::new(EntityKind::Booking, id.value())
    }
}

/// An entity of the scheduling hierarchy.
///
/// `ParentId` is `()` for the root (`Semester`), which makes
/// "find by parent" on the root a plain listing.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    /// The typed row id of this entity.
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + Into<EntityRef> + Send + Sync;
    /// The typed row id of the owning parent.
    type ParentId: Copy + fmt::Debug + Send + Sync;
    /// Validated input used to create a new row.
    type New: fmt::Debug + Send + Sync;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;

    fn parent_id(&self) -> Self::ParentId;
}
