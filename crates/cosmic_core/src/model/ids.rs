//! Record identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Unique identifier for players.
    PlayerId
);
record_id!(
    /// Unique identifier for planets.
    PlanetId
);
record_id!(
    /// Unique identifier for fleet missions.
    MissionId
);
record_id!(
    /// Unique identifier for mailbox messages.
    MessageId
);
record_id!(
    /// Unique identifier for inventory boosts.
    BoostId
);
