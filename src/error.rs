use thiserror::Error;

/// Errors returned by [`crate::StaticDict`] and its eviction policies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The eviction policy exists by name but has no implementation.
    ///
    /// The insert that triggered the eviction is aborted and the dictionary is left untouched.
    #[error("the {policy} eviction policy is not implemented")]
    NotImplemented { policy: &'static str },

    /// A dictionary needs room for at least one entry.
    #[error("capacity must be greater than zero")]
    InvalidCapacity,

    /// The eviction policy did not name an entry that could be removed.
    #[error("the {policy} eviction policy did not select an entry to evict")]
    NoVictim { policy: &'static str },
}
