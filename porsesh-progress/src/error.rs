use thiserror::Error;

/// Errors surfaced by the progress subsystem.
///
/// Both variants describe programming mistakes rather than runtime
/// conditions; timer misses and late callbacks degrade silently instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProgressError {
    /// A progress handle was requested outside any provider scope.
    #[error("navigation progress used outside of a `ProgressProvider` scope")]
    OutsideProvider,
    /// The provider was built from a config that cannot drive a cycle.
    #[error("invalid progress config: {0}")]
    InvalidConfig(String),
}
