use thiserror::Error;

/// Why a command from the input layer was rejected.
///
/// Rejected commands are no-ops: nothing in the simulation changed. The
/// embedding layer decides whether to surface anything to the player
/// (usually nothing - "the action silently did nothing").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("position is outside the world bounds")]
    OutOfBounds,
    #[error("entity does not exist or has been removed")]
    NoSuchEntity,
    #[error("no path to the requested tile")]
    NoPath,
    #[error("entity cannot accept movement commands")]
    NotCommandable,
}
