//! Move parser - turns `<joint> <direction> <seconds>` into a [`Move`].

use std::time::Duration;
use tracing::debug;

use crate::catalog::{self, Move};
use crate::error::MoveError;

/// Parse a move from its three textual arguments.
///
/// The joint/direction pair must be in the catalog. The duration is
/// permissive: see [`parse_duration`].
pub fn parse_move(joint: &str, direction: &str, duration: &str) -> Result<Move, MoveError> {
    let code = catalog::lookup(joint, direction).ok_or_else(|| MoveError::UnknownMove {
        joint: joint.to_string(),
        direction: direction.to_string(),
    })?;

    Ok(Move::new(code, parse_duration(duration)))
}

/// Parse decimal seconds.
///
/// Anything that is not a finite, non-negative number becomes a zero
/// duration instead of failing the move.
pub fn parse_duration(text: &str) -> Duration {
    match text.parse::<f64>().map(Duration::try_from_secs_f64) {
        Ok(Ok(duration)) => duration,
        _ => {
            debug!("Unusable duration {:?}, treating as zero", text);
            Duration::ZERO
        }
    }
}
