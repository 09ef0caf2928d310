//! Move sequencer - plays an ordered list of moves on the arm.
//!
//! Each move is applied, then held for its duration before the next one.
//! The first failed actuation aborts the rest. Whatever happens, the arm is
//! sent the reset code before `execute` returns. The caller is blocked for
//! the whole sequence; there is no cancellation.

use robopi_common::catalog;
use robopi_common::{ActuatorError, Move, MoveCode};
use tracing::{debug, error, info, warn};

use crate::actuator::Actuator;

pub struct MoveSequencer {
    actuator: Box<dyn Actuator>,
}

impl MoveSequencer {
    pub fn new(actuator: Box<dyn Actuator>) -> Self {
        Self { actuator }
    }

    /// Play `moves` in order, then reset.
    ///
    /// Returns the first actuation error. A failed reset is only logged.
    pub async fn execute(&mut self, moves: &[Move]) -> Result<(), ActuatorError> {
        info!("Playing {} move(s) on {}", moves.len(), self.actuator.name());

        let mut outcome = Ok(());
        for (i, mv) in moves.iter().enumerate() {
            debug!(
                "Move {}/{}: {} for {:?}",
                i + 1,
                moves.len(),
                catalog::describe(mv.code),
                mv.duration
            );

            if let Err(e) = self.actuator.apply_raw(mv.code).await {
                error!("Move {}/{} failed, aborting: {}", i + 1, moves.len(), e);
                outcome = Err(e);
                break;
            }

            if !mv.duration.is_zero() {
                tokio::time::sleep(mv.duration).await;
            }
        }

        if let Err(e) = self.actuator.apply_raw(MoveCode::RESET).await {
            warn!("Failed to reset arm: {}", e);
        }

        outcome
    }
}
