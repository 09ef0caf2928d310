//! Actuator abstraction
//!
//! The sequencer only needs "apply this raw move code". Two providers:
//! - `UsbArm` drives the real arm over usbfs
//! - `SimulatedArm` logs and records every actuation, and can be told to fail
//!
//! The provider is picked once at startup by [`open`].

mod usb;

pub use usb::UsbArm;

use async_trait::async_trait;
use robopi_common::catalog;
use robopi_common::{ActuatorError, ArmConfig, MoveCode};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

// ============================================================================
// Actuator Trait
// ============================================================================

/// Capability to energise the arm with one raw move code.
///
/// Holding a move and returning to neutral is the sequencer's job.
#[async_trait]
pub trait Actuator: Send {
    async fn apply_raw(&mut self, code: MoveCode) -> Result<(), ActuatorError>;

    /// Short description for logs
    fn name(&self) -> String;
}

/// Open the USB arm, falling back to a simulated one if it is unavailable.
pub fn open(config: &ArmConfig, simulate: bool) -> Box<dyn Actuator> {
    if simulate || config.simulate {
        info!("Using simulated arm");
        return Box::new(SimulatedArm::new());
    }

    match UsbArm::open(config) {
        Ok(arm) => {
            info!("Using {}", arm.name());
            Box::new(arm)
        }
        Err(e) => {
            warn!("Unable to setup robot arm ({}). Using a simulated arm instead.", e);
            Box::new(SimulatedArm::new())
        }
    }
}

// ============================================================================
// Simulated Arm
// ============================================================================

/// One actuation seen by the simulated arm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actuation {
    pub code: MoveCode,
    /// Offset from the arm's creation
    pub at: Duration,
    pub ok: bool,
}

/// Shared view of everything a `SimulatedArm` was asked to do
#[derive(Debug, Clone, Default)]
pub struct ActuationLog(Arc<Mutex<Vec<Actuation>>>);

impl ActuationLog {
    pub fn entries(&self) -> Vec<Actuation> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn codes(&self) -> Vec<MoveCode> {
        self.entries().into_iter().map(|a| a.code).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }

    fn push(&self, actuation: Actuation) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(actuation);
    }
}

/// Arm stand-in used when no device is present, and in tests
pub struct SimulatedArm {
    started: Instant,
    log: ActuationLog,
    calls: usize,
    fail_on: Option<usize>,
}

impl SimulatedArm {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            log: ActuationLog::default(),
            calls: 0,
            fail_on: None,
        }
    }

    /// Fail the `nth` call to `apply_raw` (1-based), reset included.
    pub fn failing_on(mut self, nth: usize) -> Self {
        self.fail_on = Some(nth);
        self
    }

    pub fn log(&self) -> ActuationLog {
        self.log.clone()
    }
}

impl Default for SimulatedArm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Actuator for SimulatedArm {
    async fn apply_raw(&mut self, code: MoveCode) -> Result<(), ActuatorError> {
        self.calls += 1;
        let ok = self.fail_on != Some(self.calls);

        self.log.push(Actuation {
            code,
            at: self.started.elapsed(),
            ok,
        });

        if !ok {
            return Err(ActuatorError::Simulated(self.calls));
        }
        info!("Simulated arm: {}", catalog::describe(code));
        Ok(())
    }

    fn name(&self) -> String {
        "simulated arm".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_arm_records_calls() {
        let mut arm = SimulatedArm::new();
        let log = arm.log();

        arm.apply_raw(MoveCode::GRIP_OPEN).await.unwrap();
        arm.apply_raw(MoveCode::RESET).await.unwrap();

        assert_eq!(log.codes(), vec![MoveCode::GRIP_OPEN, MoveCode::RESET]);
        assert!(log.entries().iter().all(|a| a.ok));
    }

    #[tokio::test]
    async fn test_simulated_arm_fails_on_nth_call() {
        let mut arm = SimulatedArm::new().failing_on(2);
        let log = arm.log();

        assert!(arm.apply_raw(MoveCode::BASE_LEFT).await.is_ok());
        let err = arm.apply_raw(MoveCode::BASE_RIGHT).await.unwrap_err();
        assert!(matches!(err, ActuatorError::Simulated(2)));
        assert!(arm.apply_raw(MoveCode::RESET).await.is_ok());

        let ok: Vec<bool> = log.entries().iter().map(|a| a.ok).collect();
        assert_eq!(ok, vec![true, false, true]);
    }

    #[test]
    fn test_open_simulated_when_requested() {
        let arm = open(&ArmConfig::default(), true);
        assert_eq!(arm.name(), "simulated arm");
    }
}
