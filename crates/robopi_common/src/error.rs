//! Error types for robopi.

use thiserror::Error;

use crate::catalog::MoveCode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("Unknown move: {joint} {direction}")]
    UnknownMove { joint: String, direction: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DanceError {
    #[error("Dance '{0}' already exists")]
    AlreadyExists(String),

    #[error("No such dance: '{0}'")]
    NoSuchDance(String),
}

#[derive(Error, Debug)]
pub enum ActuatorError {
    #[error("Robot arm not found (USB {vendor_id:04x}:{product_id:04x})")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("Move [{code}] failed: {reason}")]
    Transfer { code: MoveCode, reason: String },

    #[error("Simulated failure on actuation #{0}")]
    Simulated(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
