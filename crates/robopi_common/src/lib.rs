//! RoboPi Common - Shared types for the robopi arm controller
//!
//! Move codes, the move catalog and parser, error types and configuration.

pub mod catalog;
pub mod config;
pub mod error;
pub mod parser;

pub use catalog::{Move, MoveCode};
pub use config::{ArmConfig, Config, ConsoleConfig, IrcConfig};
pub use error::{ActuatorError, DanceError, MoveError};
pub use parser::{parse_duration, parse_move};
