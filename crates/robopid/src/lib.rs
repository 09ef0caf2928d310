//! RoboPi - teach a USB robot arm to dance over IRC or the console.

pub mod actuator;
pub mod bot;
pub mod dances;
pub mod interpreter;
pub mod irc;
pub mod listeners;
pub mod sequencer;
pub mod state;
