//! Move catalog - the joint/direction pairs the arm understands.
//!
//! Each move is a 3-byte control payload. Byte 0 drives grip, wrist, elbow
//! and shoulder; byte 1 drives the base; byte 2 is the light (unused).
//! All zeroes de-energises every joint.

use std::fmt;
use std::time::Duration;

/// Raw control payload for one actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveCode([u8; 3]);

impl MoveCode {
    /// Neutral pattern sent after every sequence
    pub const RESET: MoveCode = MoveCode([0x00, 0x00, 0x00]);

    pub const GRIP_CLOSE: MoveCode = MoveCode([0x01, 0x00, 0x00]);
    pub const GRIP_OPEN: MoveCode = MoveCode([0x02, 0x00, 0x00]);
    pub const WRIST_UP: MoveCode = MoveCode([0x04, 0x00, 0x00]);
    pub const WRIST_DOWN: MoveCode = MoveCode([0x08, 0x00, 0x00]);
    pub const ELBOW_UP: MoveCode = MoveCode([0x10, 0x00, 0x00]);
    pub const ELBOW_DOWN: MoveCode = MoveCode([0x20, 0x00, 0x00]);
    pub const SHOULDER_UP: MoveCode = MoveCode([0x40, 0x00, 0x00]);
    pub const SHOULDER_DOWN: MoveCode = MoveCode([0x80, 0x00, 0x00]);
    pub const BASE_LEFT: MoveCode = MoveCode([0x00, 0x01, 0x00]);
    pub const BASE_RIGHT: MoveCode = MoveCode([0x00, 0x02, 0x00]);

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> [u8; 3] {
        self.0
    }

    pub fn is_reset(&self) -> bool {
        *self == Self::RESET
    }
}

impl fmt::Display for MoveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x} {:02x} {:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// One timed actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub code: MoveCode,
    pub duration: Duration,
}

impl Move {
    pub fn new(code: MoveCode, duration: Duration) -> Self {
        Self { code, duration }
    }
}

/// Kept sorted by joint, then direction.
const CATALOG: [(&str, &str, MoveCode); 10] = [
    ("base", "left", MoveCode::BASE_LEFT),
    ("base", "right", MoveCode::BASE_RIGHT),
    ("elbow", "down", MoveCode::ELBOW_DOWN),
    ("elbow", "up", MoveCode::ELBOW_UP),
    ("grip", "close", MoveCode::GRIP_CLOSE),
    ("grip", "open", MoveCode::GRIP_OPEN),
    ("shoulder", "down", MoveCode::SHOULDER_DOWN),
    ("shoulder", "up", MoveCode::SHOULDER_UP),
    ("wrist", "down", MoveCode::WRIST_DOWN),
    ("wrist", "up", MoveCode::WRIST_UP),
];

/// Resolve a joint/direction pair. Matching is case-sensitive.
pub fn lookup(joint: &str, direction: &str) -> Option<MoveCode> {
    CATALOG
        .iter()
        .find(|(j, d, _)| *j == joint && *d == direction)
        .map(|(_, _, code)| *code)
}

/// Every known pair, sorted by joint then direction.
pub fn list_all() -> Vec<(&'static str, &'static str)> {
    CATALOG.iter().map(|(j, d, _)| (*j, *d)).collect()
}

/// Human-readable name for a code, e.g. "base left" or "reset".
pub fn describe(code: MoveCode) -> String {
    if code.is_reset() {
        return "reset".to_string();
    }
    CATALOG
        .iter()
        .find(|(_, _, c)| *c == code)
        .map(|(j, d, _)| format!("{} {}", j, d))
        .unwrap_or_else(|| format!("raw [{}]", code))
}
