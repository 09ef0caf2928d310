//! Conversation state: the dance store plus the dance currently being taught.

use std::fmt;

use robopi_common::{DanceError, Move};

use crate::dances::DanceStore;

/// Interpreter mode, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    Idle,
    Teaching(&'a str),
}

impl fmt::Display for Mode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Teaching(name) => write!(f, "teaching '{}'", name),
        }
    }
}

/// One per session. When `teaching` is set it always names a dance in `dances`.
#[derive(Debug, Default)]
pub struct ConversationState {
    teaching: Option<String>,
    dances: DanceStore,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode<'_> {
        match &self.teaching {
            Some(name) => Mode::Teaching(name),
            None => Mode::Idle,
        }
    }

    pub fn teaching(&self) -> Option<&str> {
        self.teaching.as_deref()
    }

    pub fn dances(&self) -> &DanceStore {
        &self.dances
    }

    /// Define `name` and start recording into it.
    ///
    /// Returns the dance that was being taught before, if it was a different one.
    pub fn begin_teaching(&mut self, name: &str) -> Result<Option<String>, DanceError> {
        self.dances.define(name)?;
        Ok(self.teaching.replace(name.to_string()))
    }

    /// Stop recording. Returns the dance that was being taught.
    pub fn finish_teaching(&mut self) -> Option<String> {
        self.teaching.take()
    }

    /// Append to the dance being taught.
    pub fn record(&mut self, mv: Move) -> Result<(), DanceError> {
        match &self.teaching {
            Some(name) => self.dances.append(name, mv),
            None => Err(DanceError::NoSuchDance(String::new())),
        }
    }

    /// Forget a dance, ending the teaching session if it was the one being taught.
    /// Returns whether teaching was ended.
    pub fn forget(&mut self, name: &str) -> bool {
        self.dances.forget(name);
        if self.teaching.as_deref() == Some(name) {
            self.teaching = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robopi_common::MoveCode;
    use std::time::Duration;

    #[test]
    fn test_teach_record_finish() {
        let mut state = ConversationState::new();
        assert_eq!(state.mode(), Mode::Idle);

        assert_eq!(state.begin_teaching("wave"), Ok(None));
        assert_eq!(state.mode(), Mode::Teaching("wave"));

        state
            .record(Move::new(MoveCode::BASE_LEFT, Duration::from_secs(1)))
            .unwrap();
        assert_eq!(state.finish_teaching(), Some("wave".to_string()));
        assert_eq!(state.mode(), Mode::Idle);
        assert_eq!(state.dances().get("wave").unwrap().len(), 1);
    }

    #[test]
    fn test_record_while_idle_fails() {
        let mut state = ConversationState::new();
        let result = state.record(Move::new(MoveCode::GRIP_OPEN, Duration::ZERO));
        assert!(result.is_err());
    }

    #[test]
    fn test_switching_dances_mid_teach() {
        let mut state = ConversationState::new();
        state.begin_teaching("wave").unwrap();
        state
            .record(Move::new(MoveCode::WRIST_UP, Duration::ZERO))
            .unwrap();

        assert_eq!(state.begin_teaching("twist"), Ok(Some("wave".to_string())));
        assert_eq!(state.teaching(), Some("twist"));
        // The abandoned dance keeps what it had
        assert_eq!(state.dances().get("wave").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_teach_keeps_state() {
        let mut state = ConversationState::new();
        state.begin_teaching("wave").unwrap();
        state.finish_teaching();

        assert!(state.begin_teaching("wave").is_err());
        assert_eq!(state.mode(), Mode::Idle);
    }

    #[test]
    fn test_forget_current_dance_ends_teaching() {
        let mut state = ConversationState::new();
        state.begin_teaching("wave").unwrap();

        assert!(state.forget("wave"));
        assert_eq!(state.mode(), Mode::Idle);
        assert!(!state.dances().contains("wave"));
        assert!(!state.forget("wave"));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Idle.to_string(), "idle");
        assert_eq!(Mode::Teaching("wave").to_string(), "teaching 'wave'");
    }
}
