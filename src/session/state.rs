use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a coaching session.
///
/// Sessions move strictly forward: Idle to Recording to Processing to
/// Complete, and from Complete back to Recording when restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session activity
    Idle,
    /// Frames are being pulled and analyzed every tick
    Recording,
    /// Stopped, waiting for the settle delay before the report
    Processing,
    /// Report generated and available
    Complete,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Processing => "processing",
            SessionState::Complete => "complete",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionState::Recording).unwrap(),
            "\"recording\""
        );
        let state: SessionState = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(state, SessionState::Complete);
    }
}
