//! Playback state machine for front-ends that animate a draw.
//!
//! The controller never touches timing. A caller polls [`PlaybackController::tick`]
//! at whatever pace it renders; each tick advances the session by at most one
//! placement, depending on the playback state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::DrawError;
use crate::session::DrawSession;
use crate::state::Assignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Advance exactly one placement, then pause
    Stepping,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    /// Pause when running, resume when paused
    Toggle,
    Step,
    Reset,
}

impl FromStr for PlaybackCommand {
    type Err = String;

    /// Single-key commands: `s` or empty line steps, `p` toggles, `a` plays, `r` resets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "step" => Ok(PlaybackCommand::Step),
            "p" | "pause" => Ok(PlaybackCommand::Toggle),
            "a" | "play" | "all" => Ok(PlaybackCommand::Play),
            "r" | "reset" => Ok(PlaybackCommand::Reset),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackController {
    state: PlaybackState,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Applies `command` and returns the new state. `Finished` only leaves on `Reset`.
    pub fn apply(&mut self, command: PlaybackCommand) -> PlaybackState {
        use PlaybackCommand as C;
        use PlaybackState as S;

        self.state = match (self.state, command) {
            (_, C::Reset) => S::Idle,
            (S::Finished, _) => S::Finished,
            (_, C::Play) => S::Running,
            (S::Running, C::Pause | C::Toggle) => S::Paused,
            (S::Paused, C::Toggle) => S::Running,
            (state, C::Pause) => state,
            (S::Idle | S::Stepping, C::Toggle) => S::Paused,
            (_, C::Step) => S::Stepping,
        };
        self.state
    }

    pub fn should_advance(&self) -> bool {
        matches!(self.state, PlaybackState::Running | PlaybackState::Stepping)
    }

    pub fn mark_finished(&mut self) {
        self.state = PlaybackState::Finished;
    }

    /// Advances `session` by one placement when the state allows it.
    ///
    /// A step falls back to `Paused` afterwards. The controller moves to
    /// `Finished` once the session is over, including when it fails.
    pub fn tick<R: Rng>(
        &mut self,
        session: &mut DrawSession<R>,
    ) -> Result<Option<Assignment>, DrawError> {
        if !self.should_advance() {
            return Ok(None);
        }
        let result = session.step();
        if result.is_err() || session.is_finished() {
            self.mark_finished();
        } else if self.state == PlaybackState::Stepping {
            self.state = PlaybackState::Paused;
        }
        result
    }
}
