//! Episode lifecycle bookkeeping

use swingup_rl_core::{RLError, Result, Terminal};

use crate::transition::Termination;

/// Where an episode is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Freshly reset, no step taken yet
    Ready,
    /// At least one step taken, not yet terminated
    Running,
    /// Ended; only a reset leaves this phase
    Terminated(Termination),
}

/// Step counter and done flag of the current episode
#[derive(Debug, Clone)]
pub struct EpisodeState {
    steps: usize,
    max_steps: usize,
    phase: Phase,
}

impl EpisodeState {
    /// A ready episode capped at `max_steps`
    #[must_use]
    pub fn new(max_steps: usize) -> Self {
        Self {
            steps: 0,
            max_steps,
            phase: Phase::Ready,
        }
    }

    /// Back to `Ready` with a zeroed counter
    pub fn reset(&mut self) {
        self.steps = 0;
        self.phase = Phase::Ready;
    }

    /// Fails once the episode has terminated
    pub fn ensure_steppable(&self) -> Result<()> {
        match self.phase {
            Phase::Terminated(_) => Err(RLError::EpisodeTerminated),
            Phase::Ready | Phase::Running => Ok(()),
        }
    }

    /// Count one step and return the new total
    pub fn advance(&mut self) -> usize {
        self.steps += 1;
        self.phase = Phase::Running;
        self.steps
    }

    /// Enter the terminal phase
    pub fn terminate(&mut self, cause: Termination) {
        self.phase = Phase::Terminated(cause);
    }

    /// Steps taken since the last reset
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Episode length cap
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The done flag
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Terminated(_))
    }

    /// Terminal marker for the state snapshot
    #[must_use]
    pub fn terminal(&self) -> Terminal {
        match self.phase {
            Phase::Terminated(Termination::TimeLimit) => Terminal::Truncated,
            Phase::Terminated(Termination::Boundary) => Terminal::Yes,
            Phase::Ready | Phase::Running => Terminal::No,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut episode = EpisodeState::new(3);
        assert_eq!(episode.phase(), Phase::Ready);
        assert!(episode.ensure_steppable().is_ok());

        assert_eq!(episode.advance(), 1);
        assert_eq!(episode.phase(), Phase::Running);

        episode.terminate(Termination::Boundary);
        assert!(episode.is_done());
        assert_eq!(episode.terminal(), Terminal::Yes);
        assert!(matches!(episode.ensure_steppable(), Err(RLError::EpisodeTerminated)));

        episode.reset();
        assert_eq!(episode.steps(), 0);
        assert!(!episode.is_done());
        assert_eq!(episode.terminal(), Terminal::No);
    }

    #[test]
    fn test_time_limit_marks_truncated() {
        let mut episode = EpisodeState::new(1);
        episode.advance();
        episode.terminate(Termination::TimeLimit);
        assert_eq!(episode.terminal(), Terminal::Truncated);
        assert_eq!(episode.max_steps(), 1);
    }
}
