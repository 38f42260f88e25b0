use std::sync::{Arc, Mutex, PoisonError};

use clubhub_result::Result;

/// Vote shown for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteState {
    pub voted: bool,
    pub count: u32,
}

impl VoteState {
    /// State after flipping the viewer's vote
    pub fn flipped(self) -> VoteState {
        if self.voted {
            VoteState {
                voted: false,
                count: self.count.saturating_sub(1),
            }
        } else {
            VoteState {
                voted: true,
                count: self.count.saturating_add(1),
            }
        }
    }
}

/// Where a toggle is in its round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotePhase {
    /// Nothing in flight
    Idle(VoteState),
    /// Mutation sent, showing the optimistic state
    Pending {
        previous: VoteState,
        optimistic: VoteState,
    },
}

/// Optimistic upvote for one (request, viewer) pair
///
/// Cloning shares the state, so a view can read what to display while the
/// board drives the mutation.
#[derive(Debug, Clone)]
pub struct VoteToggle {
    phase: Arc<Mutex<VotePhase>>,
}

impl VoteToggle {
    pub fn new(voted: bool, count: u32) -> VoteToggle {
        VoteToggle {
            phase: Arc::new(Mutex::new(VotePhase::Idle(VoteState { voted, count }))),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut VotePhase) -> T) -> T {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut phase)
    }

    pub fn phase(&self) -> VotePhase {
        self.with(|phase| *phase)
    }

    /// State to render right now
    pub fn displayed(&self) -> VoteState {
        match self.phase() {
            VotePhase::Idle(state) => state,
            VotePhase::Pending { optimistic, .. } => optimistic,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase(), VotePhase::Pending { .. })
    }

    /// Flip the vote immediately, refusing while another toggle is in flight
    pub fn begin(&self) -> Result<VoteState> {
        self.with(|phase| match *phase {
            VotePhase::Pending { .. } => Err(create_error!(VotePending)),
            VotePhase::Idle(previous) => {
                let optimistic = previous.flipped();
                *phase = VotePhase::Pending {
                    previous,
                    optimistic,
                };
                Ok(optimistic)
            }
        })
    }

    /// Settle with the vote the backend ended up with
    ///
    /// A disagreeing answer means the toggle landed on the other side, so
    /// the pre-toggle state is kept.
    pub fn confirm(&self, voted: bool) -> VoteState {
        self.with(|phase| {
            let settled = match *phase {
                VotePhase::Idle(state) => state,
                VotePhase::Pending {
                    previous,
                    optimistic,
                } => {
                    if optimistic.voted == voted {
                        optimistic
                    } else {
                        warn!("Vote settled opposite to the optimistic state");
                        previous
                    }
                }
            };

            *phase = VotePhase::Idle(settled);
            settled
        })
    }

    /// Restore exactly the state from before [`VoteToggle::begin`]
    pub fn rollback(&self) -> VoteState {
        self.with(|phase| {
            let restored = match *phase {
                VotePhase::Idle(state) => state,
                VotePhase::Pending { previous, .. } => previous,
            };

            *phase = VotePhase::Idle(restored);
            restored
        })
    }
}
