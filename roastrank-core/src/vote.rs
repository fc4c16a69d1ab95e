use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A vote submission. Serialized as the store's 'upvote'/'downvote' strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Upvote,
    Downvote,
}

impl VoteAction {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteAction::Upvote => "upvote",
            VoteAction::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteAction {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "upvote" => Ok(VoteAction::Upvote),
            "downvote" => Ok(VoteAction::Downvote),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown vote action `{other}`"
            ))),
        }
    }
}

/// Effective vote of one voter on one roast. At most one active vote per
/// pair; `None` means no row in the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteState {
    #[default]
    None,
    Upvoted,
    Downvoted,
}

impl VoteState {
    /// The action recorded in the store for this state, if any.
    pub fn as_action(self) -> Option<VoteAction> {
        match self {
            VoteState::None => None,
            VoteState::Upvoted => Some(VoteAction::Upvote),
            VoteState::Downvoted => Some(VoteAction::Downvote),
        }
    }

    pub fn from_action(action: Option<VoteAction>) -> Self {
        match action {
            None => VoteState::None,
            Some(VoteAction::Upvote) => VoteState::Upvoted,
            Some(VoteAction::Downvote) => VoteState::Downvoted,
        }
    }
}

/// Net change to a roast's counters when a transition is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoteDelta {
    pub upvotes: i64,
    pub downvotes: i64,
}

/// One step of the toggle state machine, with the counter delta the store
/// must apply in the same transaction as the row change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteTransition {
    pub previous: VoteState,
    pub next: VoteState,
    pub delta: VoteDelta,
}

/// Apply one action to the current state. Total: every (state, action) pair
/// has exactly one transition. Repeating the active vote toggles it off;
/// the opposite action switches it.
pub fn toggle(state: VoteState, action: VoteAction) -> VoteTransition {
    let (next, delta) = match (state, action) {
        (VoteState::None, VoteAction::Upvote) => (
            VoteState::Upvoted,
            VoteDelta {
                upvotes: 1,
                downvotes: 0,
            },
        ),
        (VoteState::None, VoteAction::Downvote) => (
            VoteState::Downvoted,
            VoteDelta {
                upvotes: 0,
                downvotes: 1,
            },
        ),
        (VoteState::Upvoted, VoteAction::Upvote) => (
            VoteState::None,
            VoteDelta {
                upvotes: -1,
                downvotes: 0,
            },
        ),
        (VoteState::Upvoted, VoteAction::Downvote) => (
            VoteState::Downvoted,
            VoteDelta {
                upvotes: -1,
                downvotes: 1,
            },
        ),
        (VoteState::Downvoted, VoteAction::Downvote) => (
            VoteState::None,
            VoteDelta {
                upvotes: 0,
                downvotes: -1,
            },
        ),
        (VoteState::Downvoted, VoteAction::Upvote) => (
            VoteState::Upvoted,
            VoteDelta {
                upvotes: 1,
                downvotes: -1,
            },
        ),
    };

    VoteTransition {
        previous: state,
        next,
        delta,
    }
}

#[cfg(test)]
mod tests {
    use super::{VoteAction, VoteDelta, VoteState, toggle};

    #[test]
    fn fresh_vote_sets_state_and_counter() {
        let t = toggle(VoteState::None, VoteAction::Upvote);
        assert_eq!(t.next, VoteState::Upvoted);
        assert_eq!(
            t.delta,
            VoteDelta {
                upvotes: 1,
                downvotes: 0
            }
        );

        let t = toggle(VoteState::None, VoteAction::Downvote);
        assert_eq!(t.next, VoteState::Downvoted);
        assert_eq!(
            t.delta,
            VoteDelta {
                upvotes: 0,
                downvotes: 1
            }
        );
    }

    #[test]
    fn double_upvote_nets_to_nothing() {
        let first = toggle(VoteState::None, VoteAction::Upvote);
        let second = toggle(first.next, VoteAction::Upvote);
        assert_eq!(second.next, VoteState::None);
        assert_eq!(first.delta.upvotes + second.delta.upvotes, 0);
        assert_eq!(first.delta.downvotes + second.delta.downvotes, 0);
    }

    #[test]
    fn switching_moves_both_counters() {
        let t = toggle(VoteState::Upvoted, VoteAction::Downvote);
        assert_eq!(t.next, VoteState::Downvoted);
        assert_eq!(
            t.delta,
            VoteDelta {
                upvotes: -1,
                downvotes: 1
            }
        );

        let t = toggle(VoteState::Downvoted, VoteAction::Upvote);
        assert_eq!(t.next, VoteState::Upvoted);
        assert_eq!(
            t.delta,
            VoteDelta {
                upvotes: 1,
                downvotes: -1
            }
        );
    }

    #[test]
    fn downvote_toggles_off() {
        let t = toggle(VoteState::Downvoted, VoteAction::Downvote);
        assert_eq!(t.next, VoteState::None);
        assert_eq!(
            t.delta,
            VoteDelta {
                upvotes: 0,
                downvotes: -1
            }
        );
    }

    #[test]
    fn transition_records_previous_state() {
        let t = toggle(VoteState::Upvoted, VoteAction::Downvote);
        assert_eq!(t.previous, VoteState::Upvoted);
    }

    #[test]
    fn actions_parse_their_store_strings() {
        assert_eq!("upvote".parse::<VoteAction>().unwrap(), VoteAction::Upvote);
        assert_eq!(
            "downvote".parse::<VoteAction>().unwrap(),
            VoteAction::Downvote
        );
        assert!("sideways".parse::<VoteAction>().is_err());
        assert_eq!(VoteAction::Upvote.to_string(), "upvote");
    }
}
