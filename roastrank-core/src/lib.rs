/// Achievement catalog and stat-derived unlock checks.
pub mod achievements;
/// Typed domain errors.
pub mod error;
/// Leaderboard ranking over pre-filtered score rows.
pub mod leaderboard;
/// XP-to-level mapping and progress arithmetic.
pub mod leveling;
/// Orchestrated vote and XP flows over the store traits.
pub mod service;
/// Persistence seams the domain flows depend on.
pub mod store;
/// The per-(voter, roast) vote toggle state machine.
pub mod vote;

pub use error::{CoreError, StoreError};
pub use leaderboard::{LeaderboardCategory, LeaderboardEntry, ScoreRow};
pub use vote::{VoteAction, VoteDelta, VoteState, VoteTransition};
