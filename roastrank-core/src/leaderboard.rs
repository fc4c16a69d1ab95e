use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Metric the leaderboard is ranked by. The metric values themselves come
/// from the query layer; the ranker never looks at the category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaderboardCategory {
    /// Accumulated XP.
    Roasters,
    /// Roasts received.
    Roasted,
    /// Total upvotes received across authored roasts.
    Upvoted,
}

impl LeaderboardCategory {
    pub const ALL: [LeaderboardCategory; 3] = [
        LeaderboardCategory::Roasters,
        LeaderboardCategory::Roasted,
        LeaderboardCategory::Upvoted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeaderboardCategory::Roasters => "roasters",
            LeaderboardCategory::Roasted => "roasted",
            LeaderboardCategory::Upvoted => "upvoted",
        }
    }
}

impl fmt::Display for LeaderboardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaderboardCategory {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "roasters" => Ok(LeaderboardCategory::Roasters),
            "roasted" => Ok(LeaderboardCategory::Roasted),
            "upvoted" => Ok(LeaderboardCategory::Upvoted),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown leaderboard category `{other}`"
            ))),
        }
    }
}

/// One user's metric value, already filtered for private profiles and
/// hidden roasts by whoever produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub user_id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
    pub level: i64,
    pub score: i64,
}

/// A ranked row. Positions are the 1-based index after sorting; tied scores
/// keep distinct increasing positions rather than sharing a rank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
    pub level: i64,
    pub score: i64,
    pub position: u64,
}

/// Order rows by score descending, tie-broken by username ascending, and
/// assign positions. Computed fresh on every call; callers wanting caching
/// own that concern.
pub fn rank(mut rows: Vec<ScoreRow>) -> impl Iterator<Item = LeaderboardEntry> {
    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.username.cmp(&b.username))
    });

    rows.into_iter().enumerate().map(|(index, row)| LeaderboardEntry {
        user_id: row.user_id,
        username: row.username,
        avatar_url: row.avatar_url,
        level: row.level,
        score: row.score,
        position: index as u64 + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::{LeaderboardCategory, ScoreRow, rank};

    fn row(user_id: i64, username: &str, score: i64) -> ScoreRow {
        ScoreRow {
            user_id,
            username: username.to_owned(),
            avatar_url: None,
            level: 1,
            score,
        }
    }

    #[test]
    fn orders_by_score_then_username() {
        let ranked: Vec<_> = rank(vec![
            row(1, "alice", 50),
            row(2, "brook", 80),
            row(3, "casey", 80),
        ])
        .collect();

        let summary: Vec<_> = ranked
            .iter()
            .map(|e| (e.position, e.username.as_str(), e.score))
            .collect();
        assert_eq!(
            summary,
            vec![(1, "brook", 80), (2, "casey", 80), (3, "alice", 50)]
        );
    }

    #[test]
    fn ties_get_distinct_positions() {
        let ranked: Vec<_> = rank(vec![row(1, "b", 10), row(2, "a", 10)]).collect();
        assert_eq!(ranked[0].username, "a");
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[1].username, "b");
        assert_eq!(ranked[1].position, 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(rank(Vec::new()).count(), 0);
    }

    #[test]
    fn ranking_is_deterministic() {
        let rows = vec![row(1, "zed", 5), row(2, "amy", 5), row(3, "mia", 9)];
        let first: Vec<_> = rank(rows.clone()).collect();
        let second: Vec<_> = rank(rows).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn categories_parse_their_names() {
        for category in LeaderboardCategory::ALL {
            assert_eq!(
                category.as_str().parse::<LeaderboardCategory>().unwrap(),
                category
            );
        }
        assert!("weekly".parse::<LeaderboardCategory>().is_err());
    }
}
