/// A fixed achievement definition. Unlocking one awards its XP reward once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: &'static str,
    pub xp_reward: i64,
}

/// Every achievement the platform knows about.
pub const CATALOG: &[Achievement] = &[
    Achievement {
        id: "first-roast",
        name: "First Burn",
        description: "Post your first roast",
        requirement: "Submit 1 roast",
        xp_reward: 50,
    },
    Achievement {
        id: "roast-master",
        name: "Roast Master",
        description: "Post 10 roasts",
        requirement: "Submit 10 roasts",
        xp_reward: 100,
    },
    Achievement {
        id: "hot-streak",
        name: "Hot Streak",
        description: "Get 5 roasts with 10+ upvotes",
        requirement: "5 roasts with 10+ upvotes",
        xp_reward: 200,
    },
    Achievement {
        id: "crowd-pleaser",
        name: "Crowd Pleaser",
        description: "Receive 100 total upvotes",
        requirement: "100 total upvotes",
        xp_reward: 250,
    },
    Achievement {
        id: "level-5",
        name: "Rising Star",
        description: "Reach level 5",
        requirement: "Reach level 5",
        xp_reward: 300,
    },
    Achievement {
        id: "level-10",
        name: "Comedy Legend",
        description: "Reach level 10",
        requirement: "Reach level 10",
        xp_reward: 500,
    },
    Achievement {
        id: "top-weekly",
        name: "Weekly Champion",
        description: "Get to the top of the weekly leaderboard",
        requirement: "#1 on weekly leaderboard",
        xp_reward: 400,
    },
    Achievement {
        id: "roast-battle-winner",
        name: "Battle Winner",
        description: "Win a roast battle",
        requirement: "Win 1 roast battle",
        xp_reward: 350,
    },
];

pub fn by_id(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|achievement| achievement.id == id)
}

/// Aggregate stats an author's achievements are checked against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthorStats {
    pub roasts_posted: i64,
    pub upvotes_received: i64,
    /// Roasts with 10 or more upvotes.
    pub hot_roasts: i64,
    pub level: i64,
}

/// Achievements the given stats satisfy. Covers only the stat-derived
/// entries; `top-weekly` and `roast-battle-winner` are unlocked by their
/// own events and never appear here. The caller filters already-unlocked
/// ids and awards each reward once.
pub fn check_unlocks(stats: &AuthorStats) -> Vec<&'static Achievement> {
    let mut unlocked = Vec::new();

    let mut check = |id: &str, satisfied: bool| {
        if satisfied {
            if let Some(achievement) = by_id(id) {
                unlocked.push(achievement);
            }
        }
    };

    check("first-roast", stats.roasts_posted >= 1);
    check("roast-master", stats.roasts_posted >= 10);
    check("hot-streak", stats.hot_roasts >= 5);
    check("crowd-pleaser", stats.upvotes_received >= 100);
    check("level-5", stats.level >= 5);
    check("level-10", stats.level >= 10);

    unlocked
}

#[cfg(test)]
mod tests {
    use super::{AuthorStats, CATALOG, by_id, check_unlocks};

    #[test]
    fn catalog_ids_are_unique() {
        for (index, achievement) in CATALOG.iter().enumerate() {
            assert!(
                !CATALOG[index + 1..].iter().any(|a| a.id == achievement.id),
                "duplicate id {}",
                achievement.id
            );
        }
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(by_id("first-roast").unwrap().xp_reward, 50);
        assert!(by_id("no-such-thing").is_none());
    }

    #[test]
    fn fresh_author_unlocks_nothing() {
        assert!(check_unlocks(&AuthorStats::default()).is_empty());
    }

    #[test]
    fn first_roast_unlocks_first_burn_only() {
        let stats = AuthorStats {
            roasts_posted: 1,
            level: 1,
            ..Default::default()
        };
        let ids: Vec<_> = check_unlocks(&stats).iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["first-roast"]);
    }

    #[test]
    fn thresholds_accumulate() {
        let stats = AuthorStats {
            roasts_posted: 12,
            upvotes_received: 150,
            hot_roasts: 5,
            level: 10,
        };
        let ids: Vec<_> = check_unlocks(&stats).iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec![
                "first-roast",
                "roast-master",
                "hot-streak",
                "crowd-pleaser",
                "level-5",
                "level-10"
            ]
        );
    }

    #[test]
    fn event_driven_achievements_never_unlock_from_stats() {
        let stats = AuthorStats {
            roasts_posted: i64::MAX,
            upvotes_received: i64::MAX,
            hot_roasts: i64::MAX,
            level: i64::MAX,
        };
        let ids: Vec<_> = check_unlocks(&stats).iter().map(|a| a.id).collect();
        assert!(!ids.contains(&"top-weekly"));
        assert!(!ids.contains(&"roast-battle-winner"));
    }
}
