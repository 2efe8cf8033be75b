// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    Activities,
    Leaderboard,
    Teams,
    Users,
    Workouts,
}

impl ResourceKind {
    pub const ALL: [Self; 5] = [
        Self::Activities,
        Self::Leaderboard,
        Self::Teams,
        Self::Users,
        Self::Workouts,
    ];

    pub const fn as_str(self) -> &'static str {
        self.spec().path
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "activities" => Some(Self::Activities),
            "leaderboard" => Some(Self::Leaderboard),
            "teams" => Some(Self::Teams),
            "users" => Some(Self::Users),
            "workouts" => Some(Self::Workouts),
            _ => None,
        }
    }

    pub fn parse_strict(value: &str) -> Result<Self> {
        match Self::parse(value) {
            Some(kind) => Ok(kind),
            None => bail!(
                "unknown resource {value:?}; expected one of: activities, leaderboard, teams, users, workouts"
            ),
        }
    }

    pub const fn label(self) -> &'static str {
        self.spec().title
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(0)
    }

    pub const fn spec(self) -> ResourceSpec {
        match self {
            Self::Activities => ResourceSpec {
                path: "activities",
                title: "Activities",
                singular: "Activity",
                plural: "activities",
                label_fields: &["name", "title", "id"],
                empty_message: "No activities available yet.",
                detail_title: "Activity details",
                tagline: "Track recent training sessions and drill into activity specifics.",
            },
            Self::Leaderboard => ResourceSpec {
                path: "leaderboard",
                title: "Leaderboard",
                singular: "Entry",
                plural: "entries",
                label_fields: &["name", "user", "id"],
                empty_message: "No leaderboard entries available yet.",
                detail_title: "Leaderboard entry details",
                tagline: "Celebrate top performers and keep the momentum going.",
            },
            Self::Teams => ResourceSpec {
                path: "teams",
                title: "Teams",
                singular: "Team",
                plural: "teams",
                label_fields: &["name", "title", "id"],
                empty_message: "No teams available yet.",
                detail_title: "Team details",
                tagline: "Organize squads, assign members, and review team metrics.",
            },
            Self::Users => ResourceSpec {
                path: "users",
                title: "Users",
                singular: "User",
                plural: "users",
                label_fields: &["name", "username", "email", "id"],
                empty_message: "No users available yet.",
                detail_title: "User details",
                tagline: "Keep track of member profiles and contact details.",
            },
            Self::Workouts => ResourceSpec {
                path: "workouts",
                title: "Workouts",
                singular: "Workout",
                plural: "workouts",
                label_fields: &["name", "title", "id"],
                empty_message: "No workouts available yet.",
                detail_title: "Workout details",
                tagline: "Review workout plans and track training blocks.",
            },
        }
    }
}

/// Static description of one collection endpoint and how its rows are labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Path segment under the API base, without slashes.
    pub path: &'static str,
    pub title: &'static str,
    /// Used for the positional label fallback, e.g. `"User 3"`.
    pub singular: &'static str,
    /// Used by the footer, e.g. `"Showing 2 of 4 users"`.
    pub plural: &'static str,
    /// Candidate fields for the row label, tried in order.
    pub label_fields: &'static [&'static str],
    pub empty_message: &'static str,
    pub detail_title: &'static str,
    pub tagline: &'static str,
}

pub const NO_MATCHES_MESSAGE: &str = "No matches found. Try a different filter.";

#[cfg(test)]
mod tests {
    use super::ResourceKind;

    #[test]
    fn parse_accepts_paths_case_insensitively() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::parse(kind.as_str()), Some(kind));
            assert_eq!(
                ResourceKind::parse(&kind.as_str().to_ascii_uppercase()),
                Some(kind)
            );
        }
        assert_eq!(ResourceKind::parse("badges"), None);
    }

    #[test]
    fn parse_strict_lists_known_resources() {
        let error = ResourceKind::parse_strict("badges").expect_err("unknown resource");
        assert!(error.to_string().contains("leaderboard"));
    }

    #[test]
    fn users_label_fields_prefer_name_then_username_then_email() {
        assert_eq!(
            ResourceKind::Users.spec().label_fields,
            &["name", "username", "email", "id"]
        );
        assert_eq!(
            ResourceKind::Leaderboard.spec().label_fields,
            &["name", "user", "id"]
        );
    }

    #[test]
    fn leaderboard_uses_entry_nouns() {
        let spec = ResourceKind::Leaderboard.spec();
        assert_eq!(spec.singular, "Entry");
        assert_eq!(spec.plural, "entries");
        assert_eq!(spec.path, "leaderboard");
    }

    #[test]
    fn index_matches_tab_order() {
        for (position, kind) in ResourceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }
}
