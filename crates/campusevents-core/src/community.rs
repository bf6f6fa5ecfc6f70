//! Student communities.
//!
//! A [`CommunityDirectory`] holds the known communities together with the
//! ids the user has joined, and answers searches over them.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A student community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Member count.
    pub members: u32,
    /// Number of events the community has hosted.
    pub events: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Community {
    fn seed(id: &str, name: &str, description: &str, members: u32, events: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            members,
            events,
            image_url: None,
        }
    }

    /// Returns true if the name or description contains `needle`.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

/// Ids joined by default when none are configured.
pub const DEFAULT_JOINED: [&str; 3] = ["comm-1", "comm-2", "comm-3"];

/// The built-in community catalog.
pub fn builtin_communities() -> Vec<Community> {
    vec![
        Community::seed(
            "comm-1",
            "Tech Society",
            "A community for tech enthusiasts to collaborate, learn, and share knowledge.",
            348,
            12,
        ),
        Community::seed(
            "comm-2",
            "Design Club",
            "For all design enthusiasts to showcase their creativity and collaborate on projects.",
            215,
            8,
        ),
        Community::seed(
            "comm-3",
            "Entrepreneurship Club",
            "Connecting aspiring entrepreneurs and providing resources for startups.",
            278,
            10,
        ),
        Community::seed(
            "comm-4",
            "Photography Club",
            "Capture moments, share techniques, and participate in photography contests.",
            194,
            7,
        ),
        Community::seed(
            "comm-5",
            "Debate Society",
            "Enhance your public speaking and critical thinking skills through debates.",
            165,
            6,
        ),
        Community::seed(
            "comm-6",
            "Sports Club",
            "For sports enthusiasts to participate in various inter and intra college events.",
            312,
            15,
        ),
    ]
}

/// Which communities a search covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunityTab {
    #[default]
    All,
    /// Only joined communities.
    Mine,
}

impl CommunityTab {
    /// Parses a tab name, falling back to [`CommunityTab::All`].
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Self::All,
            "mine" | "my" => Self::Mine,
            other => {
                warn!(tab = other, "unknown community tab, showing all communities");
                Self::All
            }
        }
    }
}

impl fmt::Display for CommunityTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Mine => f.write_str("mine"),
        }
    }
}

/// Communities plus the user's memberships.
#[derive(Debug, Clone)]
pub struct CommunityDirectory {
    communities: Vec<Community>,
    joined: HashSet<String>,
}

impl Default for CommunityDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommunityDirectory {
    /// Creates a directory with no memberships.
    pub fn new(communities: Vec<Community>) -> Self {
        Self {
            communities,
            joined: HashSet::new(),
        }
    }

    /// The built-in catalog with the default memberships.
    pub fn builtin() -> Self {
        Self::new(builtin_communities()).with_joined(DEFAULT_JOINED)
    }

    /// Builder method to replace the joined ids.
    pub fn with_joined<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.joined = ids.into_iter().map(Into::into).collect();
        self
    }

    /// All communities in catalog order.
    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    /// Looks up a community by id.
    pub fn get(&self, id: &str) -> Option<&Community> {
        self.communities.iter().find(|c| c.id == id)
    }

    /// Returns true if the user joined `id`.
    pub fn is_joined(&self, id: &str) -> bool {
        self.joined.contains(id)
    }

    /// Searches by name and description, in catalog order.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str, tab: CommunityTab) -> Vec<&Community> {
        let needle = query.trim().to_lowercase();
        self.communities
            .iter()
            .filter(|c| tab == CommunityTab::All || self.is_joined(&c.id))
            .filter(|c| needle.is_empty() || c.matches_text(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(found: &[&Community]) -> Vec<String> {
        found.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn builtin_catalog() {
        let dir = CommunityDirectory::builtin();
        assert_eq!(dir.communities().len(), 6);
        assert_eq!(dir.get("comm-6").unwrap().members, 312);
        assert!(dir.is_joined("comm-1"));
        assert!(!dir.is_joined("comm-4"));
    }

    #[test]
    fn blank_query_lists_everything() {
        let dir = CommunityDirectory::builtin();
        assert_eq!(dir.search("  ", CommunityTab::All).len(), 6);
        assert_eq!(
            names(&dir.search("", CommunityTab::Mine)),
            vec!["Tech Society", "Design Club", "Entrepreneurship Club"]
        );
    }

    #[test]
    fn search_name_and_description() {
        let dir = CommunityDirectory::builtin();
        assert_eq!(names(&dir.search("CLUB", CommunityTab::All)).len(), 4);
        assert_eq!(
            names(&dir.search("public speaking", CommunityTab::All)),
            vec!["Debate Society"]
        );
    }

    #[test]
    fn mine_respects_configured_memberships() {
        let dir = CommunityDirectory::builtin().with_joined(["comm-4", "comm-6"]);
        assert_eq!(
            names(&dir.search("club", CommunityTab::Mine)),
            vec!["Photography Club", "Sports Club"]
        );
        assert!(dir.search("startups", CommunityTab::Mine).is_empty());
    }

    #[test]
    fn tab_parsing() {
        assert_eq!(CommunityTab::parse_lenient("mine"), CommunityTab::Mine);
        assert_eq!(CommunityTab::parse_lenient("MY"), CommunityTab::Mine);
        assert_eq!(CommunityTab::parse_lenient("popular"), CommunityTab::All);
    }
}
