//! Read-model invalidation contract.
//!
//! Each mutating use case names the read models it invalidates. The core
//! performs no cache work itself; the API layer surfaces the list to the
//! presentation layer (as an `x-invalidates` response header) so it can
//! refresh the affected views.

use serde::Serialize;

/// Read models the presentation layer may cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadModel {
    /// The filtered issue list.
    IssueList,
    /// A single issue with its relations.
    IssueDetail,
    /// Dashboard analytics (density, heatmap, distribution, summary).
    DashboardAnalytics,
    /// The announcement feed.
    Announcements,
    /// The lost-and-found registry.
    LostAndFound,
}

impl ReadModel {
    /// Stable identifier used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IssueList => "issue-list",
            Self::IssueDetail => "issue-detail",
            Self::DashboardAnalytics => "dashboard-analytics",
            Self::Announcements => "announcements",
            Self::LostAndFound => "lost-and-found",
        }
    }
}

/// Read models invalidated by issue creation.
pub const CREATE_ISSUE: &[ReadModel] = &[ReadModel::IssueList, ReadModel::DashboardAnalytics];

/// Read models invalidated by any issue status transition.
pub const TRANSITION_ISSUE: &[ReadModel] = &[
    ReadModel::IssueList,
    ReadModel::IssueDetail,
    ReadModel::DashboardAnalytics,
];

/// Read models invalidated by an upvote toggle or a new comment.
pub const TOUCH_ISSUE: &[ReadModel] = &[ReadModel::IssueDetail];

/// Read models invalidated by creating an announcement.
pub const CREATE_ANNOUNCEMENT: &[ReadModel] = &[ReadModel::Announcements];

/// Read models invalidated by lost-and-found mutations.
pub const MUTATE_LOST_ITEM: &[ReadModel] = &[ReadModel::LostAndFound];

/// Render an invalidation set as a comma-separated header value.
#[must_use]
pub fn header_value(models: &[ReadModel]) -> String {
    models
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_is_comma_separated() {
        assert_eq!(
            header_value(TRANSITION_ISSUE),
            "issue-list,issue-detail,dashboard-analytics"
        );
    }

    #[test]
    fn test_create_issue_invalidates_list_and_dashboards() {
        assert!(CREATE_ISSUE.contains(&ReadModel::IssueList));
        assert!(CREATE_ISSUE.contains(&ReadModel::DashboardAnalytics));
        assert!(!CREATE_ISSUE.contains(&ReadModel::LostAndFound));
    }
}
