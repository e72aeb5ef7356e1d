//! Business logic services.

#![allow(missing_docs)]

pub mod analytics;
pub mod announcement;
pub mod comment;
pub mod issue;
pub mod lost_item;
pub mod upvote;
pub mod user;

pub use analytics::{
    AnalyticsService, CategoryDensity, DashboardSummary, HeatmapCell, StatusDistribution,
};
pub use announcement::{AnnouncementService, CreateAnnouncementInput};
pub use comment::{AddCommentInput, CommentService};
pub use issue::{CreateIssueInput, IssueDetail, IssueService, LocationOverride};
pub use lost_item::{ClaimSubmission, LostItemService, ReportItemInput};
pub use upvote::{UpvoteService, UpvoteToggle};
pub use user::UserService;
