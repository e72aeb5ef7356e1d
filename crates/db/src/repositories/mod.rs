//! Database repositories.

#![allow(missing_docs)]

pub mod announcement;
pub mod comment;
pub mod hostel;
pub mod issue;
pub mod issue_category;
pub mod lost_item;
pub mod upvote;
pub mod user;

pub use announcement::AnnouncementRepository;
pub use comment::CommentRepository;
pub use hostel::HostelRepository;
pub use issue::{IssueFilter, IssueRepository, IssueSort, VisibilityScope};
pub use issue_category::IssueCategoryRepository;
pub use lost_item::LostItemRepository;
pub use upvote::UpvoteRepository;
pub use user::UserRepository;
