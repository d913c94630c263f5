//! papershelf - data core for a static academic-paper site
//!
//! Three concerns, leaf-first:
//! - image discovery: parse server directory-listing HTML and walk the
//!   site's fixed folder topology ([`listing`], [`scanner`])
//! - detail resolution: priority-chain lookup of a paper's content across
//!   remote JSON, local stores and synthesized defaults ([`details`],
//!   [`store`])
//! - rendering: pure data-to-HTML-fragment functions and page assembly
//!   ([`render`], [`page`])

pub mod details;
pub mod fetch;
pub mod listing;
pub mod page;
pub mod render;
pub mod scanner;
pub mod store;

pub use details::{PaperBasicInfo, PaperDetail, PaperDetailResolver};
pub use page::{load_page, Notification, PageContent, PageSession};
pub use scanner::{AssetScanner, ImageKind, ScanIndex};
pub use store::{DetailDatabase, FileStore};
