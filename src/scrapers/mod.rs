//! Article retrieval from news feeds.
//!
//! One source is wired in today: the Google News RSS search feed, which
//! aggregates most major publishers and needs no per-outlet HTML selectors.
//! Additional sources slot in as sibling modules returning the same
//! `Vec<RawArticle>` shape.
//!
//! Scrapers follow a shared policy:
//! - a failed feed request fails the stage
//! - a malformed individual item is logged and skipped
//! - results keep feed order, deduplicated by link

pub mod google_news;
