//! Sentiment scoring, topic extraction, and comparative aggregation.
//!
//! The analysis stage sits between fetching and output. It is split into
//! three submodules with one-way dependencies:
//!
//! | Module | Role |
//! |--------|------|
//! | [`sentiment`] | Scores raw articles with a valence lexicon |
//! | [`topics`] | Extracts ranked keywords from summaries |
//! | [`aggregate`] | Builds the comparative report over a scored batch |
//!
//! Everything in here is synchronous and pure. Network fetching happens
//! before this stage, narration and file output after it, so the whole
//! analysis of a batch is a plain function call that cannot fail.

pub mod aggregate;
pub mod sentiment;
pub mod topics;
