//! Static site generation for omn.
//!
//! Renders every page the server would serve into plain HTML files, so the
//! output directory can be published to any static host.

mod builder;

pub use builder::{BuildError, BuildReport, StaticSiteBuilder};
