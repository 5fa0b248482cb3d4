//! Documentation tools module.
//!
//! - `client`: cached HTTP access to the documentation site
//! - `index`: link extraction from the index page
//! - `search`: fuzzy search over the index (`search_docs`)
//! - `page`: raw page retrieval (`get_page`)

pub mod client;
pub mod index;
pub mod page;
pub mod search;

pub use client::{DocsClient, DocsError};
pub use index::DocEntry;
pub use page::{GetPageParams, GetPageTool};
pub use search::{SearchDocsParams, SearchDocsTool};
