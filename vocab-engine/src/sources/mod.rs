//! Term source variants
//!
//! - [`ListSource`]: fixed built-in list, ranked in memory
//! - [`FileSource`]: downloaded delimited file, ranked in memory
//! - [`HttpSource`]: one remote request per search
//!
//! List and file sources share the [`Catalog`] for lazy loading and ranking.

pub mod catalog;
pub mod file;
pub mod http;
pub mod list;

pub use catalog::{rank, Catalog};
pub use file::{FileSource, FileSourceConfig, LineExtractor};
pub use http::{HttpSource, HttpSourceConfig, ResponseParser};
pub use list::{ListSource, TermsLoader};
