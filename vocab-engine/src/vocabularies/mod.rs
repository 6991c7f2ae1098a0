//! Built-in vocabularies
//!
//! | prefix       | kind |
//! |--------------|------|
//! | `iso639-2`   | file |
//! | `dcmitype`   | list |
//! | `schema`     | file |
//! | `mime`       | file |
//! | `fast-topic` | http |
//! | `fast-forms` | http |
//! | `wikidata`   | http |
//! | `viaf`       | http |
//! | `iso15924`   | file |
//!
//! Each module exposes its static metadata and a constructor taking the
//! shared [`SourceContext`](crate::types::SourceContext).

pub mod dcmitype;
pub mod fast;
pub mod iso15924;
pub mod iso639_2;
pub mod mime;
pub mod schema;
pub mod viaf;
pub mod wikidata;
