//! Series acquisition: endpoint sources, payload validation, and the fetcher.

pub mod fetcher;
pub mod payload;
pub mod sample;
pub mod source;

pub use fetcher::{DataFetcher, FetchedSeries};
pub use sample::DemoSource;
pub use source::{AnySource, Endpoint, FileSource, HttpSource, SeriesSource};
