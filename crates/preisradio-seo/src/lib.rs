//! Structured data, page metadata, sitemaps and robots rules for the storefront.
//!
//! Everything here is synchronous and free of I/O. Inputs arrive through
//! [`SeoContext`] so the output depends only on the arguments.

pub mod context;
pub mod error;
pub mod metadata;
pub mod rating;
pub mod robots;
pub mod schema;
pub mod sitemap;
pub mod text;

pub use context::SeoContext;
pub use error::SeoError;
pub use metadata::{OpenGraph, PageMetadata, TwitterCard};
pub use rating::{synthetic_rating, SyntheticRating};
pub use robots::robots_txt;
pub use sitemap::{ChangeFrequency, SitemapEntry};
