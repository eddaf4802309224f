//! Blog content pipeline: frontmatter, markdown rendering, table of contents,
//! excerpts, listings and the feed.

pub mod case_studies;
pub mod categories;
pub mod feed;
pub mod frontmatter;
pub mod posts;
pub mod render;

use std::path::PathBuf;

use thiserror::Error;

pub use categories::{category_info, category_or_default, Category, CATEGORIES};
pub use posts::{CategoryCount, PostPreview, PostRepository};
pub use render::{add_heading_ids, excerpt, extract_headings, render_post, Heading, RenderedPost};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Post has no frontmatter block")]
    MissingFrontmatter,

    #[error("Invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Failed to write feed: {0}")]
    Feed(String),
}
