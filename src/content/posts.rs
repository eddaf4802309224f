//! Flat-file post repository.
//!
//! One `.md` or `.mdx` file per post in a single directory; the file stem is
//! the slug. Nothing is cached: every call re-reads and re-renders the
//! directory.
//!
//! Drafts (`published: false`) never appear in listings, counts or the feed,
//! but `get_post_by_slug` still returns them for preview.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use super::categories::{Category, CATEGORIES};
use super::frontmatter::PostFrontmatter;
use super::render::{render_post, RenderedPost};
use super::ContentError;

const EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Post summary for list views. Same as `RenderedPost` minus the body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPreview {
    pub slug: String,
    #[serde(flatten)]
    pub frontmatter: PostFrontmatter,
    pub read_time: String,
    pub read_time_minutes: usize,
    pub excerpt: String,
}

impl From<RenderedPost> for PostPreview {
    fn from(post: RenderedPost) -> Self {
        Self {
            slug: post.slug,
            frontmatter: post.frontmatter,
            read_time: post.read_time,
            read_time_minutes: post.read_time_minutes,
            excerpt: post.excerpt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[serde(flatten)]
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct PostRepository {
    dir: PathBuf,
}

impl PostRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every slug with a post file, sorted. A missing directory has none.
    pub fn all_slugs(&self) -> Vec<String> {
        let mut slugs: Vec<String> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| post_slug(entry.path()))
            .collect();
        slugs.sort();
        slugs.dedup();
        slugs
    }

    /// Resolve a slug to its file, preferring `.mdx` over `.md`.
    fn path_for(&self, slug: &str) -> Option<PathBuf> {
        if !is_safe_slug(slug) {
            return None;
        }
        EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
    }

    /// Fetch and render one post, drafts included. `Ok(None)` when no file
    /// matches the slug.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<RenderedPost>, ContentError> {
        let Some(path) = self.path_for(slug) else {
            return Ok(None);
        };
        let raw = fs::read_to_string(&path).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        render_post(slug, &raw).map(Some)
    }

    /// Published posts, newest first, optionally limited to one category.
    ///
    /// Files that fail to read or parse are skipped with a warning so one bad
    /// post never hides the rest.
    pub fn list_posts(&self, category: Option<&str>) -> Vec<PostPreview> {
        let mut posts: Vec<RenderedPost> = self
            .all_slugs()
            .into_iter()
            .filter_map(|slug| match self.get_post_by_slug(&slug) {
                Ok(post) => post,
                Err(e) => {
                    log::warn!("Skipping post '{}' in {}: {}", slug, self.dir.display(), e);
                    None
                }
            })
            .filter(RenderedPost::is_published)
            .filter(|post| category.map_or(true, |c| post.frontmatter.category == c))
            .collect();

        // Undated posts sink to the bottom; same-day posts order by slug.
        posts.sort_by(|a, b| {
            Reverse(a.frontmatter.published_on())
                .cmp(&Reverse(b.frontmatter.published_on()))
                .then_with(|| a.slug.cmp(&b.slug))
        });
        posts.into_iter().map(PostPreview::from).collect()
    }

    /// Same-category posts other than `current_slug`, newest first.
    pub fn related_posts(
        &self,
        current_slug: &str,
        category: &str,
        limit: usize,
    ) -> Vec<PostPreview> {
        self.list_posts(Some(category))
            .into_iter()
            .filter(|post| post.slug != current_slug)
            .take(limit)
            .collect()
    }

    /// Published-post count for every known category, in table order.
    pub fn category_counts(&self) -> Vec<CategoryCount> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for post in self.list_posts(None) {
            *counts.entry(post.frontmatter.category).or_insert(0) += 1;
        }
        CATEGORIES
            .iter()
            .map(|category| CategoryCount {
                category: *category,
                count: counts.get(category.slug).copied().unwrap_or(0),
            })
            .collect()
    }
}

fn post_slug(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    is_safe_slug(stem).then(|| stem.to_string())
}

/// Slugs are bare file stems: no separators, no dot-prefixed names.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
        && !slug.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_post(dir: &Path, file: &str, title: &str, date: &str, category: &str, extra: &str) {
        let raw = format!(
            "---\ntitle: {}\ndescription: about {}\ndate: {}\ncategory: {}\ntags: [a]\nkeywords: [b]\n{}---\n## Intro\n\nSome body text for {}.\n",
            title, title, date, category, extra, title
        );
        fs::write(dir.join(file), raw).expect("write post");
    }

    fn fixture() -> (tempfile::TempDir, PostRepository) {
        let dir = tempfile::tempdir().expect("tempdir");
        write_post(dir.path(), "old-automation.md", "Old", "2024-06-01", "automation", "");
        write_post(dir.path(), "new-automation.md", "New", "2025-03-10", "automation", "");
        write_post(dir.path(), "mid-strategy.mdx", "Mid", "2024-12-24", "strategy", "");
        write_post(
            dir.path(),
            "draft-automation.md",
            "Draft",
            "2025-04-01",
            "automation",
            "published: false\n",
        );
        fs::write(dir.path().join("notes.txt"), "not a post").unwrap();
        let repo = PostRepository::new(dir.path());
        (dir, repo)
    }

    #[test]
    fn test_all_slugs_only_post_files() {
        let (_dir, repo) = fixture();
        assert_eq!(
            repo.all_slugs(),
            vec!["draft-automation", "mid-strategy", "new-automation", "old-automation"]
        );
    }

    #[test]
    fn test_list_posts_newest_first_without_drafts() {
        let (_dir, repo) = fixture();
        let slugs: Vec<String> = repo.list_posts(None).into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["new-automation", "mid-strategy", "old-automation"]);
    }

    #[test]
    fn test_draft_still_fetchable_by_slug() {
        let (_dir, repo) = fixture();
        let post = repo
            .get_post_by_slug("draft-automation")
            .expect("read ok")
            .expect("draft exists");
        assert!(!post.is_published());
        assert!(repo
            .list_posts(None)
            .iter()
            .all(|p| p.slug != "draft-automation"));
    }

    #[test]
    fn test_list_posts_by_category() {
        let (_dir, repo) = fixture();
        let slugs: Vec<String> = repo
            .list_posts(Some("automation"))
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["new-automation", "old-automation"]);
        assert!(repo.list_posts(Some("tutorials")).is_empty());
    }

    #[test]
    fn test_related_posts_excludes_current_and_limits() {
        let (dir, repo) = fixture();
        write_post(dir.path(), "third-automation.md", "Third", "2024-01-01", "automation", "");

        let related = repo.related_posts("new-automation", "automation", 3);
        let slugs: Vec<&str> = related.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["old-automation", "third-automation"]);

        let related = repo.related_posts("new-automation", "automation", 1);
        assert_eq!(related.len(), 1);
    }

    #[test]
    fn test_missing_post_is_none() {
        let (_dir, repo) = fixture();
        assert!(repo.get_post_by_slug("nope").unwrap().is_none());
        assert!(repo.get_post_by_slug("../etc/passwd").unwrap().is_none());
    }

    #[test]
    fn test_mdx_preferred_over_md() {
        let (dir, repo) = fixture();
        write_post(dir.path(), "mid-strategy.md", "Shadowed", "2024-12-24", "strategy", "");
        let post = repo.get_post_by_slug("mid-strategy").unwrap().unwrap();
        assert_eq!(post.frontmatter.title, "Mid");
        assert_eq!(
            repo.all_slugs().iter().filter(|s| *s == "mid-strategy").count(),
            1
        );
    }

    #[test]
    fn test_malformed_post_is_skipped() {
        let (dir, repo) = fixture();
        fs::write(dir.path().join("broken.md"), "---\ntitle: [oops\n---\nbody").unwrap();
        assert_eq!(repo.list_posts(None).len(), 3);
        assert!(repo.get_post_by_slug("broken").is_err());
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let repo = PostRepository::new("/definitely/not/here");
        assert!(repo.all_slugs().is_empty());
        assert!(repo.list_posts(None).is_empty());
    }

    #[test]
    fn test_category_counts_skip_drafts() {
        let (_dir, repo) = fixture();
        let counts = repo.category_counts();
        assert_eq!(counts.len(), CATEGORIES.len());
        let automation = counts
            .iter()
            .find(|c| c.category.slug == "automation")
            .unwrap();
        assert_eq!(automation.count, 2);
        let tutorials = counts.iter().find(|c| c.category.slug == "tutorials").unwrap();
        assert_eq!(tutorials.count, 0);
    }

    #[test]
    fn test_preview_has_excerpt_not_content() {
        let (_dir, repo) = fixture();
        let preview = &repo.list_posts(None)[0];
        assert_eq!(preview.excerpt, "Intro Some body text for New.");
        let value = serde_json::to_value(preview).unwrap();
        assert!(value.get("content").is_none());
        assert_eq!(value["title"], "New");
    }
}
