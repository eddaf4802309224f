//! Markdown → HTML rendering for blog posts.
//!
//! Order matters: `add_heading_ids` must run before `extract_headings`. The
//! table of contents is read back out of the id-annotated HTML, so extracting
//! first finds nothing.
//!
//! HTML is NOT sanitized. Post bodies come from the content directory and are
//! trusted; raw HTML in markdown passes straight through.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use serde::Serialize;

use super::case_studies::{case_study, CaseStudy};
use super::categories::{category_or_default, Category};
use super::frontmatter::{parse_post, PostFrontmatter};
use super::ContentError;
use crate::util::slugify;

pub const WORDS_PER_MINUTE: usize = 200;

/// Plain-text characters kept in a list-view excerpt.
pub const EXCERPT_CHARS: usize = 160;

const ELLIPSIS: &str = "...";

/// A table of contents is only worth showing past this many headings.
const MIN_TOC_HEADINGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: usize,
}

impl ReadingTime {
    pub fn label(&self) -> String {
        format!("{} min read", self.minutes)
    }
}

/// A fully rendered post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPost {
    pub slug: String,
    #[serde(flatten)]
    pub frontmatter: PostFrontmatter,
    /// HTML with heading ids already assigned.
    pub content: String,
    pub headings: Vec<Heading>,
    pub read_time: String,
    pub read_time_minutes: usize,
    pub excerpt: String,
}

impl RenderedPost {
    pub fn is_published(&self) -> bool {
        self.frontmatter.is_published()
    }

    pub fn show_toc(&self) -> bool {
        self.headings.len() >= MIN_TOC_HEADINGS
    }

    pub fn category(&self) -> &'static Category {
        category_or_default(&self.frontmatter.category)
    }

    pub fn case_study(&self) -> Option<&'static CaseStudy> {
        self.frontmatter
            .related_case_study
            .as_deref()
            .and_then(case_study)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full pipeline over a raw post file (frontmatter + markdown).
pub fn render_post(slug: &str, raw: &str) -> Result<RenderedPost, ContentError> {
    let (frontmatter, body) = parse_post(raw)?;

    let reading = reading_time(body);
    let content = add_heading_ids(&render_markdown(body));
    let headings = extract_headings(&content);
    let excerpt = excerpt(&content);

    Ok(RenderedPost {
        slug: slug.to_string(),
        frontmatter,
        content,
        headings,
        read_time: reading.label(),
        read_time_minutes: reading.minutes,
        excerpt,
    })
}

/// CommonMark plus GFM tables, strikethrough, task lists and footnotes.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Word count at `WORDS_PER_MINUTE`, rounded up.
pub fn reading_time(text: &str) -> ReadingTime {
    let words = text.split_whitespace().count();
    ReadingTime {
        words,
        minutes: words.div_ceil(WORDS_PER_MINUTE),
    }
}

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<h([23])([^>]*)>(.*?)</h([23])>").unwrap())
}

fn id_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?:^|\s)id\s*=\s*"([^"]*)""#).unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Fragment id for a heading's text. Empty slugs become "section".
pub fn slugify_heading(text: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Give every `<h2>`/`<h3>` without an id a unique one.
///
/// Collisions get a numeric suffix: "foo", "foo-1", "foo-2". Ids already
/// present in the document are kept and reserved. The uniqueness scope is this
/// one call.
pub fn add_heading_ids(html: &str) -> String {
    let mut used: HashSet<String> = heading_re()
        .captures_iter(html)
        .filter_map(|c| id_attr_re().captures(&c[2]).map(|id| id[1].to_string()))
        .collect();
    let mut suffixes: HashMap<String, usize> = HashMap::new();

    heading_re()
        .replace_all(html, |caps: &Captures| {
            let (level, attrs, inner, close) = (&caps[1], &caps[2], &caps[3], &caps[4]);
            if level != close || id_attr_re().is_match(attrs) {
                return caps[0].to_string();
            }

            let base = slugify_heading(&plain_text(inner));
            let mut id = base.clone();
            while used.contains(&id) {
                let n = suffixes.entry(base.clone()).or_insert(0);
                *n += 1;
                id = format!("{}-{}", base, n);
            }
            used.insert(id.clone());

            format!("<h{}{} id=\"{}\">{}</h{}>", level, attrs, id, inner, close)
        })
        .into_owned()
}

/// Table of contents: every `<h2>`/`<h3>` that carries an id, in order.
pub fn extract_headings(html: &str) -> Vec<Heading> {
    heading_re()
        .captures_iter(html)
        .filter(|caps| caps[1] == caps[4])
        .filter_map(|caps| {
            let id = id_attr_re().captures(&caps[2])?[1].to_string();
            let level = caps[1].parse().ok()?;
            Some(Heading {
                id,
                text: plain_text(&caps[3]),
                level,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Strip tags, decode the basic entities, collapse whitespace.
pub fn plain_text(html: &str) -> String {
    let stripped = tag_re().replace_all(html, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// List-view excerpt: plain text cut to `EXCERPT_CHARS` with "..." appended
/// when anything was cut.
pub fn excerpt(html: &str) -> String {
    let text = plain_text(html);
    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_headings_get_distinct_ids() {
        let html = render_markdown("## Foo\n\n## Foo");
        let with_ids = add_heading_ids(&html);
        let headings = extract_headings(&with_ids);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].id, "foo");
        assert_eq!(headings[1].id, "foo-1");
        assert_eq!(headings[0].text, "Foo");
        assert_eq!(headings[1].level, 2);
    }

    #[test]
    fn test_extract_before_ids_finds_nothing() {
        let html = render_markdown("## Foo\n\n## Foo");
        assert!(extract_headings(&html).is_empty());
    }

    #[test]
    fn test_only_h2_and_h3_get_ids() {
        let html = render_markdown("# Title\n\n## Setup\n\n### Step One\n\n#### Detail");
        let with_ids = add_heading_ids(&html);
        assert!(with_ids.contains("<h1>Title</h1>"));
        assert!(with_ids.contains("<h2 id=\"setup\">Setup</h2>"));
        assert!(with_ids.contains("<h3 id=\"step-one\">Step One</h3>"));
        assert!(with_ids.contains("<h4>Detail</h4>"));

        let levels: Vec<u8> = extract_headings(&with_ids).iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![2, 3]);
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let html = render_markdown("## Why **Zapier** & Make Fail");
        let headings = extract_headings(&add_heading_ids(&html));
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].id, "why-zapier-make-fail");
        assert_eq!(headings[0].text, "Why Zapier & Make Fail");
    }

    #[test]
    fn test_collision_with_suffixed_heading() {
        let html = render_markdown("## Foo 1\n\n## Foo\n\n## Foo");
        let ids: Vec<String> = extract_headings(&add_heading_ids(&html))
            .into_iter()
            .map(|h| h.id)
            .collect();
        assert_eq!(ids, vec!["foo-1", "foo", "foo-2"]);
    }

    #[test]
    fn test_existing_ids_are_kept() {
        let html = "<h2 id=\"custom\">Custom</h2>\n<h2>Custom</h2>\n";
        let with_ids = add_heading_ids(html);
        let headings = extract_headings(&with_ids);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].id, "custom");
        assert_eq!(headings[1].id, "custom-1");
    }

    #[test]
    fn test_data_id_attribute_is_not_an_id() {
        let with_ids = add_heading_ids("<h2 data-id=\"x\">Pricing</h2>\n");
        assert_eq!(with_ids, "<h2 data-id=\"x\" id=\"pricing\">Pricing</h2>\n");
        let headings = extract_headings(&with_ids);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].id, "pricing");
    }

    #[test]
    fn test_symbol_only_heading_gets_fallback_id() {
        let html = add_heading_ids(&render_markdown("## ???\n\n## !!!"));
        let ids: Vec<String> = extract_headings(&html).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["section", "section-1"]);
    }

    #[test]
    fn test_id_scope_is_per_document() {
        let first = add_heading_ids(&render_markdown("## Foo"));
        let second = add_heading_ids(&render_markdown("## Foo"));
        assert_eq!(first, second);
        assert!(second.contains("id=\"foo\""));
    }

    #[test]
    fn test_tables_are_rendered() {
        let md = "| Tool | Cost |\n|------|------|\n| Zapier | $50 |\n";
        let html = render_markdown(md);
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>Zapier</td>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render_markdown("<div class=\"callout\">Note</div>\n");
        assert!(html.contains("<div class=\"callout\">Note</div>"));
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(reading_time("").minutes, 0);
        assert_eq!(reading_time("one").minutes, 1);
        let text = vec!["word"; 200].join(" ");
        assert_eq!(reading_time(&text).minutes, 1);
        let text = vec!["word"; 201].join(" ");
        let rt = reading_time(&text);
        assert_eq!(rt.words, 201);
        assert_eq!(rt.minutes, 2);
        assert_eq!(rt.label(), "2 min read");
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let long = format!("<p>{}</p>", "lorem ipsum dolor ".repeat(40));
        let ex = excerpt(&long);
        assert!(ex.chars().count() <= EXCERPT_CHARS + ELLIPSIS.len());
        assert!(ex.ends_with("..."));
        assert!(!ex.contains('<'));
    }

    #[test]
    fn test_short_excerpt_is_untouched() {
        let ex = excerpt("<p>Short   post\n body.</p>");
        assert_eq!(ex, "Short post body.");
    }

    #[test]
    fn test_plain_text_decodes_entities() {
        assert_eq!(plain_text("<p>R&amp;D &lt;fast&gt;</p>"), "R&D <fast>");
    }

    #[test]
    fn test_render_post_pipeline() {
        let raw = "---\ntitle: Pipeline\ndate: 2025-03-01\ncategory: tutorials\n\
relatedCaseStudy: watch-tower\n---\n## One\n\ntext\n\n## Two\n\n### Three\n";
        let post = render_post("pipeline", raw).expect("renders");
        assert_eq!(post.slug, "pipeline");
        assert_eq!(post.headings.len(), 3);
        assert!(post.show_toc());
        assert!(post.content.contains("id=\"one\""));
        assert_eq!(post.read_time, "1 min read");
        assert_eq!(post.category().label, "Tutorials");
        assert_eq!(post.case_study().map(|c| c.key), Some("watch-tower"));
        assert_eq!(post.excerpt, "One text Two Three");
    }

    #[test]
    fn test_rendered_post_serializes_flat() {
        let raw = "---\ntitle: Flat\ndate: 2025-03-01\ncategory: strategy\n---\nbody";
        let value = serde_json::to_value(render_post("flat", raw).unwrap()).unwrap();
        assert_eq!(value["title"], "Flat");
        assert_eq!(value["slug"], "flat");
        assert_eq!(value["readTimeMinutes"], 1);
        assert!(value.get("relatedCaseStudy").is_none());
    }
}
