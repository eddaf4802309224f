//! RSS 2.0 feed of the published post listing.

use chrono::{NaiveTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::categories::category_or_default;
use super::posts::PostPreview;
use super::ContentError;

/// Channel-level metadata for the feed.
#[derive(Debug, Clone)]
pub struct FeedChannel<'a> {
    pub site_url: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

fn feed_err(e: impl std::fmt::Display) -> ContentError {
    ContentError::Feed(e.to_string())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), ContentError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(feed_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(feed_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(feed_err)?;
    Ok(())
}

/// Render `posts` (already filtered and ordered) as an RSS document.
pub fn rss_feed(channel: &FeedChannel<'_>, posts: &[PostPreview]) -> Result<String, ContentError> {
    let base = channel.site_url.trim_end_matches('/');
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(feed_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("rss").with_attributes([("version", "2.0")]),
        ))
        .map_err(feed_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(feed_err)?;

    text_element(&mut writer, "title", channel.title)?;
    text_element(&mut writer, "link", &format!("{}/blog", base))?;
    text_element(&mut writer, "description", channel.description)?;
    text_element(&mut writer, "lastBuildDate", &Utc::now().to_rfc2822())?;

    for post in posts {
        let link = format!("{}/blog/{}", base, post.slug);
        let summary = if post.frontmatter.description.is_empty() {
            post.excerpt.as_str()
        } else {
            post.frontmatter.description.as_str()
        };

        writer
            .write_event(Event::Start(BytesStart::new("item")))
            .map_err(feed_err)?;
        text_element(&mut writer, "title", &post.frontmatter.title)?;
        text_element(&mut writer, "link", &link)?;
        text_element(&mut writer, "guid", &link)?;
        text_element(&mut writer, "description", summary)?;
        text_element(
            &mut writer,
            "category",
            category_or_default(&post.frontmatter.category).label,
        )?;
        if let Some(date) = post.frontmatter.published_on() {
            let published = date.and_time(NaiveTime::default()).and_utc();
            text_element(&mut writer, "pubDate", &published.to_rfc2822())?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("item")))
            .map_err(feed_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(feed_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(feed_err)?;

    String::from_utf8(writer.into_inner()).map_err(feed_err)
}
