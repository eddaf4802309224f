use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error_response;
use crate::content::case_studies::CaseStudy;
use crate::content::feed::{rss_feed, FeedChannel};
use crate::content::{Category, ContentError, PostRepository, RenderedPost};
use crate::state::AppState;

const DEFAULT_RELATED_LIMIT: usize = 3;
const MAX_RELATED_LIMIT: usize = 12;

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RelatedQuery {
    limit: Option<usize>,
}

/// A post plus the lookups the article page needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostResponse {
    #[serde(flatten)]
    post: RenderedPost,
    category_info: &'static Category,
    case_study: Option<&'static CaseStudy>,
    show_toc: bool,
}

impl From<RenderedPost> for PostResponse {
    fn from(post: RenderedPost) -> Self {
        Self {
            category_info: post.category(),
            case_study: post.case_study(),
            show_toc: post.show_toc(),
            post,
        }
    }
}

/// Content reads touch the filesystem; keep them off the async workers.
async fn with_posts<T, F>(posts: PostRepository, f: F) -> Result<T, Response>
where
    F: FnOnce(&PostRepository) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&posts))
        .await
        .map_err(|e| {
            log::error!("Content task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })
}

fn content_error(slug: &str, err: ContentError) -> Response {
    log::error!("Failed to render post '{}': {}", slug, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load post")
}

pub(super) async fn list_posts_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let category = query.category.filter(|c| !c.trim().is_empty());
    match with_posts(state.posts.clone(), move |repo| {
        repo.list_posts(category.as_deref())
    })
    .await
    {
        Ok(posts) => Json(posts).into_response(),
        Err(resp) => resp,
    }
}

pub(super) async fn get_post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let lookup = slug.clone();
    let result = match with_posts(state.posts.clone(), move |repo| {
        repo.get_post_by_slug(&lookup)
    })
    .await
    {
        Ok(result) => result,
        Err(resp) => return resp,
    };

    match result {
        Ok(Some(post)) => Json(PostResponse::from(post)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Post not found"),
        Err(e) => content_error(&slug, e),
    }
}

pub(super) async fn related_posts_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<RelatedQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RELATED_LIMIT)
        .min(MAX_RELATED_LIMIT);
    let lookup = slug.clone();
    let result = match with_posts(state.posts.clone(), move |repo| {
        repo.get_post_by_slug(&lookup).map(|found| {
            found.map(|post| repo.related_posts(&post.slug, &post.frontmatter.category, limit))
        })
    })
    .await
    {
        Ok(result) => result,
        Err(resp) => return resp,
    };

    match result {
        Ok(Some(related)) => Json(related).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Post not found"),
        Err(e) => content_error(&slug, e),
    }
}

pub(super) async fn categories_handler(State(state): State<AppState>) -> Response {
    match with_posts(state.posts.clone(), |repo| repo.category_counts()).await {
        Ok(counts) => Json(counts).into_response(),
        Err(resp) => resp,
    }
}

pub(super) async fn rss_handler(State(state): State<AppState>) -> Response {
    let config = state.config.clone();
    let rendered = match with_posts(state.posts.clone(), move |repo| {
        let posts = repo.list_posts(None);
        let channel = FeedChannel {
            site_url: &config.site_url,
            title: &config.site_title,
            description: &config.site_description,
        };
        rss_feed(&channel, &posts)
    })
    .await
    {
        Ok(rendered) => rendered,
        Err(resp) => return resp,
    };

    match rendered {
        Ok(xml) => (
            [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
            xml,
        )
            .into_response(),
        Err(e) => {
            log::error!("Failed to build feed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
