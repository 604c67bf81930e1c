//! HTTP serving layer
//!
//! Routes: the listing page, the load-more proxy it calls back into, and
//! the post pages. Startup warms the caches: the initial listing page is
//! fetched, every known post identifier is enumerated and pre-rendered.
//! Unknown identifiers are generated on first request, with the response
//! blocked until the fetch resolves.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use axum::{
    extract::{Path, Query as UrlQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::cache::{ListingCache, PostCache};
use crate::cms::document::PostPage;
use crate::cms::{CmsClient, CmsError, Query};
use crate::content::feed::{transform_page, DisplayPost, Feed, LoadOutcome};
use crate::content::post::PostView;
use crate::templates::TemplateRenderer;
use crate::App;

/// Shared server state
pub struct ServerState {
    client: CmsClient,
    renderer: TemplateRenderer,
    site_title: String,
    listing_query: Query,
    listing: RwLock<ListingCache>,
    posts: RwLock<PostCache>,
}

/// Start the blog server.
pub async fn start(app: &App, ip: &str, port: u16) -> Result<()> {
    let client = CmsClient::new(
        &app.config.cms.api_url,
        app.config.cms.access_token.clone(),
    );
    let listing_query = Query::doc_type("post")
        .fetch(&["post.title", "post.subtitle", "post.author"])
        .page_size(app.config.listing.page_size);

    let state = Arc::new(ServerState {
        client,
        renderer: TemplateRenderer::new()?,
        site_title: app.config.site.title.clone(),
        listing_query,
        listing: RwLock::new(ListingCache::new(Duration::from_secs(
            app.config.listing.revalidate_secs,
        ))),
        posts: RwLock::new(PostCache::default()),
    });

    warm_up(&state).await?;

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/api/posts", get(load_more_handler))
        .route("/post/:uid", get(post_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");
    axum::serve(listener, router).await?;

    Ok(())
}

/// Prime the listing cache and pre-render every known post.
///
/// A failure of the enumeration query aborts startup; a single post
/// failing to pre-render is logged and left to the on-demand path.
async fn warm_up(state: &Arc<ServerState>) -> Result<()> {
    let page = state
        .client
        .query(&state.listing_query)
        .await
        .context("initial listing fetch failed")?;
    state.listing.write().await.store(page);

    let uids = enumerate_post_uids(state)
        .await
        .context("post path enumeration failed")?;
    tracing::info!("Pre-rendering {} posts", uids.len());

    for uid in uids {
        match render_post_page(state, &uid).await {
            Ok(html) => {
                state.posts.write().await.insert(uid, html);
            }
            Err(e) => {
                tracing::warn!("Pre-render of post {} failed: {}", uid, e);
            }
        }
    }

    Ok(())
}

/// Every post uid, following pagination to exhaustion.
async fn enumerate_post_uids(state: &ServerState) -> Result<Vec<String>, CmsError> {
    let query = Query::doc_type("post").page_size(100);
    let mut feed = Feed::from_page(&state.client.query(&query).await?);
    while feed.load_more(&state.client).await? == LoadOutcome::Loaded {}
    Ok(feed.posts().iter().map(|post| post.uid.clone()).collect())
}

/// GET /: the listing page with its initial page embedded.
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let page = match current_listing(&state).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Listing fetch failed: {}", e);
            return (StatusCode::BAD_GATEWAY, "content API unavailable").into_response();
        }
    };

    let posts = transform_page(&page);
    match state
        .renderer
        .render_index(&state.site_title, &posts, page.next_page.as_deref())
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Listing render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "render error").into_response()
        }
    }
}

/// Cached listing page, refreshed once the revalidation window has passed.
///
/// Requests in the stale window may still observe the previous copy; a
/// failed refresh falls back to it when one exists.
async fn current_listing(state: &ServerState) -> Result<PostPage, CmsError> {
    {
        let cache = state.listing.read().await;
        if let Some((page, true)) = cache.get() {
            return Ok(page.clone());
        }
    }

    match state.client.query(&state.listing_query).await {
        Ok(page) => {
            state.listing.write().await.store(page.clone());
            Ok(page)
        }
        Err(e) => {
            let cache = state.listing.read().await;
            match cache.get() {
                Some((page, _)) => {
                    tracing::warn!("Listing refresh failed, serving stale copy: {}", e);
                    Ok(page.clone())
                }
                None => Err(e),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoadMoreParams {
    next: String,
}

/// Display-transformed page in the shape the listing script consumes.
#[derive(Debug, Serialize)]
struct LoadMoreResponse {
    results: Vec<DisplayPost>,
    next_page: Option<String>,
}

/// GET /api/posts?next={cursor}: fetch a continuation pointer and return
/// the transformed page.
async fn load_more_handler(
    State(state): State<Arc<ServerState>>,
    UrlQuery(params): UrlQuery<LoadMoreParams>,
) -> Response {
    match state.client.fetch_page(&params.next).await {
        Ok(page) => {
            let results = transform_page(&page);
            Json(LoadMoreResponse {
                results,
                next_page: page.next_page,
            })
            .into_response()
        }
        Err(CmsError::ForeignPageUrl(url)) => {
            tracing::warn!("Rejected foreign page cursor {:?}", url);
            (StatusCode::BAD_REQUEST, "invalid page cursor").into_response()
        }
        Err(e) => {
            tracing::error!("Load-more fetch failed: {}", e);
            (StatusCode::BAD_GATEWAY, "content API unavailable").into_response()
        }
    }
}

/// GET /post/{uid}: cached render when present, blocking fetch otherwise.
///
/// A fetch failure never propagates to the response; the page degrades to
/// the transitional loading state and nothing is cached, so the next
/// request for the identifier tries again.
async fn post_handler(State(state): State<Arc<ServerState>>, Path(uid): Path<String>) -> Response {
    if let Some(html) = state.posts.read().await.get(&uid).map(str::to_owned) {
        return Html(html).into_response();
    }

    match render_post_page(&state, &uid).await {
        Ok(html) => {
            state.posts.write().await.insert(uid, html.clone());
            Html(html).into_response()
        }
        Err(e) => {
            tracing::warn!("Post {} unavailable: {}", uid, e);
            match state.renderer.render_loading(&state.site_title) {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!("Loading render failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "render error").into_response()
                }
            }
        }
    }
}

/// Fetch one post and render its page.
async fn render_post_page(state: &ServerState, uid: &str) -> Result<String> {
    let detail = state.client.get_by_uid("post", uid).await?;
    let view = PostView::from_detail(&detail);
    state.renderer.render_post(&state.site_title, &view)
}
