//! List posts from the content API

use anyhow::Result;

use crate::cms::{CmsClient, Query};
use crate::content::feed::{Feed, LoadOutcome};
use crate::App;

/// Print posts as `date - title [author]` lines.
///
/// With `all`, pagination is followed to exhaustion through the same
/// accumulation path the listing page uses.
pub async fn run(app: &App, all: bool) -> Result<()> {
    let client = CmsClient::new(
        &app.config.cms.api_url,
        app.config.cms.access_token.clone(),
    );
    let query = Query::doc_type("post")
        .fetch(&["post.title", "post.subtitle", "post.author"])
        .page_size(app.config.listing.page_size);

    let mut feed = Feed::from_page(&client.query(&query).await?);
    if all {
        while feed.load_more(&client).await? == LoadOutcome::Loaded {}
    }

    println!("Posts ({}):", feed.posts().len());
    for post in feed.posts() {
        let date = if post.published.is_empty() {
            "(unpublished)"
        } else {
            post.published.as_str()
        };
        println!("  {} - {} [{}]", date, post.title, post.author);
    }
    if feed.has_more() {
        println!("  ... more pages available, rerun with --all");
    }

    Ok(())
}
