//! Prismic-compatible content API client
//!
//! Constructed once at startup with the repository endpoint and an optional
//! access token, then shared by everything that talks to the content
//! repository. The master ref is resolved lazily on first use and kept for
//! the process lifetime.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::OnceCell;

use super::document::{PostDetail, PostPage};

/// Characters escaped in query component values.
const QUERY_COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'?');

/// Errors raised by the content API client.
#[derive(Debug, Error)]
pub enum CmsError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("content API transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("content API returned status {0}")]
    Api(StatusCode),

    /// The response body did not match the expected shape.
    #[error("content API response did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// No document matches the requested identifier.
    #[error("no document matches uid {0:?}")]
    NotFound(String),

    /// The repository descriptor lists no master ref.
    #[error("repository descriptor has no master ref")]
    MissingRef,

    /// A next-page URL points outside the configured repository.
    #[error("page URL {0:?} does not belong to the configured API")]
    ForeignPageUrl(String),
}

/// A paginated search query: a document type predicate, an optional field
/// projection and a page size.
#[derive(Debug, Clone)]
pub struct Query {
    doc_type: String,
    fetch: Vec<String>,
    page_size: usize,
}

impl Query {
    /// Query for all documents of one type, API default order.
    pub fn doc_type(doc_type: &str) -> Self {
        Self {
            doc_type: doc_type.to_string(),
            fetch: Vec::new(),
            page_size: 20,
        }
    }

    /// Restrict returned documents to the given `type.field` projections.
    pub fn fetch(mut self, fields: &[&str]) -> Self {
        self.fetch = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Repository descriptor returned by the API root.
#[derive(Debug, Deserialize)]
struct ApiDescriptor {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,

    #[serde(rename = "isMasterRef", default)]
    is_master: bool,
}

/// Search responses for single-document lookups reuse the page envelope.
#[derive(Debug, Deserialize)]
struct DetailPage {
    results: Vec<PostDetail>,
}

impl DetailPage {
    /// The single matching document; an empty result set is a not-found.
    fn single(self, uid: &str) -> Result<PostDetail, CmsError> {
        self.results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound(uid.to_string()))
    }
}

/// Client for a Prismic-compatible content repository.
pub struct CmsClient {
    http: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
    master_ref: OnceCell<String>,
}

impl CmsClient {
    /// Create a client for the given API root, e.g.
    /// `https://repo.cdn.prismic.io/api/v2`.
    pub fn new(api_url: &str, access_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token,
            master_ref: OnceCell::new(),
        }
    }

    /// Run a paginated search query.
    pub async fn query(&self, query: &Query) -> Result<PostPage, CmsError> {
        let reference = self.master_ref().await?;
        let url = self.search_url(reference, query);
        self.get_json(&url).await
    }

    /// Fetch a previously returned next-page URL verbatim.
    ///
    /// The URL encodes all pagination state; nothing is re-derived locally.
    /// URLs pointing outside the configured repository are rejected.
    pub async fn fetch_page(&self, url: &str) -> Result<PostPage, CmsError> {
        if !self.owns_url(url) {
            return Err(CmsError::ForeignPageUrl(url.to_string()));
        }
        self.get_json(url).await
    }

    /// Fetch the single document of `doc_type` with the given uid.
    pub async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<PostDetail, CmsError> {
        let reference = self.master_ref().await?;
        let url = self.uid_url(reference, doc_type, uid);
        let page: DetailPage = self.get_json(&url).await?;
        page.single(uid)
    }

    /// Resolve the master ref, fetching the repository descriptor once.
    async fn master_ref(&self) -> Result<&str, CmsError> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let mut url = self.api_url.clone();
                if let Some(token) = &self.access_token {
                    url.push_str("?access_token=");
                    url.push_str(&encode(token));
                }
                let descriptor: ApiDescriptor = self.get_json(&url).await?;
                descriptor
                    .refs
                    .into_iter()
                    .find(|r| r.is_master)
                    .map(|r| r.reference)
                    .ok_or(CmsError::MissingRef)
            })
            .await?;
        Ok(reference)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CmsError> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Api(status));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Whether `url` belongs to the configured repository.
    fn owns_url(&self, url: &str) -> bool {
        match (url_origin(&self.api_url), url_origin(url)) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        }
    }

    fn search_url(&self, reference: &str, query: &Query) -> String {
        let predicate = format!("[[at(document.type,\"{}\")]]", query.doc_type);
        let mut url = format!(
            "{}/documents/search?ref={}&q={}",
            self.api_url,
            encode(reference),
            encode(&predicate)
        );
        if !query.fetch.is_empty() {
            url.push_str("&fetch=");
            url.push_str(&encode(&query.fetch.join(",")));
        }
        url.push_str(&format!("&pageSize={}", query.page_size));
        if let Some(token) = &self.access_token {
            url.push_str("&access_token=");
            url.push_str(&encode(token));
        }
        url
    }

    fn uid_url(&self, reference: &str, doc_type: &str, uid: &str) -> String {
        let predicate = format!("[[at(my.{}.uid,\"{}\")]]", doc_type, uid);
        let mut url = format!(
            "{}/documents/search?ref={}&q={}&pageSize=1",
            self.api_url,
            encode(reference),
            encode(&predicate)
        );
        if let Some(token) = &self.access_token {
            url.push_str("&access_token=");
            url.push_str(&encode(token));
        }
        url
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// Scheme + authority of a URL, e.g. `https://repo.cdn.example.io`.
fn url_origin(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    match rest.find('/') {
        Some(idx) => Some(&url[..scheme_end + 3 + idx]),
        None => Some(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CmsClient {
        CmsClient::new("https://blog.cdn.example.io/api/v2/", None)
    }

    #[test]
    fn test_search_url() {
        let query = Query::doc_type("post")
            .fetch(&["post.title", "post.subtitle", "post.author"])
            .page_size(2);
        let url = client().search_url("master-ref", &query);
        assert_eq!(
            url,
            "https://blog.cdn.example.io/api/v2/documents/search\
             ?ref=master-ref\
             &q=%5B%5Bat(document.type,%22post%22)%5D%5D\
             &fetch=post.title,post.subtitle,post.author\
             &pageSize=2"
        );
    }

    #[test]
    fn test_search_url_appends_access_token() {
        let client = CmsClient::new("https://blog.cdn.example.io/api/v2", Some("s3cret&".into()));
        let url = client.search_url("r", &Query::doc_type("post"));
        assert!(url.ends_with("&access_token=s3cret%26"));
    }

    #[test]
    fn test_uid_url() {
        let url = client().uid_url("master-ref", "post", "my-first-post");
        assert_eq!(
            url,
            "https://blog.cdn.example.io/api/v2/documents/search\
             ?ref=master-ref\
             &q=%5B%5Bat(my.post.uid,%22my-first-post%22)%5D%5D\
             &pageSize=1"
        );
    }

    #[test]
    fn test_url_origin() {
        assert_eq!(
            url_origin("https://repo.cdn.example.io/api/v2/documents"),
            Some("https://repo.cdn.example.io")
        );
        assert_eq!(
            url_origin("https://repo.cdn.example.io"),
            Some("https://repo.cdn.example.io")
        );
        assert_eq!(url_origin("not a url"), None);
    }

    #[test]
    fn test_empty_result_set_is_not_found() {
        let page = DetailPage {
            results: Vec::new(),
        };
        let err = page.single("foo").unwrap_err();
        assert!(matches!(err, CmsError::NotFound(uid) if uid == "foo"));
    }

    #[test]
    fn test_owns_url() {
        let client = client();
        assert!(client.owns_url(
            "https://blog.cdn.example.io/api/v2/documents/search?ref=x&page=2"
        ));
        assert!(!client.owns_url("https://attacker.example.com/api/v2/documents/search"));
        assert!(!client.owns_url("file:///etc/passwd"));
    }
}
