use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::foundation::core::Glyph;
use crate::foundation::error::{GlyphError, KakijunResult};
use crate::glyph::model::{GlyphDocument, StrokeGeometry};

/// Outcome of resolving one glyph, shared by every caller.
pub type Resolution = Result<Arc<StrokeGeometry>, GlyphError>;

/// Source of raw stroke data.
///
/// [`GlyphStore`] talks to the outside world only through this seam, so
/// tests can substitute in-memory fetchers and exercise the cache without
/// network access.
#[async_trait]
pub trait GlyphFetcher: Send + Sync {
    /// Fetch the stroke description for one glyph. Called at most once per
    /// glyph per store lifetime.
    async fn fetch(&self, glyph: Glyph) -> Result<StrokeGeometry, GlyphError>;
}

/// Options for [`HttpGlyphFetcher`].
#[derive(Clone, Debug)]
pub struct HttpFetcherOpts {
    /// Base URL the per-character documents hang off of.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpFetcherOpts {
    fn default() -> Self {
        Self {
            base_url: "https://cdn.jsdelivr.net/npm/hanzi-writer-data@2.0".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP fetcher issuing `GET {base_url}/{character}.json`.
pub struct HttpGlyphFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGlyphFetcher {
    pub fn new(opts: HttpFetcherOpts) -> KakijunResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(opts.timeout)
            .build()
            .map_err(anyhow::Error::from)?;
        Ok(Self {
            client,
            base_url: opts.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GlyphFetcher for HttpGlyphFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, glyph: Glyph) -> Result<StrokeGeometry, GlyphError> {
        let url = format!("{}/{}.json", self.base_url, glyph);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GlyphError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GlyphError::NotFound);
        }
        if !status.is_success() {
            return Err(GlyphError::transport(format!("unexpected status {status}")));
        }

        let doc: GlyphDocument = response
            .json()
            .await
            .map_err(|e| GlyphError::malformed(format!("undecodable body: {e}")))?;
        StrokeGeometry::from_document(doc)
    }
}

impl std::fmt::Debug for HttpGlyphFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGlyphFetcher")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Store-lifetime cache of resolved glyph geometry.
///
/// One store owns one fetcher. Each entry resolves at most once: concurrent
/// `resolve` calls for the same glyph collapse onto a single fetch and all
/// observe the same outcome, and a failed entry stays failed for the life
/// of the store. Stores are explicit values, not process globals; tests
/// construct isolated ones.
pub struct GlyphStore {
    fetcher: Arc<dyn GlyphFetcher>,
    entries: Mutex<HashMap<Glyph, Arc<OnceCell<Resolution>>>>,
}

impl GlyphStore {
    pub fn new(fetcher: Arc<dyn GlyphFetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a glyph to its stroke geometry, fetching on first use.
    pub async fn resolve(&self, glyph: Glyph) -> Resolution {
        let cell = self.entry(glyph);
        cell.get_or_init(|| async {
            let outcome = self.fetcher.fetch(glyph).await.map(Arc::new);
            match &outcome {
                Ok(geometry) => {
                    tracing::debug!(%glyph, strokes = geometry.stroke_count(), "glyph resolved")
                }
                Err(error) => tracing::warn!(%glyph, %error, "glyph resolution failed"),
            }
            outcome
        })
        .await
        .clone()
    }

    /// Look up an already-resolved entry without triggering a fetch.
    ///
    /// Returns `None` while the glyph is unknown or still resolving.
    pub fn peek(&self, glyph: Glyph) -> Option<Resolution> {
        let entries = lock(&self.entries);
        entries.get(&glyph).and_then(|cell| cell.get().cloned())
    }

    fn entry(&self, glyph: Glyph) -> Arc<OnceCell<Resolution>> {
        let mut entries = lock(&self.entries);
        entries.entry(glyph).or_default().clone()
    }
}

impl std::fmt::Debug for GlyphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = lock(&self.entries);
        f.debug_struct("GlyphStore")
            .field("entries", &entries.len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
