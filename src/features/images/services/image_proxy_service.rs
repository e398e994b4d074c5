use async_trait::async_trait;
use axum::body::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{timeout, Instant};
use tracing::warn;

use crate::core::error::{AppError, Result};
use crate::shared::constants::BROWSER_USER_AGENT;

/// Raw result of one upstream attempt.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// One upstream HTTP fetch. Implemented over reqwest in production and by
/// scripted fakes in tests.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage>;
}

/// Live fetcher. Every attempt carries the fixed browser User-Agent;
/// Google's CDN hosts reject obviously non-browser clients.
pub struct ReqwestImageFetcher {
    client: reqwest::Client,
}

impl ReqwestImageFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for ReqwestImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Image fetch failed: {}", e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Image body read failed: {}", e))
        })?;

        Ok(FetchedImage {
            status,
            content_type,
            body,
        })
    }
}

/// A successfully proxied image.
#[derive(Debug, Clone)]
pub struct ProxiedImage {
    pub content_type: String,
    pub body: Bytes,
}

#[derive(Debug, Error)]
pub enum ImageProxyError {
    /// Every strategy failed; carries the last attempt's status so the
    /// caller can propagate it.
    #[error("All image sources failed (last status {last_status})")]
    Exhausted { last_status: u16 },
}

/// Tries the fallback chain of Google-hosted URLs under one shared time
/// budget, returning the first success.
pub struct ImageProxyService {
    fetcher: Arc<dyn ImageFetcher>,
    budget: Duration,
}

impl ImageProxyService {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, budget: Duration) -> Self {
        Self { fetcher, budget }
    }

    /// The fixed strategy order: CDN host, then thumbnail, then direct
    /// download.
    fn strategy_urls(file_id: &str) -> [String; 3] {
        let id = urlencoding::encode(file_id);
        [
            format!("https://lh3.googleusercontent.com/d/{}", id),
            format!("https://drive.google.com/thumbnail?id={}&sz=w1000", id),
            format!("https://drive.google.com/uc?export=download&id={}", id),
        ]
    }

    pub async fn fetch_image(
        &self,
        file_id: &str,
    ) -> std::result::Result<ProxiedImage, ImageProxyError> {
        let deadline = Instant::now() + self.budget;
        let mut last_status: u16 = 504;

        for url in Self::strategy_urls(file_id) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("Image proxy budget exhausted before trying {}", url);
                break;
            }

            match timeout(remaining, self.fetcher.fetch(&url)).await {
                Err(_) => {
                    warn!("Image fetch timed out for {}", url);
                    last_status = 504;
                }
                Ok(Err(e)) => {
                    warn!("Image fetch error for {}: {}", url, e);
                    last_status = 502;
                }
                Ok(Ok(image)) if (200..300).contains(&image.status) => {
                    return Ok(ProxiedImage {
                        content_type: image
                            .content_type
                            .unwrap_or_else(|| "image/jpeg".to_string()),
                        body: image.body,
                    });
                }
                Ok(Ok(image)) => {
                    warn!("Image fetch for {} returned {}", url, image.status);
                    last_status = image.status;
                }
            }
        }

        Err(ImageProxyError::Exhausted { last_status })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Fetcher that replays a scripted sequence of responses and records
    /// the URLs it was asked for.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        pub responses: Mutex<VecDeque<FetchedImage>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub fn with_responses(responses: Vec<FetchedImage>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedImage> {
            self.calls.lock().unwrap().push(url.to_string());
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("ScriptedFetcher ran out of responses");
            Ok(response)
        }
    }

    pub fn status(status: u16) -> FetchedImage {
        FetchedImage {
            status,
            content_type: None,
            body: Bytes::new(),
        }
    }

    pub fn ok_image(content_type: &str, body: &'static [u8]) -> FetchedImage {
        FetchedImage {
            status: 200,
            content_type: Some(content_type.to_string()),
            body: Bytes::from_static(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{ok_image, status, ScriptedFetcher};
    use super::*;

    #[test]
    fn test_strategy_order_is_cdn_then_thumbnail_then_download() {
        let urls = ImageProxyService::strategy_urls("abc123");
        assert_eq!(urls[0], "https://lh3.googleusercontent.com/d/abc123");
        assert_eq!(
            urls[1],
            "https://drive.google.com/thumbnail?id=abc123&sz=w1000"
        );
        assert_eq!(
            urls[2],
            "https://drive.google.com/uc?export=download&id=abc123"
        );
    }

    #[tokio::test]
    async fn test_first_success_stops_the_chain() {
        let fetcher = Arc::new(ScriptedFetcher::with_responses(vec![ok_image(
            "image/webp",
            b"CDN",
        )]));
        let service = ImageProxyService::new(fetcher.clone(), Duration::from_secs(15));

        let image = service.fetch_image("abc").await.unwrap();
        assert_eq!(image.content_type, "image/webp");
        assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cdn_404_falls_back_to_thumbnail() {
        let fetcher = Arc::new(ScriptedFetcher::with_responses(vec![
            status(404),
            ok_image("image/png", b"THUMB"),
        ]));
        let service = ImageProxyService::new(fetcher.clone(), Duration::from_secs(15));

        let image = service.fetch_image("abc").await.unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.body.as_ref(), b"THUMB");

        // Exactly two upstream calls: CDN, then thumbnail.
        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].contains("thumbnail"));
    }

    #[tokio::test]
    async fn test_exhaustion_carries_last_status() {
        let fetcher = Arc::new(ScriptedFetcher::with_responses(vec![
            status(404),
            status(403),
            status(500),
        ]));
        let service = ImageProxyService::new(fetcher.clone(), Duration::from_secs(15));

        let err = service.fetch_image("abc").await.unwrap_err();
        let ImageProxyError::Exhausted { last_status } = err;
        assert_eq!(last_status, 500);
        assert_eq!(fetcher.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_content_type_defaults_to_jpeg() {
        let fetcher = Arc::new(ScriptedFetcher::with_responses(vec![FetchedImage {
            status: 200,
            content_type: None,
            body: Bytes::from_static(b"RAW"),
        }]));
        let service = ImageProxyService::new(fetcher, Duration::from_secs(15));

        let image = service.fetch_image("abc").await.unwrap();
        assert_eq!(image.content_type, "image/jpeg");
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_is_shared_across_the_chain() {
        struct HangingFetcher {
            calls: std::sync::Mutex<usize>,
        }

        #[async_trait]
        impl ImageFetcher for HangingFetcher {
            async fn fetch(&self, _url: &str) -> Result<FetchedImage> {
                *self.calls.lock().unwrap() += 1;
                std::future::pending().await
            }
        }

        let fetcher = Arc::new(HangingFetcher {
            calls: std::sync::Mutex::new(0),
        });
        let service = ImageProxyService::new(fetcher.clone(), Duration::from_secs(2));

        let err = service.fetch_image("abc").await.unwrap_err();
        let ImageProxyError::Exhausted { last_status } = err;
        assert_eq!(last_status, 504);

        // The first hanging attempt consumed the whole budget; the chain
        // did not get three independent timeouts.
        assert_eq!(*fetcher.calls.lock().unwrap(), 1);
    }
}
