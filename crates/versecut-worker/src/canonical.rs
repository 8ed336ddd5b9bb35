//! Canonical verse text client.
//!
//! Fetches chapter text and translations from the verse text service and
//! normalizes them for alignment and table display.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};

/// Source of canonical chapter text and translations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CanonicalTextProvider: Send + Sync {
    /// Verse texts of a chapter, in verse order.
    async fn chapter_text(&self, chapter: u32) -> WorkerResult<Vec<String>>;

    /// Translated verse texts of a chapter, in verse order.
    async fn chapter_translation(
        &self,
        chapter: u32,
        translation_id: &str,
    ) -> WorkerResult<Vec<String>>;
}

/// HTTP client for the canonical text service.
pub struct CanonicalTextClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct VersesResponse {
    verses: Vec<VerseEntry>,
}

#[derive(Debug, Deserialize)]
struct VerseEntry {
    text_uthmani: String,
}

#[derive(Debug, Deserialize)]
struct TranslationsResponse {
    translations: Vec<TranslationEntry>,
}

#[derive(Debug, Deserialize)]
struct TranslationEntry {
    text: String,
}

impl CanonicalTextClient {
    /// Create a client against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> WorkerResult<T> {
        let response = self.client.get(url).send().await.map_err(|e| {
            WorkerError::text_api_failed(format!("Request to {} failed: {}", url, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WorkerError::text_api_failed(format!(
                "Text service returned {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            WorkerError::text_api_failed(format!("Failed to parse text service response: {}", e))
        })
    }
}

#[async_trait]
impl CanonicalTextProvider for CanonicalTextClient {
    async fn chapter_text(&self, chapter: u32) -> WorkerResult<Vec<String>> {
        let url = format!(
            "{}/quran/verses/uthmani?chapter_number={}",
            self.base_url, chapter
        );
        let response: VersesResponse = self.get_json(&url).await?;
        debug!(chapter, verses = response.verses.len(), "Fetched chapter text");

        Ok(response
            .verses
            .into_iter()
            .map(|verse| normalize_verse_text(&verse.text_uthmani))
            .collect())
    }

    async fn chapter_translation(
        &self,
        chapter: u32,
        translation_id: &str,
    ) -> WorkerResult<Vec<String>> {
        let url = format!(
            "{}/quran/translations/{}?chapter_number={}",
            self.base_url, translation_id, chapter
        );
        let response: TranslationsResponse = self.get_json(&url).await?;
        debug!(
            chapter,
            translation_id,
            verses = response.translations.len(),
            "Fetched chapter translation"
        );

        Ok(response
            .translations
            .into_iter()
            .map(|translation| normalize_translation(&translation.text))
            .collect())
    }
}

/// Strip the superscript alef variant that never appears in transcribed rows.
pub fn normalize_verse_text(text: &str) -> String {
    text.replace("ا۟", "ا")
}

/// Strip footnote markup and flatten transliteration diacritics so the
/// text renders with common subtitle fonts.
pub fn normalize_translation(text: &str) -> String {
    let tag_pattern = Regex::new(r"<[^>]+>").unwrap();
    let text = tag_pattern.replace_all(text, "");

    text.replace("صَۣ", "صَ")
        .replace('ā', "a")
        .replace('ḥ', "h")
        .replace('ū', "u")
        .replace('ʿ', "'")
        .replace('’', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_normalize_translation_strips_footnote_markup() {
        let text = "Say: He is Allāh<sup foot_note=77642>1</sup>, the ʿOne";
        assert_eq!(normalize_translation(text), "Say: He is Allah, the 'One");
    }

    #[test]
    fn test_normalize_verse_text_flattens_superscript_alef() {
        assert_eq!(normalize_verse_text("قَالُوا۟"), "قَالُوا");
    }

    #[tokio::test]
    async fn test_chapter_text_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quran/verses/uthmani"))
            .and(query_param("chapter_number", "112"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "verses": [
                    {"text_uthmani": "قل هو الله أحد"},
                    {"text_uthmani": "الله الصمد"}
                ]
            })))
            .mount(&server)
            .await;

        let client = CanonicalTextClient::new(server.uri());
        let verses = client.chapter_text(112).await.unwrap();

        assert_eq!(verses.len(), 2);
        assert_eq!(verses[1], "الله الصمد");
    }

    #[tokio::test]
    async fn test_chapter_translation_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quran/translations/131"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = CanonicalTextClient::new(server.uri());
        let result = client.chapter_translation(112, "131").await;

        assert!(matches!(result, Err(WorkerError::TextApiFailed(_))));
    }
}
