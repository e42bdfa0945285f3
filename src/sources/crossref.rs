//! CrossRef metadata source implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::CrossRefConfig;
use crate::models::{Author, MetadataRecord, MetadataRecordBuilder};
use crate::sources::{MetadataSource, SourceError};
use crate::utils::{default_user_agent, HttpClient};

pub const CROSSREF_API_BASE: &str = "https://api.crossref.org";

/// CrossRef metadata source
///
/// Uses the CrossRef REST API `works` endpoint with a `query.title` search and
/// takes the first candidate.
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    client: HttpClient,
    api_base: String,
    rows: u32,
}

impl CrossRefSource {
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&CrossRefConfig::default())
    }

    /// Build a source from the `[crossref]` configuration section
    pub fn from_config(config: &CrossRefConfig) -> Result<Self, SourceError> {
        let user_agent = match &config.mailto {
            Some(mailto) => format!("{} (mailto:{})", default_user_agent(), mailto),
            None => default_user_agent().to_string(),
        };

        let client = HttpClient::with_user_agent(
            &user_agent,
            Duration::from_secs(config.timeout_secs),
        )
        .map_err(|e| SourceError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            rows: config.rows.max(1),
        })
    }

    /// Point the source at another API base, e.g. a local mock server
    pub fn with_base_url(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl MetadataSource for CrossRefSource {
    fn id(&self) -> &str {
        "crossref"
    }

    fn name(&self) -> &str {
        "CrossRef"
    }

    async fn lookup_title(&self, title: &str) -> Result<MetadataRecord, SourceError> {
        let url = format!("{}/works", self.api_base);
        let rows = self.rows.to_string();

        tracing::debug!("Querying CrossRef for title {:?}", title);

        let response = self
            .client
            .get(&url)
            .query(&[("query.title", title), ("rows", rows.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to query CrossRef: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "CrossRef API returned status: {}",
                response.status()
            )));
        }

        let data: CRResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))?;

        let item = data
            .message
            .and_then(|message| message.items.into_iter().next())
            .ok_or(SourceError::NotFound)?;

        Ok(item.into_record(title))
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRResponse {
    message: Option<CRMessage>,
}

#[derive(Debug, Deserialize)]
struct CRMessage {
    #[serde(default)]
    items: Vec<CRItem>,
}

#[derive(Debug, Deserialize)]
struct CRAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRItem {
    #[serde(default)]
    author: Vec<CRAuthor>,
    #[serde(rename = "published-print")]
    published_print: Option<CRDate>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl CRDate {
    fn year(&self) -> Option<i32> {
        self.date_parts
            .first()
            .and_then(|parts| parts.first())
            .copied()
            .flatten()
    }
}

impl CRItem {
    /// Map the first candidate onto a record; the caller's title is kept
    fn into_record(self, title: &str) -> MetadataRecord {
        let authors = self
            .author
            .into_iter()
            .map(|a| Author::new(a.given.unwrap_or_default(), a.family.unwrap_or_default()))
            .collect();

        let year = self.published_print.as_ref().and_then(CRDate::year);

        let mut builder = MetadataRecordBuilder::new(title)
            .authors(authors)
            .maybe_year(year);

        if let Some(journal) = self.container_title.into_iter().next() {
            builder = builder.journal(journal);
        }
        if let Some(volume) = self.volume {
            builder = builder.volume(volume);
        }
        if let Some(issue) = self.issue {
            builder = builder.issue(issue);
        }
        if let Some(page) = self.page {
            builder = builder.pages(page);
        }
        if let Some(doi) = self.doi {
            builder = builder.doi(doi);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LookupFailure;
    use mockito::Matcher;

    const FULL_ITEM: &str = r#"{
        "status": "ok",
        "message": {
            "total-results": 1,
            "items": [{
                "DOI": "10.1/abc",
                "title": ["A Slightly Different Title"],
                "author": [
                    {"given": "Ann Marie", "family": "Lee", "sequence": "first"},
                    {"family": "Consortium"},
                    {"given": "Bo", "family": "Park"}
                ],
                "published-print": {"date-parts": [[2020, 3]]},
                "container-title": ["J. of Things"],
                "volume": "5",
                "issue": "2",
                "page": "10-20"
            }]
        }
    }"#;

    async fn source_for(server: &mockito::ServerGuard) -> CrossRefSource {
        CrossRefSource::new().unwrap().with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_lookup_maps_first_item() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query.title".into(), "Study X".into()),
                Matcher::UrlEncoded("rows".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(FULL_ITEM)
            .create_async()
            .await;

        let source = source_for(&server).await;
        let record = source.lookup_title("Study X").await.unwrap();

        mock.assert_async().await;
        assert_eq!(record.title, "Study X");
        assert_eq!(record.authors.len(), 3);
        assert_eq!(record.authors[0], Author::new("Ann Marie", "Lee"));
        assert_eq!(record.authors[1], Author::new("", "Consortium"));
        assert_eq!(record.year, Some(2020));
        assert_eq!(record.journal.as_deref(), Some("J. of Things"));
        assert_eq!(record.volume.as_deref(), Some("5"));
        assert_eq!(record.issue.as_deref(), Some("2"));
        assert_eq!(record.pages.as_deref(), Some("10-20"));
        assert_eq!(record.doi.as_deref(), Some("10.1/abc"));
    }

    #[tokio::test]
    async fn test_sparse_item_uses_placeholders() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"message": {"items": [{"container-title": [""], "published-print": {"date-parts": [[null]]}}]}}"#,
            )
            .create_async()
            .await;

        let source = source_for(&server).await;
        let record = source.lookup_title("Sparse").await.unwrap();

        assert!(record.authors.is_empty());
        assert_eq!(record.year_display(), "n.d.");
        assert_eq!(record.journal_display(), "N/A");
        assert_eq!(record.pages_display(), "N/A");
        assert_eq!(record.doi_display(), "N/A");
    }

    #[tokio::test]
    async fn test_empty_items_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message": {"items": []}}"#)
            .create_async()
            .await;

        let source = source_for(&server).await;
        assert!(matches!(
            source.lookup_title("Nothing").await,
            Err(SourceError::NotFound)
        ));
        assert_eq!(
            source.resolve("Nothing").await,
            Err(LookupFailure::new("No data found for this title."))
        );
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let source = source_for(&server).await;
        let err = source.lookup_title("Boom").await.unwrap_err();
        assert!(matches!(err, SourceError::Api(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let source = source_for(&server).await;
        assert!(matches!(
            source.lookup_title("Garbage").await,
            Err(SourceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_user_agent_carries_mailto() {
        let mut server = mockito::Server::new_async().await;
        let expected = format!("{} (mailto:me@example.org)", default_user_agent());
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .match_header("user-agent", expected.as_str())
            .with_status(200)
            .with_body(r#"{"message": {"items": []}}"#)
            .create_async()
            .await;

        let config = CrossRefConfig {
            api_base: server.url(),
            mailto: Some("me@example.org".to_string()),
            ..CrossRefConfig::default()
        };
        let source = CrossRefSource::from_config(&config).unwrap();
        let result = source.lookup_title("Anything").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SourceError::NotFound)));
    }

    #[test]
    fn test_from_config_trims_base() {
        let config = CrossRefConfig {
            api_base: "http://localhost:1234/".to_string(),
            ..CrossRefConfig::default()
        };
        let source = CrossRefSource::from_config(&config).unwrap();
        assert_eq!(source.api_base(), "http://localhost:1234");
    }
}
