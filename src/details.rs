//! Paper detail resolution
//!
//! Resolves a paper's textual and image content by trying sources in
//! priority order and stopping at the first that yields a record:
//! 1. paperDetails.json as an object keyed by paper id
//! 2. paperDetails.json as an array of records with a paperId/id field
//! 3. the local JSON-file store under the `paperDetails` key
//! 4. the local SQLite detail database
//! 5. a synthesized default record
//!
//! Resolution never fails: the worst case is placeholder content and empty
//! image lists.

use crate::fetch;
use crate::store::{DetailDatabase, FileStore};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PLACEHOLDER_BACKGROUND: &str = "No research background provided";
pub const PLACEHOLDER_MAIN: &str = "No research content provided";
pub const PLACEHOLDER_CONCLUSION: &str = "No research conclusions provided";
pub const PLACEHOLDER_LINK: &str = "No full-text link available";

/// Fully resolved detail record: every field is populated
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaperDetail {
    pub background_content: String,
    pub main_content: String,
    pub conclusion_content: String,
    pub link_content: String,
    pub homepage_images: Vec<String>,
    pub key_images: Vec<String>,
}

impl Default for PaperDetail {
    fn default() -> Self {
        Self {
            background_content: PLACEHOLDER_BACKGROUND.to_string(),
            main_content: PLACEHOLDER_MAIN.to_string(),
            conclusion_content: PLACEHOLDER_CONCLUSION.to_string(),
            link_content: PLACEHOLDER_LINK.to_string(),
            homepage_images: Vec::new(),
            key_images: Vec::new(),
        }
    }
}

/// Raw detail record as found in a source. Every field optional so a
/// partial record still deserializes; completion fills the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetail {
    #[serde(rename = "backgroundContent")]
    background_content: Option<String>,
    #[serde(rename = "mainContent")]
    main_content: Option<String>,
    #[serde(rename = "conclusionContent")]
    conclusion_content: Option<String>,
    #[serde(rename = "linkContent")]
    link_content: Option<String>,
    #[serde(rename = "homepageImages")]
    homepage_images: Option<Vec<String>>,
    #[serde(rename = "keyImages")]
    key_images: Option<Vec<String>>,
}

impl RawDetail {
    /// Fill absent fields with placeholders / empty lists. A field that is
    /// present but empty is kept as-is; only missing fields are defaulted.
    pub fn complete(self) -> PaperDetail {
        PaperDetail {
            background_content: self
                .background_content
                .unwrap_or_else(|| PLACEHOLDER_BACKGROUND.to_string()),
            main_content: self
                .main_content
                .unwrap_or_else(|| PLACEHOLDER_MAIN.to_string()),
            conclusion_content: self
                .conclusion_content
                .unwrap_or_else(|| PLACEHOLDER_CONCLUSION.to_string()),
            link_content: self
                .link_content
                .unwrap_or_else(|| PLACEHOLDER_LINK.to_string()),
            homepage_images: self.homepage_images.unwrap_or_default(),
            key_images: self.key_images.unwrap_or_default(),
        }
    }
}

/// Basic paper metadata from data.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaperBasicInfo {
    pub title: String,
    pub journal: String,
    pub time: String,
    pub authors: String,
}

impl PaperBasicInfo {
    /// The record synthesized when a paper is absent from data.json
    pub fn fallback(paper_id: &str) -> Self {
        Self {
            title: format!("Paper #{}", paper_id),
            journal: String::new(),
            time: String::new(),
            authors: String::new(),
        }
    }
}

pub struct PaperDetailResolver {
    client: Client,
    base_url: String,
    store: Option<FileStore>,
    database: Option<DetailDatabase>,
}

impl PaperDetailResolver {
    pub fn new(base_url: &str) -> Result<Self, String> {
        Ok(Self {
            client: fetch::build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            store: None,
            database: None,
        })
    }

    /// Attach the JSON-file fallback store
    pub fn with_store(mut self, store: FileStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Attach the SQLite fallback database
    pub fn with_database(mut self, database: DetailDatabase) -> Self {
        self.database = Some(database);
        self
    }

    /// Resolve a paper's detail record. Always succeeds; sources that are
    /// unreachable or lack the paper just fall through to the next one.
    pub async fn resolve_details(&self, paper_id: &str) -> PaperDetail {
        // 1 + 2: paperDetails.json, object- or array-shaped
        let url = format!("{}/paperDetails.json", self.base_url);
        match fetch::fetch_json(&self.client, &url).await {
            Ok(doc) => {
                if let Some(raw) = record_from_document(&doc, paper_id) {
                    println!("[Details] Paper {} found in paperDetails.json", paper_id);
                    return raw.complete();
                }
            }
            Err(e) => eprintln!("[Details] paperDetails.json unavailable: {}", e),
        }

        // 3: JSON-file store
        if let Some(store) = &self.store {
            let stored = store.load("paperDetails", Value::Null);
            if let Some(raw) = record_from_document(&stored, paper_id) {
                println!("[Details] Paper {} found in local store", paper_id);
                return raw.complete();
            }
        }

        // 4: SQLite detail database
        if let Some(database) = &self.database {
            match database.get_all() {
                Ok(records) => {
                    for (id, value) in records {
                        if id == paper_id {
                            if let Ok(raw) = serde_json::from_value::<RawDetail>(value) {
                                println!(
                                    "[Details] Paper {} found in detail database",
                                    paper_id
                                );
                                return raw.complete();
                            }
                        }
                    }
                }
                Err(e) => eprintln!("[Details] Detail database unavailable: {}", e),
            }
        }

        // 5: synthesized defaults
        println!("[Details] No detail for paper {}, using defaults", paper_id);
        PaperDetail::default()
    }

    /// Resolve a paper's basic metadata from data.json. Absence synthesizes
    /// a `Paper #{id}` title with empty other fields.
    pub async fn resolve_basic_info(&self, paper_id: &str) -> PaperBasicInfo {
        let url = format!("{}/data.json", self.base_url);
        match fetch::fetch_json(&self.client, &url).await {
            Ok(doc) => {
                if let Some(info) = basic_info_from_document(&doc, paper_id) {
                    return info;
                }
                println!("[Details] Paper {} not present in data.json", paper_id);
            }
            Err(e) => eprintln!("[Details] data.json unavailable: {}", e),
        }
        PaperBasicInfo::fallback(paper_id)
    }
}

/// Pick the detail record for a paper out of a details document.
///
/// Object-shaped documents are keyed by stringified paper id; array-shaped
/// documents carry the id in a `paperId` or `id` field (string or number,
/// compared as strings). With duplicate ids in an array the first match
/// wins.
pub fn record_from_document(doc: &Value, paper_id: &str) -> Option<RawDetail> {
    match doc {
        Value::Object(map) => {
            let record = map.get(paper_id)?;
            serde_json::from_value(record.clone()).ok()
        }
        Value::Array(items) => {
            let record = items.iter().find(|item| {
                item.get("paperId")
                    .or_else(|| item.get("id"))
                    .and_then(id_as_string)
                    .is_some_and(|id| id == paper_id)
            })?;
            serde_json::from_value(record.clone()).ok()
        }
        _ => None,
    }
}

/// Find a paper's basic metadata in a data.json document. The paper list
/// lives either at `papers` or at `projectData.papers`.
pub fn basic_info_from_document(doc: &Value, paper_id: &str) -> Option<PaperBasicInfo> {
    let papers = doc
        .get("papers")
        .or_else(|| doc.get("projectData").and_then(|p| p.get("papers")))?
        .as_array()?;

    let paper = papers.iter().find(|p| {
        p.get("id")
            .and_then(id_as_string)
            .is_some_and(|id| id == paper_id)
    })?;

    Some(PaperBasicInfo {
        title: string_field(paper, "title")
            .unwrap_or_else(|| format!("Paper #{}", paper_id)),
        journal: string_field(paper, "journal").unwrap_or_default(),
        time: string_field(paper, "time").unwrap_or_default(),
        authors: string_field(paper, "authors").unwrap_or_default(),
    })
}

/// String form of an id value; ids may arrive as strings or numbers
fn id_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(record: &Value, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_shaped_document_partial_record() {
        let doc = json!({ "3": { "backgroundContent": "X" } });
        let detail = record_from_document(&doc, "3").unwrap().complete();
        assert_eq!(detail.background_content, "X");
        assert_eq!(detail.main_content, PLACEHOLDER_MAIN);
        assert_eq!(detail.conclusion_content, PLACEHOLDER_CONCLUSION);
        assert_eq!(detail.link_content, PLACEHOLDER_LINK);
        assert!(detail.homepage_images.is_empty());
        assert!(detail.key_images.is_empty());
    }

    #[test]
    fn test_present_but_empty_field_is_kept() {
        let doc = json!({ "3": { "mainContent": "" } });
        let detail = record_from_document(&doc, "3").unwrap().complete();
        assert_eq!(detail.main_content, "");
        assert_eq!(detail.background_content, PLACEHOLDER_BACKGROUND);
    }

    #[test]
    fn test_array_shaped_document_first_duplicate_wins() {
        let doc = json!([
            { "paperId": "4", "backgroundContent": "first" },
            { "id": 4, "backgroundContent": "second" }
        ]);
        let detail = record_from_document(&doc, "4").unwrap().complete();
        assert_eq!(detail.background_content, "first");
    }

    #[test]
    fn test_array_shaped_numeric_id_compared_as_string() {
        let doc = json!([{ "id": 9, "linkContent": "https://example.org" }]);
        let detail = record_from_document(&doc, "9").unwrap().complete();
        assert_eq!(detail.link_content, "https://example.org");
        assert!(record_from_document(&doc, "09").is_none());
    }

    #[test]
    fn test_missing_id_falls_through() {
        let doc = json!({ "1": {} });
        assert!(record_from_document(&doc, "2").is_none());
        assert!(record_from_document(&Value::Null, "2").is_none());
        assert!(record_from_document(&json!("nonsense"), "2").is_none());
    }

    #[test]
    fn test_basic_info_from_papers_array() {
        let doc = json!({
            "papers": [
                { "id": 1, "title": "On Roots", "journal": "Plant Cell", "time": "2024", "authors": "Li, Wang" }
            ]
        });
        let info = basic_info_from_document(&doc, "1").unwrap();
        assert_eq!(info.title, "On Roots");
        assert_eq!(info.journal, "Plant Cell");
        assert_eq!(info.time, "2024");
        assert_eq!(info.authors, "Li, Wang");
    }

    #[test]
    fn test_basic_info_from_project_data_papers() {
        let doc = json!({
            "projectData": { "papers": [{ "id": "2", "title": "Nested" }] }
        });
        let info = basic_info_from_document(&doc, "2").unwrap();
        assert_eq!(info.title, "Nested");
        assert_eq!(info.journal, "");
    }

    #[test]
    fn test_basic_info_absent_paper() {
        let doc = json!({ "papers": [] });
        assert!(basic_info_from_document(&doc, "5").is_none());
        assert_eq!(
            PaperBasicInfo::fallback("5").title,
            "Paper #5"
        );
    }
}
