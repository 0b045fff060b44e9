//! Firestore REST encoding for the catalog collections.
//!
//! Requests are described as [`RestCall`] values and executed by a
//! platform-specific [`RestTransport`]; everything else lives here so it can
//! be exercised without a network.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::catalog::{CATEGORIES_COLLECTION, CatalogError, CatalogStore, MAPS_COLLECTION};
use crate::config::CatalogConfig;
use crate::model::{Category, CategoryDraft, CategoryPatch, MapDraft, MapEntry, MapPatch};
use crate::rest::{Method, RestCall, RestReply, RestTransport};

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_DATABASE: &str = "(default)";
const PAGE_SIZE: u32 = 300;

static DOCUMENT_NAME: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^projects/[^/]+/databases/[^/]+/documents/(?P<collection>[^/]+)/(?P<id>[^/]+)$")
        .ok()
});

/// URL builder for one Firestore database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreEndpoint {
    project_id: String,
    api_key: String,
    database: String,
}

impl FirestoreEndpoint {
    /// # Errors
    /// Returns [`CatalogError::Unconfigured`] if no project id is set.
    pub fn from_config(cfg: &CatalogConfig) -> Result<Self, CatalogError> {
        let project_id = cfg.project_id.trim();
        if project_id.is_empty() {
            return Err(CatalogError::Unconfigured);
        }
        Ok(Self {
            project_id: project_id.to_string(),
            api_key: cfg.api_key.trim().to_string(),
            database: cfg
                .database
                .clone()
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }

    fn documents_root(&self) -> String {
        format!(
            "{FIRESTORE_HOST}/projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }

    fn with_key(&self, mut url: String, has_query: bool) -> String {
        if !self.api_key.is_empty() {
            url.push(if has_query { '&' } else { '?' });
            url.push_str("key=");
            url.push_str(&urlencoding::encode(&self.api_key));
        }
        url
    }

    #[must_use]
    pub fn list(&self, collection: &str, page_token: Option<&str>) -> RestCall {
        let root = self.documents_root();
        let mut url = format!("{root}/{collection}?pageSize={PAGE_SIZE}");
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&urlencoding::encode(token));
        }
        RestCall {
            method: Method::Get,
            url: self.with_key(url, true),
            body: None,
        }
    }

    #[must_use]
    pub fn create(&self, collection: &str, fields: &Value) -> RestCall {
        RestCall {
            method: Method::Post,
            url: self.with_key(format!("{}/{collection}", self.documents_root()), false),
            body: Some(json!({ "fields": encode_fields(fields) })),
        }
    }

    /// Partial update: only the fields present in `fields` are written.
    #[must_use]
    pub fn patch(&self, collection: &str, id: &str, fields: &Value) -> RestCall {
        let encoded = encode_fields(fields);
        let mut url = format!(
            "{}/{collection}/{}?currentDocument.exists=true",
            self.documents_root(),
            urlencoding::encode(id)
        );
        for path in encoded.keys() {
            url.push_str("&updateMask.fieldPaths=");
            url.push_str(&urlencoding::encode(path));
        }
        RestCall {
            method: Method::Patch,
            url: self.with_key(url, true),
            body: Some(json!({ "fields": encoded })),
        }
    }

    #[must_use]
    pub fn delete(&self, collection: &str, id: &str) -> RestCall {
        RestCall {
            method: Method::Delete,
            url: self.with_key(
                format!(
                    "{}/{collection}/{}",
                    self.documents_root(),
                    urlencoding::encode(id)
                ),
                false,
            ),
            body: None,
        }
    }

    /// Structured query selecting documents whose `field` equals `value`.
    #[must_use]
    pub fn query_equal(&self, collection: &str, field: &str, value: &str) -> RestCall {
        RestCall {
            method: Method::Post,
            url: self.with_key(format!("{}:runQuery", self.documents_root()), false),
            body: Some(json!({
                "structuredQuery": {
                    "from": [{ "collectionId": collection }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": field },
                            "op": "EQUAL",
                            "value": { "stringValue": value }
                        }
                    }
                }
            })),
        }
    }
}

/// Wrap every string member of a JSON object as a Firestore `stringValue`.
/// `id` and non-string members are left out.
#[must_use]
pub fn encode_fields(record: &Value) -> Map<String, Value> {
    record
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(key, _)| key.as_str() != "id")
                .filter_map(|(key, value)| {
                    value
                        .as_str()
                        .map(|s| (key.clone(), json!({ "stringValue": s })))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Flatten Firestore typed values back into plain JSON.
#[must_use]
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(key, typed)| {
            let plain = typed
                .get("stringValue")
                .or_else(|| typed.get("integerValue"))
                .or_else(|| typed.get("doubleValue"))
                .or_else(|| typed.get("booleanValue"))
                .cloned()?;
            let plain = match plain {
                Value::String(_) => plain,
                other => Value::String(other.to_string()),
            };
            Some((key.clone(), plain))
        })
        .collect()
}

/// Split `projects/p/databases/d/documents/<collection>/<id>`.
#[must_use]
pub fn parse_document_name(name: &str) -> Option<(String, String)> {
    let caps = DOCUMENT_NAME.as_ref()?.captures(name)?;
    Some((caps["collection"].to_string(), caps["id"].to_string()))
}

#[derive(Debug, Clone, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct QueryRow {
    document: Option<Document>,
}

fn decode_document<T: DeserializeOwned>(doc: &Document) -> Result<T, CatalogError> {
    let (_, id) = parse_document_name(&doc.name)
        .ok_or_else(|| CatalogError::Decode(format!("unexpected document name {}", doc.name)))?;
    let mut plain = decode_fields(&doc.fields);
    plain.insert("id".to_string(), Value::String(id));
    serde_json::from_value(Value::Object(plain))
        .map_err(|err| CatalogError::Decode(err.to_string()))
}

fn decode_documents<T: DeserializeOwned>(docs: &[Document]) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match decode_document(doc) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("Skipping document {}: {err}", doc.name);
                None
            }
        })
        .collect()
}

fn parse_body<T: DeserializeOwned>(reply: &RestReply) -> Result<T, CatalogError> {
    reply
        .json()
        .and_then(serde_json::from_value)
        .map_err(|err| CatalogError::Decode(err.to_string()))
}

fn ensure_success(reply: RestReply) -> Result<RestReply, CatalogError> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(CatalogError::Rejected {
            status: reply.status,
            message: reply.error_message(),
        })
    }
}

fn to_fields<T: Serialize>(record: &T) -> Result<Value, CatalogError> {
    serde_json::to_value(record).map_err(|err| CatalogError::Decode(err.to_string()))
}

/// [`CatalogStore`] backed by the Firestore REST API.
pub struct FirestoreCatalog<T> {
    endpoint: FirestoreEndpoint,
    transport: T,
}

impl<T: RestTransport> FirestoreCatalog<T> {
    pub const fn new(endpoint: FirestoreEndpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    async fn send(&self, call: RestCall) -> Result<RestReply, CatalogError> {
        log::debug!("Firestore {} {}", call.method, call.url);
        ensure_success(self.transport.execute(call).await?)
    }

    async fn list_all<R: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<R>, CatalogError> {
        let mut records = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let reply = self
                .send(self.endpoint.list(collection, token.as_deref()))
                .await?;
            let page: ListPage = parse_body(&reply)?;
            records.extend(decode_documents(&page.documents));
            match page.next_page_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => return Ok(records),
            }
        }
    }

    async fn create_record<R: Serialize>(
        &self,
        collection: &str,
        record: &R,
    ) -> Result<String, CatalogError> {
        let reply = self
            .send(self.endpoint.create(collection, &to_fields(record)?))
            .await?;
        let doc: Document = parse_body(&reply)?;
        parse_document_name(&doc.name)
            .map(|(_, id)| id)
            .ok_or_else(|| CatalogError::Decode(format!("unexpected document name {}", doc.name)))
    }

    async fn patch_record<R: Serialize>(
        &self,
        collection: &str,
        id: &str,
        patch: &R,
    ) -> Result<(), CatalogError> {
        let fields = to_fields(patch)?;
        if encode_fields(&fields).is_empty() {
            return Ok(());
        }
        self.send(self.endpoint.patch(collection, id, &fields))
            .await
            .map_err(|err| match err {
                CatalogError::Rejected { status: 404, .. } => CatalogError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                },
                other => other,
            })?;
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl<T: RestTransport> CatalogStore for FirestoreCatalog<T> {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.list_all(CATEGORIES_COLLECTION).await
    }

    async fn list_maps(&self) -> Result<Vec<MapEntry>, CatalogError> {
        self.list_all(MAPS_COLLECTION).await
    }

    async fn list_maps_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<MapEntry>, CatalogError> {
        let reply = self
            .send(
                self.endpoint
                    .query_equal(MAPS_COLLECTION, "categoryId", category_id),
            )
            .await?;
        let rows: Vec<QueryRow> = parse_body(&reply)?;
        let docs: Vec<Document> = rows.into_iter().filter_map(|row| row.document).collect();
        Ok(decode_documents(&docs))
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<String, CatalogError> {
        self.create_record(CATEGORIES_COLLECTION, draft).await
    }

    async fn update_category(&self, id: &str, patch: &CategoryPatch) -> Result<(), CatalogError> {
        self.patch_record(CATEGORIES_COLLECTION, id, patch).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), CatalogError> {
        self.send(self.endpoint.delete(CATEGORIES_COLLECTION, id))
            .await?;
        Ok(())
    }

    async fn create_map(&self, draft: &MapDraft) -> Result<String, CatalogError> {
        self.create_record(MAPS_COLLECTION, draft).await
    }

    async fn update_map(&self, id: &str, patch: &MapPatch) -> Result<(), CatalogError> {
        self.patch_record(MAPS_COLLECTION, id, patch).await
    }

    async fn delete_map(&self, id: &str) -> Result<(), CatalogError> {
        self.send(self.endpoint.delete(MAPS_COLLECTION, id)).await?;
        Ok(())
    }
}
