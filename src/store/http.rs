use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{Page, Record, RecordFields, RecordId, RecordPatch, RecordStore};
use crate::error::{AppError, Result};

pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

const COLLECTION_PATH: &str = "/records";

/// `RecordStore` over a json-server style REST collection at `{base_url}/records`.
pub struct HttpRecordStore {
    base_url: String,
    page_size: u32,
    client: Client,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, page_size: u32) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("regform/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(ACCEPT, "application/json")
    }

    fn record_path(id: &RecordId) -> String {
        format!("{COLLECTION_PATH}/{id}")
    }

    /// Send the request and turn a non-success status into `RequestFailed`.
    async fn send(operation: &'static str, req: RequestBuilder) -> Result<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| AppError::network(operation, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::RequestFailed {
                operation,
                status: Some(status.as_u16()),
                message: format!("HTTP {status}"),
            });
        }

        Ok(resp)
    }

    async fn parse<T: DeserializeOwned>(operation: &'static str, resp: Response) -> Result<T> {
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::network(operation, e))?;
        serde_json::from_str(&body).map_err(|e| AppError::malformed(operation, e.to_string()))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn list_page(&self, page: u32) -> Result<Page> {
        tracing::debug!("GET {COLLECTION_PATH} page={page} limit={}", self.page_size);
        let req = self
            .request(Method::GET, COLLECTION_PATH)
            .query(&[("_page", page), ("_limit", self.page_size)]);
        let resp = Self::send("list", req).await?;

        let total = match resp.headers().get(TOTAL_COUNT_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or_else(|| {
                    tracing::warn!("Ignoring unparseable {TOTAL_COUNT_HEADER} header: {value:?}");
                    0
                }),
            None => 0,
        };

        let records = Self::parse("list", resp).await?;
        Ok(Page { records, total })
    }

    async fn list_all(&self) -> Result<Vec<Record>> {
        tracing::debug!("GET {COLLECTION_PATH}");
        let resp = Self::send("list", self.request(Method::GET, COLLECTION_PATH)).await?;
        Self::parse("list", resp).await
    }

    async fn create(&self, fields: &RecordFields) -> Result<Record> {
        tracing::debug!("POST {COLLECTION_PATH}");
        let req = self.request(Method::POST, COLLECTION_PATH).json(fields);
        let resp = Self::send("create", req).await?;
        Self::parse("create", resp).await
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let path = Self::record_path(id);
        tracing::debug!("DELETE {path}");
        Self::send("delete", self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<Record> {
        let path = Self::record_path(id);
        tracing::debug!("PATCH {path}");
        let req = self.request(Method::PATCH, &path).json(patch);
        let resp = Self::send("update", req).await?;
        Self::parse("update", resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample(id: u64, first: &str) -> serde_json::Value {
        json!({
            "id": id,
            "firstName": first,
            "lastName": "Li",
            "email": "a@b.co",
            "phone": "+79991234567",
            "birthDate": "2000-01-15"
        })
    }

    #[tokio::test]
    async fn test_list_page_reads_total_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records"))
            .and(query_param("_page", "2"))
            .and(query_param("_limit", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "12")
                    .set_body_json(json!([sample(11, "Al"), sample(12, "Bo")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&server.uri(), 10).unwrap();
        let page = store.list_page(2).await.unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[1].fields.first_name, "Bo");
    }

    #[tokio::test]
    async fn test_list_page_without_total_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&server.uri(), 10).unwrap();
        let page = store.list_page(1).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    }

    #[tokio::test]
    async fn test_create_posts_json_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/records"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "firstName": "Al",
                "lastName": "Li",
                "email": "a@b.co",
                "phone": "+79991234567",
                "birthDate": "2000-01-15"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(sample(1, "Al")))
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&format!("{}/", server.uri()), 10).unwrap();
        let fields = RecordFields {
            first_name: "Al".into(),
            last_name: "Li".into(),
            email: "a@b.co".into(),
            phone: "+79991234567".into(),
            birth_date: NaiveDate::from_ymd_opt(2000, 1, 15),
            ..Default::default()
        };
        let record = store.create(&fields).await.unwrap();
        assert_eq!(record.id, RecordId::Number(1));
        assert_eq!(record.fields, fields);
    }

    #[tokio::test]
    async fn test_delete_missing_record_fails() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/records/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&server.uri(), 10).unwrap();
        let err = store.delete(&RecordId::Number(99)).await.unwrap_err();
        assert!(err.is_request_failure());
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_delete_with_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/records/a1b2"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&server.uri(), 10).unwrap();
        store.delete(&RecordId::Text("a1b2".into())).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_patches_partial_body() {
        let server = MockServer::start().await;
        let mut updated = sample(3, "Al");
        updated["email"] = json!("new@mail.example");
        Mock::given(method("PATCH"))
            .and(path("/records/3"))
            .and(body_json(json!({"email": "new@mail.example"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&server.uri(), 10).unwrap();
        let patch = RecordPatch {
            email: Some("new@mail.example".into()),
            ..Default::default()
        };
        let record = store.update(&RecordId::Number(3), &patch).await.unwrap();
        assert_eq!(record.fields.email, "new@mail.example");
    }

    #[tokio::test]
    async fn test_server_error_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&server.uri(), 10).unwrap();
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::RequestFailed {
                operation: "list",
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unexpected_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/records"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(&server.uri(), 10).unwrap();
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert!(err.is_request_failure());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_failed() {
        // Nothing listens on the discard port.
        let store = HttpRecordStore::new("http://127.0.0.1:9", 10).unwrap();
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, AppError::RequestFailed { status: None, .. }));
    }
}
