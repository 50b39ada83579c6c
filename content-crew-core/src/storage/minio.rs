//! S3 client for MinIO (or any S3-compatible store) using path-style addressing.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, StatusCode};
use tracing::{debug, error, info};

use super::sigv4::{self, Credentials, RequestParts};
use crate::contract::{BucketStatus, ObjectStore, PutObject, StoredObject};
use crate::error::StorageError;
use crate::settings::{Secret, StorageSettings};

pub struct MinioStore {
    http: reqwest::Client,
    base_url: String,
    /// Value of the `Host` header reqwest will send for `base_url`.
    host: String,
    access_key: String,
    secret_key: Secret,
    region: String,
}

/// Splits an endpoint into `(scheme, host header)`.
///
/// Accepts `host[:port]` or a full `http(s)://host[:port]` URL; an explicit scheme wins over
/// `secure`. Default ports are dropped because the HTTP client omits them from `Host`.
pub fn parse_endpoint(endpoint: &str, secure: bool) -> Result<(&'static str, String), StorageError> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    let (scheme, rest) = if let Some(rest) = trimmed.strip_prefix("https://") {
        ("https", rest)
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        ("http", rest)
    } else if secure {
        ("https", trimmed)
    } else {
        ("http", trimmed)
    };
    if rest.is_empty() || rest.contains('/') || rest.contains("://") {
        return Err(StorageError::InvalidEndpoint(endpoint.to_string()));
    }
    let default_port = if scheme == "https" { ":443" } else { ":80" };
    let host = rest.strip_suffix(default_port).unwrap_or(rest).to_string();
    Ok((scheme, host))
}

impl MinioStore {
    pub fn new(http: reqwest::Client, settings: &StorageSettings) -> Result<Self, StorageError> {
        let (scheme, host) = parse_endpoint(&settings.endpoint, settings.secure)?;
        info!(scheme, host = %host, region = %settings.region, "Initialised object store client");
        Ok(Self {
            http,
            base_url: format!("{scheme}://{host}"),
            host,
            access_key: settings.access_key.clone(),
            secret_key: settings.secret_key.clone(),
            region: settings.region.clone(),
        })
    }

    fn object_path(bucket: &str, key: &str) -> String {
        format!(
            "/{}/{}",
            sigv4::uri_encode(bucket, true),
            sigv4::uri_encode(key.trim_start_matches('/'), false)
        )
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<reqwest::Response, StorageError> {
        let now = Utc::now();
        let amz_date = sigv4::amz_date(now);
        let payload_hash = sigv4::payload_hash(&body);

        let mut signed: Vec<(&str, &str)> = vec![
            ("host", self.host.as_str()),
            ("x-amz-content-sha256", payload_hash.as_str()),
            ("x-amz-date", amz_date.as_str()),
        ];
        if let Some(ct) = content_type {
            signed.push(("content-type", ct));
        }
        let creds = Credentials {
            access_key: &self.access_key,
            secret_key: self.secret_key.expose(),
            region: &self.region,
        };
        let authorization = sigv4::authorization(
            &creds,
            &RequestParts {
                method: method.as_str(),
                path,
                query: &[],
                headers: &signed,
                payload_hash: &payload_hash,
            },
            now,
        );

        debug!(%method, path, bytes = body.len(), "Sending signed storage request");
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("x-amz-content-sha256", &payload_hash)
            .header("x-amz-date", &amz_date)
            .header("authorization", authorization);
        if let Some(ct) = content_type {
            request = request.header("content-type", ct);
        }
        Ok(request.body(body).send().await?)
    }
}

async fn api_error(operation: &'static str, resp: reqwest::Response) -> StorageError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    error!(operation, status, body = %body, "Storage request rejected");
    StorageError::Api {
        operation,
        status,
        body,
    }
}

#[async_trait]
impl ObjectStore for MinioStore {
    async fn ensure_bucket(&self, bucket: &str) -> Result<BucketStatus, StorageError> {
        let path = format!("/{}", sigv4::uri_encode(bucket, true));
        let head = self.send(Method::HEAD, &path, Vec::new(), None).await?;
        match head.status() {
            s if s.is_success() => {
                info!(bucket, "Bucket already exists");
                return Ok(BucketStatus::Existing);
            }
            StatusCode::NOT_FOUND => {}
            _ => return Err(api_error("head_bucket", head).await),
        }

        let created = self.send(Method::PUT, &path, Vec::new(), None).await?;
        match created.status() {
            s if s.is_success() => {
                info!(bucket, "Bucket did not exist, created it");
                Ok(BucketStatus::Created)
            }
            // Lost a race with another writer creating the same bucket.
            StatusCode::CONFLICT => Ok(BucketStatus::Existing),
            _ => Err(api_error("make_bucket", created).await),
        }
    }

    async fn put_object(&self, req: PutObject) -> Result<StoredObject, StorageError> {
        let path = Self::object_path(&req.bucket, &req.key);
        let size = req.content.len();
        let resp = self
            .send(Method::PUT, &path, req.content, Some(&req.content_type))
            .await?;
        if !resp.status().is_success() {
            return Err(api_error("put_object", resp).await);
        }
        let etag = resp
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string());
        info!(bucket = %req.bucket, key = %req.key, size, "Uploaded object");
        Ok(StoredObject {
            bucket: req.bucket,
            key: req.key,
            size,
            etag,
        })
    }
}
