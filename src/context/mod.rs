//! Per-request context: the request view and the guarded response.
//!
//! # Responsibilities
//! - Expose method, path, headers, and merged query/form parameters
//! - Buffer the response (status, headers, body) behind the response gate
//! - Plain and signed cookie access
//! - Custom status pages on status writes
//!
//! # Design Decisions
//! - Captured path parameters are appended to the ordinary parameter set, so
//!   handler code reads path and query parameters uniformly
//! - `write_status` is the only auto-closing path, and only when a custom
//!   status page is configured for the code
//! - Secure cookie verification fails closed: malformed, tampered, or expired
//!   cookies are indistinguishable from absent ones

pub mod upload;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request, Response, StatusCode, Uri};
use url::form_urlencoded;

use crate::dispatch::gate::ResponseGate;
use crate::security::signing;

pub use upload::{UploadError, UploadFile};

/// Request/response state for one in-flight request.
pub struct Context {
    method: Method,
    uri: Uri,
    request_headers: HeaderMap,
    params: HashMap<String, Vec<String>>,
    uploads: HashMap<String, UploadFile>,
    status: StatusCode,
    headers: HeaderMap,
    gate: ResponseGate,
    secret: String,
    status_pages: Arc<HashMap<u16, PathBuf>>,
}

impl Context {
    pub(crate) fn new(
        request: Request<Bytes>,
        secret: String,
        status_pages: Arc<HashMap<u16, PathBuf>>,
    ) -> Self {
        let (parts, body) = request.into_parts();

        let mut params: HashMap<String, Vec<String>> = HashMap::new();
        if let Some(query) = parts.uri.query() {
            for (key, value) in form_urlencoded::parse(query.as_bytes()) {
                params
                    .entry(key.into_owned())
                    .or_default()
                    .push(value.into_owned());
            }
        }
        if (parts.method == Method::POST || parts.method == Method::PUT)
            && is_urlencoded_form(&parts.headers)
        {
            for (key, value) in form_urlencoded::parse(&body) {
                params
                    .entry(key.into_owned())
                    .or_default()
                    .push(value.into_owned());
            }
        }

        Self {
            method: parts.method,
            uri: parts.uri,
            request_headers: parts.headers,
            params,
            uploads: HashMap::new(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            gate: ResponseGate::new(),
            secret,
            status_pages,
        }
    }

    // ── Request side ──────────────────────────────────────────────

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn request_header(&self, name: &str) -> Option<&str> {
        self.request_headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First value for a query, form, or captured path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values recorded for a parameter name.
    pub fn param_values(&self, name: &str) -> &[String] {
        self.params.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a parameter value without clobbering existing entries. Used by
    /// the dispatcher to surface captured path segments.
    pub(crate) fn add_param(&mut self, name: String, value: String) {
        self.params.entry(name).or_default().push(value);
    }

    // ── Response side ─────────────────────────────────────────────

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_header(&mut self, name: HeaderName, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
    }

    pub fn add_header(&mut self, name: HeaderName, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
    }

    /// Set the Content-Type header from a file extension, with or without
    /// the leading dot: `ctx.set_content_type("json")` yields
    /// `application/json`. Unknown extensions leave the header untouched.
    pub fn set_content_type(&mut self, ext: &str) {
        if let Some(mime) = mime_for(ext.trim_start_matches('.')) {
            self.set_header(header::CONTENT_TYPE, mime);
        }
    }

    /// Raw body write through the gate. Dropped silently once closed.
    pub fn write(&mut self, content: &[u8]) {
        self.gate.write(content);
    }

    /// Record the response status. When a custom status page is configured
    /// for the code, its bytes become the body and the gate closes, so
    /// nothing can append to a custom error page.
    pub fn write_status(&mut self, code: StatusCode) {
        if self.gate.is_closed() {
            return;
        }
        self.status = code;
        if let Some(path) = self.status_pages.get(&code.as_u16()) {
            let body = std::fs::read(path).unwrap_or_else(|_| {
                code.canonical_reason().unwrap_or("").as_bytes().to_vec()
            });
            self.gate.write(&body);
            self.gate.close();
        }
    }

    /// Status plus plain-text body. Does not finish the request; the
    /// remaining stages still run (and usually have nothing left to do).
    pub fn error(&mut self, code: StatusCode, text: &str) {
        self.write_status(code);
        self.write(text.as_bytes());
    }

    pub fn redirect(&mut self, code: StatusCode, url: &str) {
        self.set_header(header::LOCATION, url);
        self.write_status(code);
        self.finish();
    }

    pub fn redirect_to(&mut self, url: &str) {
        self.redirect(StatusCode::FOUND, url);
    }

    pub fn not_modified(&mut self) {
        self.write_status(StatusCode::NOT_MODIFIED);
        self.finish();
    }

    pub fn not_found(&mut self) {
        self.write_status(StatusCode::NOT_FOUND);
        self.finish();
    }

    pub fn close(&mut self) {
        self.gate.close();
    }

    /// Mark the response complete. Idempotent; every later lifecycle stage
    /// observes this and stops.
    pub fn finish(&mut self) {
        self.gate.finish();
    }

    pub fn is_closed(&self) -> bool {
        self.gate.is_closed()
    }

    pub fn is_finished(&self) -> bool {
        self.gate.is_finished()
    }

    // ── Cookies ───────────────────────────────────────────────────

    /// Value of a request cookie, if present.
    pub fn cookie(&self, name: &str) -> Option<String> {
        for header_value in self.request_headers.get_all(header::COOKIE) {
            let Ok(raw) = header_value.to_str() else { continue };
            for pair in raw.split(';') {
                if let Some((key, value)) = pair.trim().split_once('=') {
                    if key == name {
                        return Some(value.to_string());
                    }
                }
            }
        }
        None
    }

    /// Set a response cookie. `ttl_secs` of zero means a browser-session
    /// cookie.
    pub fn set_cookie(&mut self, name: &str, value: &str, ttl_secs: i64) {
        let mut cookie = format!("{name}={value}; Path=/");
        if ttl_secs > 0 {
            cookie.push_str(&format!("; Max-Age={ttl_secs}"));
        }
        self.add_header(header::SET_COOKIE, &cookie);
    }

    /// Set a signed cookie: `base64(value)|expiry|signature`.
    pub fn set_secure_cookie(&mut self, name: &str, value: &str, ttl_secs: i64) {
        let encoded = BASE64.encode(value.as_bytes());
        let timestamp = if ttl_secs > 0 {
            (unix_now() as i64 + ttl_secs).to_string()
        } else {
            "0".to_string()
        };
        let sig = signing::cookie_signature(&self.secret, name, &encoded, &timestamp);
        let payload = format!("{encoded}|{timestamp}|{sig}");
        self.set_cookie(name, &payload, ttl_secs);
    }

    /// Read and verify a signed cookie. Returns `None` for any malformed,
    /// tampered, or expired payload, identically to "no cookie present".
    pub fn secure_cookie(&self, name: &str) -> Option<String> {
        let raw = self.cookie(name)?;
        let mut parts = raw.splitn(3, '|');
        let (encoded, timestamp, sig) = (parts.next()?, parts.next()?, parts.next()?);
        if signing::cookie_signature(&self.secret, name, encoded, timestamp) != sig {
            return None;
        }
        let expiry: i64 = timestamp.parse().ok()?;
        if expiry > 0 && unix_now() as i64 > expiry {
            return None;
        }
        let decoded = BASE64.decode(encoded).ok()?;
        String::from_utf8(decoded).ok()
    }

    // ── Uploads ───────────────────────────────────────────────────

    /// Fetch an uploaded file by form field name. The multipart collaborator
    /// populates the slots via [`Context::insert_upload`].
    pub fn upload_file(&self, field: &str) -> Result<&UploadFile, UploadError> {
        if self.method != Method::POST && self.method != Method::PUT {
            return Err(UploadError::WrongMethod(self.method.clone()));
        }
        self.uploads
            .get(field)
            .ok_or_else(|| UploadError::MissingField(field.to_string()))
    }

    pub fn insert_upload(&mut self, field: impl Into<String>, file: UploadFile) {
        self.uploads.insert(field.into(), file);
    }

    // ── Completion ────────────────────────────────────────────────

    pub(crate) fn into_response(self) -> Response<Bytes> {
        let mut response = Response::new(self.gate.into_body());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

fn is_urlencoded_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// MIME type for a file extension (no leading dot). Shared with static
/// file serving.
pub(crate) fn mime_for(ext: &str) -> Option<&'static str> {
    match ext {
        "html" | "htm" => Some("text/html; charset=utf-8"),
        "css" => Some("text/css"),
        "js" => Some("application/javascript"),
        "json" => Some("application/json"),
        "txt" => Some("text/plain; charset=utf-8"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        "ico" => Some("image/x-icon"),
        _ => None,
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_for(request: Request<Bytes>) -> Context {
        Context::new(request, "test-secret".to_string(), Arc::new(HashMap::new()))
    }

    fn get(uri: &str) -> Context {
        context_for(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Bytes::new())
                .unwrap(),
        )
    }

    #[test]
    fn query_parameters_are_parsed() {
        let ctx = get("/search?q=rust&page=2");
        assert_eq!(ctx.param("q"), Some("rust"));
        assert_eq!(ctx.param("page"), Some("2"));
        assert_eq!(ctx.param("missing"), None);
    }

    #[test]
    fn form_body_merges_with_query() {
        let ctx = context_for(
            Request::builder()
                .method(Method::POST)
                .uri("/submit?from=query")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Bytes::from_static(b"name=alice&from=form"))
                .unwrap(),
        );
        assert_eq!(ctx.param("name"), Some("alice"));
        assert_eq!(ctx.param_values("from"), ["query", "form"]);
    }

    #[test]
    fn added_params_append_without_clobbering() {
        let mut ctx = get("/x?id=original");
        ctx.add_param("id".to_string(), "captured".to_string());
        assert_eq!(ctx.param("id"), Some("original"));
        assert_eq!(ctx.param_values("id"), ["original", "captured"]);
    }

    #[test]
    fn secure_cookie_round_trip_through_headers() {
        let mut ctx = get("/");
        ctx.set_secure_cookie("u", "alice", 0);
        let set_cookie = ctx.headers.get(header::SET_COOKIE).unwrap();
        let cookie_pair = set_cookie
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let ctx2 = context_for(
            Request::builder()
                .method(Method::GET)
                .uri("/")
                .header(header::COOKIE, cookie_pair)
                .body(Bytes::new())
                .unwrap(),
        );
        assert_eq!(ctx2.secure_cookie("u").as_deref(), Some("alice"));
    }

    #[test]
    fn malformed_secure_cookie_is_absent() {
        let ctx = context_for(
            Request::builder()
                .method(Method::GET)
                .uri("/")
                .header(header::COOKIE, "u=not-a-signed-payload")
                .body(Bytes::new())
                .unwrap(),
        );
        assert_eq!(ctx.secure_cookie("u"), None);
    }

    #[test]
    fn content_type_resolves_with_or_without_the_dot() {
        let mut ctx = get("/");
        ctx.set_content_type("json");
        assert_eq!(
            ctx.headers.get(header::CONTENT_TYPE).unwrap(),
            &"application/json"
        );
        ctx.set_content_type(".html");
        assert_eq!(
            ctx.headers.get(header::CONTENT_TYPE).unwrap(),
            &"text/html; charset=utf-8"
        );
        // Unknown extension leaves the last value in place.
        ctx.set_content_type("zzz");
        assert_eq!(
            ctx.headers.get(header::CONTENT_TYPE).unwrap(),
            &"text/html; charset=utf-8"
        );
    }

    #[test]
    fn upload_requires_post_or_put() {
        let ctx = get("/upload");
        assert!(matches!(
            ctx.upload_file("avatar"),
            Err(UploadError::WrongMethod(_))
        ));
    }
}
