use axum::{
    extract::{OriginalUri, Request},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::MethodFilter,
    Json,
};
use seo::RequestError;
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// Browsers and the CDN may keep successful pages and sitemaps for an hour.
pub const CACHE_ONE_HOUR: &str = "public, max-age=3600, s-maxage=3600";

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_XML: &str = "application/xml; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VecResponse<T> {
    pub data: Vec<T>,
}

impl<T> VecResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

/// `body` with the given content type and, if set, the one hour cache header.
pub(crate) fn document(
    status: StatusCode,
    content_type: &'static str,
    cached: bool,
    body: String,
) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    if cached {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_ONE_HOUR));
    }
    response
}

pub(crate) fn plain_text(status: StatusCode, body: impl Into<String>) -> Response {
    document(status, CONTENT_TYPE_TEXT, false, body.into())
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("unknown error");
        self.with_message(message)
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::NotFound => Self::new(StatusCode::NOT_FOUND)
                .with_message("The requested item does not exist."),
            RequestError::InvalidArgument(why) => {
                Self::new(StatusCode::BAD_REQUEST).with_message(why)
            }
            RequestError::Other(other) => {
                log::error!("request failed: {other}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_default_message()
            }
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_map_to_status_codes() {
        let not_found = RouteErrorResponse::from(RequestError::NotFound);
        assert_eq!(not_found.status_code, StatusCode::NOT_FOUND);

        let invalid = RouteErrorResponse::from(RequestError::InvalidArgument("page".to_owned()));
        assert_eq!(invalid.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message.as_deref(), Some("page"));

        let other = RouteErrorResponse::from(RequestError::Other("down".into()));
        assert_eq!(other.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(other.message.as_deref(), Some("Internal Server Error"));
    }
}
