use axum::{http::StatusCode, response::IntoResponse, Json};
use series_common::Error;

/// Failure side of every action: a status code and the messages shown to
/// the caller.
///
/// Serializes as `{"errors": [...]}`; the body is left out entirely when
/// there is nothing to say.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    errors: Vec<String>,
}

impl ApiError {
    pub fn new<I, M>(status: StatusCode, errors: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self {
            status,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, [message])
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Vec::<String>::new())
    }

    /// Maps an interactor failure for a request that names its series in
    /// the body, where a missing series is the caller's mistake.
    ///
    /// Infrastructure errors are logged and never shown to the caller.
    pub fn from_interactor(err: Error) -> Self {
        match err {
            Error::SeriesNotFound | Error::AlreadyReviewed => Self::bad_request(err.to_string()),
            err => {
                tracing::error!(error = ?err, "error handling request");

                Self::internal()
            }
        }
    }

    /// Same as [`ApiError::from_interactor`] for a request that names its
    /// series in the path, answering 404 when it does not exist.
    pub fn from_lookup(err: Error) -> Self {
        match err {
            Error::SeriesNotFound => Self::new(StatusCode::NOT_FOUND, [err.to_string()]),
            err => Self::from_interactor(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        #[derive(serde::Serialize)]
        struct Res {
            errors: Vec<String>,
        }

        if self.errors.is_empty() {
            return self.status.into_response();
        }

        (self.status, Json(Res { errors: self.errors })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    async fn parts(err: ApiError) -> (StatusCode, Option<Value>) {
        let res = err.into_response();
        let status = res.status();

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();

        if bytes.is_empty() {
            (status, None)
        } else {
            (status, Some(serde_json::from_slice(&bytes).unwrap()))
        }
    }

    #[tokio::test]
    async fn missing_series_depends_on_where_it_was_named() {
        let (status, body) = parts(ApiError::from_lookup(Error::SeriesNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Some(json!({ "errors": ["series not found"] })));

        let (status, body) = parts(ApiError::from_interactor(Error::SeriesNotFound)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, Some(json!({ "errors": ["series not found"] })));
    }

    #[tokio::test]
    async fn already_reviewed_is_a_bad_request() {
        for err in [
            ApiError::from_interactor(Error::AlreadyReviewed),
            ApiError::from_lookup(Error::AlreadyReviewed),
        ] {
            let (status, body) = parts(err).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body,
                Some(json!({ "errors": ["this author already reviewed this series"] }))
            );
        }
    }

    #[tokio::test]
    async fn infrastructure_errors_are_opaque() {
        let cause = || std::io::Error::new(std::io::ErrorKind::Other, "password authentication failed");

        for err in [
            ApiError::from_interactor(Error::storage(cause())),
            ApiError::from_lookup(Error::storage(cause())),
        ] {
            let (status, body) = parts(err).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.is_none());
        }
    }

    #[test]
    fn empty_error_has_no_body() {
        let res = ApiError::internal().into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.headers().get("content-type").is_none());
    }

    #[test]
    fn error_body_is_json() {
        let res = ApiError::bad_request("nope").into_response();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()["content-type"], "application/json");
    }
}
