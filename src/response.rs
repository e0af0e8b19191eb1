use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use axum_extra::headers::{AcceptRanges, ContentLength};

use crate::{RangeBody, RangedStream, ResolvedWindow};

/// Data type containing computed headers and body for a file response. Implements [`IntoResponse`].
#[derive(Debug)]
pub enum RangedResponse<B> {
    /// Whole file, no range requested.
    Full {
        window: ResolvedWindow,
        stream: RangedStream<B>,
        content_type: String,
    },
    /// A single satisfiable range.
    Partial {
        window: ResolvedWindow,
        stream: RangedStream<B>,
        content_type: String,
    },
}

impl<B> RangedResponse<B> {
    pub fn window(&self) -> &ResolvedWindow {
        match self {
            RangedResponse::Full { window, .. } | RangedResponse::Partial { window, .. } => window,
        }
    }
}

fn content_type_value(content_type: &str) -> HeaderValue {
    HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

impl<B: RangeBody + Send + 'static> IntoResponse for RangedResponse<B> {
    fn into_response(self) -> Response {
        let accept_ranges = TypedHeader(AcceptRanges::bytes());

        match self {
            RangedResponse::Full { window, stream, content_type } => {
                let headers = [(header::CONTENT_TYPE, content_type_value(&content_type))];
                let content_length = TypedHeader(ContentLength(window.total));
                (StatusCode::OK, accept_ranges, content_length, headers, stream).into_response()
            }
            RangedResponse::Partial { window, stream, content_type } => {
                let headers = [(header::CONTENT_TYPE, content_type_value(&content_type))];
                let content_length = TypedHeader(ContentLength(window.len()));
                let content_range = TypedHeader(window.content_range());
                (
                    StatusCode::PARTIAL_CONTENT,
                    accept_ranges,
                    content_length,
                    content_range,
                    headers,
                    stream,
                ).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;
    use crate::KnownSize;

    const DATA: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

    fn stream(window: &ResolvedWindow) -> RangedStream<KnownSize<Cursor<&'static [u8]>>> {
        let body = KnownSize::sized(Cursor::new(DATA), DATA.len() as u64);
        RangedStream::window(body, window.start, window.end).unwrap()
    }

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_full_response() {
        let window = ResolvedWindow { start: 0, end: 61, total: 62 };
        let ranged = RangedResponse::Full {
            window,
            stream: stream(&window),
            content_type: "video/mp4".into(),
        };
        assert_eq!(&window, ranged.window());

        let response = ranged.into_response();
        assert_eq!(StatusCode::OK, response.status());

        let head = response.headers();
        assert_eq!(Some(&HeaderValue::from_static("bytes")), head.get(header::ACCEPT_RANGES));
        assert_eq!(Some(&HeaderValue::from_static("62")), head.get(header::CONTENT_LENGTH));
        assert_eq!(Some(&HeaderValue::from_static("video/mp4")), head.get(header::CONTENT_TYPE));
        assert!(head.get(header::CONTENT_RANGE).is_none());

        assert_eq!(DATA.to_vec(), body_of(response).await);
    }

    #[tokio::test]
    async fn test_partial_response() {
        let window = ResolvedWindow { start: 10, end: 19, total: 62 };
        let ranged = RangedResponse::Partial {
            window,
            stream: stream(&window),
            content_type: "video/webm".into(),
        };

        let response = ranged.into_response();
        assert_eq!(StatusCode::PARTIAL_CONTENT, response.status());

        let head = response.headers();
        assert_eq!(Some(&HeaderValue::from_static("bytes")), head.get(header::ACCEPT_RANGES));
        assert_eq!(Some(&HeaderValue::from_static("10")), head.get(header::CONTENT_LENGTH));
        assert_eq!(
            Some(&HeaderValue::from_static("bytes 10-19/62")),
            head.get(header::CONTENT_RANGE),
        );
        assert_eq!(Some(&HeaderValue::from_static("video/webm")), head.get(header::CONTENT_TYPE));

        assert_eq!(b"ABCDEFGHIJ".to_vec(), body_of(response).await);
    }

    #[tokio::test]
    async fn test_invalid_content_type_falls_back() {
        let window = ResolvedWindow { start: 0, end: 0, total: 62 };
        let ranged = RangedResponse::Partial {
            window,
            stream: stream(&window),
            content_type: "bad\nvalue".into(),
        };

        let response = ranged.into_response();
        assert_eq!(
            Some(&HeaderValue::from_static("application/octet-stream")),
            response.headers().get(header::CONTENT_TYPE),
        );
    }

    #[tokio::test]
    async fn test_single_byte_of_single_byte_body() {
        let window = ResolvedWindow { start: 0, end: 0, total: 1 };
        let body = KnownSize::sized(Cursor::new(&b"x"[..]), 1);
        let ranged = RangedResponse::Partial {
            window,
            stream: RangedStream::window(body, 0, 0).unwrap(),
            content_type: "video/mp4".into(),
        };

        let response = ranged.into_response();
        assert_eq!(StatusCode::PARTIAL_CONTENT, response.status());
        assert_eq!(
            Some(&HeaderValue::from_static("bytes 0-0/1")),
            response.headers().get(header::CONTENT_RANGE),
        );
        assert_eq!(b"x".to_vec(), body_of(response).await);
    }
}
