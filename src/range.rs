use axum::http::{header, HeaderMap};

const BYTES_PREFIX: &str = "bytes=";

/// A `Range` header as understood by this crate: at most one contiguous
/// byte range, possibly open at either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedInterval {
    /// No `Range` header was sent.
    Absent,
    /// A `Range` header was sent but does not follow `bytes=<start>-<end>`.
    Malformed,
    /// `bytes=-N` has no `start` (the last `N` bytes), `bytes=N-` has no
    /// `end` (from `N` to EOF). The two are never both `None`.
    Parsed { start: Option<u64>, end: Option<u64> },
}

impl RequestedInterval {
    /// Reads the first `Range` header from `headers`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(header::RANGE) {
            None => RequestedInterval::Absent,
            Some(value) => match value.to_str() {
                Ok(value) => parse(Some(value)),
                Err(_) => RequestedInterval::Malformed,
            },
        }
    }
}

/// Parses the raw value of a `Range` header.
///
/// Only the first range-spec of a comma separated list is looked at, the
/// rest is ignored.
pub fn parse(raw: Option<&str>) -> RequestedInterval {
    let Some(raw) = raw else {
        return RequestedInterval::Absent;
    };
    let Some(set) = raw.strip_prefix(BYTES_PREFIX) else {
        return RequestedInterval::Malformed;
    };

    let spec = set.split(',').next().unwrap_or_default().trim();
    let Some((left, right)) = spec.split_once('-') else {
        return RequestedInterval::Malformed;
    };

    match (left.is_empty(), right.is_empty()) {
        (true, true) => RequestedInterval::Malformed,
        (true, false) => match parse_position(right) {
            Some(suffix) => RequestedInterval::Parsed { start: None, end: Some(suffix) },
            None => RequestedInterval::Malformed,
        },
        (false, true) => match parse_position(left) {
            Some(start) => RequestedInterval::Parsed { start: Some(start), end: None },
            None => RequestedInterval::Malformed,
        },
        (false, false) => match (parse_position(left), parse_position(right)) {
            (Some(start), Some(end)) => {
                RequestedInterval::Parsed { start: Some(start), end: Some(end) }
            }
            _ => RequestedInterval::Malformed,
        },
    }
}

// `u64::from_str` accepts a leading `+`, which is not a valid byte position.
fn parse_position(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
