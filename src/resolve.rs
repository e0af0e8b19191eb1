use axum_extra::headers::ContentRange;

use crate::error::ServeError;
use crate::range::RequestedInterval;

/// An inclusive byte window inside a resource of `total` bytes.
///
/// Always `start <= end < total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ResolvedWindow {
    /// Number of bytes in the window.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header describing this window.
    pub fn content_range(&self) -> ContentRange {
        ContentRange::bytes(self.start..=self.end, self.total)
            .expect("an inclusive window inside the resource is a valid byte range")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// No range was asked for, the window covers the whole resource.
    Full(ResolvedWindow),
    /// A satisfiable range.
    Partial(ResolvedWindow),
    Unsatisfiable,
    BadRequest,
}

impl ResolutionOutcome {
    /// The window to read, or the error the request ends with.
    pub fn window(&self) -> Result<ResolvedWindow, ServeError> {
        match *self {
            ResolutionOutcome::Full(window) | ResolutionOutcome::Partial(window) => Ok(window),
            ResolutionOutcome::Unsatisfiable => Err(ServeError::Unsatisfiable),
            ResolutionOutcome::BadRequest => Err(ServeError::BadRequest),
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, ResolutionOutcome::Partial(_))
    }
}

/// Resolves a requested interval against a resource of `total` bytes.
///
/// An explicit end past EOF is clamped to the last byte, but a start past
/// EOF is unsatisfiable. An empty resource is always unsatisfiable.
pub fn resolve(interval: RequestedInterval, total: u64) -> ResolutionOutcome {
    if total == 0 {
        return ResolutionOutcome::Unsatisfiable;
    }
    let last = total - 1;

    let (start, end) = match interval {
        RequestedInterval::Absent => {
            return ResolutionOutcome::Full(ResolvedWindow { start: 0, end: last, total });
        }
        RequestedInterval::Malformed => return ResolutionOutcome::BadRequest,
        RequestedInterval::Parsed { start: None, end: Some(suffix) } => {
            (total.saturating_sub(suffix), last)
        }
        RequestedInterval::Parsed { start: Some(start), end: None } => (start, last),
        RequestedInterval::Parsed { start: Some(start), end: Some(end) } => (start, end.min(last)),
        RequestedInterval::Parsed { start: None, end: None } => {
            return ResolutionOutcome::BadRequest;
        }
    };

    if start > end || start >= total {
        return ResolutionOutcome::Unsatisfiable;
    }

    ResolutionOutcome::Partial(ResolvedWindow { start, end, total })
}
