//! # media-range
//!
//! Byte-range file streaming for [`axum`][1], so browsers and video players
//! can seek inside large media files without downloading them in full.
//!
//! Requests go through two pure steps before any I/O happens:
//!
//! 1. [`range::parse`] turns the raw `Range` header into a
//!    [`RequestedInterval`].
//! 2. [`resolve::resolve`] checks that interval against the file size and
//!    yields a [`ResolutionOutcome`].
//!
//! The bytes of the resolved window are then read through a [`FileLookup`]
//! as a [`RangedStream`] and sent as a [`RangedResponse`].
//!
//! Any type implementing both [`AsyncRead`] and [`AsyncSeekStart`] can be
//! served through the [`KnownSize`] adapter struct. There is also special
//! cased support for [`tokio::fs::File`], see the [`KnownSize::file`] method.
//!
//! ```
//! use media_range::{range, resolve, ResolutionOutcome, ResolvedWindow};
//!
//! let interval = range::parse(Some("bytes=-500"));
//! assert_eq!(
//!     ResolutionOutcome::Partial(ResolvedWindow { start: 500, end: 999, total: 1000 }),
//!     resolve::resolve(interval, 1000),
//! );
//! ```
//!
//! [1]: https://docs.rs/axum

mod file;
mod stream;

pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod mime;
pub mod range;
pub mod resolve;
pub mod response;
pub mod server;

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncSeek};

pub use config::Config;
pub use error::ServeError;
pub use file::KnownSize;
pub use lookup::{DiskLookup, FileLookup, MemoryLookup};
pub use mime::{GuessMime, MimeTypeDetector};
pub use range::RequestedInterval;
pub use resolve::{ResolutionOutcome, ResolvedWindow};
pub use response::RangedResponse;
pub use server::{router, AppState};
pub use stream::RangedStream;

/// [`AsyncSeek`] narrowed to only allow seeking from start.
pub trait AsyncSeekStart {
    /// Same semantics as [`AsyncSeek::start_seek`], always passing position as the
    /// `SeekFrom::Start` variant.
    fn start_seek(self: Pin<&mut Self>, position: u64) -> io::Result<()>;

    /// Same semantics as [`AsyncSeek::poll_complete`], returning `()` instead of the new
    /// stream position.
    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>>;
}

impl<T: AsyncSeek> AsyncSeekStart for T {
    fn start_seek(self: Pin<&mut Self>, position: u64) -> io::Result<()> {
        AsyncSeek::start_seek(self, io::SeekFrom::Start(position))
    }

    fn poll_complete(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        AsyncSeek::poll_complete(self, cx).map_ok(|_| ())
    }
}

/// An [`AsyncRead`] and [`AsyncSeekStart`] with a fixed known byte size.
pub trait RangeBody: AsyncRead + AsyncSeekStart {
    /// The total size of the underlying file.
    ///
    /// This should not change for the lifetime of the object once queried.
    /// Behaviour is not guaranteed if it does change.
    fn byte_size(&self) -> u64;
}
