//! Storage backends for loaded module images.
//!
//! A [`crate::metadata::Metadata`] value keeps the bytes of the image it was loaded from behind
//! the [`Backend`] trait, so that the same API works regardless of where the image lives.
//!
//! # Key Components
//!
//! - [`Backend`] - Trait for different data sources (disk files, memory buffers)
//! - [`Physical`] - Memory-mapped file backend for disk access
//! - [`Memory`] - Shared in-memory buffer backend
//!
//! # Thread Safety
//!
//! All backends are [`Send`] and [`Sync`]; a loaded image can be shared across threads without
//! additional synchronization.

mod memory;
mod physical;

pub use memory::Memory;
pub use physical::Physical;

/// Backend trait for image data sources.
///
/// This trait abstracts over the source of image data, allowing for both in-memory and on-disk
/// representations. All implementations must be thread-safe.
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// Returns `None` if the requested range is out of bounds.
    ///
    /// # Arguments
    ///
    /// * `offset` - The starting offset within the data.
    /// * `len` - The length of the slice in bytes.
    fn data_slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.data().get(offset..end)
    }

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the backend holds no data.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
