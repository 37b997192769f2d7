//! Physical file backend for memory-mapped I/O.
//!
//! [`Physical`] maps an image file directly into the process's virtual address space. Only the
//! pages that are actually touched get loaded, and the operating system shares the mapping
//! between processes that open the same file.

use std::{fs, path::Path};

use memmap2::Mmap;

use super::Backend;
use crate::{LoadError, LoadResult};

/// A file backend that uses memory-mapped I/O for efficient access to files on disk.
///
/// # Examples
///
/// ```rust,no_run
/// use metaref::file::{Backend, Physical};
///
/// let physical = Physical::new("System.dll")?;
/// println!("Image size: {} bytes", physical.len());
/// # Ok::<(), metaref::LoadError>(())
/// ```
#[derive(Debug)]
pub struct Physical {
    /// Memory-mapped file data
    data: Mmap,
}

impl Physical {
    /// Create a new physical file backend by memory-mapping the specified file.
    ///
    /// # Arguments
    /// * `path` - Path to the image on disk.
    ///
    /// # Errors
    /// Returns [`LoadError::NotFound`] if the file does not exist and [`LoadError::Io`] if it
    /// can not be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> LoadResult<Physical> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|error| LoadError::from_io(error, Some(path)))?;

        Self::from_std_file(&file)
    }

    /// Creates a new physical file backend from an opened [`std::fs::File`].
    ///
    /// # Errors
    /// Returns [`LoadError::Io`] if memory mapping fails.
    pub fn from_std_file(file: &fs::File) -> LoadResult<Physical> {
        // The mapping stays valid after `file` is closed.
        let mmap = unsafe { Mmap::map(file) }.map_err(LoadError::Io)?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
