//! Loaded module images.
//!
//! [`Metadata`] is what a [`crate::Reference`] hands back from
//! [`crate::Reference::get_metadata`]. It pairs the [`ImageKind`] the image was loaded as with
//! the image bytes behind a [`crate::file::Backend`]. Decoding the binary layout is left to the
//! consumer; the only check performed here is that the image is not empty.
//!
//! Metadata is never cached by the reference it came from. It is cheap to clone, so an external
//! cache can hand out the same value to every compilation that needs it.

use std::{fmt, fs, path::Path, sync::Arc};

use crate::{
    file::{Backend, Memory, Physical},
    reference::ImageKind,
    LoadError, LoadResult,
};

/// A loaded module image.
#[derive(Clone)]
pub struct Metadata {
    kind: ImageKind,
    image: Arc<dyn Backend>,
}

impl Metadata {
    /// Wraps an already loaded image.
    ///
    /// # Errors
    /// Returns [`LoadError::Malformed`] if the image is empty.
    pub fn new(kind: ImageKind, image: Arc<dyn Backend>) -> LoadResult<Self> {
        if image.is_empty() {
            return Err(malformed_error!("Provided {} image was empty", kind));
        }

        Ok(Metadata { kind, image })
    }

    /// Wraps an image held in memory.
    ///
    /// # Errors
    /// Returns [`LoadError::Malformed`] if `data` is empty.
    pub fn from_mem(kind: ImageKind, data: impl Into<Arc<[u8]>>) -> LoadResult<Self> {
        Self::new(kind, Arc::new(Memory::new(data)))
    }

    /// Loads an image from disk.
    ///
    /// With `memory_map` set the file is mapped into memory, otherwise it is read into a buffer.
    ///
    /// # Errors
    /// Returns [`LoadError::NotFound`] if the file does not exist, [`LoadError::Malformed`] if
    /// it is empty and [`LoadError::Io`] for any other access failure.
    pub fn from_file(kind: ImageKind, path: &Path, memory_map: bool) -> LoadResult<Self> {
        let file = fs::File::open(path).map_err(|error| LoadError::from_io(error, Some(path)))?;
        let size = file.metadata().map_err(LoadError::Io)?.len();
        if size == 0 {
            return Err(malformed_error!("File '{}' is empty", path.display()));
        }

        let image: Arc<dyn Backend> = if memory_map {
            Arc::new(Physical::from_std_file(&file)?)
        } else {
            let data = fs::read(path).map_err(|error| LoadError::from_io(error, Some(path)))?;
            Arc::new(Memory::new(data))
        };

        Self::new(kind, image)
    }

    /// The kind this image was loaded as.
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// The raw image bytes.
    pub fn data(&self) -> &[u8] {
        self.image.data()
    }

    /// Size of the image in bytes.
    pub fn len(&self) -> usize {
        self.image.len()
    }

    /// Always `false`; empty images are rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    /// The backend holding the image.
    pub fn image(&self) -> &Arc<dyn Backend> {
        &self.image
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metadata")
            .field("kind", &self.kind)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mem() {
        let metadata = Metadata::from_mem(ImageKind::Assembly, b"MZ".to_vec()).unwrap();
        assert_eq!(metadata.kind(), ImageKind::Assembly);
        assert_eq!(metadata.data(), b"MZ");
        assert_eq!(metadata.len(), 2);
    }

    #[test]
    fn test_from_mem_empty() {
        let result = Metadata::from_mem(ImageKind::Module, Vec::<u8>::new());
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_from_file_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.dll");
        fs::write(&path, b"MZ\x90\x00").unwrap();

        let mapped = Metadata::from_file(ImageKind::Assembly, &path, true).unwrap();
        let buffered = Metadata::from_file(ImageKind::Assembly, &path, false).unwrap();
        assert_eq!(mapped.data(), buffered.data());
    }

    #[test]
    fn test_from_file_empty_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.dll");
        fs::write(&empty, b"").unwrap();

        assert!(matches!(
            Metadata::from_file(ImageKind::Assembly, &empty, true),
            Err(LoadError::Malformed { .. })
        ));
        assert!(matches!(
            Metadata::from_file(ImageKind::Assembly, &dir.path().join("nope.dll"), false),
            Err(LoadError::NotFound { name: Some(_) })
        ));
    }

    #[test]
    fn test_clone_shares_image() {
        let metadata = Metadata::from_mem(ImageKind::Assembly, vec![1_u8, 2, 3]).unwrap();
        let copy = metadata.clone();
        assert!(Arc::ptr_eq(metadata.image(), copy.image()));
    }
}
