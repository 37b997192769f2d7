use std::sync::Arc;

use super::Backend;

/// Image backed by a shared memory buffer.
///
/// The buffer is reference counted, so every [`crate::metadata::Metadata`] loaded from the same
/// in-memory reference shares one allocation.
#[derive(Debug, Clone)]
pub struct Memory {
    data: Arc<[u8]>,
}

impl Memory {
    /// Create a new memory backend
    ///
    /// ## Arguments
    /// * 'data' - The data buffer to share
    pub fn new(data: impl Into<Arc<[u8]>>) -> Memory {
        Memory { data: data.into() }
    }

    /// The shared buffer behind this backend.
    pub fn shared(&self) -> &Arc<[u8]> {
        &self.data
    }
}

impl Backend for Memory {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory() {
        let mut data = vec![0xCC_u8; 1048];
        data[10..15].fill(0xBB);

        let memory = Memory::new(data);

        assert_eq!(memory.len(), 1048);
        assert_eq!(memory.data()[0], 0xCC);
        assert_eq!(memory.data()[42], 0xCC);
        assert_eq!(
            memory.data_slice(10, 5).unwrap(),
            &[0xBB, 0xBB, 0xBB, 0xBB, 0xBB]
        );

        assert!(memory
            .data_slice(u32::MAX as usize, u32::MAX as usize)
            .is_none());
        assert!(memory.data_slice(0, 2048).is_none());
    }

    #[test]
    fn test_memory_empty_buffer() {
        let memory = Memory::new(Vec::<u8>::new());

        assert!(memory.is_empty());
        assert!(memory.data_slice(0, 1).is_none());
        assert!(memory.data_slice(1, 0).is_none());
        let empty_slice: &[u8] = &[];
        assert_eq!(memory.data_slice(0, 0).unwrap(), empty_slice);
    }

    #[test]
    fn test_memory_offset_overflow() {
        let memory = Memory::new(vec![0x00_u8; 100]);

        assert!(memory.data_slice(usize::MAX, 1).is_none());
        assert!(memory.data_slice(100, 1).is_none());
        assert!(memory.data_slice(99, 2).is_none());
    }

    #[test]
    fn test_memory_shared_buffer() {
        let data: Arc<[u8]> = Arc::from(vec![1_u8, 2, 3]);
        let first = Memory::new(Arc::clone(&data));
        let second = first.clone();

        assert!(Arc::ptr_eq(first.shared(), &data));
        assert!(Arc::ptr_eq(first.shared(), second.shared()));
    }
}
