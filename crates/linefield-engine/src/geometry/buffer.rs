use bytemuck::Zeroable;

use super::Vertex;

/// Fixed-capacity CPU vertex arena.
///
/// Storage is one contiguous allocation made at construction and reused for
/// the life of the buffer; per-frame use is `reset()` + append. `len` is the
/// authoritative bound: stale vertices past it are never read, so `reset`
/// does not clear storage.
#[derive(Debug)]
pub struct VertexBuffer {
    storage: Box<[Vertex]>,
    len: usize,
}

impl VertexBuffer {
    /// Allocates a buffer holding up to `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![Vertex::zeroed(); capacity].into_boxed_slice(),
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Vertices still writable before the buffer is full.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Logically clears the buffer in O(1). Capacity is retained.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Appends one vertex. Returns `false` (and writes nothing) iff full.
    #[inline]
    pub fn append(&mut self, vertex: Vertex) -> bool {
        if self.len == self.storage.len() {
            return false;
        }
        self.storage[self.len] = vertex;
        self.len += 1;
        true
    }

    /// The written prefix of the buffer.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.storage[..self.len]
    }

    /// The written prefix as raw bytes, ready for a verbatim GPU upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices())
    }
}
