//! CPU-side staging for per-draw uniform data.
//!
//! Per-draw object blocks are usually bound through a single dynamic uniform
//! buffer: every draw's block is written at an aligned offset, and that
//! offset is passed as the dynamic offset when binding. [`UniformArena`]
//! builds the contents of such a buffer on the host so it can be uploaded in
//! one copy.
//!
//! # Example
//!
//! ```ignore
//! let mut arena = UniformArena::from_config(&config)?;
//! for object in &objects {
//!     let block = object.object_block(config.schema);
//!     let alloc = arena.push_object(&block).expect("arena full");
//!     draws.push((object, alloc.offset));
//! }
//! queue.write_buffer(&buffer, 0, arena.as_bytes());
//! arena.reset();
//! ```

use crate::error::{LayoutError, LayoutResult};
use crate::schema::ObjectBlock;
use crate::UniformConfig;

/// A region written into a [`UniformArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformAllocation {
    /// Byte offset, usable as a dynamic uniform offset.
    pub offset: u64,
    /// Size of the written block in bytes.
    pub size: u64,
}

impl UniformAllocation {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// Linear host buffer of uniform blocks at dynamic-offset alignment.
///
/// Not thread-safe; use one arena per recording thread.
#[derive(Debug, Clone)]
pub struct UniformArena {
    data: Vec<u8>,
    capacity: u64,
    alignment: u64,
    write_offset: u64,
    len: usize,
}

impl UniformArena {
    /// Typical `minUniformBufferOffsetAlignment` upper bound.
    pub const DEFAULT_ALIGNMENT: u64 = 256;

    pub fn new(capacity: u64) -> LayoutResult<Self> {
        Self::with_alignment(capacity, Self::DEFAULT_ALIGNMENT)
    }

    /// Create an arena whose allocations start at multiples of `alignment`.
    pub fn with_alignment(capacity: u64, alignment: u64) -> LayoutResult<Self> {
        if !alignment.is_power_of_two() {
            return Err(LayoutError::InvalidAlignment(alignment));
        }
        if capacity == 0 {
            return Err(LayoutError::ZeroCapacity);
        }

        Ok(Self {
            data: Vec::new(),
            capacity,
            alignment,
            write_offset: 0,
            len: 0,
        })
    }

    pub fn from_config(config: &UniformConfig) -> LayoutResult<Self> {
        Self::with_alignment(
            config.object_arena_capacity,
            config.min_uniform_offset_alignment,
        )
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Bytes used since the last reset, including alignment gaps.
    pub fn used(&self) -> u64 {
        self.write_offset
    }

    pub fn remaining(&self) -> u64 {
        self.capacity - self.write_offset
    }

    /// Number of blocks written since the last reset.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append raw bytes at the next aligned offset.
    ///
    /// Returns `None` if the block does not fit.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Option<UniformAllocation> {
        let offset = if self.len == 0 {
            0
        } else {
            align_up_u64(self.write_offset, self.alignment)
        };
        let size = bytes.len() as u64;

        if offset + size > self.capacity {
            log::warn!(
                "Uniform arena full: {size} bytes requested at offset {offset}, capacity {}",
                self.capacity
            );
            return None;
        }

        self.data.resize(offset as usize, 0);
        self.data.extend_from_slice(bytes);
        self.write_offset = offset + size;
        self.len += 1;

        Some(UniformAllocation { offset, size })
    }

    pub fn push<T: bytemuck::Pod>(&mut self, value: &T) -> Option<UniformAllocation> {
        self.push_bytes(bytemuck::bytes_of(value))
    }

    pub fn push_object(&mut self, block: &ObjectBlock) -> Option<UniformAllocation> {
        self.push_bytes(block.as_bytes())
    }

    /// Contents to upload, from offset 0 to the end of the last block.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Forget all blocks, keeping the allocation.
    pub fn reset(&mut self) {
        self.data.clear();
        self.write_offset = 0;
        self.len = 0;
    }
}

fn align_up_u64(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) & !(alignment - 1)
}
