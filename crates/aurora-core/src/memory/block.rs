// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The owned byte block handed out by the tagged allocator.

use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Alignment, in bytes, of every non-empty block.
pub const MEMORY_ALIGNMENT: usize = 16;

/// A zero-initialized, exclusively owned region of heap memory.
///
/// Blocks are obtained from [`TaggedAllocator::allocate`](super::TaggedAllocator::allocate)
/// and should be handed back through
/// [`TaggedAllocator::free`](super::TaggedAllocator::free). Dropping a block
/// releases the memory but leaves the tag counter untouched.
pub struct MemoryBlock {
    ptr: NonNull<u8>,
    size: usize,
}

impl MemoryBlock {
    /// Creates a block that owns no memory.
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            size: 0,
        }
    }

    /// Obtains `size` zeroed bytes from the system allocator.
    ///
    /// Running out of memory terminates the process.
    pub(super) fn allocate(size: usize) -> Self {
        if size == 0 {
            return Self::empty();
        }

        let layout = match Layout::from_size_align(size, MEMORY_ALIGNMENT) {
            Ok(layout) => layout,
            Err(e) => {
                log::error!("Allocation of {size} bytes has no valid layout: {e}. Aborting.");
                std::process::abort();
            }
        };

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        match NonNull::new(raw) {
            Some(ptr) => Self { ptr, size },
            None => {
                log::error!("System allocator failed to provide {size} bytes.");
                alloc::handle_alloc_error(layout)
            }
        }
    }

    /// The number of bytes owned by this block.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the block owns no memory.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl Deref for MemoryBlock {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `size` initialized bytes (or dangling with size 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }
}

impl DerefMut for MemoryBlock {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: same as `deref`, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl Drop for MemoryBlock {
    fn drop(&mut self) {
        if self.size == 0 {
            return;
        }
        // SAFETY: the block was allocated with exactly this layout in `allocate`.
        unsafe {
            let layout = Layout::from_size_align_unchecked(self.size, MEMORY_ALIGNMENT);
            alloc::dealloc(self.ptr.as_ptr(), layout);
        }
    }
}

impl Default for MemoryBlock {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for MemoryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBlock")
            .field("ptr", &self.ptr)
            .field("size", &self.size)
            .finish()
    }
}
