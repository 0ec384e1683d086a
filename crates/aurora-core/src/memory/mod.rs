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

//! Tagged memory allocation and accounting.
//!
//! Every engine allocation is associated with a [`MemoryTag`]. The
//! [`TaggedAllocator`] keeps a running byte count per tag so that leaks can be
//! attributed to the subsystem that caused them. Each `allocate` must be paired
//! with exactly one `free` carrying the same tag and size; when every owner
//! behaves, the sum of all tag counters is zero at shutdown.
//!
//! The byte-level helpers ([`zero_memory`], [`copy_memory`], [`set_memory`])
//! mirror the classic fill/copy primitives on top of slices.

mod allocator;
mod block;
mod tag;

pub use allocator::{format_bytes, MemoryStats, TaggedAllocator};
pub use block::{MemoryBlock, MEMORY_ALIGNMENT};
pub use tag::MemoryTag;

/// Sets the first `size` bytes of `block` to zero.
///
/// # Panics
/// Panics if `size` exceeds the length of `block`.
pub fn zero_memory(block: &mut [u8], size: usize) {
    block[..size].fill(0);
}

/// Copies `size` bytes from `source` into `dest`.
///
/// The borrow rules guarantee the two regions never overlap.
///
/// # Panics
/// Panics if `size` exceeds the length of either slice.
pub fn copy_memory(dest: &mut [u8], source: &[u8], size: usize) {
    dest[..size].copy_from_slice(&source[..size]);
}

/// Sets the first `size` bytes of `dest` to `value`.
///
/// # Panics
/// Panics if `size` exceeds the length of `dest`.
pub fn set_memory(dest: &mut [u8], value: u8, size: usize) {
    dest[..size].fill(value);
}
