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

//! The growable array.
//!
//! A growable array is one allocation made through the [`TaggedAllocator`]
//! under [`MemoryTag::DArray`]. The block starts with a small header
//! (capacity, length, stride) followed by the element storage:
//!
//! ```text
//! | capacity: u64 | length: u64 | stride: u64 | element 0 | element 1 | ... |
//! ```
//!
//! [`RawDArray`] works on raw bytes with a caller-supplied stride.
//! [`DArray`] is the typed wrapper used by the rest of the engine.

use super::error::DArrayError;
use crate::memory::{copy_memory, MemoryBlock, MemoryTag, TaggedAllocator};
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// Capacity used by [`DArray::new`].
pub const DARRAY_DEFAULT_CAPACITY: usize = 1;
/// Capacity multiplier applied when a full array grows.
pub const DARRAY_RESIZE_FACTOR: usize = 2;
/// Size of the header preceding the element storage.
pub const DARRAY_HEADER_SIZE: usize = size_of::<DArrayHeader>();
/// Largest element alignment a typed [`DArray`] supports.
pub const DARRAY_MAX_ALIGN: usize = 8;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
struct DArrayHeader {
    capacity: u64,
    length: u64,
    stride: u64,
}

fn allocation_size(capacity: usize, stride: usize) -> usize {
    capacity
        .saturating_mul(stride)
        .saturating_add(DARRAY_HEADER_SIZE)
}

fn write_header(block: &mut [u8], header: DArrayHeader) {
    block[..DARRAY_HEADER_SIZE].copy_from_slice(bytemuck::bytes_of(&header));
}

/// A byte-level growable array with a fixed element stride.
///
/// Invariants: `length <= capacity`, the stride never changes, and the
/// capacity only grows, multiplied by [`DARRAY_RESIZE_FACTOR`] whenever an
/// insertion would overflow it. Growth may move the storage; the array value
/// remains the only owner, so no stale pointer can survive it.
pub struct RawDArray {
    allocator: Arc<TaggedAllocator>,
    block: MemoryBlock,
}

impl RawDArray {
    /// Creates an empty array able to hold `capacity` elements of `stride` bytes.
    pub fn create(allocator: Arc<TaggedAllocator>, capacity: usize, stride: usize) -> Self {
        let mut block = allocator.allocate(allocation_size(capacity, stride), MemoryTag::DArray);
        write_header(
            &mut block,
            DArrayHeader {
                capacity: capacity as u64,
                length: 0,
                stride: stride as u64,
            },
        );
        Self { allocator, block }
    }

    /// Destroys the array, returning its whole block to the allocator.
    pub fn destroy(self) {}

    fn header(&self) -> DArrayHeader {
        bytemuck::pod_read_unaligned(&self.block[..DARRAY_HEADER_SIZE])
    }

    fn write_length(&mut self, length: usize) {
        let mut header = self.header();
        header.length = length as u64;
        write_header(&mut self.block, header);
    }

    /// Number of elements the current storage can hold.
    pub fn capacity(&self) -> usize {
        self.header().capacity as usize
    }

    /// Number of elements currently stored.
    pub fn length(&self) -> usize {
        self.header().length as usize
    }

    /// Size of one element in bytes.
    pub fn stride(&self) -> usize {
        self.header().stride as usize
    }

    /// Returns `true` if the array holds no element.
    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// The stored elements as one contiguous byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        let used = self.length() * self.stride();
        &self.block[DARRAY_HEADER_SIZE..DARRAY_HEADER_SIZE + used]
    }

    /// The stored elements as one contiguous mutable byte slice.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let used = self.length() * self.stride();
        &mut self.block[DARRAY_HEADER_SIZE..DARRAY_HEADER_SIZE + used]
    }

    /// The bytes of the element at `index`, if it exists.
    pub fn element(&self, index: usize) -> Option<&[u8]> {
        let stride = self.stride();
        (index < self.length()).then(|| {
            let start = DARRAY_HEADER_SIZE + index * stride;
            &self.block[start..start + stride]
        })
    }

    /// The mutable bytes of the element at `index`, if it exists.
    pub fn element_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let stride = self.stride();
        if index >= self.length() {
            return None;
        }
        let start = DARRAY_HEADER_SIZE + index * stride;
        Some(&mut self.block[start..start + stride])
    }

    /// Moves the contents into a new block of `DARRAY_RESIZE_FACTOR` times the capacity.
    fn grow(&mut self) {
        let header = self.header();
        let capacity = header.capacity as usize;
        let stride = header.stride as usize;
        let length = header.length as usize;
        let new_capacity = capacity
            .saturating_mul(DARRAY_RESIZE_FACTOR)
            .max(DARRAY_DEFAULT_CAPACITY);

        let mut new_block = self
            .allocator
            .allocate(allocation_size(new_capacity, stride), MemoryTag::DArray);
        write_header(
            &mut new_block,
            DArrayHeader {
                capacity: new_capacity as u64,
                ..header
            },
        );
        copy_memory(
            &mut new_block[DARRAY_HEADER_SIZE..],
            &self.block[DARRAY_HEADER_SIZE..],
            length * stride,
        );

        let old_block = std::mem::replace(&mut self.block, new_block);
        self.allocator.free(
            old_block,
            allocation_size(capacity, stride),
            MemoryTag::DArray,
        );
        log::trace!("Growable array resized from {capacity} to {new_capacity} elements.");
    }

    fn check_stride(&self, value: &[u8]) {
        assert_eq!(
            value.len(),
            self.stride(),
            "value size does not match the array stride"
        );
    }

    /// Appends one element, growing the storage first if it is full.
    ///
    /// # Panics
    /// Panics if `value` is not exactly one stride long.
    pub fn push(&mut self, value: &[u8]) {
        self.check_stride(value);
        let length = self.length();
        if length >= self.capacity() {
            self.grow();
        }

        let stride = self.stride();
        let start = DARRAY_HEADER_SIZE + length * stride;
        copy_memory(&mut self.block[start..start + stride], value, stride);
        self.write_length(length + 1);
    }

    /// Removes the last element, copying it into `out`.
    ///
    /// Returns `false` and leaves `out` untouched if the array is empty.
    ///
    /// # Panics
    /// Panics if `out` is not exactly one stride long.
    pub fn pop(&mut self, out: &mut [u8]) -> bool {
        self.check_stride(out);
        let length = self.length();
        if length == 0 {
            log::error!("pop called on an empty array.");
            return false;
        }

        let stride = self.stride();
        let start = DARRAY_HEADER_SIZE + (length - 1) * stride;
        copy_memory(out, &self.block[start..start + stride], stride);
        self.write_length(length - 1);
        true
    }

    /// Inserts an element at `index`, shifting later elements one slot right.
    ///
    /// `index` must address an existing element; otherwise the call is
    /// rejected and the array is left unchanged.
    ///
    /// # Panics
    /// Panics if `value` is not exactly one stride long.
    pub fn insert_at(&mut self, index: usize, value: &[u8]) -> Result<(), DArrayError> {
        self.check_stride(value);
        let length = self.length();
        if index >= length {
            let error = DArrayError::IndexOutOfBounds { index, length };
            log::error!("{error}");
            return Err(error);
        }

        if length >= self.capacity() {
            self.grow();
        }

        let stride = self.stride();
        let start = DARRAY_HEADER_SIZE + index * stride;
        let end = DARRAY_HEADER_SIZE + length * stride;
        self.block.copy_within(start..end, start + stride);
        copy_memory(&mut self.block[start..start + stride], value, stride);
        self.write_length(length + 1);
        Ok(())
    }

    /// Removes the element at `index` into `out`, shifting later elements left.
    ///
    /// An out-of-range `index` is rejected and the array is left unchanged.
    ///
    /// # Panics
    /// Panics if `out` is not exactly one stride long.
    pub fn pop_at(&mut self, index: usize, out: &mut [u8]) -> Result<(), DArrayError> {
        self.check_stride(out);
        let length = self.length();
        if index >= length {
            let error = DArrayError::IndexOutOfBounds { index, length };
            log::error!("{error}");
            return Err(error);
        }

        let stride = self.stride();
        let start = DARRAY_HEADER_SIZE + index * stride;
        let end = DARRAY_HEADER_SIZE + length * stride;
        copy_memory(out, &self.block[start..start + stride], stride);
        self.block.copy_within(start + stride..end, start);
        self.write_length(length - 1);
        Ok(())
    }

    /// Sets the length to zero. The capacity is kept.
    pub fn clear(&mut self) {
        self.write_length(0);
    }

    /// Sets the length directly, exposing whatever bytes the storage holds.
    pub fn set_length(&mut self, length: usize) -> Result<(), DArrayError> {
        let capacity = self.capacity();
        if length > capacity {
            let error = DArrayError::LengthExceedsCapacity { length, capacity };
            log::error!("{error}");
            return Err(error);
        }
        self.write_length(length);
        Ok(())
    }
}

impl Drop for RawDArray {
    fn drop(&mut self) {
        let header = self.header();
        let size = allocation_size(header.capacity as usize, header.stride as usize);
        let block = std::mem::take(&mut self.block);
        self.allocator.free(block, size, MemoryTag::DArray);
    }
}

impl fmt::Debug for RawDArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        f.debug_struct("RawDArray")
            .field("capacity", &header.capacity)
            .field("length", &header.length)
            .field("stride", &header.stride)
            .finish()
    }
}

/// A typed growable array of plain-old-data elements.
///
/// The stride is `size_of::<T>()`. Elements are stored in the same
/// header-prefixed block as [`RawDArray`], so indexing works directly on the
/// storage.
pub struct DArray<T: Pod> {
    raw: RawDArray,
    _marker: PhantomData<T>,
}

impl<T: Pod> DArray<T> {
    const LAYOUT_CHECK: () = assert!(
        size_of::<T>() > 0 && align_of::<T>() <= DARRAY_MAX_ALIGN,
        "DArray elements must be sized and aligned to at most 8 bytes"
    );

    /// Creates an empty array with the default capacity.
    pub fn new(allocator: Arc<TaggedAllocator>) -> Self {
        Self::with_capacity(allocator, DARRAY_DEFAULT_CAPACITY)
    }

    /// Creates an empty array able to hold `capacity` elements before growing.
    pub fn with_capacity(allocator: Arc<TaggedAllocator>, capacity: usize) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LAYOUT_CHECK;
        Self {
            raw: RawDArray::create(allocator, capacity, size_of::<T>()),
            _marker: PhantomData,
        }
    }

    /// Destroys the array, returning its storage to the allocator.
    pub fn destroy(self) {}

    /// Number of elements the current storage can hold.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Number of elements currently stored.
    pub fn len(&self) -> usize {
        self.raw.length()
    }

    /// Size of one element in bytes.
    pub fn stride(&self) -> usize {
        self.raw.stride()
    }

    /// Returns `true` if the array holds no element.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The stored elements.
    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(self.raw.as_bytes())
    }

    /// The stored elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(self.raw.as_bytes_mut())
    }

    /// Iterates over the stored elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// A copy of the element at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).copied()
    }

    /// Appends `value`, growing the storage if it is full.
    pub fn push(&mut self, value: T) {
        self.raw.push(bytemuck::bytes_of(&value));
    }

    /// Appends every element of `values` in order.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        for value in values {
            self.push(*value);
        }
    }

    /// Removes and returns the last element, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        let mut value = T::zeroed();
        self.raw
            .pop(bytemuck::bytes_of_mut(&mut value))
            .then_some(value)
    }

    /// Inserts `value` before the element currently at `index`.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), DArrayError> {
        self.raw.insert_at(index, bytemuck::bytes_of(&value))
    }

    /// Removes and returns the element at `index`, closing the gap.
    pub fn pop_at(&mut self, index: usize) -> Result<T, DArrayError> {
        let mut value = T::zeroed();
        self.raw
            .pop_at(index, bytemuck::bytes_of_mut(&mut value))
            .map(|()| value)
    }

    /// Sets the length to zero. The capacity is kept.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Sets the length directly. Elements past the previous length keep
    /// whatever bytes the storage held (zero for never-written slots).
    pub fn set_length(&mut self, length: usize) -> Result<(), DArrayError> {
        self.raw.set_length(length)
    }
}

impl<T: Pod> Index<usize> for DArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Pod> IndexMut<usize> for DArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, T: Pod> IntoIterator for &'a DArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for DArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
