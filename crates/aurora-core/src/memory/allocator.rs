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

use super::block::MemoryBlock;
use super::tag::MemoryTag;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// A snapshot of the allocator's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStats {
    /// Bytes currently accounted under each tag, indexed by [`MemoryTag::index`].
    pub tagged_bytes: [u64; MemoryTag::COUNT],
    /// Sum of all tag counters.
    pub total_bytes: u64,
    /// The highest value `total_bytes` has ever reached.
    pub peak_bytes: u64,
    /// Number of `allocate` calls.
    pub total_allocations: u64,
    /// Number of `free` calls.
    pub total_frees: u64,
}

impl MemoryStats {
    /// Bytes currently accounted under `tag`.
    pub fn bytes_for(&self, tag: MemoryTag) -> u64 {
        self.tagged_bytes[tag.index()]
    }

    /// Number of allocations that have not been freed yet.
    pub fn live_allocations(&self) -> i64 {
        self.total_allocations as i64 - self.total_frees as i64
    }
}

/// The engine's allocation front-end.
///
/// All engine heap traffic goes through [`allocate`](Self::allocate) and
/// [`free`](Self::free). The allocator keeps one byte counter per
/// [`MemoryTag`], starting at zero on construction.
///
/// The counters are atomics so that a shared `Arc<TaggedAllocator>` can be
/// handed to every subsystem; the engine itself drives it from a single thread.
#[derive(Debug, Default)]
pub struct TaggedAllocator {
    tagged: [AtomicU64; MemoryTag::COUNT],
    total: AtomicU64,
    peak: AtomicU64,
    allocations: AtomicU64,
    frees: AtomicU64,
}

impl TaggedAllocator {
    /// Creates an allocator with every counter at zero.
    pub fn new() -> Self {
        log::debug!("Tagged allocator initialized.");
        Self::default()
    }

    /// Allocates a zeroed block of `size` bytes accounted under `tag`.
    ///
    /// There is no failure value: if the system cannot provide the memory,
    /// the error is logged and the process terminates.
    pub fn allocate(&self, size: usize, tag: MemoryTag) -> MemoryBlock {
        if tag == MemoryTag::Unknown {
            log::warn!("allocate called using MemoryTag::Unknown. Re-class this allocation.");
        }

        let block = MemoryBlock::allocate(size);
        let size = size as u64;

        self.tagged[tag.index()].fetch_add(size, Ordering::Relaxed);
        let new_total = self.total.fetch_add(size, Ordering::Relaxed) + size;
        self.peak.fetch_max(new_total, Ordering::Relaxed);
        self.allocations.fetch_add(1, Ordering::Relaxed);

        log::trace!("Allocated {size} bytes under {tag}.");
        block
    }

    /// Releases `block`, decrementing `tag`'s counter by `size`.
    ///
    /// `size` and `tag` must match the values given to `allocate`. A mismatch
    /// leaves the counters inconsistent; the memory itself is always released.
    pub fn free(&self, block: MemoryBlock, size: usize, tag: MemoryTag) {
        if tag == MemoryTag::Unknown {
            log::warn!("free called using MemoryTag::Unknown. Re-class this allocation.");
        }
        if block.size() != size {
            log::warn!(
                "free called with size {size} for a block of {} bytes under {tag}.",
                block.size()
            );
        }

        let size = size as u64;
        let tag_result = self.tagged[tag.index()].fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |current| current.checked_sub(size),
        );
        if tag_result.is_err() {
            log::error!("Memory tracking counter for {tag} underflowed during free! Size: {size}");
        }

        let total_result =
            self.total
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                    current.checked_sub(size)
                });
        if total_result.is_err() {
            log::error!("Total memory tracking counter underflowed during free! Size: {size}");
        }

        self.frees.fetch_add(1, Ordering::Relaxed);
        drop(block);
    }

    /// Bytes currently accounted under `tag`.
    pub fn tag_usage(&self, tag: MemoryTag) -> u64 {
        self.tagged[tag.index()].load(Ordering::Relaxed)
    }

    /// Bytes currently accounted under all tags.
    pub fn total_usage(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Takes a snapshot of every counter.
    pub fn stats(&self) -> MemoryStats {
        let mut tagged_bytes = [0u64; MemoryTag::COUNT];
        for (slot, counter) in tagged_bytes.iter_mut().zip(self.tagged.iter()) {
            *slot = counter.load(Ordering::Relaxed);
        }

        MemoryStats {
            tagged_bytes,
            total_bytes: self.total.load(Ordering::Relaxed),
            peak_bytes: self.peak.load(Ordering::Relaxed),
            total_allocations: self.allocations.load(Ordering::Relaxed),
            total_frees: self.frees.load(Ordering::Relaxed),
        }
    }

    /// Produces a human-readable breakdown of the bytes in use per tag.
    pub fn usage_report(&self) -> String {
        let stats = self.stats();
        let mut report = String::from("System memory use (tagged):\n");

        for tag in MemoryTag::ALL {
            let _ = writeln!(
                report,
                "  {:<12}: {}",
                tag.label(),
                format_bytes(stats.bytes_for(tag))
            );
        }
        let _ = write!(
            report,
            "  {:<12}: {} (peak {})",
            "TOTAL",
            format_bytes(stats.total_bytes),
            format_bytes(stats.peak_bytes)
        );

        report
    }
}

/// Formats a byte count using the largest fitting binary unit.
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= GIB {
        format!("{:.2}GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.2}MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2}KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes}B")
    }
}
