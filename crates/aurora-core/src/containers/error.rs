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

use std::fmt;

/// A rejected operation on a growable array. The array is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DArrayError {
    /// The index does not address an existing element.
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The array's length at the time of the call.
        length: usize,
    },
    /// A length larger than the allocated capacity was requested.
    LengthExceedsCapacity {
        /// The requested length.
        length: usize,
        /// The array's capacity.
        capacity: usize,
    },
}

impl fmt::Display for DArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DArrayError::IndexOutOfBounds { index, length } => {
                write!(
                    f,
                    "Index outside the bounds of this array! Length: {length}, index: {index}"
                )
            }
            DArrayError::LengthExceedsCapacity { length, capacity } => {
                write!(
                    f,
                    "Length {length} exceeds the capacity of this array ({capacity})"
                )
            }
        }
    }
}

impl std::error::Error for DArrayError {}
