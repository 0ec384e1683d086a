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

/// The category an allocation is accounted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MemoryTag {
    /// For temporary use. Should be replaced by a dedicated tag.
    Unknown,
    /// Fixed-size arrays.
    Array,
    /// Growable arrays.
    DArray,
    /// Dictionaries and hash tables.
    Dict,
    /// Ring queues.
    RingQueue,
    /// Binary search trees.
    Bst,
    /// Strings.
    String,
    /// Application-level state.
    Application,
    /// Job system allocations.
    Job,
    /// Texture data.
    Texture,
    /// Material instances.
    MaterialInstance,
    /// Renderer state.
    Renderer,
    /// Game-specific state.
    Game,
    /// Transforms.
    Transform,
    /// Entities.
    Entity,
    /// Entity graph nodes.
    EntityNode,
    /// Scenes.
    Scene,
}

impl MemoryTag {
    /// The number of distinct tags.
    pub const COUNT: usize = 17;

    /// Every tag, in counter order.
    pub const ALL: [MemoryTag; Self::COUNT] = [
        MemoryTag::Unknown,
        MemoryTag::Array,
        MemoryTag::DArray,
        MemoryTag::Dict,
        MemoryTag::RingQueue,
        MemoryTag::Bst,
        MemoryTag::String,
        MemoryTag::Application,
        MemoryTag::Job,
        MemoryTag::Texture,
        MemoryTag::MaterialInstance,
        MemoryTag::Renderer,
        MemoryTag::Game,
        MemoryTag::Transform,
        MemoryTag::Entity,
        MemoryTag::EntityNode,
        MemoryTag::Scene,
    ];

    /// Index of this tag's counter.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The label printed in usage reports.
    pub const fn label(self) -> &'static str {
        match self {
            MemoryTag::Unknown => "UNKNOWN",
            MemoryTag::Array => "ARRAY",
            MemoryTag::DArray => "DARRAY",
            MemoryTag::Dict => "DICT",
            MemoryTag::RingQueue => "RING_QUEUE",
            MemoryTag::Bst => "BST",
            MemoryTag::String => "STRING",
            MemoryTag::Application => "APPLICATION",
            MemoryTag::Job => "JOB",
            MemoryTag::Texture => "TEXTURE",
            MemoryTag::MaterialInstance => "MAT_INST",
            MemoryTag::Renderer => "RENDERER",
            MemoryTag::Game => "GAME",
            MemoryTag::Transform => "TRANSFORM",
            MemoryTag::Entity => "ENTITY",
            MemoryTag::EntityNode => "ENTITY_NODE",
            MemoryTag::Scene => "SCENE",
        }
    }
}

impl fmt::Display for MemoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, tag) in MemoryTag::ALL.iter().enumerate() {
            assert_eq!(tag.index(), i);
        }
        assert_eq!(MemoryTag::Scene.index(), MemoryTag::COUNT - 1);
    }
}
