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

//! Defines data structures related to GPU texture resources.

/// The size of a two-dimensional texture in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent2D {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl Extent2D {
    /// Total number of texels.
    pub const fn texel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The texel format of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureFormat {
    /// 8-bit-per-channel RGBA, linear.
    #[default]
    Rgba8Unorm,
    /// 8-bit-per-channel BGRA, linear.
    Bgra8Unorm,
    /// 32-bit floating point depth.
    Depth32Float,
}

impl TextureFormat {
    /// Size of a single texel in bytes.
    pub const fn bytes_per_texel(&self) -> u64 {
        match self {
            TextureFormat::Rgba8Unorm | TextureFormat::Bgra8Unorm | TextureFormat::Depth32Float => {
                4
            }
        }
    }
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    /// An optional debug label for the texture.
    pub label: Option<String>,
    /// The dimensions of the texture.
    pub extent: Extent2D,
    /// The texel format.
    pub format: TextureFormat,
}

impl TextureDescriptor {
    /// Total size of the texture contents in bytes.
    pub const fn byte_size(&self) -> u64 {
        self.extent.texel_count() * self.format.bytes_per_texel()
    }
}

/// An opaque handle identifying a GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);
