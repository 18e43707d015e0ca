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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Two kinds of failure exist and must not be confused:
//!
//! * **Runtime errors**: a resource is missing, a draw was issued in an
//!   invalid state, the driver rejected an operation. These are carried as
//!   [`ResourceError`] / [`RenderError`] values local to the command that
//!   raised them; the render loop reports them and keeps going.
//! * **Contract violations**: queuing after shutdown, completing an
//!   [`AsyncOp`](crate::renderer::command::AsyncOp) twice, touching the
//!   backend from the wrong thread. These are caller bugs and panic with a
//!   descriptive message instead of being modeled as error values.

use crate::renderer::api::{BufferId, TextureId};
use std::fmt;

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The referenced buffer does not exist (never created or already destroyed).
    BufferNotFound(BufferId),
    /// The referenced texture does not exist (never created or already destroyed).
    TextureNotFound(TextureId),
    /// A resource was created with an id that is already in use.
    AlreadyExists(String),
    /// An access exceeded the bounds of the underlying storage.
    OutOfBounds {
        /// Byte offset at which the access started.
        offset: u64,
        /// Length of the access in bytes.
        len: u64,
        /// Total size of the resource in bytes.
        size: u64,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::BufferNotFound(id) => {
                write!(f, "Buffer not found: {id:?}")
            }
            ResourceError::TextureNotFound(id) => {
                write!(f, "Texture not found: {id:?}")
            }
            ResourceError::AlreadyExists(what) => {
                write!(f, "Resource already exists: {what}")
            }
            ResourceError::OutOfBounds { offset, len, size } => {
                write!(
                    f,
                    "Resource access out of bounds: {len} bytes at offset {offset} (size {size})"
                )
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error that can occur while executing render commands.
#[derive(Debug)]
pub enum RenderError {
    /// A failure occurred while bringing up the render thread or backend.
    InitializationFailed(String),
    /// A drawing or frame-sequencing operation failed.
    RenderingFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// The graphics device was lost (e.g., driver crash). Catastrophic;
    /// typically requires reinitialization.
    DeviceLost,
    /// An unexpected or internal error occurred.
    Internal(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize the render thread: {msg}")
            }
            RenderError::RenderingFailed(msg) => {
                write!(f, "A rendering operation failed: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::DeviceLost => write!(
                f,
                "The graphics device was lost and needs to be reinitialized."
            ),
            RenderError::Internal(msg) => {
                write!(f, "An internal or unexpected error occurred: {msg}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}
