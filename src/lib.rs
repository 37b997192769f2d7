// Copyright 2025 Johann Kempter
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
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # metaref
//!
//! Compiler-facing references to compiled .NET module images.
//!
//! A compiler holds one [`Reference`] per assembly or module it consumes. The reference does
//! not own the decoded image; it knows where the image lives, how the compilation consumes it
//! ([`reference::ReferenceProperties`]: kind, extern aliases, interop type embedding), and
//! which documentation belongs to it.
//!
//! ## Features
//!
//! - **Value-semantic updates** - `with_*` methods never mutate, and return the very same
//!   reference when nothing changes, so caches keyed by reference identity stay valid
//! - **Lazy documentation** - the documentation provider is bound once, race-free, on first use
//! - **Closed failure classification** - loading failures are either one of three recognized
//!   resource-access problems, translatable into diagnostics, or an unexpected fault that is
//!   never masked
//! - **Efficient image access** - memory-mapped files or shared in-memory buffers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metaref::prelude::*;
//!
//! let reference = Reference::from_file("lib.dll", ReferenceProperties::assembly())?
//!     .with_aliases(["Lib"])?;
//!
//! let diagnostics = Diagnostics::new();
//! match reference.get_metadata() {
//!     Ok(metadata) => println!("{} loaded, {} bytes", reference, metadata.len()),
//!     Err(failure) => {
//!         // Unexpected faults are handed back and propagate as errors
//!         let diagnostic = reference.translate_failure(failure, &DefaultMessages, Location::None)?;
//!         diagnostics.push(diagnostic);
//!     }
//! }
//!
//! if let Some(text) = reference.documentation().documentation("T:Lib.Widget") {
//!     println!("{text}");
//! }
//! # Ok::<(), metaref::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`reference`] - [`Reference`], its properties, image sources and the documentation binder
//! - [`metadata`] - Loaded images handed out by [`Reference::get_metadata`]
//! - [`documentation`] - Documentation providers, including XML documentation files
//! - [`diagnostics`] - Translation of load failures into diagnostics and their collection
//! - [`file`] - Memory-mapped and in-memory image backends
//! - [`Error`], [`LoadError`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: metadata loads and property
//! updates at `debug`, documentation binding at `trace`, and unreadable documentation files at
//! `warn`. No subscriber is installed.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

pub mod diagnostics;
pub mod documentation;
pub mod file;
pub mod metadata;
pub mod reference;

/// `metaref` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Result type of image loading operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

pub use error::{Error, LoadError};

/// The reference handle; see [`reference::Reference`].
pub use reference::Reference;
