//! Local gridpack handling for `fragcheck`.
//!
//! [`LocalGridpackStore`] implements [`fragcheck_core::ports::GridpackPort`]
//! on the local filesystem (cvmfs and EOS are plain mounts on the nodes this
//! runs on). [`ScriptPatchRunner`] implements
//! [`fragcheck_core::ports::PatchRunnerPort`] by shelling out to the patch script.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod archive;
mod patch;
mod store;

pub use archive::{ArchiveFormat, unpack};
pub use patch::{DEFAULT_PYTHON, ScriptPatchRunner};
pub use store::LocalGridpackStore;
