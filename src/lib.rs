//! # sf-package-builder
//!
//! Package manifest engine and retrieve-result reconciliation for Salesforce
//! metadata retrievals.
//!
//! ## Features
//!
//! - **Manifest build** - Turn a component selection into a package.xml
//!   document, materializing folder containers for folder-scoped types
//! - **Manifest parse** - Read a package.xml back into a component selection,
//!   dropping folder placeholders
//! - **Folder resolution** - Resolve folder records into slash-delimited
//!   paths, with cycle protection
//! - **Reconciliation** - Map the retrieval CLI's raw, multi-shaped output
//!   onto one stable status per requested component
//!
//! The crate is pure: it performs no I/O and does not invoke the CLI. Callers
//! own process invocation, file persistence, and the org query layer, and
//! hand this crate their captured inputs.
//!
//! ## Example
//!
//! ```rust
//! use sf_package_builder::{Component, PackageManifest, DEFAULT_API_VERSION};
//!
//! let selection = vec![
//!     Component::new("ApexClass", "AccountService"),
//!     Component::new("EmailTemplate", "Marketing/Welcome"),
//! ];
//!
//! let manifest = PackageManifest::from_components(&selection, DEFAULT_API_VERSION);
//! let xml = manifest.to_xml();
//!
//! // Round-trips: the folder placeholder "Marketing" is not a component.
//! let restored = PackageManifest::parse(&xml).components();
//! assert_eq!(restored.len(), 2);
//! ```

mod error;
mod folders;
mod manifest;
mod parse;
mod reconcile;
mod types;
mod xml;

pub use error::{Error, ErrorKind, Result};
pub use folders::resolve_folder_paths;
pub use manifest::{PackageManifest, PackageTypeMembers};
pub use reconcile::{
    reconcile, BatchErrorType, RawToolOutput, Reconciliation, RetrieveItemResult,
    RetrieveItemStatus, BENIGN_TRACKING_REF_ERROR,
};
pub use types::{
    is_folder_scoped, Component, FolderRecord, Selection, DEFAULT_API_VERSION,
    FOLDER_SCOPED_TYPES, UNFILED_PUBLIC_FOLDER,
};
