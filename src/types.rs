//! Core types for component selection and folder records.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Default Metadata API version.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Sentinel folder name for the org-wide default container.
///
/// The default container is not a real folder record; callers substitute this
/// label directly instead of resolving it through the folder hierarchy.
pub const UNFILED_PUBLIC_FOLDER: &str = "unfiled$public";

/// Metadata types whose members live inside named folders.
pub const FOLDER_SCOPED_TYPES: [&str; 4] = ["Dashboard", "Document", "EmailTemplate", "Report"];

/// Whether members of the given metadata type are folder-path-qualified.
pub fn is_folder_scoped(type_name: &str) -> bool {
    FOLDER_SCOPED_TYPES.contains(&type_name)
}

/// A single named metadata component eligible for retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Display label, usually equal to `api_name`.
    pub name: String,
    /// Canonical identifier sent to the retrieval tool. For folder-scoped
    /// types this is `folder/path/LeafName`; the folder path may be empty.
    pub api_name: String,
    /// Metadata type name, e.g. `ApexClass` or `EmailTemplate`.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Component {
    /// Create a component whose display name equals its API name.
    pub fn new(type_name: impl Into<String>, api_name: impl Into<String>) -> Self {
        let api_name = api_name.into();
        Self {
            name: api_name.clone(),
            api_name,
            type_name: type_name.into(),
        }
    }

    /// Folder portion of the API name; empty when the member is unfoldered.
    pub fn folder_path(&self) -> &str {
        match self.api_name.rfind('/') {
            Some(idx) => &self.api_name[..idx],
            None => "",
        }
    }

    /// Final path segment of the API name.
    pub fn leaf_name(&self) -> &str {
        match self.api_name.rfind('/') {
            Some(idx) => &self.api_name[idx + 1..],
            None => &self.api_name,
        }
    }
}

/// A folder node as supplied by the org query layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub id: String,
    pub developer_name: String,
    pub parent_id: Option<String>,
}

/// An ordered component selection.
///
/// Enforces the invariant that an API name appears at most once per metadata
/// type within a selection set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    components: Vec<Component>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, rejecting a duplicate API name within the same type.
    pub fn add(&mut self, component: Component) -> Result<()> {
        let duplicate = self
            .components
            .iter()
            .any(|c| c.type_name == component.type_name && c.api_name == component.api_name);
        if duplicate {
            return Err(Error::new(ErrorKind::DuplicateComponent {
                type_name: component.type_name,
                api_name: component.api_name,
            }));
        }
        self.components.push(component);
        Ok(())
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl From<Selection> for Vec<Component> {
    fn from(selection: Selection) -> Self {
        selection.components
    }
}
