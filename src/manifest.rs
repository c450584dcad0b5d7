//! Package manifest construction and serialization.

use std::collections::{BTreeSet, HashMap};

use crate::types::{is_folder_scoped, Component};
use crate::xml;

/// Package manifest (package.xml).
///
/// Use this structured type to safely build package manifests without risk of
/// XML injection. All values are properly escaped when converted to XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    pub types: Vec<PackageTypeMembers>,
    pub version: String,
}

/// Type members block in a package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTypeMembers {
    pub name: String,
    pub members: Vec<String>,
}

impl PackageManifest {
    /// Create a new package manifest with the given API version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            version: version.into(),
        }
    }

    /// Add a metadata type with its members.
    pub fn add_type(mut self, name: impl Into<String>, members: Vec<String>) -> Self {
        self.types.push(PackageTypeMembers {
            name: name.into(),
            members,
        });
        self
    }

    /// Build a manifest from a component selection.
    ///
    /// Components group by type in first-seen order. For folder-scoped types,
    /// every ancestor folder path of a member is materialized as its own
    /// member, since the retrieval API expects folder containers listed
    /// alongside their contents. Members within a type are deduplicated and
    /// sorted; lexicographic order places each folder path before any member
    /// it is a prefix of.
    ///
    /// An empty selection yields a manifest with zero type blocks and only
    /// the version.
    pub fn from_components(components: &[Component], version: impl Into<String>) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, BTreeSet<String>> = HashMap::new();

        for component in components {
            if !groups.contains_key(&component.type_name) {
                order.push(component.type_name.clone());
            }
            let members = groups.entry(component.type_name.clone()).or_default();

            if is_folder_scoped(&component.type_name) {
                let folder_path = component.folder_path();
                if !folder_path.is_empty() {
                    let mut prefix = String::new();
                    for segment in folder_path.split('/') {
                        if !prefix.is_empty() {
                            prefix.push('/');
                        }
                        prefix.push_str(segment);
                        members.insert(prefix.clone());
                    }
                }
            }
            members.insert(component.api_name.clone());
        }

        let types = order
            .into_iter()
            .map(|name| {
                let members = groups
                    .remove(&name)
                    .unwrap_or_default()
                    .into_iter()
                    .collect();
                PackageTypeMembers { name, members }
            })
            .collect();

        Self {
            types,
            version: version.into(),
        }
    }

    /// Serialize to a package.xml document.
    ///
    /// All text content is XML-escaped to prevent injection.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<Package xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n");

        for group in &self.types {
            out.push_str("    <types>\n");
            for member in &group.members {
                out.push_str("        <members>");
                out.push_str(&xml::escape(member));
                out.push_str("</members>\n");
            }
            out.push_str("        <name>");
            out.push_str(&xml::escape(&group.name));
            out.push_str("</name>\n");
            out.push_str("    </types>\n");
        }

        out.push_str("    <version>");
        out.push_str(&xml::escape(&self.version));
        out.push_str("</version>\n");
        out.push_str("</Package>\n");
        out
    }
}
