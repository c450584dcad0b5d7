//! Manifest parsing.

use crate::manifest::{PackageManifest, PackageTypeMembers};
use crate::types::{is_folder_scoped, Component};
use crate::xml;

impl PackageManifest {
    /// Parse a previously serialized package.xml document.
    ///
    /// Malformed input degrades instead of erroring: a type block without a
    /// name is skipped, a document without type blocks parses to an empty
    /// manifest, a missing version parses to an empty version string.
    pub fn parse(text: &str) -> PackageManifest {
        let mut types = Vec::new();
        for block in extract_blocks(text, "types") {
            let name = match extract_element(&block, "name") {
                Some(name) => name,
                None => continue,
            };
            let members = extract_elements(&block, "members");
            types.push(PackageTypeMembers { name, members });
        }

        let version = extract_element(text, "version").unwrap_or_default();
        PackageManifest { types, version }
    }

    /// Reconstruct the component selection this manifest describes.
    ///
    /// Within a folder-scoped type, a member that is a strict ancestor path
    /// of a sibling member is a folder placeholder rather than a selectable
    /// component and is dropped. Every other member becomes a component with
    /// `name = api_name = member`.
    pub fn components(&self) -> Vec<Component> {
        let mut components = Vec::new();
        for group in &self.types {
            let folder_scoped = is_folder_scoped(&group.name);
            for member in &group.members {
                if folder_scoped && is_folder_placeholder(member, &group.members) {
                    continue;
                }
                components.push(Component::new(group.name.clone(), member.clone()));
            }
        }
        components
    }
}

/// A member is a folder placeholder iff some sibling extends it past a `/`.
fn is_folder_placeholder(member: &str, members: &[String]) -> bool {
    let prefix = format!("{}/", member);
    members.iter().any(|other| other.starts_with(&prefix))
}

/// Extract the inner content of the first `<tag>...</tag>` pair.
fn extract_element(text: &str, tag: &str) -> Option<String> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);

    let start_idx = text.find(&start_tag)?;
    let content_start = start_idx + start_tag.len();
    let search_from = &text[content_start..];
    let end_idx = search_from.find(&end_tag)?;
    Some(xml::unescape(search_from[..end_idx].trim()))
}

/// Extract the inner content of every `<tag>...</tag>` pair, in order.
fn extract_elements(text: &str, tag: &str) -> Vec<String> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);

    let mut results = Vec::new();
    let mut search_from = text;
    while let Some(start_idx) = search_from.find(&start_tag) {
        let content_start = start_idx + start_tag.len();
        let remaining = &search_from[content_start..];
        match remaining.find(&end_tag) {
            Some(end_idx) => {
                results.push(xml::unescape(remaining[..end_idx].trim()));
                search_from = &remaining[end_idx + end_tag.len()..];
            }
            None => break,
        }
    }
    results
}

/// Extract every `<tag>...</tag>` block's raw inner text, in order.
fn extract_blocks(text: &str, tag: &str) -> Vec<String> {
    let start_tag = format!("<{}>", tag);
    let end_tag = format!("</{}>", tag);

    let mut blocks = Vec::new();
    let mut search_from = text;
    while let Some(start_idx) = search_from.find(&start_tag) {
        let content_start = start_idx + start_tag.len();
        let remaining = &search_from[content_start..];
        match remaining.find(&end_tag) {
            Some(end_idx) => {
                blocks.push(remaining[..end_idx].to_string());
                search_from = &remaining[end_idx + end_tag.len()..];
            }
            None => break,
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_API_VERSION;

    #[test]
    fn test_extract_element() {
        let text = "<root><id>12345</id><done>true</done></root>";
        assert_eq!(extract_element(text, "id"), Some("12345".to_string()));
        assert_eq!(extract_element(text, "done"), Some("true".to_string()));
        assert_eq!(extract_element(text, "missing"), None);
    }

    #[test]
    fn test_extract_elements_multiple() {
        let text = "<root><name>Alice</name><name>Bob</name><name>Charlie</name></root>";
        assert_eq!(extract_elements(text, "name"), vec!["Alice", "Bob", "Charlie"]);
    }

    #[test]
    fn test_extract_elements_unescapes_entities() {
        let text = "<members>R&amp;D/Report</members>";
        assert_eq!(extract_elements(text, "members"), vec!["R&D/Report"]);
    }

    #[test]
    fn test_parse_reads_groups_and_version() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<Package xmlns="http://soap.sforce.com/2006/04/metadata">
    <types>
        <members>Alpha</members>
        <members>Beta</members>
        <name>ApexClass</name>
    </types>
    <types>
        <members>Invoice__c</members>
        <name>CustomObject</name>
    </types>
    <version>62.0</version>
</Package>
"#;
        let manifest = PackageManifest::parse(text);
        assert_eq!(manifest.version, "62.0");
        assert_eq!(manifest.types.len(), 2);
        assert_eq!(manifest.types[0].name, "ApexClass");
        assert_eq!(manifest.types[0].members, vec!["Alpha", "Beta"]);
        assert_eq!(manifest.types[1].name, "CustomObject");
    }

    #[test]
    fn test_parse_skips_unnamed_block_and_tolerates_missing_version() {
        let text = "<Package><types><members>Orphan</members></types></Package>";
        let manifest = PackageManifest::parse(text);
        assert!(manifest.types.is_empty());
        assert_eq!(manifest.version, "");
    }

    #[test]
    fn test_parse_empty_or_garbage_input() {
        assert!(PackageManifest::parse("").types.is_empty());
        assert!(PackageManifest::parse("not xml at all").types.is_empty());
    }

    #[test]
    fn test_components_excludes_folder_placeholders() {
        let manifest = PackageManifest::new("62.0").add_type(
            "EmailTemplate",
            vec![
                "Marketing".to_string(),
                "Marketing/Onboarding".to_string(),
                "Marketing/Onboarding/Welcome".to_string(),
                "Marketing/Farewell".to_string(),
            ],
        );

        let components = manifest.components();
        let api_names: Vec<&str> = components.iter().map(|c| c.api_name.as_str()).collect();
        assert_eq!(
            api_names,
            vec!["Marketing/Onboarding/Welcome", "Marketing/Farewell"]
        );
    }

    #[test]
    fn test_components_keeps_childless_folder_scoped_member() {
        // A lone foldered member with no sibling extending it is a leaf.
        let manifest =
            PackageManifest::new("62.0").add_type("Report", vec!["Sales".to_string()]);
        let components = manifest.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].api_name, "Sales");
    }

    #[test]
    fn test_components_prefix_rule_requires_slash_boundary() {
        // "Sales" is not an ancestor of "SalesOps/Report".
        let manifest = PackageManifest::new("62.0").add_type(
            "Report",
            vec!["Sales".to_string(), "SalesOps/Report".to_string()],
        );
        let components = manifest.components();
        let api_names: Vec<&str> = components.iter().map(|c| c.api_name.as_str()).collect();
        assert!(api_names.contains(&"Sales"));
    }

    #[test]
    fn test_components_emits_all_members_for_flat_types() {
        let manifest = PackageManifest::new("62.0").add_type(
            "ApexClass",
            vec!["Outer".to_string(), "Outer/Inner".to_string()],
        );
        assert_eq!(manifest.components().len(), 2);
    }

    #[test]
    fn test_build_parse_round_trip_restores_leaf_selection() {
        let selection = vec![
            Component::new("ApexClass", "AccountService"),
            Component::new("ApexClass", "InvoiceService"),
            Component::new("EmailTemplate", "Marketing/Onboarding/Welcome"),
            Component::new("Report", "Sales/Pipeline"),
            Component::new("CustomObject", "Invoice__c"),
        ];
        let built = PackageManifest::from_components(&selection, DEFAULT_API_VERSION);
        let restored = PackageManifest::parse(&built.to_xml());
        assert_eq!(restored.version, DEFAULT_API_VERSION);

        let mut expected: Vec<String> =
            selection.iter().map(|c| c.api_name.clone()).collect();
        expected.sort();
        let mut actual: Vec<String> = restored
            .components()
            .iter()
            .map(|c| c.api_name.clone())
            .collect();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_round_trip_preserves_xml_entities() {
        let selection = vec![Component::new("Report", "R&D/Q1 <draft>")];
        let built = PackageManifest::from_components(&selection, "62.0");
        let restored = PackageManifest::parse(&built.to_xml());
        let components = restored.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].api_name, "R&D/Q1 <draft>");
    }
}
