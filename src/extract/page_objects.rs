//! Page-object discovery: which classes encapsulate a page, and which methods
//! they expose. The action mapper consults this metadata when deciding whether
//! a call qualifier refers to a page object.

use crate::analysis::symbol_table::SymbolTable;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageObjectInfo {
    pub class_name: String,
    /// Declared method names, sorted.
    pub methods: Vec<String>,
    /// Number of `By.*`-initialized fields.
    pub locator_count: usize,
}

/// List the page-object classes discovered in one tree.
pub fn extract_page_objects(symbols: &SymbolTable<'_>) -> Vec<PageObjectInfo> {
    let pages: Vec<PageObjectInfo> = symbols
        .classes()
        .iter()
        .filter(|(_, info)| info.is_page_object)
        .map(|(&name, info)| PageObjectInfo {
            class_name: name.to_string(),
            methods: info.methods.keys().map(|m| m.to_string()).collect(),
            locator_count: info.locators.len(),
        })
        .collect();

    info!(
        "page-objects: {} discovered in {}",
        pages.len(),
        symbols.file_path()
    );
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::Diagnostics;
    use crate::testutil::PageBuilder;

    #[test]
    fn lists_page_objects_with_methods() {
        let tree = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .method_referencing("enterEmail", "emailInput")
            .build();
        let mut diags = Diagnostics::new();
        let symbols = SymbolTable::build(&tree, &mut diags).unwrap();

        let pages = extract_page_objects(&symbols);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].class_name, "LoginPage");
        assert_eq!(pages[0].methods, vec!["enterEmail".to_string()]);
        assert_eq!(pages[0].locator_count, 1);
    }

    #[test]
    fn non_page_classes_are_excluded() {
        let tree = PageBuilder::new("MathUtils").empty_method("add").build();
        let mut diags = Diagnostics::new();
        let symbols = SymbolTable::build(&tree, &mut diags).unwrap();
        assert!(extract_page_objects(&symbols).is_empty());
    }
}
