//! Compiler configuration loaded from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PageObjectError;

const DEFAULT_CORE_PACKAGE: &str = "utam.core.element";
const DEFAULT_LIST_IMPORT: &str = "java.util.List";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Settings that shape how type references are resolved.
pub struct CompilerConfig {
    /// Package hosting the runtime element and locator types.
    pub core_package: String,
    /// Fully qualified name of the collection type used for list accessors.
    pub list_import: String,
    /// Page-object namespace (the part before `/pageObjects/`) to target package.
    ///
    /// Namespaces without an entry map to `<namespace with '-' as '.'>.pageobjects`.
    pub package_mapping: BTreeMap<String, String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            core_package: DEFAULT_CORE_PACKAGE.to_string(),
            list_import: DEFAULT_LIST_IMPORT.to_string(),
            package_mapping: BTreeMap::new(),
        }
    }
}

impl CompilerConfig {
    /// Parses configuration text. Missing fields take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, PageObjectError> {
        let config: CompilerConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every configured name is usable as a qualified type path.
    pub fn validate(&self) -> Result<(), PageObjectError> {
        if self.core_package.trim().is_empty() {
            return Err(PageObjectError::Config(
                "corePackage must be a non-empty package name".to_string(),
            ));
        }
        match self.list_import.rsplit_once('.') {
            Some((package, name)) if !package.is_empty() && !name.is_empty() => {}
            _ => {
                return Err(PageObjectError::Config(format!(
                    "listImport '{}' must be a qualified type name",
                    self.list_import
                )))
            }
        }
        for (namespace, package) in &self.package_mapping {
            if package.trim().is_empty() {
                return Err(PageObjectError::Config(format!(
                    "packageMapping.{namespace} must be a non-empty package name"
                )));
            }
        }
        Ok(())
    }
}
