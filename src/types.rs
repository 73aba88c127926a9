//! Type references and the registry that resolves declared type names.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::CompilerConfig;
use crate::diagnostics::{INVALID_ELEMENT_TYPE, UNSUPPORTED_PARAMETER_TYPE};
use crate::error::{CompilationError, PageObjectError};

/// Declared parameter type names accepted in argument lists.
pub const PARAMETER_TYPE_NAMES: &[&str] = &["string", "number", "boolean", "locator"];

const BASIC_ELEMENT_NAME: &str = "BasicElement";
const LOCATOR_NAME: &str = "Locator";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A named target type plus the import needed to reference it.
///
/// Equality and hashing only consider `simple_name` and `import_path`.
pub struct TypeRef {
    pub simple_name: String,
    /// Fully qualified import, empty for types that need none.
    pub import_path: String,
    #[serde(default)]
    pub is_collection: bool,
}

impl TypeRef {
    pub fn new(simple_name: impl Into<String>, import_path: impl Into<String>) -> Self {
        Self {
            simple_name: simple_name.into(),
            import_path: import_path.into(),
            is_collection: false,
        }
    }

    /// Type that is always in scope and never imported.
    pub fn builtin(simple_name: impl Into<String>) -> Self {
        Self::new(simple_name, String::new())
    }

    /// Returns a collection-of-`self` reference; `self` is unchanged.
    pub fn wrap_as_list(&self) -> Self {
        Self {
            is_collection: true,
            ..self.clone()
        }
    }

    /// Element type of a collection, or a copy of `self`.
    pub fn element_type(&self) -> Self {
        Self {
            is_collection: false,
            ..self.clone()
        }
    }

    pub fn needs_import(&self) -> bool {
        !self.import_path.is_empty()
    }

    /// Form used in signatures: `Foo` or `List<Foo>`.
    pub fn display_name(&self) -> String {
        if self.is_collection {
            format!("List<{}>", self.simple_name)
        } else {
            self.simple_name.clone()
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.simple_name == other.simple_name && self.import_path == other.import_path
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.simple_name.hash(state);
        self.import_path.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Read-only registry of the types the compiler can reference.
///
/// Built once from a [`CompilerConfig`] and shared by reference; it is never
/// mutated during compilation.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    basic_element: TypeRef,
    list: TypeRef,
    parameter_types: BTreeMap<&'static str, TypeRef>,
    package_mapping: BTreeMap<String, String>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::build(&CompilerConfig::default())
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CompilerConfig) -> Result<Self, PageObjectError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &CompilerConfig) -> Self {
        let core = config.core_package.trim();
        let (_, list_name) = config
            .list_import
            .rsplit_once('.')
            .unwrap_or(("", config.list_import.as_str()));

        let mut parameter_types = BTreeMap::new();
        parameter_types.insert("string", TypeRef::builtin("String"));
        parameter_types.insert("number", TypeRef::builtin("Integer"));
        parameter_types.insert("boolean", TypeRef::builtin("Boolean"));
        parameter_types.insert(
            "locator",
            TypeRef::new(LOCATOR_NAME, format!("{core}.{LOCATOR_NAME}")),
        );

        Self {
            basic_element: TypeRef::new(BASIC_ELEMENT_NAME, format!("{core}.{BASIC_ELEMENT_NAME}")),
            list: TypeRef::new(list_name, config.list_import.clone()),
            parameter_types,
            package_mapping: config.package_mapping.clone(),
        }
    }

    /// Base element capability type every lookup call is typed against.
    pub fn basic_element(&self) -> &TypeRef {
        &self.basic_element
    }

    pub fn list_type(&self) -> &TypeRef {
        &self.list
    }

    /// Resolves a declared parameter type name (`string`, `number`, ...).
    pub fn parameter_type(&self, name: &str, context: &str) -> Result<TypeRef, CompilationError> {
        self.parameter_types.get(name).cloned().ok_or_else(|| {
            CompilationError::new(
                UNSUPPORTED_PARAMETER_TYPE,
                [context, name, PARAMETER_TYPE_NAMES.join(", ").as_str()],
            )
        })
    }

    /// Declared type name matching a resolved parameter type, if any.
    pub fn parameter_type_name(&self, type_ref: &TypeRef) -> Option<&'static str> {
        self.parameter_types
            .iter()
            .find(|(_, t)| *t == type_ref)
            .map(|(name, _)| *name)
    }

    /// Infers the parameter type of a literal argument value.
    pub fn literal_type(&self, value: &JsonValue) -> Option<TypeRef> {
        let name = match value {
            JsonValue::String(_) => "string",
            JsonValue::Number(n) if n.is_i64() || n.is_u64() => "number",
            JsonValue::Bool(_) => "boolean",
            _ => return None,
        };
        self.parameter_types.get(name).cloned()
    }

    /// Resolves `<namespace>/pageObjects/<dir>/.../<name>` into a target type.
    pub fn page_object_type(
        &self,
        reference: &str,
        context: &str,
    ) -> Result<TypeRef, CompilationError> {
        let caps = page_object_type_regex()
            .captures(reference)
            .ok_or_else(|| CompilationError::new(INVALID_ELEMENT_TYPE, [context, reference]))?;

        let namespace = &caps[1];
        let mut package = self
            .package_mapping
            .get(namespace)
            .cloned()
            .unwrap_or_else(|| format!("{}.pageobjects", namespace.replace('-', ".")));
        for dir in caps[2].split('/').filter(|d| !d.is_empty()) {
            package.push('.');
            package.push_str(&dir.replace('-', "_").to_lowercase());
        }

        let simple_name = capitalize(&caps[3]);
        let import_path = format!("{package}.{simple_name}");
        Ok(TypeRef::new(simple_name, import_path))
    }

    /// Types that must be imported to reference `type_ref`: the list type
    /// first for collections, then the element type.
    pub fn importable_types(&self, type_ref: &TypeRef) -> Vec<TypeRef> {
        let mut out = Vec::with_capacity(2);
        if type_ref.is_collection {
            out.push(self.list.clone());
        }
        let element = type_ref.element_type();
        if element.needs_import() {
            out.push(element);
        }
        out
    }

    /// Adds the imports of `type_ref` to an ordered dependency set.
    pub fn record_dependency(&self, deps: &mut IndexSet<TypeRef>, type_ref: &TypeRef) {
        for dependency in self.importable_types(type_ref) {
            deps.insert(dependency);
        }
    }
}

/// Upper-cases the first character: `fooBar` -> `FooBar`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn page_object_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_-]+)/pageObjects/((?:[A-Za-z0-9_-]+/)*)([A-Za-z][A-Za-z0-9_]*)$")
            .expect("valid regex")
    })
}
