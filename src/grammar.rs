//! Declarative element nodes and the JSON field readers shared by the
//! selector, argument and filter parsers.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::diagnostics::{
    EMPTY_STRING, FILTER_WITHOUT_RETURN_ALL, INVALID_ELEMENT_NAME, MISSING_PROPERTY,
    NESTED_ELEMENTS_NOT_ALLOWED, WRONG_PROPERTY_SHAPE,
};
use crate::error::CompilationError;
use crate::matcher::parse_filter;
use crate::method::{
    build_element_method, Cardinality, ElementMethodSpec, LookupKind, MethodRepresentation,
};
use crate::scope::ScopeElement;
use crate::selector::{parse_element_selector, ElementSelector};
use crate::types::{TypeRef, TypeRegistry};

#[derive(Debug, Clone, PartialEq)]
/// Declared type of an element.
pub enum ElementType {
    /// No `type` property: the base element capability type.
    Basic,
    /// Another page object, referenced as `<namespace>/pageObjects/...`.
    PageObject(TypeRef),
}

#[derive(Debug, Clone)]
/// One validated element node.
///
/// Nested element nodes are kept raw so that each child is parsed (and may
/// fail) on its own.
pub struct ElementDeclaration {
    pub name: String,
    pub is_public: bool,
    pub is_nullable: bool,
    pub element_type: ElementType,
    pub selector: ElementSelector,
    pub cardinality: Cardinality,
    pub elements: Vec<JsonValue>,
    pub shadow_elements: Vec<JsonValue>,
}

impl ElementDeclaration {
    /// Parses an element node. `path` locates the node for diagnostics raised
    /// before its name is known.
    pub fn parse(
        value: &JsonValue,
        path: &str,
        registry: &TypeRegistry,
    ) -> Result<Self, CompilationError> {
        let map = expect_object(value, "page object", path)?;
        let name = required_str(map, "name", path)?;
        if !is_identifier(name) {
            return Err(CompilationError::new(INVALID_ELEMENT_NAME, [path, name]));
        }
        let context = format!("element '{name}'");

        let element_type = match optional_str(map, "type", &context)? {
            None => ElementType::Basic,
            Some(reference) => {
                ElementType::PageObject(registry.page_object_type(reference, &context)?)
            }
        };
        let is_public = optional_bool(map, "public", &context)?;
        let is_nullable = optional_bool(map, "nullable", &context)?;

        let selector_node = map.get("selector").ok_or_else(|| {
            CompilationError::new(MISSING_PROPERTY, [context.as_str(), "selector"])
        })?;
        let selector = parse_element_selector(selector_node, &context, registry)?;

        let filter = match map.get("filter") {
            Some(node) if !node.is_null() => Some(parse_filter(node, &context, registry)?),
            _ => None,
        };
        let cardinality = match (selector.return_all, filter) {
            (false, None) => Cardinality::Single,
            (false, Some(_)) => {
                return Err(CompilationError::new(FILTER_WITHOUT_RETURN_ALL, [context]));
            }
            (true, None) => Cardinality::Multiple,
            (true, Some(filter)) => Cardinality::Filtered {
                predicate: filter.predicate,
                find_first: filter.find_first,
            },
        };

        let elements = optional_array(map, "elements", &context)?.to_vec();
        let shadow_elements = match map.get("shadow") {
            Some(node) if !node.is_null() => {
                let shadow = expect_object(node, &context, "shadow")?;
                optional_array(shadow, "elements", &format!("{context} shadow"))?.to_vec()
            }
            _ => Vec::new(),
        };

        if !elements.is_empty() || !shadow_elements.is_empty() {
            let reason = if selector.return_all {
                Some("element returns a list")
            } else if matches!(element_type, ElementType::PageObject(_)) {
                Some("element has a page object type")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(CompilationError::new(
                    NESTED_ELEMENTS_NOT_ALLOWED,
                    [context.as_str(), reason],
                ));
            }
        }

        Ok(Self {
            name: name.to_string(),
            is_public,
            is_nullable,
            element_type,
            selector,
            cardinality,
            elements,
            shadow_elements,
        })
    }

    pub fn type_ref(&self, registry: &TypeRegistry) -> TypeRef {
        match &self.element_type {
            ElementType::Basic => registry.basic_element().clone(),
            ElementType::PageObject(type_ref) => type_ref.clone(),
        }
    }

    pub fn lookup_kind(&self) -> LookupKind {
        match self.element_type {
            ElementType::Basic => LookupKind::Basic,
            ElementType::PageObject(_) => LookupKind::Custom,
        }
    }

    /// Builds the accessor of this element, looked up relative to `scope`.
    pub fn to_method(
        &self,
        scope: &ScopeElement,
        registry: &TypeRegistry,
    ) -> Result<MethodRepresentation, CompilationError> {
        let element_type = self.type_ref(registry);
        build_element_method(
            &ElementMethodSpec {
                element_name: &self.name,
                is_public: self.is_public,
                lookup: self.lookup_kind(),
                element_type: &element_type,
                locator: &self.selector.locator,
                locator_parameters: &self.selector.parameters,
                scope,
                cardinality: &self.cardinality,
            },
            registry,
        )
    }
}

/// Best-effort label for an element node whose parsing failed.
pub fn element_label(value: &JsonValue, path: &str) -> String {
    value
        .get("name")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string())
}

pub(crate) fn expect_object<'a>(
    value: &'a JsonValue,
    context: &str,
    property: &str,
) -> Result<&'a JsonMap<String, JsonValue>, CompilationError> {
    value.as_object().ok_or_else(|| {
        CompilationError::new(WRONG_PROPERTY_SHAPE, [context, property, "an object"])
    })
}

/// Missing and `null` properties read as `None`.
pub(crate) fn optional_str<'a>(
    map: &'a JsonMap<String, JsonValue>,
    key: &str,
    context: &str,
) -> Result<Option<&'a str>, CompilationError> {
    match map.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(value)) => Ok(Some(value.as_str())),
        Some(_) => Err(CompilationError::new(
            WRONG_PROPERTY_SHAPE,
            [context, key, "a string"],
        )),
    }
}

pub(crate) fn required_str<'a>(
    map: &'a JsonMap<String, JsonValue>,
    key: &str,
    context: &str,
) -> Result<&'a str, CompilationError> {
    let value = optional_str(map, key, context)?
        .ok_or_else(|| CompilationError::new(MISSING_PROPERTY, [context, key]))?;
    if value.is_empty() {
        return Err(CompilationError::new(EMPTY_STRING, [context, key]));
    }
    Ok(value)
}

pub(crate) fn optional_bool(
    map: &JsonMap<String, JsonValue>,
    key: &str,
    context: &str,
) -> Result<bool, CompilationError> {
    match map.get(key) {
        None | Some(JsonValue::Null) => Ok(false),
        Some(JsonValue::Bool(value)) => Ok(*value),
        Some(_) => Err(CompilationError::new(
            WRONG_PROPERTY_SHAPE,
            [context, key, "a boolean"],
        )),
    }
}

pub(crate) fn optional_array<'a>(
    map: &'a JsonMap<String, JsonValue>,
    key: &str,
    context: &str,
) -> Result<&'a [JsonValue], CompilationError> {
    match map.get(key) {
        None | Some(JsonValue::Null) => Ok(&[]),
        Some(JsonValue::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(CompilationError::new(
            WRONG_PROPERTY_SHAPE,
            [context, key, "an array"],
        )),
    }
}

/// Element and apply-method names: a letter followed by letters, digits or `_`.
pub(crate) fn is_identifier(name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid regex"))
        .is_match(name)
}
