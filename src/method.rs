//! Element accessor methods: one builder for the single, list and filtered
//! cardinalities.

use indexmap::IndexSet;
use serde::Serialize;

use crate::error::CompilationError;
use crate::matcher::Predicate;
use crate::params::{MethodParameter, ParameterTracker};
use crate::scope::ScopeElement;
use crate::selector::Locator;
use crate::types::{capitalize, TypeRef, TypeRegistry};

const BUILD_ONE: &str = "build";
const BUILD_LIST: &str = "buildList";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Runtime lookup primitive the accessor body starts from.
pub enum LookupKind {
    /// Element typed as the base element capability.
    Basic,
    /// Element typed as another page object.
    Custom,
}

impl LookupKind {
    pub fn primitive(self) -> &'static str {
        match self {
            LookupKind::Basic => "basic",
            LookupKind::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// How many elements an accessor yields.
pub enum Cardinality {
    Single,
    Multiple,
    /// Filtered candidates; the first match or every match.
    Filtered { predicate: Predicate, find_first: bool },
}

/// Inputs of [`build_element_method`].
#[derive(Debug, Clone, Copy)]
pub struct ElementMethodSpec<'a> {
    pub element_name: &'a str,
    pub is_public: bool,
    pub lookup: LookupKind,
    /// Declared element type, never a collection.
    pub element_type: &'a TypeRef,
    pub locator: &'a Locator,
    pub locator_parameters: &'a [MethodParameter],
    pub scope: &'a ScopeElement,
    pub cardinality: &'a Cardinality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Emittable accessor: signature, body statements and imports.
pub struct MethodRepresentation {
    pub name: String,
    pub is_public: bool,
    pub parameters: Vec<MethodParameter>,
    pub return_type: TypeRef,
    pub body_lines: Vec<String>,
    /// Imports needed by the implementation.
    pub class_dependencies: IndexSet<TypeRef>,
    /// Imports needed by the public signature.
    pub interface_dependencies: IndexSet<TypeRef>,
}

impl MethodRepresentation {
    /// Signature text, e.g. `List<Foo> getFoo(Integer x, String y)`.
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_ref.display_name(), p.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}({})", self.return_type.display_name(), self.name, params)
    }
}

/// Accessor name for an element: `getFoo` when public, `getFooElement`
/// otherwise.
pub fn accessor_name(element_name: &str, is_public: bool) -> String {
    let name = capitalize(element_name);
    if is_public {
        format!("get{name}")
    } else {
        format!("get{name}Element")
    }
}

/// Builds the accessor for one element declaration.
///
/// Signature parameters are merged in order: scope, locator, then for the
/// filtered variant the apply-method and matcher arguments. The only error
/// raised is a parameter naming conflict.
pub fn build_element_method(
    spec: &ElementMethodSpec<'_>,
    registry: &TypeRegistry,
) -> Result<MethodRepresentation, CompilationError> {
    let name = accessor_name(spec.element_name, spec.is_public);
    let mut tracker = ParameterTracker::new(format!("method '{name}'"));
    tracker.set_parameters(spec.scope.parameters())?;
    tracker.set_parameters(spec.locator_parameters)?;

    let lookup = format!(
        "{}({}, {})",
        spec.lookup.primitive(),
        spec.scope.expression(),
        spec.locator.code(spec.locator_parameters)
    );
    let element_type = spec.element_type.element_type();
    let type_name = &element_type.simple_name;

    let (return_type, build, predicate) = match spec.cardinality {
        Cardinality::Single => (element_type.clone(), BUILD_ONE, None),
        Cardinality::Multiple => (element_type.wrap_as_list(), BUILD_LIST, None),
        Cardinality::Filtered {
            predicate,
            find_first,
        } => {
            let apply_and_matcher: Vec<MethodParameter> =
                predicate.parameters().cloned().collect();
            tracker.set_parameters(&apply_and_matcher)?;
            match *find_first {
                true => (element_type.clone(), BUILD_ONE, Some(predicate)),
                false => (element_type.wrap_as_list(), BUILD_LIST, Some(predicate)),
            }
        }
    };
    debug_assert_eq!(
        return_type.is_collection,
        build == BUILD_LIST,
        "return type and build call disagree for {name}"
    );
    let statement = match predicate {
        Some(predicate) => format!(
            "return {lookup}.{build}({type_name}.class, {})",
            predicate.code()
        ),
        None => format!("return {lookup}.{build}({type_name}.class)"),
    };

    let mut interface_dependencies = IndexSet::new();
    registry.record_dependency(&mut interface_dependencies, &return_type);
    let mut class_dependencies = IndexSet::new();
    registry.record_dependency(&mut class_dependencies, &return_type);
    registry.record_dependency(&mut class_dependencies, registry.basic_element());

    let parameters = tracker.into_parameters();
    tracing::debug!(
        method = %name,
        parameters = parameters.len(),
        return_type = %return_type,
        "built element accessor"
    );

    Ok(MethodRepresentation {
        name,
        is_public: spec.is_public,
        parameters,
        return_type,
        body_lines: vec![spec.scope.prefix_line(registry.basic_element()), statement],
        class_dependencies,
        interface_dependencies,
    })
}
