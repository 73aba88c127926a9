//! Compiles declarative page-object element nodes into accessor-method
//! representations ready for textual emission.
//!
//! The pipeline for one element is: parse the selector into a [`Locator`],
//! compose the signature from the scope, locator and filter parameters, and
//! hand everything to [`build_element_method`], which picks the return type
//! and body for the element's [`Cardinality`].

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod matcher;
pub mod method;
pub mod page;
pub mod params;
pub mod scope;
pub mod selector;
pub mod types;

pub use config::CompilerConfig;
pub use diagnostics::{DefaultCatalog, MessageCatalog};
pub use error::{CompilationError, PageObjectError};
pub use grammar::{ElementDeclaration, ElementType};
pub use matcher::{Filter, MatcherKind, MatcherSpec, Predicate};
pub use method::{
    accessor_name, build_element_method, Cardinality, ElementMethodSpec, LookupKind,
    MethodRepresentation,
};
pub use page::{
    compile_page_object, compile_page_object_value, ElementDiagnostic, PageObjectCompilation,
};
pub use params::{MethodParameter, ParameterTracker};
pub use scope::ScopeElement;
pub use selector::{Locator, SelectorKind, SelectorSpec};
pub use types::{TypeRef, TypeRegistry};

/// Parses and builds a single element declaration relative to `scope`.
///
/// Every call is independent, so callers may compile declarations one by one
/// and collect failures per element.
pub fn compile_element(
    node: &serde_json::Value,
    scope: &ScopeElement,
    registry: &TypeRegistry,
) -> Result<MethodRepresentation, CompilationError> {
    let decl = ElementDeclaration::parse(node, "element", registry)?;
    decl.to_method(scope, registry)
}
