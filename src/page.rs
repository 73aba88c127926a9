//! Page-object compilation: every element declaration becomes one accessor.
//!
//! Each element is its own isolation boundary. A failing declaration records
//! one diagnostic and skips its nested elements; siblings keep compiling.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::diagnostics::{DUPLICATE_ELEMENT, MISSING_PROPERTY, UNSUPPORTED_PROPERTY};
use crate::error::{CompilationError, PageObjectError};
use crate::grammar::{
    element_label, expect_object, optional_array, optional_bool, ElementDeclaration,
};
use crate::method::{accessor_name, MethodRepresentation};
use crate::scope::{ScopeElement, ROOT_GETTER};
use crate::selector::{parse_root_selector, Locator};
use crate::types::TypeRegistry;

const PAGE_CONTEXT: &str = "page object";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Diagnostic attributed to one element declaration.
pub struct ElementDiagnostic {
    /// Element name, or the node path when the name could not be read.
    pub element: String,
    pub code: u16,
    pub args: Vec<String>,
}

impl ElementDiagnostic {
    fn new(element: impl Into<String>, error: CompilationError) -> Self {
        Self {
            element: element.into(),
            code: error.code,
            args: error.args,
        }
    }

    pub fn error(&self) -> CompilationError {
        CompilationError::new(self.code, self.args.iter().cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Result of compiling one page object.
pub struct PageObjectCompilation {
    /// Root selector, present for `root: true` page objects.
    pub root_locator: Option<Locator>,
    /// Accessors in declaration order, parents before their nested elements.
    pub methods: Vec<MethodRepresentation>,
    pub diagnostics: Vec<ElementDiagnostic>,
}

impl PageObjectCompilation {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn method(&self, name: &str) -> Option<&MethodRepresentation> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Compiles page-object JSON text.
pub fn compile_page_object(
    input: &str,
    registry: &TypeRegistry,
) -> Result<PageObjectCompilation, PageObjectError> {
    let value: JsonValue = serde_json::from_str(input)?;
    compile_page_object_value(&value, registry)
}

/// Compiles an already parsed page-object node.
///
/// Page-level problems (shape, root selector) fail the whole call; element
/// problems are collected in [`PageObjectCompilation::diagnostics`].
pub fn compile_page_object_value(
    value: &JsonValue,
    registry: &TypeRegistry,
) -> Result<PageObjectCompilation, PageObjectError> {
    let map = expect_object(value, PAGE_CONTEXT, "$")?;

    let is_root = optional_bool(map, "root", PAGE_CONTEXT)?;
    let root_locator = match (is_root, map.get("selector")) {
        (true, Some(node)) => Some(parse_root_selector(node, PAGE_CONTEXT)?),
        (true, None) => {
            return Err(CompilationError::new(MISSING_PROPERTY, [PAGE_CONTEXT, "selector"]).into());
        }
        (false, Some(_)) => {
            return Err(
                CompilationError::new(UNSUPPORTED_PROPERTY, [PAGE_CONTEXT, "selector"]).into(),
            );
        }
        (false, None) => None,
    };

    let elements = optional_array(map, "elements", PAGE_CONTEXT)?;
    let shadow_elements = match map.get("shadow") {
        Some(node) if !node.is_null() => {
            let shadow = expect_object(node, PAGE_CONTEXT, "shadow")?;
            optional_array(shadow, "elements", "page object shadow")?
        }
        _ => &[],
    };

    let mut walker = PageWalker::new(registry);
    walker.compile_elements(elements, &ScopeElement::root(false), "elements");
    walker.compile_elements(shadow_elements, &ScopeElement::root(true), "shadow.elements");

    tracing::debug!(
        methods = walker.methods.len(),
        diagnostics = walker.diagnostics.len(),
        "compiled page object"
    );

    Ok(PageObjectCompilation {
        root_locator,
        methods: walker.methods,
        diagnostics: walker.diagnostics,
    })
}

struct PageWalker<'r> {
    registry: &'r TypeRegistry,
    /// Accessor names taken so far, the root getter included.
    accessors: HashSet<String>,
    methods: Vec<MethodRepresentation>,
    diagnostics: Vec<ElementDiagnostic>,
}

impl<'r> PageWalker<'r> {
    fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            accessors: HashSet::from([ROOT_GETTER.to_string()]),
            methods: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn compile_elements(&mut self, nodes: &[JsonValue], scope: &ScopeElement, path: &str) {
        for (index, node) in nodes.iter().enumerate() {
            let node_path = format!("{path}[{index}]");
            if let Err(diagnostic) = self.compile_element(node, scope, &node_path) {
                tracing::debug!(
                    element = %diagnostic.element,
                    code = diagnostic.code,
                    "skipped element declaration"
                );
                self.diagnostics.push(diagnostic);
            }
        }
    }

    fn compile_element(
        &mut self,
        node: &JsonValue,
        scope: &ScopeElement,
        path: &str,
    ) -> Result<(), ElementDiagnostic> {
        let decl = ElementDeclaration::parse(node, path, self.registry)
            .map_err(|e| ElementDiagnostic::new(element_label(node, path), e))?;

        let accessor = accessor_name(&decl.name, decl.is_public);
        if !self.accessors.insert(accessor.clone()) {
            return Err(ElementDiagnostic::new(
                decl.name.clone(),
                CompilationError::new(
                    DUPLICATE_ELEMENT,
                    [PAGE_CONTEXT, decl.name.as_str(), accessor.as_str()],
                ),
            ));
        }

        let method = decl
            .to_method(scope, self.registry)
            .map_err(|e| ElementDiagnostic::new(decl.name.clone(), e))?;

        let light_scope = ScopeElement::for_element(&decl.name, &method, decl.is_nullable, false);
        let shadow_scope = ScopeElement::for_element(&decl.name, &method, decl.is_nullable, true);
        self.methods.push(method);

        self.compile_elements(&decl.elements, &light_scope, &format!("{path}.elements"));
        self.compile_elements(
            &decl.shadow_elements,
            &shadow_scope,
            &format!("{path}.shadow.elements"),
        );
        Ok(())
    }
}
