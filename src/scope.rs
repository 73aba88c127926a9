//! Scope elements: the element a nested lookup is performed relative to.

use serde::Serialize;

use crate::method::MethodRepresentation;
use crate::params::{call_arguments, MethodParameter};
use crate::types::TypeRef;

const ROOT_SCOPE_NAME: &str = "root";
/// Accessor of the page root element; no element accessor may reuse it.
pub const ROOT_GETTER: &str = "getRootElement";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeElement {
    /// Local variable the scoped lookup is expressed relative to.
    pub name: String,
    /// Accessor returning the scope element.
    pub getter: String,
    /// Full parameter list of `getter`, outer scopes first.
    pub parameters: Vec<MethodParameter>,
    pub is_nullable: bool,
    pub expands_shadow_root: bool,
}

impl ScopeElement {
    pub fn new(
        name: impl Into<String>,
        getter: impl Into<String>,
        parameters: Vec<MethodParameter>,
        is_nullable: bool,
        expands_shadow_root: bool,
    ) -> Self {
        Self {
            name: name.into(),
            getter: getter.into(),
            parameters,
            is_nullable,
            expands_shadow_root,
        }
    }

    /// The page object's root element.
    pub fn root(expands_shadow_root: bool) -> Self {
        Self::new(ROOT_SCOPE_NAME, ROOT_GETTER, Vec::new(), false, expands_shadow_root)
    }

    /// Uses an already built accessor as the scope of the elements nested
    /// under it. Its parameters already include every outer scope's, so
    /// chains of any depth flatten into one list.
    pub fn for_element(
        element_name: &str,
        accessor: &MethodRepresentation,
        is_nullable: bool,
        expands_shadow_root: bool,
    ) -> Self {
        Self::new(
            element_name,
            accessor.name.clone(),
            accessor.parameters.clone(),
            is_nullable,
            expands_shadow_root,
        )
    }

    pub fn parameters(&self) -> &[MethodParameter] {
        &self.parameters
    }

    /// Expression lookups are scoped to.
    pub fn expression(&self) -> &str {
        &self.name
    }

    /// Statement declaring the scope variable, typed as `base_element`.
    pub fn prefix_line(&self, base_element: &TypeRef) -> String {
        let mut line = format!(
            "{} {} = this.{}({})",
            base_element.simple_name,
            self.name,
            self.getter,
            call_arguments(&self.parameters)
        );
        if self.is_nullable {
            line.push_str(".nullable()");
        }
        if self.expands_shadow_root {
            line.push_str(".expandShadowRoot()");
        }
        line
    }
}
