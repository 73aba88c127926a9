//! Method parameters and the tracker that composes a method signature from
//! several parameter sources.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::diagnostics::{PARAMETER_CONFLICT, UNSUPPORTED_PARAMETER_TYPE, WRONG_PROPERTY_SHAPE};
use crate::error::CompilationError;
use crate::grammar::{expect_object, optional_str, required_str};
use crate::types::{TypeRef, TypeRegistry, PARAMETER_TYPE_NAMES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Single argument of a generated method or of a call inside its body.
pub struct MethodParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Inline value; literal parameters never appear in a signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<JsonValue>,
}

impl MethodParameter {
    pub fn named(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            literal: None,
        }
    }

    pub fn literal(name: impl Into<String>, type_ref: TypeRef, value: JsonValue) -> Self {
        Self {
            name: name.into(),
            type_ref,
            literal: Some(value),
        }
    }

    pub fn is_literal(&self) -> bool {
        self.literal.is_some()
    }

    /// Text passed at a call site: the literal rendered as code, or the name.
    pub fn code_value(&self) -> String {
        match &self.literal {
            Some(value) => value.to_string(),
            None => self.name.clone(),
        }
    }
}

/// Joins call-site values of `parameters` with `, `.
pub fn call_arguments(parameters: &[MethodParameter]) -> String {
    parameters
        .iter()
        .map(MethodParameter::code_value)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Insertion-ordered, name-keyed parameter set of one generated method.
#[derive(Debug, Clone)]
pub struct ParameterTracker {
    owner: String,
    parameters: IndexMap<String, MethodParameter>,
}

impl ParameterTracker {
    /// `owner` labels conflict diagnostics, e.g. `method 'getFoo'`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            parameters: IndexMap::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Merges `parameters` by name. A name seen before is kept at its first
    /// position when the types agree; differing types are a conflict.
    pub fn set_parameters(
        &mut self,
        parameters: &[MethodParameter],
    ) -> Result<(), CompilationError> {
        for parameter in parameters.iter().filter(|p| !p.is_literal()) {
            if let Some(existing) = self.parameters.get(&parameter.name) {
                if existing.type_ref != parameter.type_ref {
                    return Err(CompilationError::new(
                        PARAMETER_CONFLICT,
                        [
                            self.owner.clone(),
                            parameter.name.clone(),
                            existing.type_ref.display_name(),
                            parameter.type_ref.display_name(),
                        ],
                    ));
                }
                continue;
            }
            tracing::trace!(
                owner = %self.owner,
                parameter = %parameter.name,
                "added method parameter"
            );
            self.parameters
                .insert(parameter.name.clone(), parameter.clone());
        }
        Ok(())
    }

    pub fn parameters(&self) -> impl Iterator<Item = &MethodParameter> {
        self.parameters.values()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn into_parameters(self) -> Vec<MethodParameter> {
        self.parameters.into_values().collect()
    }
}

/// Reads an argument list: each entry is either `{name, type}` or a literal
/// `{value}` with an optional `name` and `type`.
pub fn parse_arguments(
    args: &[JsonValue],
    context: &str,
    registry: &TypeRegistry,
) -> Result<Vec<MethodParameter>, CompilationError> {
    let mut out = Vec::with_capacity(args.len());
    for (index, arg) in args.iter().enumerate() {
        let property = format!("args[{index}]");
        let map = expect_object(arg, context, &property)?;
        let arg_context = format!("{context} {property}");

        if let Some(value) = map.get("value") {
            let type_ref = registry.literal_type(value).ok_or_else(|| {
                CompilationError::new(
                    UNSUPPORTED_PARAMETER_TYPE,
                    [
                        arg_context.clone(),
                        json_type_name(value).to_string(),
                        PARAMETER_TYPE_NAMES.join(", "),
                    ],
                )
            })?;
            if let Some(declared) = optional_str(map, "type", &arg_context)? {
                let declared_ref = registry.parameter_type(declared, &arg_context)?;
                if declared_ref != type_ref {
                    return Err(CompilationError::new(
                        WRONG_PROPERTY_SHAPE,
                        [arg_context, "value".to_string(), format!("a {declared} literal")],
                    ));
                }
            }
            let name = match optional_str(map, "name", &arg_context)? {
                Some(name) => name.to_string(),
                None => value.to_string(),
            };
            out.push(MethodParameter::literal(name, type_ref, value.clone()));
            continue;
        }

        let name = required_str(map, "name", &arg_context)?;
        let type_name = required_str(map, "type", &arg_context)?;
        let type_ref = registry.parameter_type(type_name, &arg_context)?;
        out.push(MethodParameter::named(name, type_ref));
    }
    Ok(out)
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
