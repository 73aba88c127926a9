//! Filter predicates: an "apply" accessor invoked on each candidate element
//! and a matcher testing its result.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::diagnostics::{
    INVALID_METHOD_NAME, MATCHER_ARGS_COUNT, MATCHER_ARG_TYPE, MISSING_PROPERTY, UNKNOWN_MATCHER,
};
use crate::error::CompilationError;
use crate::grammar::{expect_object, is_identifier, optional_array, optional_bool, required_str};
use crate::params::{call_arguments, parse_arguments, MethodParameter};
use crate::types::TypeRegistry;

const CANDIDATE: &str = "elm";
const OPERAND: &str = "tmp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Comparison applied to the apply-method result.
pub enum MatcherKind {
    IsTrue,
    IsFalse,
    NotNull,
    StringEquals,
    StringContains,
}

impl MatcherKind {
    pub const ALL: [MatcherKind; 5] = [
        MatcherKind::IsTrue,
        MatcherKind::IsFalse,
        MatcherKind::NotNull,
        MatcherKind::StringEquals,
        MatcherKind::StringContains,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MatcherKind::IsTrue => "isTrue",
            MatcherKind::IsFalse => "isFalse",
            MatcherKind::NotNull => "notNull",
            MatcherKind::StringEquals => "stringEquals",
            MatcherKind::StringContains => "stringContains",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Declared type of every matcher argument, `None` when it takes none.
    pub fn argument_type(self) -> Option<&'static str> {
        match self {
            MatcherKind::StringEquals | MatcherKind::StringContains => Some("string"),
            MatcherKind::IsTrue | MatcherKind::IsFalse | MatcherKind::NotNull => None,
        }
    }

    pub fn arity(self) -> usize {
        match self.argument_type() {
            Some(_) => 1,
            None => 0,
        }
    }

    /// Type the apply-method result is held in.
    fn operand_type(self) -> &'static str {
        match self {
            MatcherKind::IsTrue | MatcherKind::IsFalse => "Boolean",
            MatcherKind::NotNull => "Object",
            MatcherKind::StringEquals | MatcherKind::StringContains => "String",
        }
    }

    fn condition(self, args: &str) -> String {
        match self {
            MatcherKind::IsTrue => format!("Boolean.TRUE.equals({OPERAND})"),
            MatcherKind::IsFalse => format!("Boolean.FALSE.equals({OPERAND})"),
            MatcherKind::NotNull => format!("{OPERAND} != null"),
            MatcherKind::StringEquals => format!("{OPERAND} != null && {OPERAND}.equals({args})"),
            MatcherKind::StringContains => {
                format!("{OPERAND} != null && {OPERAND}.contains({args})")
            }
        }
    }
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatcherSpec {
    pub kind: MatcherKind,
    pub parameters: Vec<MethodParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Filter condition applied to each candidate element.
pub struct Predicate {
    pub apply_method: String,
    pub apply_parameters: Vec<MethodParameter>,
    pub matcher: MatcherSpec,
}

impl Predicate {
    /// Single lambda expression: invoke the apply method, then test the
    /// result with the matcher.
    pub fn code(&self) -> String {
        format!(
            "{CANDIDATE} -> {{ {} {OPERAND} = {CANDIDATE}.{}({}); return {}; }}",
            self.matcher.kind.operand_type(),
            self.apply_method,
            call_arguments(&self.apply_parameters),
            self.matcher
                .kind
                .condition(&call_arguments(&self.matcher.parameters)),
        )
    }

    /// Parameters contributed to the method signature: apply-method
    /// arguments, then matcher arguments.
    pub fn parameters(&self) -> impl Iterator<Item = &MethodParameter> {
        self.apply_parameters
            .iter()
            .chain(self.matcher.parameters.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Parsed `filter` node.
pub struct Filter {
    pub predicate: Predicate,
    /// Return the first match instead of every match.
    pub find_first: bool,
}

/// Parses `{apply, args, matcher: {type, args}, findFirst}`.
pub fn parse_filter(
    value: &JsonValue,
    context: &str,
    registry: &TypeRegistry,
) -> Result<Filter, CompilationError> {
    let filter_context = format!("{context} filter");
    let map = expect_object(value, context, "filter")?;

    let apply_method = required_str(map, "apply", &filter_context)?;
    if !is_identifier(apply_method) {
        return Err(CompilationError::new(
            INVALID_METHOD_NAME,
            [filter_context.as_str(), apply_method],
        ));
    }
    let apply_parameters = parse_arguments(
        optional_array(map, "args", &filter_context)?,
        &filter_context,
        registry,
    )?;

    let matcher_node = map.get("matcher").ok_or_else(|| {
        CompilationError::new(MISSING_PROPERTY, [filter_context.as_str(), "matcher"])
    })?;
    let matcher = parse_matcher(matcher_node, &filter_context, registry)?;
    let find_first = optional_bool(map, "findFirst", &filter_context)?;

    Ok(Filter {
        predicate: Predicate {
            apply_method: apply_method.to_string(),
            apply_parameters,
            matcher,
        },
        find_first,
    })
}

fn parse_matcher(
    value: &JsonValue,
    context: &str,
    registry: &TypeRegistry,
) -> Result<MatcherSpec, CompilationError> {
    let matcher_context = format!("{context} matcher");
    let map = expect_object(value, context, "matcher")?;

    let type_name = required_str(map, "type", &matcher_context)?;
    let kind = MatcherKind::from_name(type_name).ok_or_else(|| {
        let supported = MatcherKind::ALL
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ");
        CompilationError::new(UNKNOWN_MATCHER, [context, type_name, supported.as_str()])
    })?;

    let parameters = parse_arguments(
        optional_array(map, "args", &matcher_context)?,
        &matcher_context,
        registry,
    )?;
    if parameters.len() != kind.arity() {
        return Err(CompilationError::new(
            MATCHER_ARGS_COUNT,
            [
                context.to_string(),
                kind.name().to_string(),
                kind.arity().to_string(),
                parameters.len().to_string(),
            ],
        ));
    }

    if let Some(expected) = kind.argument_type() {
        for parameter in &parameters {
            let actual = registry
                .parameter_type_name(&parameter.type_ref)
                .unwrap_or("unknown");
            if actual != expected {
                return Err(CompilationError::new(
                    MATCHER_ARG_TYPE,
                    [context, kind.name(), parameter.name.as_str(), actual, expected],
                ));
            }
        }
    }

    Ok(MatcherSpec { kind, parameters })
}
