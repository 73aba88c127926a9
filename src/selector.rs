//! Selector kinds, locators and selector-node parsing.
//!
//! A selector node names exactly one of four lookup strategies. Element
//! selectors may additionally take arguments (`%s`/`%d` placeholders in the
//! expression) and `returnAll`; the page root selector may not.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::diagnostics::{
    EMPTY_STRING, EXCLUSIVE_SELECTOR_TYPES, NO_SELECTOR_TYPE, SELECTOR_ARGS_COUNT,
    SELECTOR_ARG_TYPE, UNSUPPORTED_PROPERTY,
};
use crate::error::CompilationError;
use crate::grammar::{expect_object, optional_array, optional_bool, optional_str};
use crate::params::{call_arguments, parse_arguments, MethodParameter};
use crate::types::TypeRegistry;

const LOCATOR_FACTORY: &str = "LocatorBy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Strategy used to find an element at runtime.
pub enum SelectorKind {
    Css,
    AccessId,
    ClassChain,
    UiAutomator,
}

impl SelectorKind {
    /// All kinds, in the order inputs are checked and reported.
    pub const ALL: [SelectorKind; 4] = [
        SelectorKind::Css,
        SelectorKind::AccessId,
        SelectorKind::ClassChain,
        SelectorKind::UiAutomator,
    ];

    /// Property name in a selector node.
    pub fn key(self) -> &'static str {
        match self {
            SelectorKind::Css => "css",
            SelectorKind::AccessId => "accessid",
            SelectorKind::ClassChain => "classchain",
            SelectorKind::UiAutomator => "uiautomator",
        }
    }

    fn factory_method(self) -> &'static str {
        match self {
            SelectorKind::Css => "byCss",
            SelectorKind::AccessId => "byAccessibilityId",
            SelectorKind::ClassChain => "byClassChain",
            SelectorKind::UiAutomator => "byUiAutomator",
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Comma-separated list of every supported selector kind.
pub fn supported_selector_types() -> String {
    SelectorKind::ALL
        .iter()
        .map(|kind| kind.key())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Selector with exactly one populated, non-empty strategy.
pub enum SelectorSpec {
    Css(String),
    AccessId(String),
    ClassChain(String),
    UiAutomator(String),
}

impl SelectorSpec {
    /// Builds a selector from the four optional raw inputs.
    ///
    /// Present inputs are checked for emptiness first, in [`SelectorKind::ALL`]
    /// order; then zero present inputs yield code 1002 and several yield 1003.
    pub fn from_raw(
        css: Option<&str>,
        accessid: Option<&str>,
        classchain: Option<&str>,
        uiautomator: Option<&str>,
    ) -> Result<Self, CompilationError> {
        let inputs = [
            (SelectorKind::Css, css),
            (SelectorKind::AccessId, accessid),
            (SelectorKind::ClassChain, classchain),
            (SelectorKind::UiAutomator, uiautomator),
        ];

        for (kind, value) in inputs {
            if value.is_some_and(str::is_empty) {
                return Err(CompilationError::new(EMPTY_STRING, ["selector", kind.key()]));
            }
        }

        let mut present = inputs
            .into_iter()
            .filter_map(|(kind, value)| value.map(|v| (kind, v)));
        let (kind, value) = present.next().ok_or_else(|| {
            CompilationError::new(NO_SELECTOR_TYPE, [supported_selector_types()])
        })?;
        if present.next().is_some() {
            return Err(CompilationError::new(
                EXCLUSIVE_SELECTOR_TYPES,
                [supported_selector_types()],
            ));
        }

        let value = value.to_string();
        Ok(match kind {
            SelectorKind::Css => SelectorSpec::Css(value),
            SelectorKind::AccessId => SelectorSpec::AccessId(value),
            SelectorKind::ClassChain => SelectorSpec::ClassChain(value),
            SelectorKind::UiAutomator => SelectorSpec::UiAutomator(value),
        })
    }

    pub fn kind(&self) -> SelectorKind {
        match self {
            SelectorSpec::Css(_) => SelectorKind::Css,
            SelectorSpec::AccessId(_) => SelectorKind::AccessId,
            SelectorSpec::ClassChain(_) => SelectorKind::ClassChain,
            SelectorSpec::UiAutomator(_) => SelectorKind::UiAutomator,
        }
    }

    pub fn expression(&self) -> &str {
        match self {
            SelectorSpec::Css(value)
            | SelectorSpec::AccessId(value)
            | SelectorSpec::ClassChain(value)
            | SelectorSpec::UiAutomator(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Resolved, strategy-tagged lookup expression.
pub struct Locator {
    pub kind: SelectorKind,
    pub expression: String,
}

impl From<SelectorSpec> for Locator {
    fn from(spec: SelectorSpec) -> Self {
        let kind = spec.kind();
        let expression = match spec {
            SelectorSpec::Css(value)
            | SelectorSpec::AccessId(value)
            | SelectorSpec::ClassChain(value)
            | SelectorSpec::UiAutomator(value) => value,
        };
        Self { kind, expression }
    }
}

impl Locator {
    /// Locator-construction expression; placeholder arguments are applied
    /// through `String.format`.
    pub fn code(&self, args: &[MethodParameter]) -> String {
        let expression = JsonValue::from(self.expression.as_str()).to_string();
        let value = if args.is_empty() {
            expression
        } else {
            format!("String.format({expression}, {})", call_arguments(args))
        };
        format!("{LOCATOR_FACTORY}.{}({value})", self.kind.factory_method())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Parsed element selector node.
pub struct ElementSelector {
    pub locator: Locator,
    /// Arguments filling the expression placeholders, in order.
    pub parameters: Vec<MethodParameter>,
    pub return_all: bool,
}

/// Parses the page root selector, which accepts no arguments and no
/// `returnAll`.
pub fn parse_root_selector(value: &JsonValue, context: &str) -> Result<Locator, CompilationError> {
    let map = expect_object(value, context, "selector")?;
    for property in ["args", "returnAll"] {
        if map.contains_key(property) {
            return Err(CompilationError::new(
                UNSUPPORTED_PROPERTY,
                [format!("{context} root selector"), property.to_string()],
            ));
        }
    }
    let spec = read_selector_spec(map, context)?;
    tracing::trace!(kind = %spec.kind(), "parsed root selector");
    Ok(spec.into())
}

/// Parses an element selector node with its optional `args` and `returnAll`.
pub fn parse_element_selector(
    value: &JsonValue,
    context: &str,
    registry: &TypeRegistry,
) -> Result<ElementSelector, CompilationError> {
    let map = expect_object(value, context, "selector")?;
    let spec = read_selector_spec(map, context)?;
    let selector_context = format!("{context} selector");
    let parameters = parse_arguments(
        optional_array(map, "args", &selector_context)?,
        &selector_context,
        registry,
    )?;
    validate_placeholders(spec.expression(), &parameters, context, registry)?;
    let return_all = optional_bool(map, "returnAll", &selector_context)?;

    Ok(ElementSelector {
        locator: spec.into(),
        parameters,
        return_all,
    })
}

fn read_selector_spec(
    map: &serde_json::Map<String, JsonValue>,
    context: &str,
) -> Result<SelectorSpec, CompilationError> {
    let selector_context = format!("{context} selector");
    SelectorSpec::from_raw(
        optional_str(map, SelectorKind::Css.key(), &selector_context)?,
        optional_str(map, SelectorKind::AccessId.key(), &selector_context)?,
        optional_str(map, SelectorKind::ClassChain.key(), &selector_context)?,
        optional_str(map, SelectorKind::UiAutomator.key(), &selector_context)?,
    )
}

fn validate_placeholders(
    expression: &str,
    parameters: &[MethodParameter],
    context: &str,
    registry: &TypeRegistry,
) -> Result<(), CompilationError> {
    let unescaped = expression.replace("%%", "");
    let placeholders: Vec<&str> = placeholder_regex()
        .find_iter(&unescaped)
        .map(|m| m.as_str())
        .collect();

    if placeholders.len() != parameters.len() {
        return Err(CompilationError::new(
            SELECTOR_ARGS_COUNT,
            [
                context.to_string(),
                expression.to_string(),
                placeholders.len().to_string(),
                parameters.len().to_string(),
            ],
        ));
    }

    for (placeholder, parameter) in placeholders.iter().zip(parameters) {
        let expected = if *placeholder == "%d" { "number" } else { "string" };
        let actual = registry
            .parameter_type_name(&parameter.type_ref)
            .unwrap_or("unknown");
        if actual != expected {
            return Err(CompilationError::new(
                SELECTOR_ARG_TYPE,
                [context, parameter.name.as_str(), actual, expected],
            ));
        }
    }
    Ok(())
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%[sd]").expect("valid regex"))
}
