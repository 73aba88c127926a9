//! Diagnostic codes and the message catalog seam.
//!
//! Every validation point in the compiler selects one of the codes below and
//! the ordered arguments for it. Turning a code into text is the job of a
//! [`MessageCatalog`]; [`DefaultCatalog`] ships the stock English messages.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::CompilationError;

pub const EMPTY_STRING: u16 = 1000;
pub const MISSING_PROPERTY: u16 = 1001;
pub const NO_SELECTOR_TYPE: u16 = 1002;
pub const EXCLUSIVE_SELECTOR_TYPES: u16 = 1003;
pub const SELECTOR_ARGS_COUNT: u16 = 1004;
pub const SELECTOR_ARG_TYPE: u16 = 1005;
pub const PARAMETER_CONFLICT: u16 = 1006;
pub const UNKNOWN_MATCHER: u16 = 1007;
pub const MATCHER_ARGS_COUNT: u16 = 1008;
pub const UNSUPPORTED_PARAMETER_TYPE: u16 = 1009;
pub const WRONG_PROPERTY_SHAPE: u16 = 1010;
pub const DUPLICATE_ELEMENT: u16 = 1011;
pub const FILTER_WITHOUT_RETURN_ALL: u16 = 1012;
pub const INVALID_ELEMENT_TYPE: u16 = 1013;
pub const NESTED_ELEMENTS_NOT_ALLOWED: u16 = 1014;
pub const UNSUPPORTED_PROPERTY: u16 = 1015;
pub const MATCHER_ARG_TYPE: u16 = 1016;
pub const INVALID_ELEMENT_NAME: u16 = 1017;
pub const INVALID_METHOD_NAME: u16 = 1018;

/// Maps diagnostic codes and arguments to human-readable text.
pub trait MessageCatalog {
    /// Returns the formatted message, or `None` for an unknown code.
    fn message(&self, code: u16, args: &[String]) -> Option<String>;

    /// Formats a diagnostic, falling back to its debug-style rendering.
    fn render(&self, error: &CompilationError) -> String {
        self.message(error.code, &error.args)
            .unwrap_or_else(|| error.to_string())
    }
}

/// Catalog with the built-in message templates.
///
/// Templates reference arguments positionally as `{0}`, `{1}`, ... A
/// placeholder without a matching argument is left untouched.
#[derive(Debug, Clone)]
pub struct DefaultCatalog {
    templates: BTreeMap<u16, String>,
}

impl Default for DefaultCatalog {
    fn default() -> Self {
        let templates = [
            (EMPTY_STRING, "{0}: property \"{1}\" should be a non-empty string"),
            (MISSING_PROPERTY, "{0}: required property \"{1}\" is missing"),
            (
                NO_SELECTOR_TYPE,
                "no recognized selector type provided, supported types are {0}",
            ),
            (
                EXCLUSIVE_SELECTOR_TYPES,
                "mutually exclusive selector types provided, supported types are {0}",
            ),
            (
                SELECTOR_ARGS_COUNT,
                "{0}: selector \"{1}\" expects {2} argument(s), found {3}",
            ),
            (
                SELECTOR_ARG_TYPE,
                "{0}: selector argument \"{1}\" has type {2}, placeholder expects {3}",
            ),
            (
                PARAMETER_CONFLICT,
                "{0}: parameter \"{1}\" is already declared with type {2}, cannot redeclare it with type {3}",
            ),
            (
                UNKNOWN_MATCHER,
                "{0}: unknown matcher type \"{1}\", supported types are {2}",
            ),
            (
                MATCHER_ARGS_COUNT,
                "{0}: matcher \"{1}\" expects {2} argument(s), found {3}",
            ),
            (
                UNSUPPORTED_PARAMETER_TYPE,
                "{0}: unsupported parameter type \"{1}\", supported types are {2}",
            ),
            (WRONG_PROPERTY_SHAPE, "{0}: property \"{1}\" should be {2}"),
            (
                DUPLICATE_ELEMENT,
                "{0}: element \"{1}\" duplicates accessor \"{2}\"",
            ),
            (
                FILTER_WITHOUT_RETURN_ALL,
                "{0}: filter can only be applied when selector sets \"returnAll\" to true",
            ),
            (
                INVALID_ELEMENT_TYPE,
                "{0}: element type \"{1}\" is not a valid page object type",
            ),
            (NESTED_ELEMENTS_NOT_ALLOWED, "{0}: nested elements are not allowed, {1}"),
            (UNSUPPORTED_PROPERTY, "{0}: property \"{1}\" is not supported"),
            (
                MATCHER_ARG_TYPE,
                "{0}: matcher \"{1}\" argument \"{2}\" has type {3}, expected {4}",
            ),
            (INVALID_ELEMENT_NAME, "{0}: \"{1}\" is not a valid element name"),
            (INVALID_METHOD_NAME, "{0}: \"{1}\" is not a valid method name"),
        ];
        Self {
            templates: templates
                .into_iter()
                .map(|(code, template)| (code, template.to_string()))
                .collect(),
        }
    }
}

impl DefaultCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides or adds the template for `code`.
    pub fn with_template(mut self, code: u16, template: impl Into<String>) -> Self {
        self.templates.insert(code, template.into());
        self
    }
}

impl MessageCatalog for DefaultCatalog {
    fn message(&self, code: u16, args: &[String]) -> Option<String> {
        let template = self.templates.get(&code)?;
        Some(interpolate(template, args))
    }
}

fn interpolate(template: &str, args: &[String]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d+)\}").expect("valid regex"))
}
