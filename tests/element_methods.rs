use serde_json::json;

use page_object_compiler::diagnostics::PARAMETER_CONFLICT;
use page_object_compiler::{
    build_element_method, compile_element, Cardinality, ElementMethodSpec, Locator, LookupKind,
    MatcherKind, MatcherSpec, MethodParameter, MethodRepresentation, Predicate, ScopeElement,
    SelectorSpec, TypeRef, TypeRegistry,
};

fn bar_scope(registry: &TypeRegistry) -> ScopeElement {
    let int = registry.parameter_type("number", "test").unwrap();
    ScopeElement::new(
        "bar",
        "getBarElement",
        vec![MethodParameter::named("x", int)],
        false,
        false,
    )
}

fn build(registry: &TypeRegistry, cardinality: &Cardinality) -> MethodRepresentation {
    let foo = TypeRef::new("Foo", "utam.app.pageobjects.Foo");
    let locator: Locator = SelectorSpec::from_raw(Some("a[title='%s']"), None, None, None)
        .unwrap()
        .into();
    let string = registry.parameter_type("string", "test").unwrap();
    let locator_parameters = vec![MethodParameter::named("y", string)];
    let scope = bar_scope(registry);
    build_element_method(
        &ElementMethodSpec {
            element_name: "foo",
            is_public: true,
            lookup: LookupKind::Custom,
            element_type: &foo,
            locator: &locator,
            locator_parameters: &locator_parameters,
            scope: &scope,
            cardinality,
        },
        registry,
    )
    .unwrap()
}

fn parameter_names(method: &MethodRepresentation) -> Vec<&str> {
    method.parameters.iter().map(|p| p.name.as_str()).collect()
}

fn contains_predicate() -> Predicate {
    Predicate {
        apply_method: "getText".to_string(),
        apply_parameters: vec![],
        matcher: MatcherSpec {
            kind: MatcherKind::StringContains,
            parameters: vec![MethodParameter::named("z", TypeRef::builtin("String"))],
        },
    }
}

#[test]
fn single_scoped_accessor() {
    let registry = TypeRegistry::new();
    let method = build(&registry, &Cardinality::Single);

    assert_eq!(method.name, "getFoo");
    assert!(method.is_public);
    assert_eq!(parameter_names(&method), vec!["x", "y"]);
    assert_eq!(method.return_type, TypeRef::new("Foo", "utam.app.pageobjects.Foo"));
    assert!(!method.return_type.is_collection);
    assert_eq!(method.signature(), "Foo getFoo(Integer x, String y)");
    assert_eq!(
        method.body_lines,
        vec![
            "BasicElement bar = this.getBarElement(x)",
            r#"return custom(bar, LocatorBy.byCss(String.format("a[title='%s']", y))).build(Foo.class)"#,
        ]
    );
    assert!(!method.body_lines[1].contains("elm ->"));
}

#[test]
fn filtered_list_accessor() {
    let registry = TypeRegistry::new();
    let method = build(
        &registry,
        &Cardinality::Filtered {
            predicate: contains_predicate(),
            find_first: false,
        },
    );

    assert_eq!(parameter_names(&method), vec!["x", "y", "z"]);
    assert!(method.return_type.is_collection);
    assert_eq!(method.signature(), "List<Foo> getFoo(Integer x, String y, String z)");
    assert_eq!(
        method.body_lines[1],
        "return custom(bar, LocatorBy.byCss(String.format(\"a[title='%s']\", y)))\
         .buildList(Foo.class, elm -> { String tmp = elm.getText(); return tmp != null && tmp.contains(z); })"
    );
    let interface: Vec<_> = method
        .interface_dependencies
        .iter()
        .map(|t| t.import_path.as_str())
        .collect();
    assert_eq!(interface, vec!["java.util.List", "utam.app.pageobjects.Foo"]);
    let class: Vec<_> = method
        .class_dependencies
        .iter()
        .map(|t| t.import_path.as_str())
        .collect();
    assert_eq!(
        class,
        vec![
            "java.util.List",
            "utam.app.pageobjects.Foo",
            "utam.core.element.BasicElement"
        ]
    );
}

#[test]
fn filtered_find_first_accessor() {
    let registry = TypeRegistry::new();
    let method = build(
        &registry,
        &Cardinality::Filtered {
            predicate: contains_predicate(),
            find_first: true,
        },
    );
    assert!(!method.return_type.is_collection);
    assert!(method.body_lines[1].contains(".build(Foo.class, elm -> "));
    assert!(!method.body_lines[1].contains("buildList"));
}

#[test]
fn multiple_accessor_is_always_a_list() {
    let registry = TypeRegistry::new();
    let method = build(&registry, &Cardinality::Multiple);
    assert!(method.return_type.is_collection);
    assert_eq!(parameter_names(&method), vec!["x", "y"]);
    assert!(method.body_lines[1].ends_with(".buildList(Foo.class)"));
}

#[test]
fn duplicate_names_across_sources_are_dropped() {
    let registry = TypeRegistry::new();
    let predicate = Predicate {
        apply_method: "getAttribute".to_string(),
        apply_parameters: vec![MethodParameter::named("y", TypeRef::builtin("String"))],
        matcher: MatcherSpec {
            kind: MatcherKind::StringEquals,
            parameters: vec![MethodParameter::named("y", TypeRef::builtin("String"))],
        },
    };
    let method = build(
        &registry,
        &Cardinality::Filtered {
            predicate,
            find_first: true,
        },
    );
    assert_eq!(parameter_names(&method), vec!["x", "y"]);
}

#[test]
fn matcher_type_conflict_names_the_method() {
    let registry = TypeRegistry::new();
    let scope = bar_scope(&registry);
    let node = json!({
        "name": "foo",
        "selector": {"css": "li", "returnAll": true},
        "filter": {
            "apply": "getText",
            "matcher": {"type": "stringEquals", "args": [{"name": "x", "type": "string"}]}
        }
    });
    let err = compile_element(&node, &scope, &registry).unwrap_err();
    assert_eq!(err.code, PARAMETER_CONFLICT);
    assert_eq!(err.args, vec!["method 'getFooElement'", "x", "Integer", "String"]);
}

#[test]
fn building_twice_is_identical() {
    let registry = TypeRegistry::new();
    let cardinality = Cardinality::Filtered {
        predicate: contains_predicate(),
        find_first: false,
    };
    let first = build(&registry, &cardinality);
    let second = build(&registry, &cardinality);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn compiles_basic_element_from_node() {
    let registry = TypeRegistry::new();
    let node = json!({
        "name": "submitButton",
        "selector": {"accessid": "submit"}
    });
    let method = compile_element(&node, &ScopeElement::root(false), &registry).unwrap();
    assert_eq!(method.name, "getSubmitButtonElement");
    assert_eq!(method.return_type.simple_name, "BasicElement");
    assert_eq!(
        method.body_lines[1],
        r#"return basic(root, LocatorBy.byAccessibilityId("submit")).build(BasicElement.class)"#
    );
    let class: Vec<_> = method
        .class_dependencies
        .iter()
        .map(|t| t.simple_name.as_str())
        .collect();
    assert_eq!(class, vec!["BasicElement"]);
}

#[test]
fn serialized_representation_uses_emitter_field_names() {
    let registry = TypeRegistry::new();
    let method = build(&registry, &Cardinality::Multiple);
    let value = serde_json::to_value(&method).unwrap();
    assert_eq!(value["name"], json!("getFoo"));
    assert_eq!(value["returnType"]["simpleName"], json!("Foo"));
    assert_eq!(value["returnType"]["isCollection"], json!(true));
    assert_eq!(value["parameters"][0]["type"]["simpleName"], json!("Integer"));
    assert_eq!(value["interfaceDependencies"][0]["importPath"], json!("java.util.List"));
}

#[test]
fn build_call_text_inside_selector_does_not_affect_cardinality() {
    let registry = TypeRegistry::new();
    let node = json!({
        "name": "link",
        "selector": {"css": "a[title='.buildList(']"}
    });
    let method = compile_element(&node, &ScopeElement::root(false), &registry).unwrap();
    assert!(!method.return_type.is_collection);
    assert!(method.body_lines[1].ends_with(".build(BasicElement.class)"));

    let node = json!({
        "name": "row",
        "selector": {"css": "tr", "returnAll": true},
        "filter": {
            "apply": "getText",
            "matcher": {"type": "stringEquals", "args": [{"value": "x.buildList(y"}]},
            "findFirst": true
        }
    });
    let method = compile_element(&node, &ScopeElement::root(false), &registry).unwrap();
    assert!(!method.return_type.is_collection);
    assert!(method.body_lines[1].contains(").build(BasicElement.class, elm -> {"));
    assert!(method.body_lines[1].contains("x.buildList(y"));
}

#[test]
fn parameters_from_all_four_sources_keep_first_occurrence_order() {
    let registry = TypeRegistry::new();
    let int = registry.parameter_type("number", "test").unwrap();
    let string = registry.parameter_type("string", "test").unwrap();
    let scope = ScopeElement::new(
        "bar",
        "getBarElement",
        vec![
            MethodParameter::named("x", int),
            MethodParameter::named("s", string),
        ],
        false,
        false,
    );
    let node = json!({
        "name": "cell",
        "selector": {
            "css": "a[data-s='%s'][title='%s']",
            "args": [{"name": "s", "type": "string"}, {"name": "y", "type": "string"}],
            "returnAll": true
        },
        "filter": {
            "apply": "getAttribute",
            "args": [{"name": "y", "type": "string"}, {"name": "a", "type": "string"}],
            "matcher": {"type": "stringContains", "args": [{"name": "a", "type": "string"}]}
        }
    });
    let method = compile_element(&node, &scope, &registry).unwrap();
    assert_eq!(parameter_names(&method), vec!["x", "s", "y", "a"]);
    assert!(method.return_type.is_collection);
    assert!(method.body_lines[1].contains(
        "elm -> { String tmp = elm.getAttribute(y, a); return tmp != null && tmp.contains(a); }"
    ));
}
