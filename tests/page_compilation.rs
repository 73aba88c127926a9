use serde_json::json;

use page_object_compiler::diagnostics::{
    DUPLICATE_ELEMENT, EXCLUSIVE_SELECTOR_TYPES, NO_SELECTOR_TYPE, PARAMETER_CONFLICT,
};
use page_object_compiler::{
    compile_page_object, compile_page_object_value, CompilerConfig, DefaultCatalog,
    MessageCatalog, SelectorKind, TypeRegistry,
};

const LOGIN_PAGE: &str = r#"
{
  "root": true,
  "selector": {"css": "app-login"},
  "shadow": {
    "elements": [
      {
        "name": "form",
        "nullable": true,
        "selector": {"css": "form[data-tenant='%s']", "args": [{"name": "tenant", "type": "string"}]},
        "elements": [
          {
            "name": "field",
            "public": true,
            "type": "utam-auth/pageObjects/inputField",
            "selector": {"css": "input-field:nth-of-type(%d)", "args": [{"name": "index", "type": "number"}]}
          },
          {
            "name": "buttons",
            "public": true,
            "type": "utam-auth/pageObjects/controls/button",
            "selector": {"css": "button", "returnAll": true},
            "filter": {
              "apply": "getText",
              "matcher": {"type": "stringContains", "args": [{"name": "label", "type": "string"}]},
              "findFirst": true
            }
          }
        ]
      }
    ]
  },
  "elements": [
    {"name": "banner", "selector": {"classchain": "**/XCUIElementTypeStaticText"}},
    {"name": "links", "public": true, "selector": {"css": "a", "returnAll": true}}
  ]
}
"#;

#[test]
fn compiles_nested_page_object() {
    let registry = TypeRegistry::new();
    let out = compile_page_object(LOGIN_PAGE, &registry).unwrap();

    assert!(out.is_success(), "{:?}", out.diagnostics);
    assert_eq!(out.root_locator.as_ref().map(|l| l.kind), Some(SelectorKind::Css));

    let names: Vec<_> = out.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["getBannerElement", "getLinks", "getFormElement", "getField", "getButtons"]
    );

    let form = out.method("getFormElement").unwrap();
    assert_eq!(form.body_lines[0], "BasicElement root = this.getRootElement().expandShadowRoot()");

    let field = out.method("getField").unwrap();
    assert_eq!(field.signature(), "InputField getField(String tenant, Integer index)");
    assert_eq!(field.body_lines[0], "BasicElement form = this.getFormElement(tenant).nullable()");
    assert_eq!(
        field.body_lines[1],
        r#"return custom(form, LocatorBy.byCss(String.format("input-field:nth-of-type(%d)", index))).build(InputField.class)"#
    );
    assert_eq!(
        field.return_type.import_path,
        "utam.auth.pageobjects.InputField"
    );

    let buttons = out.method("getButtons").unwrap();
    assert_eq!(buttons.signature(), "Button getButtons(String tenant, String label)");
    assert_eq!(
        buttons.return_type.import_path,
        "utam.auth.pageobjects.controls.Button"
    );

    let links = out.method("getLinks").unwrap();
    assert_eq!(links.signature(), "List<BasicElement> getLinks()");
}

#[test]
fn failing_element_does_not_stop_siblings() {
    let registry = TypeRegistry::new();
    let page = json!({
        "elements": [
            {"name": "first", "selector": {}},
            {"name": "second", "selector": {"css": "a", "accessid": "b"}},
            {"name": "third", "selector": {"css": "c"}}
        ]
    });
    let out = compile_page_object_value(&page, &registry).unwrap();
    assert!(!out.is_success());
    assert_eq!(out.methods.len(), 1);
    assert_eq!(out.methods[0].name, "getThirdElement");

    let codes: Vec<_> = out
        .diagnostics
        .iter()
        .map(|d| (d.element.as_str(), d.code))
        .collect();
    assert_eq!(
        codes,
        vec![("first", NO_SELECTOR_TYPE), ("second", EXCLUSIVE_SELECTOR_TYPES)]
    );
}

#[test]
fn failing_parent_skips_its_children() {
    let registry = TypeRegistry::new();
    let page = json!({
        "elements": [
            {
                "name": "panel",
                "selector": {"css": ""},
                "elements": [{"name": "child", "selector": {"css": "x"}}]
            },
            {"name": "other", "selector": {"css": "y"}}
        ]
    });
    let out = compile_page_object_value(&page, &registry).unwrap();
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].element, "panel");
    let names: Vec<_> = out.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["getOtherElement"]);
}

#[test]
fn duplicate_element_names_are_reported() {
    let registry = TypeRegistry::new();
    let page = json!({
        "elements": [
            {"name": "item", "selector": {"css": "a"}},
            {"name": "box", "selector": {"css": "b"}, "elements": [
                {"name": "item", "selector": {"css": "c"}}
            ]}
        ]
    });
    let out = compile_page_object_value(&page, &registry).unwrap();
    assert_eq!(out.methods.len(), 2);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].code, DUPLICATE_ELEMENT);
    assert_eq!(
        out.diagnostics[0].args,
        vec!["page object", "item", "getItemElement"]
    );
}

#[test]
fn colliding_accessor_names_are_reported() {
    let registry = TypeRegistry::new();
    let page = json!({
        "elements": [
            {"name": "foo", "selector": {"css": "a"}},
            {"name": "fooElement", "public": true, "selector": {"css": "b"}},
            {"name": "root", "selector": {"css": "c"}}
        ]
    });
    let out = compile_page_object_value(&page, &registry).unwrap();
    assert_eq!(out.methods.len(), 1);
    assert!(out.method("getFooElement").is_some());
    let reported: Vec<_> = out
        .diagnostics
        .iter()
        .map(|d| (d.code, d.args.clone()))
        .collect();
    assert_eq!(
        reported,
        vec![
            (
                DUPLICATE_ELEMENT,
                vec![
                    "page object".to_string(),
                    "fooElement".to_string(),
                    "getFooElement".to_string(),
                ],
            ),
            (
                DUPLICATE_ELEMENT,
                vec![
                    "page object".to_string(),
                    "root".to_string(),
                    "getRootElement".to_string(),
                ],
            ),
        ]
    );
}

#[test]
fn conflicts_across_scope_levels_are_detected() {
    let registry = TypeRegistry::new();
    let page = json!({
        "elements": [
            {
                "name": "outer",
                "selector": {"css": "div[id='%s']", "args": [{"name": "id", "type": "string"}]},
                "elements": [
                    {
                        "name": "middle",
                        "selector": {"css": "section"},
                        "elements": [
                            {
                                "name": "inner",
                                "selector": {"css": "li:nth-child(%d)", "args": [{"name": "id", "type": "number"}]}
                            }
                        ]
                    }
                ]
            }
        ]
    });
    let out = compile_page_object_value(&page, &registry).unwrap();
    assert_eq!(out.methods.len(), 2);
    let middle = out.method("getMiddleElement").unwrap();
    assert_eq!(middle.signature(), "BasicElement getMiddleElement(String id)");

    assert_eq!(out.diagnostics.len(), 1);
    let diagnostic = &out.diagnostics[0];
    assert_eq!(diagnostic.element, "inner");
    assert_eq!(diagnostic.code, PARAMETER_CONFLICT);
    assert_eq!(
        DefaultCatalog::new().render(&diagnostic.error()),
        "method 'getInnerElement': parameter \"id\" is already declared with type String, cannot redeclare it with type Integer"
    );
}

#[test]
fn package_mapping_shapes_imports() {
    let config = CompilerConfig::from_json_str(
        r#"{"packageMapping": {"utam-auth": "com.example.auth"}}"#,
    )
    .unwrap();
    let registry = TypeRegistry::from_config(&config).unwrap();
    let out = compile_page_object(LOGIN_PAGE, &registry).unwrap();
    let field = out.method("getField").unwrap();
    assert_eq!(field.return_type.import_path, "com.example.auth.InputField");
}

#[test]
fn pages_compile_independently_across_threads() {
    let registry = TypeRegistry::new();
    let sequential = compile_page_object(LOGIN_PAGE, &registry).unwrap();
    let results: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| compile_page_object(LOGIN_PAGE, &registry).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for result in results {
        assert_eq!(result, sequential);
    }
}
