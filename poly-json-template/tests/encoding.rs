//! The reserved placeholder encoding and serde support.

use poly_json_template::{
    POLY_ARG_NAME_KEY, Placeholder, QUOTED_KEY, TemplateErrorKind, TemplateValue, parse,
};
use poly_json_template_testhelpers::IPanic;
use serde_json::json;

#[test]
fn parsed_trees_encode_placeholders_as_objects() -> Result<(), IPanic> {
    poly_json_template_testhelpers::setup();

    let tree = parse(r#"{"name": {{name}}, "lastName": "{{userLastName}}", "n": 1}"#)?;
    assert_eq!(
        tree.to_encoded(),
        json!({
            "name": {"$polyArgName": "name", "quoted": false},
            "lastName": {"$polyArgName": "userLastName", "quoted": true},
            "n": 1
        })
    );
    assert_eq!(TemplateValue::from_encoded(tree.to_encoded()), tree);
    Ok(())
}

#[test]
fn only_the_exact_shape_is_a_placeholder() {
    poly_json_template_testhelpers::setup();

    let cases = [
        json!({POLY_ARG_NAME_KEY: "id"}),
        json!({POLY_ARG_NAME_KEY: "id", QUOTED_KEY: "yes"}),
        json!({POLY_ARG_NAME_KEY: 1, QUOTED_KEY: true}),
        json!({POLY_ARG_NAME_KEY: "id", QUOTED_KEY: true, "extra": 1}),
        json!({POLY_ARG_NAME_KEY: "", QUOTED_KEY: true}),
        json!({POLY_ARG_NAME_KEY: "a{b", QUOTED_KEY: false}),
    ];
    for case in cases {
        let tree = TemplateValue::from_encoded(case.clone());
        assert!(!tree.is_placeholder(), "{case}");
        assert_eq!(tree, TemplateValue::from(case));
    }

    let tree = TemplateValue::from_encoded(json!({QUOTED_KEY: true, POLY_ARG_NAME_KEY: "id"}));
    assert_eq!(tree.as_placeholder(), Placeholder::quoted("id").ok().as_ref());
}

#[test]
fn serde_round_trip() -> Result<(), IPanic> {
    poly_json_template_testhelpers::setup();

    let tree = parse(r#"[{{a}}, {"b": "{{b}}", "c": [true, null, 2.5, "s"]}]"#)?;
    let text = serde_json::to_string(&tree)?;
    assert_eq!(
        text,
        r#"[{"$polyArgName":"a","quoted":false},{"b":{"$polyArgName":"b","quoted":true},"c":[true,null,2.5,"s"]}]"#
    );
    let back: TemplateValue = serde_json::from_str(&text)?;
    assert_eq!(back, tree);
    Ok(())
}

#[test]
fn bad_encoded_text() {
    poly_json_template_testhelpers::setup();

    let err = TemplateValue::from_encoded_str("{nope").unwrap_err();
    assert!(matches!(err.kind, TemplateErrorKind::InvalidEncoding { .. }));
    assert!(!err.is_malformed());
}

#[test]
fn placeholder_names_are_checked() {
    poly_json_template_testhelpers::setup();

    for name in ["", "a{b", "a}b", " padded", "padded\n"] {
        let err = Placeholder::bare(name).unwrap_err();
        assert_eq!(
            err.kind,
            TemplateErrorKind::InvalidPlaceholderName { name: name.into() }
        );
    }
    let placeholder = Placeholder::quoted("user id").unwrap();
    assert_eq!(placeholder.name(), "user id");
    assert!(placeholder.is_quoted());
}
