//! Conversion behavior through the public API.

use std::sync::Arc;

use metaflat_cli::core::FlattenError;
use metaflat_cli::templates::{TemplateTree, builtin_templates};
use metaflat_cli::test_utils::{bracket_converter, init_test_logging};
use metaflat_cli::value::{TypeName, Value};
use metaflat_cli::walker::Converter;

fn json(text: &str) -> Value {
    Value::from_json_str(text).unwrap()
}

#[test]
fn test_map_first_and_last_lines() {
    init_test_logging(None);
    let lines = bracket_converter()
        .convert(&json(r#"{"width": 512, "bands": [{"min": 0}], "nodata": null}"#))
        .unwrap();

    assert_eq!(lines.first().map(String::as_str), Some("{\n"));
    assert_eq!(lines.last().map(String::as_str), Some("}\n"));
    assert_eq!(
        lines,
        ["{\n", "width=512;\n", "[\n", "{\n", "min=0;\n", "}\n", "]\n", "nodata=null;\n", "}\n"]
    );
}

#[test]
fn test_empty_root_containers() {
    let converter = bracket_converter();
    assert_eq!(converter.convert(&Value::Map(Default::default())).unwrap().len(), 2);
    assert_eq!(converter.convert(&Value::List(Vec::new())).unwrap().len(), 2);
}

#[test]
fn test_yaml_and_json_inputs_render_identically() {
    let converter = bracket_converter();
    let from_json = converter
        .convert_to_string(&json(r#"{"name": "dem.tif", "tags": ["a", "b"], "scale": 1.0}"#))
        .unwrap();
    let from_yaml = converter
        .convert_to_string(&Value::from_yaml_str("name: dem.tif\ntags: [a, b]\nscale: 1.0\n").unwrap())
        .unwrap();
    assert_eq!(from_json, from_yaml);
    assert!(from_json.contains("scale=1.0;\n"));
}

#[test]
fn test_builtin_templates_end_to_end() {
    let converter = Converter::new(Arc::new(builtin_templates().unwrap()));
    let out = converter
        .convert_to_string(&json(r#"{"size": 4, "meta": {"ok": true}, "tags": ["x"]}"#))
        .unwrap();
    assert_eq!(
        out,
        "{\nsize = 4\nmeta {\nok = true\n}\ntags [\n0 = \"x\"\n]\n}\n"
    );
}

#[test]
fn test_separator_templates_join_siblings() {
    let templates = TemplateTree::build([
        ("in_list", "["),
        ("out_list", "]"),
        ("*.in_dict", "{"),
        ("*.out_dict", "}"),
        ("*.*.in_*", "{name}:{value}"),
        ("*.*.*next_in_*", ","),
        ("*.*next_in_dict", ", "),
    ])
    .unwrap();
    let converter = Converter::new(Arc::new(templates));

    let out = converter
        .convert_to_string(&json(r#"[{"a": 1, "b": "x"}, {"c": null}]"#))
        .unwrap();
    assert_eq!(out, "[{a:1,b:x}, {c:null}]");
}

#[test]
fn test_errors_abort_without_output() {
    let converter = bracket_converter().with_max_depth(1);

    let err = converter.convert(&json(r#"{"a": {"b": {}}}"#)).unwrap_err();
    assert!(matches!(err, FlattenError::DepthLimitExceeded { limit: 1, .. }));

    let err = converter.convert(&Value::from("scalar")).unwrap_err();
    assert_eq!(err, FlattenError::UnsupportedRootKind { kind: TypeName::Str });
}

#[test]
fn test_converter_is_shareable_across_threads() {
    let converter = bracket_converter();
    let input = json(r#"{"a": [1, 2, 3], "b": {"c": "d"}}"#);
    let expected = converter.convert(&input).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| converter.convert(&input).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
