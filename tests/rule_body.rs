//! End-to-end coverage of the public rule-body API.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use insight_rules::{
    Filter, LogFormat, RuleBody, RuleBodyError, RuleBodyProps, Statistic,
};

fn render_to_value(body: &RuleBody) -> Value {
    serde_json::from_str(&body.render().unwrap()).unwrap()
}

/// Walks a rendered body asserting no null placeholders were emitted.
fn assert_no_nulls(value: &Value) {
    match value {
        Value::Null => panic!("rendered body contains a null placeholder"),
        Value::Array(items) => items.iter().for_each(assert_no_nulls),
        Value::Object(map) => map.values().for_each(assert_no_nulls),
        _ => {}
    }
}

#[test]
fn minimal_description_gets_full_defaults() {
    let props = RuleBodyProps {
        contribution_keys: vec!["k".to_string()],
        ..RuleBodyProps::new(["g"])
    };

    let rendered = render_to_value(&RuleBody::from_props(&props).unwrap());

    assert_eq!(
        rendered,
        json!({
            "Schema": {"Name": "CloudWatchLogRule", "Version": 1},
            "LogGroupNames": ["g"],
            "LogFormat": "JSON",
            "Contribution": {"Keys": ["k"], "Filters": []},
            "AggregateOn": "Count"
        })
    );
}

#[test]
fn clf_description_renders_fields_object() {
    let props = RuleBodyProps {
        contribution_keys: vec!["1".to_string()],
        field_aliases: Some(BTreeMap::from([
            ("1".to_string(), "clientIp".to_string()),
            ("4".to_string(), "httpStatus".to_string()),
        ])),
        ..RuleBodyProps::new(["web-server-logs"])
    };

    let rendered = render_to_value(&RuleBody::from_props(&props).unwrap());

    assert_eq!(rendered["LogFormat"], "CLF");
    assert_eq!(
        rendered["Fields"],
        json!({"1": "clientIp", "4": "httpStatus"})
    );
}

#[test]
fn unset_optionals_are_absent_not_null() {
    let props = RuleBodyProps {
        contribution_keys: vec!["k".to_string()],
        contribution_filters: Some(vec![
            Filter::on("path").starts_with(["/api"]).unwrap().build().unwrap(),
        ]),
        ..RuleBodyProps::new(["g"])
    };

    let rendered = render_to_value(&RuleBody::from_props(&props).unwrap());

    assert_no_nulls(&rendered);
    assert!(rendered.get("Fields").is_none());
    assert!(rendered["Contribution"].get("ValueOf").is_none());
    let filter = &rendered["Contribution"]["Filters"][0];
    assert!(filter.get("IgnoreCase").is_none());
    assert!(filter.get("Statistic").is_none());
}

#[test]
fn filters_carry_annotations_and_operands() {
    let filters = vec![
        Filter::on("httpMethod")
            .is_in(["put", "post"])
            .unwrap()
            .ignore_case(true)
            .build()
            .unwrap(),
        Filter::on("bytesTransferred")
            .greater_than(0.0)
            .statistic(Statistic::Sum)
            .build()
            .unwrap(),
    ];

    let props = RuleBodyProps {
        contribution_keys: vec!["clientIp".to_string()],
        contribution_filters: Some(filters),
        ..RuleBodyProps::new(["api-gateway-logs"])
    };

    let rendered = render_to_value(&RuleBody::from_props(&props).unwrap());

    assert_eq!(
        rendered["Contribution"]["Filters"],
        json!([
            {"Match": "httpMethod", "In": ["put", "post"], "IgnoreCase": true},
            {"Match": "bytesTransferred", "GreaterThan": 0.0, "Statistic": "SUM"}
        ])
    );
}

#[test]
fn from_file_matches_from_props() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("body.json");
    std::fs::write(
        &path,
        r#"{
            "logSources": ["api-gateway-logs"],
            "contributionKeys": ["clientIp"],
            "valueField": "bytesTransferred",
            "contributionFilters": [
                {"matchField": "httpMethod", "operation": "IN", "operand": ["PUT"]}
            ]
        }"#,
    )
    .unwrap();

    let from_file = render_to_value(&RuleBody::from_file(&path).unwrap());

    let props = RuleBodyProps {
        contribution_keys: vec!["clientIp".to_string()],
        value_field: Some("bytesTransferred".to_string()),
        contribution_filters: Some(vec![
            Filter::on("httpMethod").is_in(["PUT"]).unwrap().build().unwrap(),
        ]),
        ..RuleBodyProps::new(["api-gateway-logs"])
    };
    let from_props = render_to_value(&RuleBody::from_props(&props).unwrap());

    assert_eq!(from_file, from_props);
    assert_eq!(from_file["AggregateOn"], "Sum");
}

#[test]
fn explicit_format_and_aggregation_are_respected() {
    let props = RuleBodyProps {
        log_format: Some(LogFormat::Json),
        aggregation: Some(insight_rules::Aggregation::Count),
        value_field: Some("bytes".to_string()),
        ..RuleBodyProps::new(["g"])
    };

    let rendered = render_to_value(&RuleBody::from_props(&props).unwrap());

    // value_field set but aggregation explicitly Count: no inference overrides it
    assert_eq!(rendered["AggregateOn"], "Count");
    assert_eq!(rendered["Contribution"]["ValueOf"], "bytes");
}

#[test]
fn oversized_key_and_filter_lists_are_rejected() {
    let mut props = RuleBodyProps::new(["g"]);
    props.contribution_keys = (0..5).map(|i| format!("k{i}")).collect();
    assert!(matches!(
        RuleBody::from_props(&props).unwrap_err(),
        RuleBodyError::SchemaValidation { .. }
    ));

    let mut props = RuleBodyProps::new(["g"]);
    props.contribution_filters = Some(
        (0..5)
            .map(|i| {
                Filter::on(format!("f{i}"))
                    .is_present(true)
                    .build()
                    .unwrap()
            })
            .collect(),
    );
    assert!(matches!(
        RuleBody::from_props(&props).unwrap_err(),
        RuleBodyError::SchemaValidation { .. }
    ));
}

#[test]
fn custom_bodies_pass_through_unmodified() {
    let unmodeled = json!({
        "Schema": {"Name": "CloudWatchLogRule", "Version": 2},
        "Unrecognized": {"Nested": [1, 2, 3]}
    });

    let rendered = render_to_value(&RuleBody::custom(unmodeled.clone()));
    assert_eq!(rendered, unmodeled);

    let raw = "{\"Free\": \"form\"}";
    assert_eq!(RuleBody::custom_str(raw).render().unwrap(), raw);
}
