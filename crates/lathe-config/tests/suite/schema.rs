use lathe_config::{json_schema, json_schema_string};

#[test]
fn schema_lists_sections_and_ids() {
    let schema = json_schema();
    let properties = &schema.schema.object.as_ref().unwrap().properties;
    assert!(properties.contains_key("refactorings"));
    assert!(properties.contains_key("logging"));

    let text = json_schema_string().unwrap();
    assert!(text.contains("\"sort-enum-members\""));
    assert!(text.contains("\"fail-fast\""));
}
