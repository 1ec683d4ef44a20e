use lathe_refactor::RefactoringId;

use super::{check, check_not_offered, check_semantic, offered_ids};

#[test]
fn expand_auto_property() {
    let fixture = r#"
class C
{
    public int /*caret*/Value { get; set; }
}
"#;
    let expected = r#"
class C
{
    private int _value;
    public int Value
    {
        get { return _value; }
        set { _value = value; }
    }
}
"#;
    check(RefactoringId::ExpandProperty, fixture, expected);
}

#[test]
fn expand_moves_the_initializer_to_the_field() {
    let fixture = r#"
class C
{
    public int /*caret*/Value { get; set; } = 5;
}
"#;
    let expected = r#"
class C
{
    private int _value = 5;
    public int Value
    {
        get { return _value; }
        set { _value = value; }
    }
}
"#;
    check(RefactoringId::ExpandProperty, fixture, expected);
}

#[test]
fn expand_getter_only_property_redirects_assignments() {
    let fixture = r#"
class C
{
    public C()
    {
        Value = 1;
    }

    public int /*caret*/Value { get; }
}
"#;
    let expected = r#"
class C
{
    public C()
    {
        _value = 1;
    }

    private readonly int _value;
    public int Value
    {
        get { return _value; }
    }
}
"#;
    check_semantic(RefactoringId::ExpandProperty, fixture, expected);
}

#[test]
fn expand_getter_only_property_needs_a_model() {
    let fixture = r#"
class C
{
    public int /*caret*/Value { get; }
}
"#;
    assert!(!offered_ids(fixture, false).contains(&RefactoringId::ExpandProperty));
}

#[test]
fn expand_skips_interface_properties() {
    let fixture = r#"
interface I
{
    int /*caret*/Value { get; set; }
}
"#;
    check_not_offered(RefactoringId::ExpandProperty, fixture);
}

#[test]
fn convert_full_property_to_auto_property() {
    let fixture = r#"
class C
{
    private int _value;
    public int /*caret*/Value
    {
        get { return _value; }
        set { _value = value; }
    }

    int Twice() => _value * 2;
}
"#;
    let expected = r#"
class C
{
    public int Value { get; set; }

    int Twice() => Value * 2;
}
"#;
    check_semantic(RefactoringId::ConvertToAutoProperty, fixture, expected);
}

#[test]
fn convert_keeps_the_field_initializer() {
    let fixture = r#"
class C
{
    private readonly string name = "n";
    public string /*caret*/Name => name;
}
"#;
    let expected = r#"
class C
{
    public string Name { get; } = "n";
}
"#;
    check_semantic(RefactoringId::ConvertToAutoProperty, fixture, expected);
}

#[test]
fn convert_skips_public_fields() {
    let fixture = r#"
class C
{
    public int value;
    public int /*caret*/Value
    {
        get { return value; }
    }
}
"#;
    check_not_offered(RefactoringId::ConvertToAutoProperty, fixture);
}

#[test]
fn convert_skips_getters_with_logic() {
    let fixture = r#"
class C
{
    private int _value;
    public int /*caret*/Value
    {
        get { return _value + 1; }
        set { _value = value; }
    }
}
"#;
    check_not_offered(RefactoringId::ConvertToAutoProperty, fixture);
}
