use lathe_core::TextSpan;

const CARET: &str = "/*caret*/";
const START: &str = "/*start*/";
const END: &str = "/*end*/";

/// Strips a `/*caret*/` marker; the span is empty at the marker's position.
pub fn extract_caret(fixture: &str) -> (String, TextSpan) {
    let offset = fixture
        .find(CARET)
        .expect("fixture missing /*caret*/ marker");
    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..offset]);
    text.push_str(&fixture[offset + CARET.len()..]);
    (text, TextSpan::at(offset))
}

/// Strips `/*start*/` and `/*end*/` markers; the span covers the text between them.
pub fn extract_range(fixture: &str) -> (String, TextSpan) {
    let start = fixture
        .find(START)
        .expect("fixture missing /*start*/ marker");
    let after_start = start + START.len();
    let end = fixture.find(END).expect("fixture missing /*end*/ marker");
    assert!(end >= after_start, "/*end*/ must come after /*start*/");

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..start]);
    text.push_str(&fixture[after_start..end]);
    text.push_str(&fixture[end + END.len()..]);

    // The start stays put; the end shifts left by the start marker.
    (text, TextSpan::new(start, end - START.len()))
}

/// Either marker style, whichever the fixture uses.
pub fn extract_selection(fixture: &str) -> (String, TextSpan) {
    if fixture.contains(CARET) {
        extract_caret(fixture)
    } else {
        extract_range(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret() {
        let (text, span) = extract_caret("a /*caret*/b");
        assert_eq!(text, "a b");
        assert_eq!(span, TextSpan::at(2));
    }

    #[test]
    fn range() {
        let (text, span) = extract_range("x = /*start*/a + b/*end*/;");
        assert_eq!(text, "x = a + b;");
        assert_eq!(&text[span.as_range()], "a + b");
    }
}
