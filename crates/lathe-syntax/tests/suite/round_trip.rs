use pretty_assertions::assert_eq;

use lathe_syntax::parse;

const SAMPLES: &[&str] = &[
    "",
    "using System;\nusing System.Collections.Generic;\n",
    "namespace App.Core\n{\n    public sealed class Box<T> : IBox<T>, IDisposable\n    {\n        private readonly List<T> _items = new List<T>();\n    }\n}\n",
    "class C {\n    /// <summary>Docs</summary>\n    public int Count { get; private set; } = 0;\n    public string Name => _name ?? \"\";\n}\n",
    "class C { void M() { for (int i = 0, j = 10; i < j; i++, j--) { x += i >> 1; } } }",
    "class C { void M() { do { x++; } while (x < 10); } }",
    "class C { void M() { var s = $\"{a,5:N2} and {{braces}} {b}\"; var v = @\"C:\\path\"\"\"; } }",
    "class C { int M(object o) => o is string ? 1 : -1; string N(object o) => o as string ?? \"\"; }",
    "enum Color : byte { Red = 1, Green = 1 << 1, Blue, }",
    "class C {\r\n#if DEBUG\r\n    void M() { }\r\n#endif\r\n}\r\n",
    "class C { void M() { switch (x) { case 1: case 2: { break; } default: return; } } }",
    "class C { void M() { try { F(); } catch (IOException e) when (e.HResult > 0) { throw; } finally { G(); } } }",
    "class C { void M() { Func<int, int> f = (a) => a * 2; Action g = () => { }; var arr = new int[] { 1, 2 }; } }",
    "class C { C(int a) : base(a) { } public static explicit operator",
    "class C { void M() { if (a) { /* unterminated",
];

#[test]
fn every_sample_round_trips() {
    for sample in SAMPLES {
        let parsed = parse(sample);
        assert_eq!(parsed.syntax().to_string(), *sample, "lossless parse of {sample:?}");
    }
}

#[test]
fn well_formed_samples_have_no_errors() {
    for sample in &SAMPLES[..13] {
        let parsed = parse(sample);
        assert!(
            parsed.errors.is_empty(),
            "unexpected errors for {sample:?}: {:?}",
            parsed.errors
        );
    }
}
