use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use lathe_refactor::{
    compute_refactorings, CancellationToken, Document, FileId, RefactoringId, RefactoringsConfig, TextSpan,
};
use lathe_semantic::LocalSemanticModelProvider;

fn fixture() -> String {
    let mut out = String::from("class Item { }\n\nclass Fixture\n{\n");
    for i in 0..200u32 {
        out.push_str(&format!("    int Value{i}(int a, int b)\n    {{\n"));
        out.push_str("        var item = new Item();\n");
        out.push_str("        if (a == b) { return a; } else { return b; }\n");
        out.push_str("    }\n\n");
    }
    out.push_str("}\n");
    out
}

fn bench_refactorings(c: &mut Criterion) {
    let mut group = c.benchmark_group("refactor");
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(20);

    let source = fixture();
    let document = Document::new(FileId::new("Fixture.cs"), source.as_str())
        .with_semantics(Arc::new(LocalSemanticModelProvider));
    let config = RefactoringsConfig::fail_fast();
    // The last method, so lookups walk the whole file.
    let offset = source.rfind("if (a == b)").expect("fixture must contain an if statement");
    let caret = TextSpan::at(offset);

    group.bench_function("compute_at_if", |b| {
        let actions = compute_refactorings(&document, caret, &config, &CancellationToken::new())
            .expect("computing refactorings must succeed");
        assert!(
            actions.iter().any(|a| a.id == RefactoringId::InvertIf),
            "fixture should offer invert-if"
        );
        b.iter(|| {
            black_box(
                compute_refactorings(black_box(&document), caret, &config, &CancellationToken::new())
                    .expect("computing refactorings must succeed"),
            )
        });
    });

    group.bench_function("apply_invert_if", |b| {
        b.iter_batched(
            || {
                compute_refactorings(&document, caret, &config, &CancellationToken::new())
                    .expect("computing refactorings must succeed")
                    .into_iter()
                    .find(|a| a.id == RefactoringId::InvertIf)
                    .expect("fixture should offer invert-if")
            },
            |action| black_box(action.apply(&CancellationToken::new()).expect("invert-if must apply")),
            BatchSize::SmallInput,
        );
    });

    let declaration = source.rfind("var item").expect("fixture must contain a local");
    let on_var = TextSpan::at(declaration + 1);
    group.bench_function("semantic_use_explicit_type", |b| {
        b.iter(|| {
            black_box(
                compute_refactorings(black_box(&document), on_var, &config, &CancellationToken::new())
                    .expect("computing refactorings must succeed"),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_refactorings);
criterion_main!(benches);
