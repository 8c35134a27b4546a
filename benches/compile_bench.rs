//! Benchmarks for horizon parse and compile.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use horizon::core::config::Settings;
use horizon::core::job::{compile_definition, render_job};
use horizon::core::parser::parse_document;
use horizon::core::translation::TranslationStore;

/// A definition with `schemas` schemas, each holding a mix of field types.
fn definition(schemas: usize) -> String {
    let mut xml = String::from(
        r#"<job version="1.0"><definition languageCode="en-us" contentPackage="bench"/><tasks>"#,
    );
    for s in 0..schemas {
        xml.push_str(&format!(
            r#"<createSchema code="s{s}" name="Schema {s}" desc="Bench schema {s}">
  <createField schemaCode="s{s}" code="title" type="text" name="Title"/>
  <createField schemaCode="s{s}" code="amount" type="number" decimals="2" scale="currencies">
    <usd><brl value="5"/><eur value="0.9"/></usd>
  </createField>
  <createField schemaCode="s{s}" code="owner" type="lookup" name="Owner">
    <dataset code="users" type="dynamic">
      <fields><field code="name" name="Name"/></fields>
      <groups>admins,sales</groups>
    </dataset>
  </createField>
  <createColumn table="s{s}" code="note" type="text"/>
</createSchema>"#
        ));
    }
    xml.push_str("</tasks></job>");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_document");
    for size in [10, 100, 1000] {
        let xml = definition(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| {
                let root = parse_document(black_box(xml)).unwrap();
                black_box(root);
            });
        });
    }
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_definition");
    for size in [10, 100, 1000] {
        let root = parse_document(&definition(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &root, |b, root| {
            b.iter(|| {
                let compiled =
                    compile_definition(black_box(root), TranslationStore::new(), Settings::default())
                        .unwrap();
                black_box(compiled.job.tasks.len());
            });
        });
    }
    group.finish();
}

fn bench_translation_roundtrip(c: &mut Criterion) {
    let root = parse_document(&definition(100)).unwrap();
    let compiled = compile_definition(&root, TranslationStore::new(), Settings::default()).unwrap();
    let table = compiled.translations.render(false).unwrap();

    c.bench_function("translation_reload_and_compile", |b| {
        b.iter(|| {
            let store = TranslationStore::parse(black_box(&table)).unwrap();
            let compiled = compile_definition(&root, store, Settings::default()).unwrap();
            black_box(render_job(&compiled.job).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_compile,
    bench_translation_roundtrip
);
criterion_main!(benches);
