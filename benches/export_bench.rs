//! Export performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;
use tempfile::TempDir;
use tokenc::*;

/// Primitive colors and spacing plus a light/dark semantic layer aliasing them
fn generate_snapshot(size: usize) -> VariableSnapshot {
    let mut variables = Vec::with_capacity(size * 3);

    for i in 0..size {
        let shade = i as f64 / size as f64;
        variables.push(
            Variable::new(format!("color-{}", i), format!("Color/Gray/{}", i * 10), ResolvedType::Color, "primitives")
                .with_value("base", RawValue::Color(ColorValue::rgb(shade, shade, shade)))
                .with_description(if i % 2 == 0 { "format: oklch" } else { "" }),
        );
        variables.push(
            Variable::new(format!("space-{}", i), format!("Space/{}", i), ResolvedType::Number, "primitives")
                .with_value("base", RawValue::Number(i as f64 * 4.0))
                .with_description("unit: rem"),
        );
        variables.push(
            Variable::new(format!("surface-{}", i), format!("Surface/Level {}", i), ResolvedType::Color, "semantic")
                .with_value("light", RawValue::alias(format!("color-{}", i)))
                .with_value("dark", RawValue::alias(format!("color-{}", size - 1 - i))),
        );
    }

    VariableSnapshot::new(
        variables,
        vec![
            Collection::new("primitives", "Primitives", vec![Mode::new("base", "Default")]),
            Collection::new(
                "semantic",
                "Semantic",
                vec![Mode::new("light", "Light"), Mode::new("dark", "Dark")],
            ),
        ],
    )
}

fn bench_small_export(c: &mut Criterion) {
    let snapshot = generate_snapshot(10);
    let options = ExportOptions::default();

    c.bench_function("small_css_export", |b| {
        b.iter(|| export(black_box(&snapshot), ExportFormat::Css, black_box(&options)))
    });
}

fn bench_formats(c: &mut Criterion) {
    let snapshot = generate_snapshot(500);
    let options = ExportOptions {
        use_modes_as_selectors: true,
        ..Default::default()
    };

    let mut group = c.benchmark_group("formats");

    for format in ExportFormat::ALL {
        group.bench_with_input(format.to_string(), &format, |b, &format| {
            b.iter(|| export(black_box(&snapshot), format, black_box(&options)))
        });
    }

    group.finish();
}

fn bench_long_alias_chains(c: &mut Criterion) {
    let mut variables = vec![Variable::new("v0", "chain/0", ResolvedType::Number, "c")
        .with_value("m", RawValue::Number(1.0))];
    for i in 1..=MAX_ALIAS_DEPTH {
        variables.push(
            Variable::new(format!("v{}", i), format!("chain/{}", i), ResolvedType::Number, "c")
                .with_value("m", RawValue::alias(format!("v{}", i - 1))),
        );
    }
    let snapshot = VariableSnapshot::new(
        variables,
        vec![Collection::new("c", "Chains", vec![Mode::new("m", "Default")])],
    );
    let options = ExportOptions::default();

    c.bench_function("alias_chain_export", |b| {
        b.iter(|| export(black_box(&snapshot), ExportFormat::Json, black_box(&options)))
    });
}

fn bench_file_export(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("variables.json");
    let output_path = temp_dir.path().join("tokens.css");

    let content = serde_json::to_string(&generate_snapshot(200)).unwrap();
    fs::write(&input_path, content).unwrap();

    c.bench_function("file_export", |b| {
        b.iter(|| {
            export_file(
                black_box(input_path.to_str().unwrap()),
                black_box(output_path.to_str().unwrap()),
                ExportFormat::Css,
            )
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_small_export,
    bench_formats,
    bench_long_alias_chains,
    bench_file_export
);

criterion_main!(benches);
