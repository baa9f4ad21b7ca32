//! Benchmarks pour l'extraction d'une grille TFU

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grille_tfu::{extract, CellValue, ExtractOptions, Grid};

/// Grille synthétique: `departments` × 10 communes × 5 arrondissements, 6 catégories
fn synthetic_grid(departments: usize) -> Grid {
    let categories = 6;
    let mut header = vec![CellValue::from("DEPARTEMENTS"), "COMMUNES".into(), "Arrondissements".into()];
    let mut sub_header = vec![CellValue::Empty; 3];
    for k in 0..categories {
        header.push(CellValue::Text(format!("Bâtiments type {}", k + 1)));
        header.push(CellValue::Empty);
        sub_header.push(CellValue::Text(format!("Catégorie {}", k + 1)));
        sub_header.push(CellValue::Empty);
    }

    let mut rows = vec![header, sub_header];
    for d in 0..departments {
        for c in 0..10 {
            for a in 0..5 {
                let mut row = vec![
                    if c == 0 && a == 0 {
                        CellValue::Text(format!("DEPT {}", d))
                    } else {
                        CellValue::Empty
                    },
                    if a == 0 {
                        CellValue::Text(format!("COMMUNE {}-{}", d, c))
                    } else {
                        CellValue::Empty
                    },
                    CellValue::Text(format!("Arrondissement {}", a)),
                ];
                for k in 0..categories {
                    row.push(CellValue::Number(100.0 + k as f64));
                    row.push(CellValue::Text(format!("{}", 3000 + k)));
                }
                rows.push(row);
            }
        }
    }

    Grid::new(rows)
}

fn bench_extract(c: &mut Criterion) {
    let options = ExtractOptions::default();
    let mut group = c.benchmark_group("extract");

    for departments in [12, 120] {
        let grid = synthetic_grid(departments);
        group.throughput(Throughput::Elements(grid.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(departments), &grid, |b, grid| {
            b.iter(|| {
                let result = extract(black_box(grid), "bench.xlsx", &options).unwrap();
                black_box(result)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
