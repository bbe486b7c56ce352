//! Pipeline performance benchmarks.
//!
//! Measures parsing, cleaning and KPI aggregation across table sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use salesboard::input::Parser;
use salesboard::mapping::{apply, detect};
use salesboard::{CanonicalTable, DataCleaner, KpiCalculator, ProductMetric, SalesBoard, SchemaRegistry};
use std::io::Write;
use tempfile::NamedTempFile;

const COUNTRIES: [&str; 4] = ["United Kingdom", "France", "Germany", "Spain"];

/// Generate synthetic transactions with a few duplicates, returns and bad prices.
fn generate_csv_data(rows: usize) -> String {
    let mut data =
        String::from("InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n");

    for row in 0..rows {
        let invoice = if row % 50 == 0 {
            format!("C{}", 500_000 + row / 3)
        } else {
            format!("{}", 500_000 + row / 3)
        };
        let quantity = match row % 37 {
            0 => String::new(),
            1 => "-2".to_string(),
            _ => format!("{}", row % 24 + 1),
        };
        let price = if row % 41 == 0 {
            "n/a".to_string()
        } else {
            format!("{:.2}", (row % 17) as f64 * 0.75 + 0.5)
        };
        data.push_str(&format!(
            "{},SKU{:04},Product {},{},2011-{:02}-{:02} {:02}:15:00,{},{},{}\n",
            invoice,
            row % 300,
            row % 300,
            quantity,
            row % 12 + 1,
            row % 28 + 1,
            row % 24,
            price,
            if row % 9 == 0 { String::new() } else { format!("{}", 12_000 + row % 400) },
            COUNTRIES[row % COUNTRIES.len()],
        ));
    }

    data
}

fn mapped_table(data: &str) -> CanonicalTable {
    let raw = Parser::new().parse_str(data).unwrap();
    let registry = SchemaRegistry::canonical();
    apply(&detect(raw.headers(), registry), &raw, registry).unwrap()
}

/// Benchmark the full pipeline from file to KPIs.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| black_box(SalesBoard::new().run_file(temp.path()).unwrap()),
            )
        });
    }

    group.finish();
}

/// Benchmark cleaning alone.
fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean");

    for rows in [1_000, 10_000].iter() {
        let table = mapped_table(&generate_csv_data(*rows));
        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter_with_setup(
                || DataCleaner::new(table.clone()).unwrap(),
                |mut cleaner| black_box(cleaner.clean().row_count()),
            )
        });
    }

    group.finish();
}

/// Benchmark KPI aggregation on a cleaned table.
fn bench_kpis(c: &mut Criterion) {
    let mut group = c.benchmark_group("kpi_summary");

    for rows in [1_000, 10_000].iter() {
        let mut cleaner = DataCleaner::new(mapped_table(&generate_csv_data(*rows))).unwrap();
        let table = cleaner.clean().clone();
        group.throughput(Throughput::Elements(table.row_count() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(KpiCalculator::new(table).summary(10, ProductMetric::Revenue)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_clean, bench_kpis);
criterion_main!(benches);
