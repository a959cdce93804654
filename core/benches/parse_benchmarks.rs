use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use tabprep::{
    FormatHint, ParseConfig, Row, parse_auto, parse_csv_with_limit, parse_xlsx, rows_to_xlsx,
};

const MAX_BENCH_TIME_SECS: u64 = 15;
const WARMUP_SECS: u64 = 2;
const SAMPLE_SIZE: usize = 20;
const COLUMNS: usize = 12;

fn column_names() -> Vec<String> {
    (0..COLUMNS).map(|c| format!("Column {c}")).collect()
}

fn synthetic_csv(nrows: usize) -> String {
    let mut text = column_names().join(",");
    text.push('\n');
    for r in 0..nrows {
        let line: Vec<String> = (0..COLUMNS)
            .map(|c| match c % 3 {
                0 => format!("value-{r}-{c}"),
                1 => format!("\"quoted, {r}\""),
                _ => (r * COLUMNS + c).to_string(),
            })
            .collect();
        text.push_str(&line.join(","));
        text.push('\n');
    }
    text
}

fn synthetic_xlsx(nrows: usize) -> Vec<u8> {
    let columns = column_names();
    let rows: Vec<Row> = (0..nrows)
        .map(|r| {
            columns
                .iter()
                .enumerate()
                .map(|(c, name)| (name.clone(), format!("cell {r}:{c}")))
                .collect()
        })
        .collect();
    rows_to_xlsx(&columns, &rows).expect("synthetic workbook should be written")
}

fn bench_csv_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parse");
    group.measurement_time(Duration::from_secs(MAX_BENCH_TIME_SECS));
    group.warm_up_time(Duration::from_secs(WARMUP_SECS));
    group.sample_size(SAMPLE_SIZE);

    for size in [100usize, 1000, 10_000].iter() {
        let text = synthetic_csv(*size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", size), size, |b, _| {
            b.iter(|| parse_csv_with_limit(black_box(&text), None));
        });
    }
    group.finish();
}

fn bench_xlsx_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("xlsx_parse");
    group.measurement_time(Duration::from_secs(MAX_BENCH_TIME_SECS));
    group.warm_up_time(Duration::from_secs(WARMUP_SECS));
    group.sample_size(SAMPLE_SIZE);

    for size in [100usize, 1000, 10_000].iter() {
        let bytes = synthetic_xlsx(*size);
        group.throughput(Throughput::Elements((*size * COLUMNS) as u64));
        group.bench_with_input(BenchmarkId::new("rows", size), size, |b, _| {
            b.iter(|| parse_xlsx(black_box(&bytes)).expect("workbook should parse"));
        });
    }
    group.finish();
}

fn bench_mislabelled_fallback(c: &mut Criterion) {
    let text = synthetic_csv(1000);
    let hint = FormatHint::new().with_declared_type("xlsx");
    let config = ParseConfig::default();
    c.bench_function("parse_auto_csv_declared_xlsx", |b| {
        b.iter(|| parse_auto(black_box(text.as_bytes()), &hint, &config).expect("decodes"));
    });
}

criterion_group!(
    benches,
    bench_csv_parse,
    bench_xlsx_parse,
    bench_mislabelled_fallback,
);
criterion_main!(benches);
