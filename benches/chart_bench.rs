use bazi_engine::calendar::astro::{jie_bounds, local_to_jde};
use bazi_engine::calendar::lunar::solar_to_lunar;
use bazi_engine::{AstronomicalCalendar, BaziEngine, BirthRequest, EngineConfig, Gender, GeoLocator};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn make_engine() -> BaziEngine {
    BaziEngine::from_parts(
        EngineConfig::default(),
        GeoLocator::embedded().unwrap(),
        Arc::new(AstronomicalCalendar::new()),
    )
}

fn calendar_bench(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
    let at = date.and_hms_opt(10, 15, 0).unwrap();

    let mut group = c.benchmark_group("calendar");
    group.bench_function("jie_bounds", |b| {
        b.iter(|| jie_bounds(black_box(local_to_jde(at))))
    });
    group.bench_function("solar_to_lunar", |b| {
        b.iter(|| solar_to_lunar(black_box(date)))
    });
    group.finish();
}

fn geo_bench(c: &mut Criterion) {
    let locator = GeoLocator::embedded().unwrap();

    let mut group = c.benchmark_group("geo");
    group.bench_function("exact", |b| b.iter(|| locator.longitude(black_box("北京市"))));
    group.bench_function("three_part", |b| {
        b.iter(|| locator.longitude(black_box("广东省/深圳市/南山区")))
    });
    group.bench_function("unresolved", |b| {
        b.iter(|| locator.longitude(black_box("亚特兰蒂斯")))
    });
    group.finish();
}

fn chart_bench(c: &mut Criterion) {
    let engine = make_engine();
    let request = BirthRequest::solar(1990, 6, 15, 10, 30, Gender::Male, "北京市");
    let batch: Vec<BirthRequest> = (0..64)
        .map(|i| BirthRequest::solar(1950 + i, 1 + (i as u32 % 12), 15, 10, 30, Gender::Female, "上海市"))
        .collect();

    let mut group = c.benchmark_group("chart");
    group.bench_function("calculate", |b| {
        b.iter(|| engine.calculate(black_box(&request)))
    });
    group.bench_function("calculate_batch_64", |b| {
        b.iter(|| engine.calculate_batch(black_box(&batch)))
    });
    group.finish();
}

criterion_group!(benches, calendar_bench, geo_bench, chart_bench);
criterion_main!(benches);
