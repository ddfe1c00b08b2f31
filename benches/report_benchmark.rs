use chrono::DateTime;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use page_vision::report::render_report;
use page_vision::slug::slug_from_url;

fn benchmark_slug(c: &mut Criterion) {
    c.bench_function("slug_from_url", |b| {
        b.iter(|| slug_from_url(black_box("https://example.com/pricing/plans/enterprise")))
    });
}

fn benchmark_render(c: &mut Criterion) {
    let generated_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let description = "A pricing page with three plans.\n".repeat(40);

    c.bench_function("render_report", |b| {
        b.iter(|| {
            render_report(
                black_box("https://example.com/pricing"),
                black_box("../screenshots/example.com__pricing.png"),
                black_box(&description),
                Some("Checked on desktop."),
                generated_at,
            )
        })
    });
}

criterion_group!(benches, benchmark_slug, benchmark_render);
criterion_main!(benches);
