use criterion::{black_box, criterion_group, criterion_main, Criterion};

use screenshot_annotator::geometry::{layout, Route};
use screenshot_annotator::label::{Label, Point};
use screenshot_annotator::rendering::html::render_html;
use screenshot_annotator::{AnnotationDocument, Annotator, LayoutConfig, Viewport};

// Every valid route at a handful of positions.
fn bench_layout_routes(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let labels: Vec<Label> = Route::all()
        .iter()
        .flat_map(|route| {
            [(10.0, 10.0), (50.0, 50.0), (90.0, 75.0)].into_iter().map(move |(x, y)| {
                let mut l = Label::new("bench", "Bench", Point { x, y }, route.direction1);
                l.direction2 = route.direction2;
                l
            })
        })
        .collect();

    c.bench_function("layout_all_routes", |b| {
        b.iter(|| {
            for l in &labels {
                let _ = black_box(layout(l, &config, 0.8).expect("valid route"));
            }
        })
    });
}

fn bench_compose_demo(c: &mut Criterion) {
    let json = std::fs::read_to_string("tests/fixtures/cmd_demo.json").expect("read fixture");
    let doc = AnnotationDocument::from_json(&json).expect("valid fixture");
    let annotator = Annotator::from_document(doc, Viewport::default()).expect("annotator");
    annotator.resolver().observe_content_height(1100.0);

    c.bench_function("compose_demo", |b| {
        b.iter(|| {
            let _ = black_box(annotator.compose());
        })
    });

    let composition = annotator.compose();
    c.bench_function("render_html_demo", |b| {
        b.iter(|| {
            let _ = black_box(render_html(&composition).unwrap());
        })
    });
}

criterion_group!(benches, bench_layout_routes, bench_compose_demo);
criterion_main!(benches);
