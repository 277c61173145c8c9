use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use iridoscan::quality::QualityAssessor;
use iridoscan::{CancellationToken, EyeSide, IrisLandmark, IrisPipeline, Landmarks, PipelineConfig};

fn eye_frame(size: u32, iris: IrisLandmark) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        let dx = x as f64 + 0.5 - iris.center[0];
        let dy = y as f64 + 0.5 - iris.center[1];
        let r = dx.hypot(dy);
        if r > iris.radius {
            Rgb([128, 128, 128])
        } else {
            // radial fibers over a blue-gray base
            let spoke = ((dy.atan2(dx) * 24.0).sin() * 30.0) as i16;
            Rgb([
                (70 + spoke).clamp(0, 255) as u8,
                (90 + spoke).clamp(0, 255) as u8,
                (150 + spoke / 2).clamp(0, 255) as u8,
            ])
        }
    })
}

fn benchmark_quality_gate(c: &mut Criterion) {
    let iris = IrisLandmark::new(640.0, 640.0, 200.0);
    let frame = eye_frame(1280, iris);
    let landmarks = Landmarks::single(EyeSide::Left, iris);
    let assessor = QualityAssessor::default();

    c.bench_function("quality_gate_1280", |b| {
        b.iter(|| assessor.assess(black_box(&frame), Some(&landmarks), EyeSide::Left))
    });
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let iris = IrisLandmark::new(640.0, 640.0, 200.0);
    let frame = eye_frame(1280, iris);

    let mut group = c.benchmark_group("analyze_frame");
    group.sample_size(20);
    for parallel in [true, false] {
        let mut config = PipelineConfig::default();
        config.zones.parallel = parallel;
        let pipeline = IrisPipeline::new(config, move |_: &RgbImage| {
            Some(Landmarks::single(EyeSide::Left, iris))
        })
        .expect("valid config");
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| {
                pipeline
                    .analyze_frame(black_box(&frame), EyeSide::Left, &CancellationToken::new())
                    .ok()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_quality_gate, benchmark_full_pipeline);
criterion_main!(benches);
