use criterion::{black_box, criterion_group, criterion_main, Criterion};
use edgestag::{EdgePipeline, PixelBuffer, ThresholdPair};

fn build_slanted_rgb(width: usize, height: usize) -> PixelBuffer {
    let theta = 20.0f32.to_radians();
    let nx = theta.cos();
    let ny = theta.sin();
    let t = nx * (0.5 * width as f32) + ny * (0.5 * height as f32);

    let mut data = vec![0u8; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let d = nx * x as f32 + ny * y as f32 - t;
            let v = if d >= 0.0 { 255 } else { 0 };
            let i = (y * width + x) * 3;
            data[i..i + 3].fill(v);
        }
    }

    PixelBuffer::from_raw(width, height, 3, data).expect("valid image")
}

fn bench_detect(c: &mut Criterion) {
    let image = build_slanted_rgb(1280, 1024);
    let pipeline = EdgePipeline::default();
    let thresholds = ThresholdPair::default();

    c.bench_function("detect_rgb_1280x1024", |b| {
        b.iter(|| {
            let out = pipeline.detect(black_box(&image), black_box(thresholds)).unwrap();
            black_box(out.edges.edge_count());
        });
    });
}

fn bench_process_png(c: &mut Criterion) {
    let image = build_slanted_rgb(640, 480);
    let bytes = edgestag::io::encode_png(&image).expect("png encoding");
    let pipeline = EdgePipeline::default();
    let thresholds = ThresholdPair::default();

    c.bench_function("process_png_640x480", |b| {
        b.iter(|| {
            let out = pipeline.process_bytes(black_box(&bytes), thresholds).unwrap();
            black_box(out.statistics.edge_percentage);
        });
    });
}

fn bench_frame(c: &mut Criterion) {
    let image = build_slanted_rgb(1280, 720);
    let bytes = edgestag::io::encode_png(&image).expect("png encoding");
    let pipeline = EdgePipeline::default();
    let thresholds = ThresholdPair::default();

    c.bench_function("frame_png_1280x720_to_640x480", |b| {
        b.iter(|| {
            let out = pipeline
                .run_from_frame(black_box(&bytes), 640, 480, thresholds)
                .unwrap();
            black_box(out.width());
        });
    });
}

criterion_group!(benches, bench_detect, bench_process_png, bench_frame);
criterion_main!(benches);
