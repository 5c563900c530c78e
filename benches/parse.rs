use std::borrow::Cow;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gifblocks::{ApplicationExtension, ByteIterator, DataBlock, GifInfo, NetscapeExtension};

/// An animation of `frames` 64x64 frames, encoded by the `gif` crate.
fn animation(frames: u16) -> Vec<u8> {
    let palette = [0, 0, 0, 255, 255, 255, 255, 0, 0, 0, 0, 255];
    let pixels: Vec<u8> = (0..64 * 64).map(|i| (i % 4) as u8).collect();
    let mut data = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut data, 64, 64, &palette).unwrap();
        encoder.set_repeat(gif::Repeat::Infinite).unwrap();
        for delay in 0..frames {
            let frame = gif::Frame {
                width: 64,
                height: 64,
                delay,
                buffer: Cow::Borrowed(&pixels),
                ..Default::default()
            };
            encoder.write_frame(&frame).unwrap();
        }
    }
    data
}

fn parser_benchmarks(c: &mut Criterion) {
    c.bench_function("walk_animation", |b| {
        let data = animation(64);
        b.iter(|| GifInfo::from_slice(black_box(&data)).unwrap())
    });

    c.bench_function("read_netscape_extension", |b| {
        let mut data = Vec::new();
        NetscapeExtension::new(3)
            .unwrap()
            .application_extension()
            .write_to(&mut data);
        b.iter(|| {
            let extension = ApplicationExtension::from_bytes(black_box(&data)).unwrap().0;
            NetscapeExtension::try_from(extension).unwrap()
        })
    });

    c.bench_function("read_full_data_blocks", |b| {
        let mut data = Vec::new();
        for _ in 0..64 {
            DataBlock::from_payload(&[0xaa; 255]).unwrap().write_to(&mut data);
        }
        b.iter(|| {
            let mut bytes = ByteIterator::from_slice(black_box(&data));
            (0..64)
                .map(|_| DataBlock::read(&mut bytes).actual_size())
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, parser_benchmarks);
criterion_main!(benches);
