//! Formatter benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use kernlib_core::stdio::{BufferSink, FormatArg, render, sprintf, sprintf_into};

fn bench_conversions(c: &mut Criterion) {
    let cases: &[(&str, &str, FormatArg<'static>)] = &[
        ("decimal", "%d", FormatArg::Signed(-1_234_567)),
        ("hex_zero_fill", "%016x", FormatArg::Unsigned(0xdead_beef)),
        ("pointer", "%p", FormatArg::Pointer(0x7fff_1000)),
        ("string_width", "%-24s", FormatArg::Str(Some(&b"vmlinuz-6.8.0"[..]))),
        ("float", "%.6f", FormatArg::Float(3.141_592_653)),
        ("code_point", "%C", FormatArg::CodePoint(0x1F600)),
    ];
    let mut group = c.benchmark_group("printf_conversion");

    for (name, template, arg) in cases {
        group.bench_with_input(BenchmarkId::new("sprintf", name), template, |b, template| {
            b.iter(|| black_box(sprintf(black_box(template.as_bytes()), &[*arg])));
        });
    }
    group.finish();
}

fn bench_template_lengths(c: &mut Criterion) {
    let sizes: &[usize] = &[16, 256, 4096];
    let mut group = c.benchmark_group("printf_template");

    for &size in sizes {
        let mut template = b"%s=%d ".repeat(size / 6);
        template.truncate(size);
        let args: Vec<FormatArg<'_>> = (0..size)
            .map(|i| {
                if i % 2 == 0 {
                    FormatArg::Str(Some(&b"root"[..]))
                } else {
                    FormatArg::Signed(i as i64)
                }
            })
            .collect();
        let mut out = vec![0u8; size * 4];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("buffer", size), &size, |b, _| {
            b.iter(|| {
                let mut sink = BufferSink::new(&mut out);
                black_box(render(&mut sink, &template, &args));
            });
        });
        group.bench_with_input(BenchmarkId::new("bounded", size), &size, |b, _| {
            let mut small = [0u8; 64];
            b.iter(|| black_box(sprintf_into(&mut small, &template, &args)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_conversions, bench_template_lengths);
criterion_main!(benches);
