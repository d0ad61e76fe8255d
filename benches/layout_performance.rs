//! Layout micro-benchmarks
//!
//! Measures parse (tokenize, resolve, build, compose) and re-compose time for
//! paragraphs of growing length.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use leaftext::{FontLibrary, FontMetrics, Formatter, ImageLibrary};
use leaftext_traits::{FontNames, GlyphBounds, OutlineSink};
use std::hint::black_box;
use std::sync::Arc;

#[derive(Debug)]
struct BenchFont;

impl FontMetrics for BenchFont {
    fn units_per_em(&self) -> u16 {
        2048
    }

    fn ascender(&self) -> i16 {
        1900
    }

    fn descender(&self) -> i16 {
        -500
    }

    fn glyph_id(&self, c: char) -> Option<u16> {
        u16::try_from(u32::from(c)).ok()
    }

    fn advance_width(&self, glyph: u16) -> Option<u16> {
        Some(900 + glyph % 7 * 100)
    }

    fn glyph_bounds(&self, _glyph: u16) -> Option<GlyphBounds> {
        Some(GlyphBounds {
            x_min: 0,
            y_min: -400,
            x_max: 900,
            y_max: 1500,
        })
    }

    fn kerning(&self, left: u16, right: u16) -> Option<i16> {
        (left.wrapping_add(right) % 5 == 0).then_some(-40)
    }

    fn outline(&self, _glyph: u16, _sink: &mut dyn OutlineSink) -> bool {
        false
    }

    fn names(&self) -> FontNames {
        FontNames {
            family: Some("Bench".to_string()),
            subfamily: Some("Regular".to_string()),
            ..Default::default()
        }
    }
}

fn formatter() -> Formatter {
    let fonts = FontLibrary::new();
    fonts
        .register("bench", Arc::new(BenchFont))
        .expect("register bench font");
    let mut formatter = Formatter::new(fonts, ImageLibrary::new());
    formatter.set_word_wrap(480.0);
    formatter
}

fn paragraph(repeat: usize) -> String {
    concat!(
        r#"The <b>quick</b> brown <i>fox</i> jumps over the <a href="x">lazy</a> dog "#,
        r#"&amp; <span style="font-size:18px">friends</span>. "#,
    )
    .repeat(repeat)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for repeat in [10, 100, 1000] {
        let markup = paragraph(repeat);
        let mut formatter = formatter();
        group.bench_with_input(BenchmarkId::from_parameter(repeat), &markup, |b, markup| {
            b.iter(|| formatter.parse(black_box(markup)).leaves.len())
        });
    }
    group.finish();
}

fn bench_recompose(c: &mut Criterion) {
    let mut formatter = formatter();
    formatter.parse(&paragraph(1000));
    let mut wrap = 300.0_f32;
    c.bench_function("recompose_1000_sentences", |b| {
        b.iter(|| {
            wrap = if wrap > 600.0 { 300.0 } else { wrap + 10.0 };
            formatter.set_word_wrap(black_box(wrap));
            formatter.compose().height
        })
    });
}

criterion_group!(benches, bench_parse, bench_recompose);
criterion_main!(benches);
