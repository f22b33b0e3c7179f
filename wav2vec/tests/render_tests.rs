//! End-to-end rendering tests
//!
//! Decode generated files and check the exact text each encoder produces.

mod helpers;

use helpers::*;
use wav2vec::audio::container::MemorySource;
use wav2vec::audio::decoder::{DecoderOptions, WaveformDecoder};
use wav2vec::audio::types::{ContainerKind, ContainerParams};
use wav2vec::output::{encoder_for, render, render_to_string, CsvEncoder, PostScriptEncoder, SvgEncoder};
use wav2vec_common::OutputFormat;

const MONO: [i32; 3] = [0, 16384, -16384];

fn render_file(path: &std::path::Path, format: OutputFormat, block_size: usize) -> String {
    let mut decoder = decoder_for(path, options(100, block_size));
    let mut encoder = encoder_for(format);
    render_to_string(&mut decoder, encoder.as_mut()).unwrap()
}

#[test]
fn test_svg_mono_document() {
    let (_dir, path) = wav_fixture(1, 16, &MONO);
    assert_eq!(
        render_file(&path, OutputFormat::Svg, 0),
        concat!(
            r#"<svg width="3" height="100" xmlns="http://www.w3.org/2000/svg" version="1.1">"#,
            r#"<polyline stroke="black" stroke-linecap="round" stroke-linejoin="round" fill="none" points=""#,
            " 1.000000, 50.000000 2.000000, 25.000000 3.000000, 75.000000",
            r#"" />"#,
            "</svg>"
        )
    );
}

#[test]
fn test_svg_one_polyline_per_channel() {
    let (_dir, path) = wav_fixture(3, 16, &sine_samples(40, 3));
    let mut decoder = decoder_for(&path, options(200, 0));
    let svg = render_to_string(&mut decoder, &mut SvgEncoder::new()).unwrap();

    assert!(svg.starts_with(r#"<svg width="40" height="600" "#));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("<polyline").count(), 3);
    assert_eq!(svg.matches(r#"" />"#).count(), 3);
}

#[test]
fn test_svg_width_is_clamped() {
    let (_dir, path) = wav_fixture(1, 16, &sine_samples(400, 1));
    let options = DecoderOptions {
        max_width: 100,
        max_height: 100,
        ..DecoderOptions::default()
    };
    let mut decoder = WaveformDecoder::new(
        Box::new(wav2vec::audio::container::FileSource::detect(&path).unwrap()),
        options,
    );
    let svg = render_to_string(&mut decoder, &mut SvgEncoder::new()).unwrap();
    assert!(svg.starts_with(r#"<svg width="100" height="100" "#));
    // Last frame lands on the right edge
    assert!(svg.contains(" 100.000000, "));
}

#[test]
fn test_streamed_mono_output_is_identical() {
    let (_dir, path) = wav_fixture(1, 16, &sine_samples(50, 1));
    for format in OutputFormat::all_variants() {
        let whole = render_file(&path, *format, 0);
        for block_size in [1, 7, 50] {
            assert_eq!(
                render_file(&path, *format, block_size),
                whole,
                "{} block size {}",
                format,
                block_size
            );
        }
    }
}

#[test]
fn test_csv_mono_document() {
    let (_dir, path) = wav_fixture(1, 16, &MONO);
    assert_eq!(
        render_file(&path, OutputFormat::Csv, 0),
        "Channel #1\nX, Y\n1.000000, 0.000000\n2.000000, 25.000000\n3.000000, -25.000000\n"
    );
}

#[test]
fn test_csv_8_bit_document() {
    // Unsigned on disk; centred on 128 before scaling
    let (_dir, path) = wav_fixture(1, 8, &[0, 64, -64]);
    let mut decoder = decoder_for(&path, options(128, 0));
    assert_eq!(
        render_to_string(&mut decoder, &mut CsvEncoder::new()).unwrap(),
        "Channel #1\nX, Y\n1.000000, 0.000000\n2.000000, 32.000000\n3.000000, -32.000000\n"
    );
}

#[test]
fn test_csv_32_bit_document() {
    let (_dir, path) = wav_fixture(1, 32, &[1 << 30, -(1 << 30), 0]);
    let mut decoder = decoder_for(&path, options(1000, 2));
    assert_eq!(
        render_to_string(&mut decoder, &mut CsvEncoder::new()).unwrap(),
        "Channel #1\nX, Y\n1.000000, 250.000000\n2.000000, -250.000000\n3.000000, 0.000000\n"
    );
}

#[test]
fn test_csv_stereo_streamed_repeats_headers() {
    let (_dir, path) = wav_fixture(2, 16, &[0, 16384, 16384, 0]);
    assert_eq!(
        render_file(&path, OutputFormat::Csv, 1),
        "Channel #1\nX, Y\n1.000000, 0.000000\n\
         Channel #2\nX, Y\n1.000000, 25.000000\n\
         Channel #1\nX, Y\n2.000000, 25.000000\n\
         Channel #2\nX, Y\n2.000000, 0.000000\n"
    );
}

#[test]
fn test_postscript_mono_document() {
    let (_dir, path) = wav_fixture(1, 16, &MONO);
    assert_eq!(
        render_file(&path, OutputFormat::PostScript, 0),
        "%!PS-Adobe-3.0\n\
         %%BoundingBox: 0 0 3 100\n\
         << /PageSize [3 100] >> setpagedevice\n\
         0 100 translate\n\
         1 -1 scale\n\
         newpath\n\
         1.000000 50.000000 moveto\n\
         1.000000 50.000000 lineto\n\
         2.000000 25.000000 lineto\n\
         3.000000 75.000000 lineto\n\
         stroke\n\
         showpage\n"
    );
}

#[test]
fn test_postscript_stereo_resumes_from_last_point() {
    let (_dir, path) = wav_fixture(2, 16, &[0, 0, 16384, -16384]);
    let mut decoder = decoder_for(&path, options(100, 1));
    let ps = render_to_string(&mut decoder, &mut PostScriptEncoder::new()).unwrap();

    let path_lines: Vec<&str> = ps
        .lines()
        .filter(|l| l.ends_with("moveto") || l.ends_with("lineto"))
        .collect();
    assert_eq!(
        path_lines,
        vec![
            "1.000000 50.000000 moveto",
            "1.000000 50.000000 lineto",
            "1.000000 150.000000 moveto",
            "1.000000 150.000000 lineto",
            "1.000000 50.000000 moveto",
            "2.000000 25.000000 lineto",
            "1.000000 150.000000 moveto",
            "2.000000 175.000000 lineto",
        ]
    );
}

#[test]
fn test_render_returns_sink() {
    let source = MemorySource::filled(ContainerKind::Wav, ContainerParams::pcm(1, 2, 8000, 4), 0);
    let mut decoder = WaveformDecoder::new(Box::new(source.clone()), DecoderOptions::default());
    let out = render(&mut decoder, &mut CsvEncoder::new(), Vec::new()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 6);
    assert_eq!(source.open_count(), 1);
    assert_eq!(source.close_count(), 1);
}

#[test]
fn test_render_twice_reopens_decoder() {
    let (_dir, path) = wav_fixture(2, 16, &sine_samples(20, 2));
    let mut decoder = decoder_for(&path, options(100, 3));
    let mut encoder = PostScriptEncoder::new();
    let first = render_to_string(&mut decoder, &mut encoder).unwrap();
    let second = render_to_string(&mut decoder, &mut encoder).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_render_releases_file_on_decode_error() {
    // Claims 10 frames, holds 4
    let source = MemorySource::new(ContainerKind::Wav, ContainerParams::pcm(1, 2, 8000, 10), vec![0; 8]);
    let mut decoder = WaveformDecoder::new(Box::new(source.clone()), DecoderOptions::default());
    let result = render(&mut decoder, &mut SvgEncoder::new(), Vec::new());
    assert!(matches!(result, Err(wav2vec::Error::MalformedFrameData(_))));
    assert_eq!(source.close_count(), 1);
    assert!(!decoder.is_open());
}

#[test]
fn test_canonical_fixture_slurp() {
    // 2 channels x 10 frames of 0x01 bytes: every 16-bit sample is 0x0101
    let source = MemorySource::filled(ContainerKind::Wav, ContainerParams::pcm(2, 2, 44100, 10), 0x01);
    let mut decoder = WaveformDecoder::new(Box::new(source), DecoderOptions::default());
    let csv = render_to_string(&mut decoder, &mut CsvEncoder::new()).unwrap();
    let rows: Vec<(f64, f64)> = csv
        .lines()
        .filter(|l| !l.starts_with("Channel") && !l.starts_with("X, Y"))
        .map(|l| {
            let (x, y) = l.split_once(", ").unwrap();
            (x.parse().unwrap(), y.parse().unwrap())
        })
        .collect();
    assert_eq!(rows.len(), 20);
    for (i, (x, y)) in rows.iter().enumerate() {
        assert_eq!(*x, (i % 10 + 1) as f64);
        assert!((y - 257.0).abs() < 5.0);
    }
}
