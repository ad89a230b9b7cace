use std::path::Path;

use anyhow::Result;
use approx::assert_abs_diff_eq;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tempfile::tempdir;
use wavsplit::audio::{decode_audio, encode_clip};
use wavsplit::config::AppConfig;
use wavsplit::pipeline::split_file;
use wavsplit::{segment, DecodeError, SegmentParams, SplitError};

const SAMPLE_RATE: u32 = 44_100;

#[test]
fn splits_two_calls_into_two_files() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("dawn_chorus.wav");
    let tenth = SAMPLE_RATE as usize / 10;
    let layout = [(0, tenth), (1, tenth), (0, 2 * tenth), (2, tenth), (0, tenth)];
    let samples = write_layout(&source, &layout)?;

    let config = AppConfig::from_override(Some(temp.path().join("clips")))?;
    let report = split_file(Some(source.as_path()), &config, &SegmentParams::default())?;

    // The second burst is followed by exactly one tenth of silence,
    // which is just enough to close it.
    assert_eq!(report.clips.len(), 2);
    for (index, clip) in report.clips.iter().enumerate() {
        assert_eq!(clip.index, index);
        assert_eq!(
            clip.path,
            config.output_dir.join(format!("dawn_chorus_{index}.wav"))
        );
        let written = read_samples(&clip.path)?;
        assert_eq!(written, samples[clip.range.as_range()].to_vec());
        assert_eq!(WavReader::open(&clip.path)?.spec().sample_rate, SAMPLE_RATE);
    }
    assert_abs_diff_eq!(
        report.clips[0].range.start_secs(SAMPLE_RATE),
        0.1,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        report.clips[0].range.duration_secs(SAMPLE_RATE),
        0.1,
        epsilon = 1e-9
    );
    Ok(())
}

#[test]
fn keep_trailing_writes_the_unterminated_clip() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("take.wav");
    write_layout(&source, &[(0, 500), (1, 300), (0, 100)])?;

    let config = AppConfig::from_override(Some(temp.path().join("out")))?;
    let dropped = split_file(Some(source.as_path()), &config, &SegmentParams::default())?;
    assert!(dropped.clips.is_empty());

    let params = SegmentParams::default().with_flush_trailing(true);
    let kept = split_file(Some(source.as_path()), &config, &params)?;
    assert_eq!(kept.clips.len(), 1);
    assert_eq!(kept.clips[0].range.as_range(), 500..800);
    assert_eq!(read_samples(&kept.clips[0].path)?.len(), 300);
    Ok(())
}

#[test]
fn preserves_source_frame_rate() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("low.wav");
    let spec = mono_spec(8_000);
    let mut writer = WavWriter::create(&source, spec)?;
    for sample in [0i16, 0, 900, 900, 0, 0, 0] {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    let config = AppConfig::from_override(Some(temp.path().join("out")))?;
    let report = split_file(Some(source.as_path()), &config, &SegmentParams::new(3, 1))?;
    assert_eq!(report.format.frame_rate, 8_000);
    assert_eq!(report.clips.len(), 1);
    let reader = WavReader::open(&report.clips[0].path)?;
    assert_eq!(reader.spec(), spec);
    Ok(())
}

#[test]
fn truncated_source_is_rejected_before_any_clip_is_written() -> Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("cut_short.wav");
    let tenth = SAMPLE_RATE as usize / 10;
    write_layout(&source, &[(0, tenth), (1, tenth), (0, tenth), (2, tenth), (0, tenth)])?;
    let file = std::fs::OpenOptions::new().write(true).open(&source)?;
    let len = file.metadata()?.len();
    file.set_len(len - 5_001)?;
    drop(file);

    let err = decode_audio(&source).unwrap_err();
    assert!(
        matches!(err, DecodeError::Truncated { expected, .. } if expected == 5 * tenth as u64),
        "{err:?}"
    );

    let out = temp.path().join("clips");
    let config = AppConfig::from_override(Some(out.clone()))?;
    let err =
        split_file(Some(source.as_path()), &config, &SegmentParams::default()).unwrap_err();
    assert!(
        matches!(
            err,
            SplitError::Decode {
                source: DecodeError::Truncated { .. },
                ..
            }
        ),
        "{err:?}"
    );
    assert_eq!(std::fs::read_dir(&out)?.count(), 0, "no clips may be written");
    Ok(())
}

#[test]
fn encoded_clip_round_trips_losslessly() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("sweep.wav");
    let samples: Vec<i16> = (i16::MIN..=i16::MAX).step_by(7).collect();
    encode_clip(&path, &samples, SAMPLE_RATE)?;

    let decoded = decode_audio(&path)?;
    assert_eq!(decoded.samples, samples);
    assert_eq!(decoded.format.frame_rate, SAMPLE_RATE);
    assert_eq!(decoded.format.channels, 1);
    assert_eq!(decoded.format.sample_width, 2);
    Ok(())
}

#[test]
fn decoded_file_segments_like_in_memory_samples() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("scenario.wav");
    let mut samples = vec![0i16, 0, 0, 5, 5, 5, 0, 0, 0, 0, 0, 7, 7];
    samples.extend([0; 10]);
    encode_clip(&path, &samples, SAMPLE_RATE)?;

    let decoded = decode_audio(&path)?;
    let params = SegmentParams::new(5, 1);
    let ranges: Vec<_> = segment(&decoded.samples, &params)
        .iter()
        .map(|r| r.as_range())
        .collect();
    assert_eq!(ranges, vec![3..6, 11..13]);
    Ok(())
}

fn mono_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Writes `(kind, len)` runs: kind 0 is digital silence, anything else a
/// square wave whose amplitude grows with `kind`.
fn write_layout(path: &Path, layout: &[(u8, usize)]) -> Result<Vec<i16>> {
    let mut samples = Vec::new();
    for &(kind, len) in layout {
        for i in 0..len {
            let sample = match kind {
                0 => 0,
                k => {
                    let amplitude = 1_000 * i16::from(k);
                    if (i / 20) % 2 == 0 {
                        amplitude
                    } else {
                        -amplitude
                    }
                }
            };
            samples.push(sample);
        }
    }
    let mut writer = WavWriter::create(path, mono_spec(SAMPLE_RATE))?;
    for &sample in &samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(samples)
}

fn read_samples(path: &Path) -> Result<Vec<i16>> {
    let mut reader = WavReader::open(path)?;
    let samples = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    Ok(samples)
}
