use std::f64::consts::TAU;

use overlap_dsp::{
    BlockProcessor, ChannelBlock, GainEffect, OverlapAdd, OverlapAddSettings, Passthrough,
    ProcessSpec, SpectralFilterEffect,
};
use rand::Rng;

fn stream<P: BlockProcessor<f32>>(
    adapter: &mut OverlapAdd<f32, P>,
    input: &[f32],
    mut next_chunk: impl FnMut() -> usize,
) -> Vec<f32> {
    let mut output = vec![0.0_f32; input.len()];
    let mut start = 0;
    while start < input.len() {
        let end = (start + next_chunk()).min(input.len());
        adapter.process(&[&input[start..end]], &mut [&mut output[start..end]]);
        start = end;
    }
    output
}

fn sine(frequency: f64, sample_rate: f64, len: usize, amplitude: f64) -> Vec<f32> {
    (0..len)
        .map(|i| (amplitude * (TAU * frequency * i as f64 / sample_rate).sin()) as f32)
        .collect()
}

#[test]
fn spectral_low_pass_through_overlap_add() {
    // 256-point windows at 25.6 kHz put every multiple of 100 Hz on an exact bin.
    let sample_rate = 25_600.0;
    let len = 4096;
    let low = sine(300.0, sample_rate, len, 0.8);
    let high = sine(6_000.0, sample_rate, len, 0.4);
    let mixed: Vec<f32> = low.iter().zip(&high).map(|(a, b)| a + b).collect();

    let filter = SpectralFilterEffect::new(0.0, 1_000.0);
    let mut adapter = OverlapAdd::<f32, _>::new(256, 128, filter);
    adapter.prepare(&ProcessSpec::new(sample_rate, 100, 1));
    assert_eq!(adapter.processor().fft_size(), Some(256));

    let output = stream(&mut adapter, &mixed, || 100);
    // Windows overlapping the silent pre-roll are not periodic and leak, so start
    // comparing once every contributing window lies inside the signal.
    let latency = adapter.latency_samples();
    for (index, sample) in output.iter().enumerate().skip(latency + adapter.window_size()) {
        let expected = low[index - latency];
        assert!(
            (sample - expected).abs() < 1e-3,
            "sample {}: {} vs {}",
            index,
            sample,
            expected
        );
    }
}

#[test]
fn dynamic_processor_with_random_host_blocks() {
    let mut rng = rand::thread_rng();
    let input: Vec<f32> = (0..2000).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let processor: Box<dyn BlockProcessor<f32>> = Box::new(GainEffect::new(0.5));
    let mut adapter = OverlapAdd::<f32, _>::new(64, 16, processor);
    adapter.prepare(&ProcessSpec::new(48_000.0, 512, 1));

    let output = stream(&mut adapter, &input, || rng.gen_range(1..=512));
    let latency = adapter.latency_samples();
    assert!(output[..latency].iter().all(|&s| s == 0.0));
    for (sample, original) in output[latency..].iter().zip(&input) {
        assert!((sample - original * 0.5).abs() < 1e-5);
    }
}

#[test]
fn settings_from_json_drive_the_adapter() {
    let settings = OverlapAddSettings::from_json(r#"{"window_size":32,"hop_size":8}"#)
        .expect("valid settings");
    let gain: GainEffect =
        serde_json::from_str(r#"{"enabled":true,"gain":"0db"}"#).expect("valid gain");

    let mut adapter = OverlapAdd::<f64, _>::from_settings(&settings, gain).expect("adapter");
    adapter.prepare(&ProcessSpec::new(44_100.0, 7, 2));
    assert_eq!(adapter.num_channels(), 2);

    let left = vec![1.0_f64; 100];
    let right = vec![-2.0_f64; 100];
    let mut block = ChannelBlock::from_channels(&[left, right]);
    adapter.process_replacing(&mut block);

    let latency = adapter.latency_samples();
    assert_eq!(latency, 31);
    for index in 0..100 {
        let (expected_left, expected_right) = if index < latency {
            (0.0, 0.0)
        } else {
            (1.0, -2.0)
        };
        assert!((block.sample(0, index) - expected_left).abs() < 1e-12);
        assert!((block.sample(1, index) - expected_right).abs() < 1e-12);
    }
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = OverlapAddSettings::new(100, 30);
    let err = OverlapAdd::<f32, _>::from_settings(&settings, Passthrough).unwrap_err();
    assert_eq!(err.to_string(), "window size 100 is not a multiple of hop size 30");
}
