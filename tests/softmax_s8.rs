use qnn_kernels::{quantize_multiplier, softmax, softmax_s8_hp, softmax_s8_s16_hp, SoftmaxConfig, SoftmaxS8Config};

/// Derive the int8 softmax parameters for an input scale, with 5 integer bits
/// in the Q5.26 exp argument.
fn softmax_params(input_scale: f64) -> (i32, i32, i32) {
    const INTEGER_BITS: i32 = 5;
    let real = (input_scale * (1u64 << (31 - INTEGER_BITS)) as f64).min((1u64 << 31) as f64 - 1.0);
    let params = quantize_multiplier(real);
    let max_input_rescaled = ((1i64 << INTEGER_BITS) - 1) as f64 * (1i64 << (31 - INTEGER_BITS)) as f64
        / (1i64 << params.shift) as f64;
    (params.multiplier, params.shift, -(max_input_rescaled.floor() as i32))
}

#[test]
fn derived_parameters_match_known_values() {
    let (mult, shift, diff_min) = softmax_params(0.1);
    assert_eq!(shift, 23);
    assert!((mult - 1_717_986_918).abs() <= 1);
    assert_eq!(diff_min, -248);
}

#[test]
fn int8_softmax_tracks_float_softmax() {
    let input_scale = 0.1f32;
    let (mult, shift, diff_min) = softmax_params(input_scale as f64);
    let row_size = 16;
    let rows = 4;
    let input: Vec<i8> = (0..rows * row_size).map(|i| ((i * 37) % 255) as i32 - 127).map(|v| v as i8).collect();

    let mut q_out = vec![0i8; input.len()];
    softmax_s8_hp(&input, SoftmaxS8Config::new(rows, row_size, mult, shift, diff_min), &mut q_out).unwrap();

    let logits: Vec<f32> = input.iter().map(|&q| q as f32 * input_scale).collect();
    let mut f_out = vec![0f32; input.len()];
    softmax(&logits, &mut f_out, SoftmaxConfig::new(rows, row_size)).unwrap();

    for (q, p) in q_out.iter().zip(f_out.iter()) {
        let dequant = (*q as i32 + 128) as f32 / 256.0;
        assert!((dequant - p).abs() <= 2.0 / 256.0, "int8 {q} vs float {p}");
    }
}

#[test]
fn int8_softmax_codes_sum_to_one() {
    let (mult, shift, diff_min) = softmax_params(0.1);
    let input = [10i8, 20, 30];
    let mut output = [0i8; 3];
    softmax_s8_hp(&input, SoftmaxS8Config::new(1, 3, mult, shift, diff_min), &mut output).unwrap();

    let total: i32 = output.iter().map(|&q| q as i32 + 128).sum();
    assert!((253..=258).contains(&total), "total {total}");
    assert_eq!(output.iter().copied().max(), Some(output[2]));
}

#[test]
fn int16_softmax_has_finer_resolution() {
    let (mult, shift, diff_min) = softmax_params(0.05);
    let input: Vec<i8> = (0..32).map(|i| (i * 3 - 48) as i8).collect();
    let mut output = vec![0i16; 32];
    softmax_s8_s16_hp(&input, SoftmaxS8Config::new(1, 32, mult, shift, diff_min), &mut output).unwrap();

    let logits: Vec<f32> = input.iter().map(|&q| q as f32 * 0.05).collect();
    let mut reference = vec![0f32; 32];
    softmax(&logits, &mut reference, SoftmaxConfig::single_row(32)).unwrap();

    for (q, p) in output.iter().zip(reference.iter()) {
        let dequant = (*q as i32 + 32768) as f32 / 65536.0;
        assert!((dequant - p).abs() <= 4.0 / 65536.0, "int16 {q} vs float {p}");
    }
    for w in output.windows(2) {
        assert!(w[0] <= w[1]);
    }
}

#[test]
fn single_element_rows_are_certain() {
    let (mult, shift, diff_min) = softmax_params(0.1);
    let input = [-5i8, 0, 100];
    let mut output = [0i8; 3];
    softmax_s8_hp(&input, SoftmaxS8Config::new(3, 1, mult, shift, diff_min), &mut output).unwrap();
    assert_eq!(output, [127, 127, 127]);
}
