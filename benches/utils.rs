#![allow(dead_code)]

use rand::Rng;

/// 元素吞吐量 elements/sec
pub fn throughput_elements(elements: usize, duration_secs: f64) -> f64 {
    elements as f64 / duration_secs
}

/// 生成随机 f32 向量 [-1.0, 1.0)
pub fn random_f32_vec(n: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// 生成随机 f32 向量 [lo, hi)
pub fn random_f32_range(n: usize, lo: f32, hi: f32) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}

/// 生成随机 i8 向量
pub fn random_i8_vec(n: usize) -> Vec<i8> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(-128..127i8)).collect()
}

/// 生成随机 i32 累加器向量 (conv/matmul 输出范围)
pub fn random_acc_vec(n: usize) -> Vec<i32> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(-1_000_000..1_000_000)).collect()
}
