//! Public Code Generator
//!
//! Short reference codes shown to waiting customers. Ambiguous glyphs
//! (0/O, 1/I/L) are excluded so codes survive being read aloud or
//! scribbled on a ticket.

use rand::Rng;

/// Uppercase alphanumerics minus 0/O, 1/I/L
const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

pub const CODE_LEN: usize = 6;

/// Maximum regeneration attempts before giving up on a collision streak
pub const MAX_ATTEMPTS: u32 = 5;

/// Generate one candidate code; uniqueness is the caller's problem
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Source of candidate codes
///
/// 测试可注入确定性实现来观察碰撞重试路径。
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> String;
}

/// Default source backed by the thread-local RNG
pub struct RandomCodeSource;

impl CodeSource for RandomCodeSource {
    fn next_code(&self) -> String {
        generate_code()
    }
}
