//! Note identifier generation
//!
//! IDs look like `note-1718000000000-k3x9a`: a millisecond timestamp plus
//! five uniformly distributed random base36 characters. Uniqueness is
//! best-effort.

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 5;
/// 7 * 36, the largest multiple of 36 below 256
const UNBIASED_LIMIT: u8 = 252;

/// Generate a fresh note ID
pub fn generate_note_id() -> String {
    let now = chrono::Utc::now();
    format!("note-{}-{}", now.timestamp_millis(), random_suffix(now.timestamp_subsec_nanos()))
}

fn random_suffix(fallback_seed: u32) -> String {
    let mut source = ByteSource::new(fallback_seed);
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    while suffix.len() < SUFFIX_LEN {
        let mut bytes = [0u8; SUFFIX_LEN];
        source.fill(&mut bytes);
        let remaining = SUFFIX_LEN - suffix.len();
        suffix.extend(bytes.iter().filter_map(|b| base36_digit(*b)).take(remaining));
    }
    suffix
}

/// Base36 digit for a random byte; `None` for the 4 values past the last
/// full cycle of 36
fn base36_digit(byte: u8) -> Option<char> {
    (byte < UNBIASED_LIMIT).then(|| BASE36[(byte % 36) as usize] as char)
}

/// OS randomness, falling back to a clock-seeded xorshift when unavailable
struct ByteSource {
    seed: u32,
    use_clock: bool,
}

impl ByteSource {
    fn new(seed: u32) -> Self {
        Self { seed, use_clock: false }
    }

    fn fill(&mut self, bytes: &mut [u8]) {
        if !self.use_clock {
            match getrandom::getrandom(bytes) {
                Ok(()) => return,
                Err(e) => {
                    log::warn!("getrandom unavailable ({}), deriving note id suffix from clock", e);
                    self.use_clock = true;
                }
            }
        }
        for byte in bytes.iter_mut() {
            // xorshift32
            self.seed ^= self.seed << 13;
            self.seed ^= self.seed >> 17;
            self.seed ^= self.seed << 5;
            *byte = self.seed as u8;
        }
    }
}
