//! Markers and probe characters used to test reflections

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, OnceLock};

/// Opaque token that should never occur naturally in a page
pub const DEFAULT_MARKER: &str = "iy3j4h234hjb23234";

pub const PROBE_PREFIX: &str = "pfx";
pub const PROBE_SUFFIX: &str = "sfx";

/// Characters probed for survival, in report order
pub const SPECIAL_CHARS: [&str; 13] = [
    "\"", "'", "<", ">", "$", "|", "(", ")", "`", ":", ";", "{", "}",
];

pub const RANDOM_MARKER_LEN: usize = 17;

/// `pfx<ch>sfx`
pub fn wrap_probe(ch: &str) -> String {
    format!("{}{}{}", PROBE_PREFIX, ch, PROBE_SUFFIX)
}

/// Random marker generator seeded once for the lifetime of the process
pub struct MarkerSource {
    rng: Mutex<StdRng>,
}

impl MarkerSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic source, for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The shared process-wide source
    pub fn global() -> &'static MarkerSource {
        static SOURCE: OnceLock<MarkerSource> = OnceLock::new();
        SOURCE.get_or_init(MarkerSource::new)
    }

    /// Lowercase alphanumeric marker of `len` characters
    pub fn marker(&self, len: usize) -> String {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        (0..len)
            .map(|_| rng.sample(Alphanumeric) as char)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }
}

impl Default for MarkerSource {
    fn default() -> Self {
        Self::new()
    }
}
