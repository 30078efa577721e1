//! Environment abstraction for deterministic testing.
//!
//! Decouples synchronization logic from system resources (wall clock,
//! randomness). Production code uses [`SystemEnv`]; tests use seeded
//! environments with a controllable clock so recency ordering and id
//! generation are reproducible.

/// Alphabet for locally generated tokens (ids are base36, matching the ids
/// peers on other platforms produce).
const TOKEN_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Abstract environment providing wall-clock time and randomness.
///
/// # Invariants
///
/// - `now_millis()` never decreases within a single execution context.
/// - `random_bytes()` is best-effort unique, not cryptographically
///   authenticated: identity and room ids generated from it are collision
///   resistant in practice but carry no ownership proof.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current wall-clock time as milliseconds since the Unix epoch.
    ///
    /// Used for room recency (`last_activity`); this is a timestamp that gets
    /// persisted, not a monotonic instant.
    fn now_millis(&self) -> u64;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random base36 token of the given length.
    ///
    /// Convenience for identity ids (`u_` prefix + 6 chars) and room ids
    /// (8 chars).
    fn token(&self, len: usize) -> String {
        let mut bytes = vec![0u8; len];
        self.random_bytes(&mut bytes);
        bytes.iter().map(|b| char::from(TOKEN_ALPHABET[usize::from(*b) % 36])).collect()
    }
}

/// Production environment backed by the system clock and OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn now_millis(&self) -> u64 {
        // A clock set before the epoch reads as 0 rather than failing the
        // calling operation.
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        use rand::RngCore;
        rand::rngs::OsRng.fill_bytes(buffer);
    }
}

pub mod test_utils {
    //! Deterministic environment for unit tests.

    use std::sync::{Arc, Mutex, PoisonError};

    use rand::{RngCore, SeedableRng, rngs::StdRng};

    use super::Environment;

    struct MockState {
        now_millis: u64,
        rng: StdRng,
    }

    /// Deterministic environment: seeded RNG and a manually advanced clock.
    ///
    /// Clones share state, so ids generated across clones never collide and
    /// `advance` is visible everywhere.
    #[derive(Clone)]
    pub struct MockEnv {
        state: Arc<Mutex<MockState>>,
    }

    impl MockEnv {
        /// Create a mock environment with a fixed default seed.
        pub fn new() -> Self {
            Self::with_seed(0)
        }

        /// Create a mock environment with the given RNG seed.
        pub fn with_seed(seed: u64) -> Self {
            Self {
                state: Arc::new(Mutex::new(MockState {
                    now_millis: 1_700_000_000_000,
                    rng: StdRng::seed_from_u64(seed),
                })),
            }
        }

        /// Advance the mock clock by `millis`.
        pub fn advance(&self, millis: u64) {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.now_millis += millis;
        }
    }

    impl Default for MockEnv {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Environment for MockEnv {
        fn now_millis(&self) -> u64 {
            self.state.lock().unwrap_or_else(PoisonError::into_inner).now_millis
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.rng.fill_bytes(buffer);
        }
    }
}
