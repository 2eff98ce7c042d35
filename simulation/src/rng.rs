use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// RNG driving every stochastic choice in a simulation.
pub type SimRng = ChaCha8Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}
