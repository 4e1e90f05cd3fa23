use std::time::{Duration, Instant};

use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Number of proof attempts a single mining request may spend
pub const DEFAULT_MAX_ATTEMPTS: u32 = 15;

/// Errors that can occur while setting up a work challenge
#[derive(Debug, Error)]
pub enum WorkError {
    #[error("invalid matrix size: {0} (must be at least 1)")]
    InvalidMatrixSize(usize),

    #[error("invalid attempt budget: {0} (must be at least 1)")]
    InvalidAttemptBudget(u32),
}

/// A deterministic proof-of-useful-work challenge
///
/// Each attempt regenerates a pair of pseudo-random matrices from
/// `seed + attempt`, multiplies them, and hashes the canonical text of the
/// product's entry sum. A candidate is accepted when its digest carries the
/// required number of leading zero hex characters. Anyone holding the same
/// parameters can re-derive the digest for a claimed attempt, so proofs are
/// auditable without trusting the miner.
#[derive(Debug, Clone)]
pub struct WorkChallenge {
    matrix_size: usize,
    seed: u64,
    difficulty: u32,
    max_attempts: u32,
}

/// A successful outcome of a proof search
#[derive(Debug, Clone)]
pub struct WorkProof {
    /// Digest accepted as the proof
    pub proof: String,

    /// Attempt number that produced the digest
    pub attempt: u32,

    /// Wall-clock time spent on the accepted attempt's matrix product
    pub elapsed: Duration,
}

impl WorkChallenge {
    /// Creates a new work challenge
    ///
    /// # Arguments
    ///
    /// * `matrix_size` - Side length of the generated square matrices
    /// * `seed` - Base seed; attempt `n` reseeds with `seed + n`
    /// * `difficulty` - Required number of leading zero hex characters
    /// * `max_attempts` - Upper bound on the number of attempts
    ///
    /// # Returns
    ///
    /// Result with the challenge, or an error for degenerate parameters
    pub fn new(
        matrix_size: usize,
        seed: u64,
        difficulty: u32,
        max_attempts: u32,
    ) -> Result<Self, WorkError> {
        if matrix_size == 0 {
            return Err(WorkError::InvalidMatrixSize(matrix_size));
        }
        if max_attempts == 0 {
            return Err(WorkError::InvalidAttemptBudget(max_attempts));
        }

        Ok(WorkChallenge {
            matrix_size,
            seed,
            difficulty,
            max_attempts,
        })
    }

    /// Searches for a digest meeting the difficulty target
    ///
    /// Attempts are tried in order starting at 0, returning on the first
    /// success. `None` after the attempt budget is exhausted is a legitimate
    /// outcome, not a fault; the caller decides whether to retry with other
    /// parameters.
    pub fn search(&self) -> Option<WorkProof> {
        let target = self.target();

        for attempt in 0..self.max_attempts {
            let (candidate, elapsed) = self.candidate(attempt);

            if candidate.starts_with(&target) {
                return Some(WorkProof {
                    proof: candidate,
                    attempt,
                    elapsed,
                });
            }
        }

        None
    }

    /// Re-derives the candidate digest for a single attempt
    pub fn derive(&self, attempt: u32) -> String {
        self.candidate(attempt).0
    }

    /// Audits a claimed proof
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt number the miner claims produced the proof
    /// * `proof` - The claimed digest
    ///
    /// # Returns
    ///
    /// true iff the digest re-derives from the challenge parameters and
    /// meets the difficulty target
    pub fn verify(&self, attempt: u32, proof: &str) -> bool {
        proof.starts_with(&self.target()) && self.derive(attempt) == proof
    }

    /// Difficulty target as a prefix of zero hex characters
    fn target(&self) -> String {
        "0".repeat(self.difficulty as usize)
    }

    /// Runs one attempt: regenerate the matrices, multiply, hash the sum
    ///
    /// The generator is ChaCha8 seeded with `seed + attempt` (wrapping), and
    /// the draw order is fixed: all of A row by row, then all of B. The
    /// product's entries are summed in column-major storage order and the
    /// scalar is rendered with Rust's shortest round-trip formatting before
    /// hashing, so independently written verifiers agree on the digest.
    fn candidate(&self, attempt: u32) -> (String, Duration) {
        let n = self.matrix_size;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(u64::from(attempt)));

        let a = random_matrix(&mut rng, n);
        let b = random_matrix(&mut rng, n);

        let started = Instant::now();
        let product = &a * &b;
        let elapsed = started.elapsed();

        let sum: f64 = product.iter().sum();

        let mut hasher = Sha256::new();
        hasher.update(sum.to_string().as_bytes());

        (hex::encode(hasher.finalize()), elapsed)
    }
}

/// Generates an `n × n` matrix of uniform values in `[0, 1)`, drawn row-major
fn random_matrix(rng: &mut ChaCha8Rng, n: usize) -> DMatrix<f64> {
    let entries: Vec<f64> = (0..n * n).map(|_| rng.gen::<f64>()).collect();
    DMatrix::from_row_slice(n, n, &entries)
}
