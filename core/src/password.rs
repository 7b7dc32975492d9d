// core/src/password.rs

//! Salted, memory-hard password hashing (Argon2id, PHC string format).
//!
//! Hashes embed their algorithm, version, parameters and salt, so a stored hash can
//! be verified after the configured cost changes. [`PasswordHasher::needs_rehash`]
//! reports hashes that should be upgraded the next time the plain password is known.

use argon2::{
  password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
  Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use tracing::{debug, error, instrument, warn};

use crate::error::{ShopError, ShopResult};

/// Argon2 cost settings. Defaults follow the OWASP minimum for Argon2id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
  /// Memory cost in KiB.
  pub memory_kib: u32,
  pub iterations: u32,
  pub parallelism: u32,
}

impl Default for HashingCost {
  fn default() -> Self {
    Self {
      memory_kib: 19_456,
      iterations: 2,
      parallelism: 1,
    }
  }
}

/// Upper bounds on the cost a stored hash may ask `verify` to pay (1 GiB, 16 passes, 16 lanes).
const MAX_VERIFY_MEMORY_KIB: u32 = 1_048_576;
const MAX_VERIFY_ITERATIONS: u32 = 16;
const MAX_VERIFY_PARALLELISM: u32 = 16;

fn within_verify_limits(params: &Params) -> bool {
  params.m_cost() <= MAX_VERIFY_MEMORY_KIB
    && params.t_cost() <= MAX_VERIFY_ITERATIONS
    && params.p_cost() <= MAX_VERIFY_PARALLELISM
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
  params: Params,
}

impl PasswordHasher {
  const OUTPUT_LEN: usize = 32;

  pub fn new() -> Self {
    // The default cost is a valid Argon2 parameter set.
    Self::with_cost(HashingCost::default()).unwrap_or_else(|_| Self { params: Params::default() })
  }

  pub fn with_cost(cost: HashingCost) -> ShopResult<Self> {
    let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, Some(Self::OUTPUT_LEN))
      .map_err(|e| ShopError::PasswordHash(format!("invalid Argon2 parameters {:?}: {}", cost, e)))?;
    Ok(Self { params })
  }

  pub fn cost(&self) -> HashingCost {
    HashingCost {
      memory_kib: self.params.m_cost(),
      iterations: self.params.t_cost(),
      parallelism: self.params.p_cost(),
    }
  }

  fn argon2(&self) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
  }

  /// Hashes `password` with a fresh random salt. Two calls on the same input give different strings.
  #[instrument(name = "password::hash", skip_all, err(Display))]
  pub fn hash(&self, password: &str) -> ShopResult<String> {
    if password.is_empty() {
      return Err(ShopError::Validation("Password cannot be empty".to_string()));
    }
    let salt = SaltString::generate(&mut OsRng);
    self
      .argon2()
      .hash_password(password.as_bytes(), &salt)
      .map(|hash| hash.to_string())
      .map_err(|e| {
        error!(error = %e, "Argon2 hashing failed.");
        ShopError::PasswordHash(e.to_string())
      })
  }

  /// Returns true iff `plain` matches `hash` under the parameters embedded in `hash`.
  ///
  /// Strings that are not valid PHC hashes, or name another scheme, verify as false.
  #[instrument(name = "password::verify", skip_all, fields(hash_len = hash.len()))]
  pub fn verify(&self, plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
      Ok(parsed) => parsed,
      Err(e) => {
        debug!(error = %e, "Stored hash is not a PHC string.");
        return false;
      }
    };
    // The stored hash dictates the cost of verifying it; refuse costs no hash of ours would carry.
    match Params::try_from(&parsed) {
      Ok(params) if within_verify_limits(&params) => {}
      Ok(params) => {
        warn!(
          m_cost = params.m_cost(),
          t_cost = params.t_cost(),
          p_cost = params.p_cost(),
          "Stored hash exceeds the verification cost limits."
        );
        return false;
      }
      Err(e) => {
        debug!(error = %e, "Stored hash carries unusable Argon2 parameters.");
        return false;
      }
    }
    // Argon2 picks the variant, version and cost from the parsed hash.
    Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok()
  }

  /// True when `hash` is unreadable or was produced with a different algorithm or cost.
  pub fn needs_rehash(&self, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
      return true;
    };
    if parsed.algorithm != Algorithm::Argon2id.ident() {
      return true;
    }
    match Params::try_from(&parsed) {
      Ok(stored) => {
        stored.m_cost() != self.params.m_cost()
          || stored.t_cost() != self.params.t_cost()
          || stored.p_cost() != self.params.p_cost()
      }
      Err(_) => true,
    }
  }

  /// [`hash`](Self::hash) on the blocking pool, for use inside request handlers.
  pub async fn hash_async(&self, password: String) -> ShopResult<String> {
    let hasher = self.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
      .await
      .map_err(|e| ShopError::Internal(format!("password hash task failed: {}", e)))?
  }

  /// [`verify`](Self::verify) on the blocking pool.
  pub async fn verify_async(&self, plain: String, hash: String) -> ShopResult<bool> {
    let hasher = self.clone();
    tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
      .await
      .map_err(|e| ShopError::Internal(format!("password verify task failed: {}", e)))
  }
}

impl Default for PasswordHasher {
  fn default() -> Self {
    Self::new()
  }
}
