use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Random alphanumeric secret, used for the webhook secret token when none
/// is configured.
pub fn create_random_secret(secret_len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}
