//! Initial password generation.

use rand::Rng;

/// Special characters permitted by the password policy.
const SPECIALS: &[u8] = b"!@#$%^&*()";

/// Generates an initial account password.
///
/// Fixed format: one uppercase letter, three lowercase letters, five
/// digits, one character from [`SPECIALS`], concatenated in that order.
/// The character classes and their order are part of the exposed policy;
/// downstream tooling parses these passwords, so do not reshuffle them
/// without notice.
#[must_use]
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let mut password = String::with_capacity(10);

    password.push(rng.gen_range(b'A'..=b'Z') as char);
    for _ in 0..3 {
        password.push(rng.gen_range(b'a'..=b'z') as char);
    }
    for _ in 0..5 {
        password.push(rng.gen_range(b'0'..=b'9') as char);
    }
    password.push(SPECIALS[rng.gen_range(0..SPECIALS.len())] as char);

    password
}
