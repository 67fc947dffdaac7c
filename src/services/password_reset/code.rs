use rand::Rng;

pub const CODE_LENGTH: usize = 6;

/// Uniformly random numeric code. Kept as text so leading zeros survive.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
