//! UUID v4 and ULID generation from an injected random source.

use rand::Rng;
use uuid::Builder;

const ULID_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const ULID_LEN: usize = 26;
const TIME_CHARS: usize = 10;
const MAX_BATCH: usize = 1000;

/// Random UUID with the RFC 4122 version (4) and variant bits set.
pub fn uuid_v4<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes[..]);
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}

/// `count` v4 UUIDs; `count` is clamped to `1..=1000`.
pub fn uuid_batch<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<String> {
    (0..count.clamp(1, MAX_BATCH)).map(|_| uuid_v4(rng)).collect()
}

/// 48-bit millisecond time in the first 10 chars, 80 random bits in the
/// last 16, Crockford Base32.
pub fn encode_ulid(timestamp_ms: u64, randomness: [u8; 10]) -> String {
    let mut chars = [0u8; ULID_LEN];
    let mut ts = timestamp_ms & ((1u64 << 48) - 1);
    for slot in chars[..TIME_CHARS].iter_mut().rev() {
        *slot = ULID_ALPHABET[(ts & 0x1F) as usize];
        ts >>= 5;
    }
    let mut rand_val = randomness
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte));
    for slot in chars[TIME_CHARS..].iter_mut().rev() {
        *slot = ULID_ALPHABET[(rand_val & 0x1F) as usize];
        rand_val >>= 5;
    }
    chars.iter().map(|&b| char::from(b)).collect()
}

pub fn ulid<R: Rng + ?Sized>(timestamp_ms: u64, rng: &mut R) -> String {
    let mut randomness = [0u8; 10];
    rng.fill(&mut randomness[..]);
    encode_ulid(timestamp_ms, randomness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn uuid_has_version_and_variant() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        let id = uuid_v4(&mut rng);
        assert_eq!(id.len(), 36);
        let bytes: Vec<char> = id.chars().collect();
        assert_eq!(bytes[14], '4');
        assert!(matches!(bytes[19], '8' | '9' | 'a' | 'b'));
        let parsed = uuid::Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn batch_is_clamped() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        assert_eq!(uuid_batch(0, &mut rng).len(), 1);
        assert_eq!(uuid_batch(5000, &mut rng).len(), MAX_BATCH);
        let ids = uuid_batch(10, &mut rng);
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn ulid_encodes_time_prefix() {
        let id = encode_ulid(1_469_918_176_385, [0xff; 10]);
        assert_eq!(id, "01ARYZ6S41ZZZZZZZZZZZZZZZZ");
        assert_eq!(encode_ulid(0, [0; 10]), "0".repeat(ULID_LEN));
    }

    #[test]
    fn ulid_sorts_by_time() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let earlier = ulid(1_000, &mut rng);
        let later = ulid(2_000, &mut rng);
        assert_eq!(earlier.len(), ULID_LEN);
        assert!(earlier[..TIME_CHARS] < later[..TIME_CHARS]);
    }
}
