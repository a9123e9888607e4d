use crate::models::UserAttributes;
use xxhash_rust::xxh3::xxh3_128;

/// Placeholder folded into the seed when a palm signature is absent
pub const MISSING_PALM: &str = "palm:unread";

/// Placeholder folded into the seed when a legal name is absent
pub const MISSING_NAME: &str = "name:unknown";

/// Normalize an identity for comparison and storage
///
/// Two identities are the same person iff their trimmed, lower-cased forms
/// are equal. Every identity that enters the core passes through here.
#[inline]
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Unordered pair key: the two normalized identities in lexicographic order
///
/// `PairKey::new(a, b) == PairKey::new(b, a)` for all a, b, which makes it
/// the storage key for match records and the basis of the pair seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub lo: String,
    pub hi: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let a = normalize_identity(a);
        let b = normalize_identity(b);
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn is_self(&self) -> bool {
        self.lo == self.hi
    }

    /// The opposite side of the pair from the given normalized identity
    pub fn other(&self, identity: &str) -> &str {
        if identity == self.lo {
            &self.hi
        } else {
            &self.lo
        }
    }
}

/// Build the symmetric seed string for a pair
///
/// Each same-typed pair of values is sorted lexicographically before it is
/// appended, so the final string is byte-identical for (A,B) and (B,A).
/// This ordering is what guarantees both sides see the same match percentage;
/// it must never be dropped.
pub fn pair_seed_string(
    a_id: &str,
    a_attrs: &UserAttributes,
    b_id: &str,
    b_attrs: &UserAttributes,
) -> String {
    let a_id = normalize_identity(a_id);
    let b_id = normalize_identity(b_id);
    let (id_lo, id_hi) = sorted_pair(&a_id, &b_id);

    let a_palm = a_attrs.palm_signature.as_deref().unwrap_or(MISSING_PALM);
    let b_palm = b_attrs.palm_signature.as_deref().unwrap_or(MISSING_PALM);
    let (palm_lo, palm_hi) = sorted_pair(a_palm, b_palm);

    let a_name = a_attrs.legal_name.as_deref().unwrap_or(MISSING_NAME);
    let b_name = b_attrs.legal_name.as_deref().unwrap_or(MISSING_NAME);
    let (name_lo, name_hi) = sorted_pair(a_name, b_name);

    [id_lo, id_hi, palm_lo, palm_hi, name_lo, name_hi].join("|")
}

#[inline]
fn sorted_pair<'a>(x: &'a str, y: &'a str) -> (&'a str, &'a str) {
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}

/// Stable 128-bit digest of a seed string
#[inline]
pub fn seed_digest(seed: &str) -> u128 {
    xxh3_128(seed.as_bytes())
}

/// Expand a 128-bit digest into a 32-byte generator seed
pub fn rng_seed(digest: u128) -> [u8; 32] {
    let bytes = digest.to_le_bytes();
    let mut seed = [0u8; 32];
    seed[..16].copy_from_slice(&bytes);
    seed[16..].copy_from_slice(&bytes);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(palm: Option<&str>, name: Option<&str>) -> UserAttributes {
        UserAttributes {
            palm_signature: palm.map(str::to_string),
            legal_name: name.map(str::to_string),
            ..UserAttributes::fallback()
        }
    }

    #[test]
    fn test_normalize_identity() {
        assert_eq!(normalize_identity("  Alice@X.com "), "alice@x.com");
        assert_eq!(normalize_identity("alice@x.com"), normalize_identity("ALICE@X.COM"));
    }

    #[test]
    fn test_pair_key_is_order_independent() {
        let ab = PairKey::new("Bob@x.com", "alice@x.com");
        let ba = PairKey::new("alice@x.com", "bob@x.com ");
        assert_eq!(ab, ba);
        assert_eq!(ab.lo, "alice@x.com");
        assert_eq!(ab.hi, "bob@x.com");
    }

    #[test]
    fn test_pair_key_other_side() {
        let key = PairKey::new("a@x.com", "b@x.com");
        assert_eq!(key.other("a@x.com"), "b@x.com");
        assert_eq!(key.other("b@x.com"), "a@x.com");
    }

    #[test]
    fn test_seed_string_symmetric() {
        let alice = attrs(Some("SIGA"), Some("Alice Doe"));
        let bob = attrs(Some("SIGB"), Some("Bob Roe"));

        let forward = pair_seed_string("alice@x.com", &alice, "bob@x.com", &bob);
        let backward = pair_seed_string("bob@x.com", &bob, "alice@x.com", &alice);

        assert_eq!(forward, backward);
        assert!(forward.starts_with("alice@x.com|bob@x.com|SIGA|SIGB"));
    }

    #[test]
    fn test_seed_string_uses_placeholders() {
        let sparse = attrs(None, None);
        let full = attrs(Some("SIG"), Some("Full Name"));

        let seed = pair_seed_string("a@x.com", &sparse, "b@x.com", &full);
        assert!(seed.contains(MISSING_PALM));
        assert!(seed.contains(MISSING_NAME));
    }

    #[test]
    fn test_digest_is_stable() {
        let seed = "alice@x.com|bob@x.com|SIGA|SIGB";
        assert_eq!(seed_digest(seed), seed_digest(seed));
        assert_ne!(seed_digest(seed), seed_digest("alice@x.com|bob@x.com|SIGA|SIGC"));
    }

    #[test]
    fn test_rng_seed_expansion() {
        let seed = rng_seed(0x0123_4567_89ab_cdef_0011_2233_4455_6677);
        assert_eq!(&seed[..16], &seed[16..]);
    }
}
