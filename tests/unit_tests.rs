// Unit tests for Cosmic Match

use chrono::NaiveDate;
use cosmic_match::core::{
    life_path_meaning, life_path_number, normalize_identity, pair_seed_string, sun_sign,
    PairKey, PairScoreEngine, FACTORS,
};
use cosmic_match::models::{Method, ScoringBands, Tier, UserAttributes};

fn attrs(birth: (i32, u32, u32), palm: Option<&str>, name: Option<&str>) -> UserAttributes {
    UserAttributes {
        birth_date: NaiveDate::from_ymd_opt(birth.0, birth.1, birth.2).unwrap(),
        palm_signature: palm.map(str::to_string),
        legal_name: name.map(str::to_string),
        ..UserAttributes::fallback()
    }
}

#[test]
fn test_identity_equality_is_case_insensitive() {
    assert_eq!(normalize_identity("  ALICE@X.COM "), normalize_identity("alice@x.com"));
    assert_ne!(normalize_identity("alice@x.com"), normalize_identity("alicia@x.com"));
}

#[test]
fn test_seed_string_byte_identical_from_either_side() {
    // The seed built from sorted identities and sorted palm signatures must
    // be byte-identical whether computed from Alice's or Bob's record.
    let alice = attrs((1992, 4, 2), Some("SIGA"), None);
    let bob = attrs((1989, 10, 11), Some("SIGB"), None);

    let from_alice = pair_seed_string("alice@x.com", &alice, "bob@x.com", &bob);
    let from_bob = pair_seed_string("bob@x.com", &bob, "alice@x.com", &alice);

    assert_eq!(from_alice, from_bob);
    assert!(from_alice.starts_with("alice@x.com|bob@x.com|SIGA|SIGB"));
}

#[test]
fn test_score_symmetry_across_many_pairs() {
    let engine = PairScoreEngine::with_default_bands();

    for i in 0..25 {
        let a_id = format!("user{}@x.com", i);
        let b_id = format!("user{}@x.com", i + 100);
        let a = attrs((1980 + i, 1 + (i as u32 % 12), 1 + (i as u32 % 28)), Some("PA"), None);
        let b = attrs((1990 - i, 12 - (i as u32 % 11), 1 + (i as u32 % 27)), None, Some("B"));

        let ab = engine.score(&a_id, &a, &b_id, &b);
        let ba = engine.score(&b_id, &b, &a_id, &a);
        assert_eq!(ab, ba, "asymmetric score for pair {}", i);
    }
}

#[test]
fn test_score_determinism() {
    let engine = PairScoreEngine::with_default_bands();
    let a = attrs((1992, 4, 2), Some("SIGA"), Some("Alice Doe"));
    let b = attrs((1989, 10, 11), Some("SIGB"), Some("Bob Roe"));

    let first = engine.score("alice@x.com", &a, "bob@x.com", &b);
    for _ in 0..10 {
        assert_eq!(engine.score("alice@x.com", &a, "bob@x.com", &b), first);
    }
}

#[test]
fn test_attribute_change_is_localized() {
    let engine = PairScoreEngine::with_default_bands();
    let a_before = attrs((1992, 4, 2), Some("SIGA"), None);
    let a_after = attrs((1992, 4, 2), Some("SIGA-rescanned"), None);
    let b = attrs((1989, 10, 11), Some("SIGB"), None);
    let c = attrs((1985, 6, 20), Some("SIGC"), None);
    let d = attrs((1995, 2, 14), Some("SIGD"), None);

    // Changing Alice's palm signature changes her pair with Bob
    let ab_before = engine.score("alice@x.com", &a_before, "bob@x.com", &b);
    let ab_after = engine.score("alice@x.com", &a_after, "bob@x.com", &b);
    assert_ne!(ab_before, ab_after);

    // ...and leaves an unrelated pair untouched
    let cd_before = engine.score("carol@x.com", &c, "dan@x.com", &d);
    let cd_after = engine.score("carol@x.com", &c, "dan@x.com", &d);
    assert_eq!(cd_before, cd_after);
}

#[test]
fn test_factor_names_and_order() {
    let engine = PairScoreEngine::with_default_bands();
    let a = attrs((1992, 4, 2), Some("SIGA"), None);
    let b = attrs((1989, 10, 11), Some("SIGB"), None);

    let score = engine.score("alice@x.com", &a, "bob@x.com", &b);
    let names: Vec<&str> = score.factors.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "sun_sign_synergy",
            "venus_alignment",
            "life_path_resonance",
            "karmic_echo",
            "heart_line_affinity",
            "mount_balance",
        ]
    );
    assert_eq!(names.len(), FACTORS.len());
}

#[test]
fn test_method_gating_is_pairwise() {
    let engine = PairScoreEngine::with_default_bands();
    let mut a = attrs((1992, 4, 2), Some("SIGA"), None);
    a.methods = vec![Method::Astrology, Method::Palmistry];
    let mut b = attrs((1989, 10, 11), Some("SIGB"), None);
    b.methods = vec![Method::Astrology, Method::Numerology];

    // Only the methods both sides enable appear
    let score = engine.score("alice@x.com", &a, "bob@x.com", &b);
    let names: Vec<&str> = score.factors.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["sun_sign_synergy", "venus_alignment"]);
}

#[test]
fn test_tiers_follow_thresholds() {
    let bands = ScoringBands::default();
    let engine = PairScoreEngine::new(bands);
    let b = attrs((1989, 10, 11), None, None);

    for i in 0..100 {
        let a = attrs((1970 + (i % 40), 1 + (i as u32 % 12), 1 + (i as u32 % 28)), None, None);
        let score = engine.score(&format!("u{}@x.com", i), &a, "bob@x.com", &b);
        let expected = if score.total >= bands.high_threshold {
            Tier::CosmicBond
        } else if score.total >= bands.medium_threshold {
            Tier::StrongAlignment
        } else {
            Tier::FaintSpark
        };
        assert_eq!(score.tier, expected);
    }
}

#[test]
fn test_self_card_scores_one_hundred() {
    let engine = PairScoreEngine::with_default_bands();
    let a = attrs((1992, 4, 2), Some("SIGA"), None);

    let card = engine.score("alice@x.com", &a, "ALICE@x.com", &a);
    assert_eq!(card.total, 100);
    assert_eq!(card.tier, Tier::CosmicBond);
}

#[test]
fn test_sun_sign_and_life_path() {
    let date = NaiveDate::from_ymd_opt(1990, 8, 5).unwrap();
    assert_eq!(sun_sign(date), "Leo");

    let n = life_path_number(date);
    assert!((1..=9).contains(&n));
    assert!(!life_path_meaning(n).is_empty());
}

#[test]
fn test_pair_key_matches_seed_ordering() {
    let key = PairKey::new("Bob@X.com", " alice@x.com");
    assert_eq!((key.lo.as_str(), key.hi.as_str()), ("alice@x.com", "bob@x.com"));
    assert!(!key.is_self());
    assert!(PairKey::new("a@x.com", "A@X.COM").is_self());
}
