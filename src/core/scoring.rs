use crate::core::seed::{pair_seed_string, rng_seed, seed_digest, PairKey};
use crate::core::zodiac::element_bonus;
use crate::models::{FactorScore, Method, PairScore, ScoringBands, Tier, UserAttributes};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sub-factor names and the method each belongs to, in draw order.
///
/// The order is part of the contract: every factor draw consumes generator
/// state, so reordering or removing an entry silently changes every score in
/// production. Append-only.
pub const FACTORS: &[(&str, Method)] = &[
    ("sun_sign_synergy", Method::Astrology),
    ("venus_alignment", Method::Astrology),
    ("life_path_resonance", Method::Numerology),
    ("karmic_echo", Method::Numerology),
    ("heart_line_affinity", Method::Palmistry),
    ("mount_balance", Method::Palmistry),
];

/// Score assigned to the self/"own destiny" card and all of its factors
pub const SELF_SCORE: u8 = 100;

/// Deterministic, symmetric compatibility scoring engine
///
/// For a given pair the result is identical regardless of query direction,
/// stable across repeated queries, and changes only when an attribute folded
/// into the seed changes.
#[derive(Debug, Clone)]
pub struct PairScoreEngine {
    bands: ScoringBands,
}

impl PairScoreEngine {
    pub fn new(bands: ScoringBands) -> Self {
        Self { bands }
    }

    pub fn with_default_bands() -> Self {
        Self {
            bands: ScoringBands::default(),
        }
    }

    /// Score a pair of users
    ///
    /// Draw order: total first, then each factor in `FACTORS` order. Every
    /// factor is always drawn so the generator stream does not depend on the
    /// enabled-method flags; a factor only appears in the breakdown when both
    /// users have its method enabled. The element bonus is added to the total
    /// before tier classification.
    pub fn score(
        &self,
        me_id: &str,
        me: &UserAttributes,
        other_id: &str,
        other: &UserAttributes,
    ) -> PairScore {
        let key = PairKey::new(me_id, other_id);
        if key.is_self() {
            return self.self_card(me);
        }

        let seed = pair_seed_string(me_id, me, other_id, other);
        let mut rng = StdRng::from_seed(rng_seed(seed_digest(&seed)));

        let base: u8 = rng.random_range(self.bands.pair_min..=self.bands.pair_max);

        let mut factors = Vec::with_capacity(FACTORS.len());
        for (name, method) in FACTORS {
            let value: u8 = rng.random_range(self.bands.factor_min..=self.bands.factor_max);
            if me.has_method(*method) && other.has_method(*method) {
                factors.push(FactorScore {
                    name: (*name).to_string(),
                    score: value,
                });
            }
        }

        let bonus = element_bonus(me.birth_date, other.birth_date, &self.bands);
        let total = base.saturating_add(bonus).min(100);

        PairScore {
            total,
            factors,
            tier: self.bands.tier_for(total),
        }
    }

    fn self_card(&self, me: &UserAttributes) -> PairScore {
        let factors = FACTORS
            .iter()
            .filter(|(_, method)| me.has_method(*method))
            .map(|(name, _)| FactorScore {
                name: (*name).to_string(),
                score: SELF_SCORE,
            })
            .collect();

        PairScore {
            total: SELF_SCORE,
            factors,
            tier: Tier::CosmicBond,
        }
    }
}

impl Default for PairScoreEngine {
    fn default() -> Self {
        Self::with_default_bands()
    }
}
