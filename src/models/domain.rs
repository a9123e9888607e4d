use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scoring dimensions a user can enable on their profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Astrology,
    Numerology,
    Palmistry,
}

/// Per-user profile attributes read by the scoring engine
///
/// Owned by the profile store; the engine only reads these. Optional fields
/// are substituted with fixed placeholder tokens when building the pair seed
/// so a sparse profile still scores deterministically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(rename = "birthDate")]
    pub birth_date: NaiveDate,
    #[serde(rename = "palmSignature", default)]
    pub palm_signature: Option<String>,
    #[serde(rename = "legalName", default)]
    pub legal_name: Option<String>,
    #[serde(rename = "birthTime", default)]
    pub birth_time: Option<String>,
    #[serde(rename = "birthPlace", default)]
    pub birth_place: Option<String>,
    #[serde(default = "all_methods")]
    pub methods: Vec<Method>,
}

impl UserAttributes {
    /// Default profile substituted when stored attributes fail to parse.
    /// The feed keeps rendering rather than surfacing a mid-feed crash.
    pub fn fallback() -> Self {
        Self {
            birth_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            palm_signature: None,
            legal_name: None,
            birth_time: None,
            birth_place: None,
            methods: all_methods(),
        }
    }

    pub fn has_method(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}

fn all_methods() -> Vec<Method> {
    vec![Method::Astrology, Method::Numerology, Method::Palmistry]
}

/// Coarse bucket label derived from the numeric score via fixed thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    CosmicBond,
    StrongAlignment,
    FaintSpark,
}

/// One named sub-factor of a pair score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorScore {
    pub name: String,
    pub score: u8,
}

/// Full scoring result for a pair, identical regardless of query direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairScore {
    pub total: u8,
    pub factors: Vec<FactorScore>,
    pub tier: Tier,
}

/// Like/mutual-match state for one unordered pair
///
/// `pair_lo`/`pair_hi` are the lexicographically ordered normalized
/// identities. The record is hard-deleted on a safety violation; a later
/// like from either side starts from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "pairLo")]
    pub pair_lo: String,
    #[serde(rename = "pairHi")]
    pub pair_hi: String,
    pub initiator: String,
    pub mutual: bool,
    pub unlocked: bool,
    #[serde(rename = "acceptedLo")]
    pub accepted_lo: bool,
    #[serde(rename = "acceptedHi")]
    pub accepted_hi: bool,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MatchRecord {
    /// Whether the given (normalized) identity has accepted this chat
    pub fn accepted_by(&self, identity: &str) -> bool {
        if identity == self.pair_lo {
            self.accepted_lo
        } else if identity == self.pair_hi {
            self.accepted_hi
        } else {
            false
        }
    }
}

/// A persisted chat message between a mutual pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: uuid::Uuid,
    #[serde(rename = "pairLo")]
    pub pair_lo: String,
    #[serde(rename = "pairHi")]
    pub pair_hi: String,
    pub sender: String,
    pub body: String,
    #[serde(rename = "sentAt")]
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

/// Score bands, tier thresholds and element bonuses
///
/// Product-tuning constants, injected from configuration. The bands are not
/// a law; the symmetry and determinism contracts are.
#[derive(Debug, Clone, Copy)]
pub struct ScoringBands {
    pub pair_min: u8,
    pub pair_max: u8,
    pub factor_min: u8,
    pub factor_max: u8,
    pub high_threshold: u8,
    pub medium_threshold: u8,
    pub same_element_bonus: u8,
    pub harmony_bonus: u8,
}

impl Default for ScoringBands {
    fn default() -> Self {
        Self {
            pair_min: 65,
            pair_max: 98,
            factor_min: 60,
            factor_max: 98,
            high_threshold: 90,
            medium_threshold: 78,
            same_element_bonus: 4,
            harmony_bonus: 2,
        }
    }
}

impl ScoringBands {
    pub fn tier_for(&self, total: u8) -> Tier {
        if total >= self.high_threshold {
            Tier::CosmicBond
        } else if total >= self.medium_threshold {
            Tier::StrongAlignment
        } else {
            Tier::FaintSpark
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        let bands = ScoringBands::default();
        assert_eq!(bands.tier_for(90), Tier::CosmicBond);
        assert_eq!(bands.tier_for(89), Tier::StrongAlignment);
        assert_eq!(bands.tier_for(78), Tier::StrongAlignment);
        assert_eq!(bands.tier_for(77), Tier::FaintSpark);
    }

    #[test]
    fn test_accepted_by_sides() {
        let record = MatchRecord {
            pair_lo: "a@x.com".to_string(),
            pair_hi: "b@x.com".to_string(),
            initiator: "a@x.com".to_string(),
            mutual: true,
            unlocked: false,
            accepted_lo: true,
            accepted_hi: false,
            created_at: chrono::Utc::now(),
        };

        assert!(record.accepted_by("a@x.com"));
        assert!(!record.accepted_by("b@x.com"));
        assert!(!record.accepted_by("stranger@x.com"));
    }
}
