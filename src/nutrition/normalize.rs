//! Provider-aware nutrient normalization.
//!
//! Each provider names nutrients differently:
//! - Open Food Facts: fixed slugs with a `_100g` suffix (`proteins_100g`)
//! - USDA: free-text names (`"Protein"`, `"Total lipid (fat)"`), matched
//!   case-insensitively by substring, optionally restricted to a unit
//! - FatSecret: per-serving fields holding numbers as text (`"protein": "31.02"`)
//!
//! The tables below declare, per provider, which raw identifiers feed each
//! [`NutrientKey`], in priority order. Unmapped nutrients are dropped.

use std::collections::BTreeMap;

use super::domain::{NutrientKey, ProviderId, RawNutrient};

/// How a raw nutrient identifier is recognized
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Exact key
    Key(&'static str),
    /// Case-insensitive substring, with an optional required unit
    Contains(&'static str, Option<&'static str>),
}

impl Matcher {
    fn matches(self, nutrient: &RawNutrient) -> bool {
        match self {
            Matcher::Key(key) => nutrient.name == key,
            Matcher::Contains(needle, unit) => {
                nutrient
                    .name
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
                    && unit.is_none_or(|unit| {
                        nutrient
                            .unit
                            .as_deref()
                            .is_some_and(|u| u.eq_ignore_ascii_case(unit))
                    })
            }
        }
    }
}

type Rule = (NutrientKey, &'static [Matcher]);

const OPEN_FOOD_FACTS: &[Rule] = &[
    (NutrientKey::Calories, &[Matcher::Key("energy-kcal_100g")]),
    (NutrientKey::Protein, &[Matcher::Key("proteins_100g")]),
    (NutrientKey::Carbohydrates, &[Matcher::Key("carbohydrates_100g")]),
    (NutrientKey::Fat, &[Matcher::Key("fat_100g")]),
    (NutrientKey::Fiber, &[Matcher::Key("fiber_100g")]),
    (NutrientKey::Calcium, &[Matcher::Key("calcium_100g")]),
    (
        NutrientKey::Omega3,
        &[
            Matcher::Key("omega-3-fat_100g"),
            Matcher::Key("alpha-linolenic-acid_100g"),
        ],
    ),
    (NutrientKey::SaturatedFat, &[Matcher::Key("saturated-fat_100g")]),
    (NutrientKey::Iron, &[Matcher::Key("iron_100g")]),
    (NutrientKey::Sodium, &[Matcher::Key("sodium_100g")]),
    (NutrientKey::Potassium, &[Matcher::Key("potassium_100g")]),
    (NutrientKey::Choline, &[Matcher::Key("choline_100g")]),
    (NutrientKey::Caffeine, &[Matcher::Key("caffeine_100g")]),
];

const USDA: &[Rule] = &[
    // Energy is reported in both KCAL and kJ
    (NutrientKey::Calories, &[Matcher::Contains("Energy", Some("KCAL"))]),
    (NutrientKey::Protein, &[Matcher::Contains("Protein", None)]),
    (
        NutrientKey::Carbohydrates,
        &[Matcher::Contains("Carbohydrate, by difference", None)],
    ),
    (NutrientKey::Fat, &[Matcher::Contains("Total lipid (fat)", None)]),
    (NutrientKey::Fiber, &[Matcher::Contains("Fiber, total dietary", None)]),
    (NutrientKey::Calcium, &[Matcher::Contains("Calcium, Ca", None)]),
    (NutrientKey::Omega3, &[Matcher::Contains("18:3 n-3", None)]),
    (
        NutrientKey::SaturatedFat,
        &[Matcher::Contains("Fatty acids, total saturated", None)],
    ),
    (NutrientKey::Iron, &[Matcher::Contains("Iron, Fe", None)]),
    (NutrientKey::Sodium, &[Matcher::Contains("Sodium, Na", None)]),
    (NutrientKey::Potassium, &[Matcher::Contains("Potassium, K", None)]),
    (NutrientKey::Choline, &[Matcher::Contains("Choline, total", None)]),
    (NutrientKey::Caffeine, &[Matcher::Contains("Caffeine", None)]),
];

const FATSECRET: &[Rule] = &[
    (NutrientKey::Calories, &[Matcher::Key("calories")]),
    (NutrientKey::Protein, &[Matcher::Key("protein")]),
    (
        NutrientKey::Carbohydrates,
        &[Matcher::Key("carbohydrate"), Matcher::Key("carbs")],
    ),
    (NutrientKey::Fat, &[Matcher::Key("fat")]),
    (NutrientKey::Fiber, &[Matcher::Key("fiber")]),
    (NutrientKey::Calcium, &[Matcher::Key("calcium")]),
    (NutrientKey::SaturatedFat, &[Matcher::Key("saturated_fat")]),
    (NutrientKey::Iron, &[Matcher::Key("iron")]),
    (NutrientKey::Sodium, &[Matcher::Key("sodium")]),
    (NutrientKey::Potassium, &[Matcher::Key("potassium")]),
];

fn rules_for(provider: ProviderId) -> &'static [Rule] {
    match provider {
        ProviderId::OpenFoodFacts(_) => OPEN_FOOD_FACTS,
        ProviderId::Usda => USDA,
        ProviderId::FatSecret => FATSECRET,
    }
}

/// Map provider nutrients to canonical keys.
///
/// For each key the provider's matchers are tried in order, and the first
/// raw nutrient with a parseable value wins. Keys with no parseable source
/// are absent from the result.
pub fn normalize(provider: ProviderId, raw: &[RawNutrient]) -> BTreeMap<NutrientKey, f64> {
    rules_for(provider)
        .iter()
        .filter_map(|(key, matchers)| {
            matchers
                .iter()
                .find_map(|matcher| {
                    raw.iter()
                        .filter(|nutrient| matcher.matches(nutrient))
                        .find_map(|nutrient| parse_amount(&nutrient.value))
                })
                .map(|value| (*key, value))
        })
        .collect()
}

/// Parse a nutrient amount, tolerating a comma decimal separator.
///
/// Returns `None` for null, non-numeric and non-finite values.
pub fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    let amount = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|a| a.is_finite())
}
