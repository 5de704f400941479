//! Migration of free-text gear effects into structured effects.
//!
//! Older sheets stored gear effects as prose ("Bane on Sneaking",
//! "Boon on AGL rolls"). The rules engine only understands structured
//! `Effect`s, so prose is classified once, when a sheet is loaded.
//! Text that matches no known pattern becomes `Effect::Narrative`.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde_json::{json, Value};
use sheetsmith_domain::value_objects::skill;
use sheetsmith_domain::{Attribute, Effect, GearEffect};

// Literal pattern, exercised by the tests below
#[allow(clippy::unwrap_used)]
fn effect_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)^\s*(boon|bane)\s+(?:on|to|for)\s+(?:all\s+)?",
            r"(.+?)(?:\s+(?:rolls?|checks?))?\s*\.?\s*$",
        ))
        .unwrap()
    })
}

/// Classify one free-text effect.
pub fn parse_effect(text: &str) -> Effect {
    let narrative = || Effect::Narrative {
        text: text.trim().to_string(),
    };

    let Some(captures) = effect_pattern().captures(text) else {
        return narrative();
    };
    let (Some(kind), Some(target)) = (captures.get(1), captures.get(2)) else {
        return narrative();
    };
    let is_bane = kind.as_str().eq_ignore_ascii_case("bane");
    let target = target.as_str().trim();

    if let Ok(attribute) = target.parse::<Attribute>() {
        return if is_bane {
            Effect::BaneOnAttribute { attribute }
        } else {
            Effect::BoonOnAttribute { attribute }
        };
    }

    match skill(target) {
        Ok(definition) => {
            let skill = definition.name.to_string();
            if is_bane {
                Effect::BaneOnSkill { skill }
            } else {
                Effect::BoonOnSkill { skill }
            }
        }
        Err(_) => narrative(),
    }
}

/// Rewrite prose gear entries of a stored sheet in place.
///
/// Accepted legacy shapes:
/// - `{"source": "Elven cloak", "effect": "Boon on Sneaking"}`
/// - `"Lantern: Bane on Sneaking"` (source and effect in one string)
///
/// Returns the number of entries rewritten. Structured entries are left alone.
pub fn migrate_gear(sheet: &mut Value) -> usize {
    let Some(gear) = sheet.get_mut("gear").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut migrated = 0;
    for entry in gear.iter_mut() {
        let replacement = match entry {
            Value::String(line) => {
                let (source, text) = match line.split_once(':') {
                    Some((source, text)) => (source.trim(), text.trim()),
                    None => (line.trim(), line.trim()),
                };
                Some(GearEffect::new(source, parse_effect(text)))
            }
            Value::Object(map) => match map.get("effect") {
                Some(Value::String(text)) => {
                    let source = map
                        .get("source")
                        .and_then(Value::as_str)
                        .unwrap_or("Unknown")
                        .to_string();
                    Some(GearEffect::new(source, parse_effect(text)))
                }
                _ => None,
            },
            _ => None,
        };

        if let Some(gear_effect) = replacement {
            *entry = json!({
                "source": gear_effect.source,
                "effect": gear_effect.effect,
            });
            migrated += 1;
        }
    }
    migrated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bane_on_skill() {
        assert_eq!(
            parse_effect("Bane on Sneaking"),
            Effect::BaneOnSkill {
                skill: "Sneaking".to_string()
            }
        );
    }

    #[test]
    fn boon_on_attribute_rolls() {
        assert_eq!(
            parse_effect("Boon on AGL rolls"),
            Effect::BoonOnAttribute {
                attribute: Attribute::Agl
            }
        );
        assert_eq!(
            parse_effect("boon to all Strength checks."),
            Effect::BoonOnAttribute {
                attribute: Attribute::Str
            }
        );
    }

    #[test]
    fn skill_names_are_canonicalised() {
        assert_eq!(
            parse_effect("BANE ON spot hidden"),
            Effect::BaneOnSkill {
                skill: "Spot Hidden".to_string()
            }
        );
    }

    #[test]
    fn unknown_text_is_narrative() {
        assert!(parse_effect("Glows faintly near orcs").is_narrative());
        assert!(parse_effect("Bane on swimming in lava").is_narrative());
    }

    #[test]
    fn migrates_both_legacy_shapes() {
        let mut sheet = json!({
            "gear": [
                {"source": "Elven cloak", "effect": "Boon on Sneaking"},
                "Heavy armor: Bane on Evade",
                {"source": "Rope", "effect": {"kind": "narrative", "text": "10 m"}}
            ]
        });
        assert_eq!(migrate_gear(&mut sheet), 2);

        let gear: Vec<GearEffect> = serde_json::from_value(sheet["gear"].clone()).unwrap();
        assert_eq!(gear[0].source, "Elven cloak");
        assert_eq!(
            gear[1],
            GearEffect::new(
                "Heavy armor",
                Effect::BaneOnSkill {
                    skill: "Evade".to_string()
                }
            )
        );
        assert!(gear[2].effect.is_narrative());
    }

    #[test]
    fn sheet_without_gear_is_untouched() {
        let mut sheet = json!({"name": "Sigrid"});
        assert_eq!(migrate_gear(&mut sheet), 0);
        assert_eq!(sheet, json!({"name": "Sigrid"}));
    }
}
