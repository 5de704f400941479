//! PlayerCharacter aggregate - a character sheet and its play state
//!
//! # Rustic DDD Design
//!
//! This aggregate follows Rustic DDD principles:
//! - **Private fields**: All fields are encapsulated
//! - **Valid by construction**: raw attributes and magic school are checked in `new()`
//! - **Outcome enums**: mutations report what happened via `events::character_events`
//! - **Snapshot semantics**: every mutation leaves a complete sheet for the caller to persist

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

use crate::error::DomainError;
use crate::events::{
    AdvancementOutcome, ConditionToggled, DamageOutcome, HealOutcome, PoolResized, PowerUsed,
    RestOutcome, SkillMarkOutcome,
};
use crate::game_systems::dragonbane::{
    self as rules, AdvancementKind, AdvancementTracker, DerivedStats, RestState, RestTier,
    RollContext,
};
use crate::ids::CharacterId;
use crate::value_objects::{
    skill, Ability, AgeCategory, Attribute, Attributes, CharacterName, Condition, Conditions,
    GearEffect, Kin, MagicSchool, Profession, ResourceKind, ResourcePool, RollModifier,
    SkillDefinition, Spell, MAX_RAW_ATTRIBUTE,
};

/// A milestone reward picked by the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvancementChoice {
    Attribute { attribute: Attribute },
    Skill { skill: String },
    Spell { spell: Spell },
    HeroicAbility { ability: Ability },
}

impl AdvancementChoice {
    pub fn kind(&self) -> AdvancementKind {
        match self {
            AdvancementChoice::Attribute { .. } => AdvancementKind::Attribute,
            AdvancementChoice::Skill { .. } => AdvancementKind::Skill,
            AdvancementChoice::Spell { .. } => AdvancementKind::Spell,
            AdvancementChoice::HeroicAbility { .. } => AdvancementKind::HeroicAbility,
        }
    }
}

/// Everything needed to roll a skill check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillCheck {
    pub skill: &'static SkillDefinition,
    pub trained: bool,
    /// Effective skill value: base chance, doubled if trained.
    pub value: u8,
    pub context: RollContext,
    /// The modifier to roll with after forced banes were applied.
    pub modifier: RollModifier,
}

/// A player character sheet.
///
/// # Invariants
///
/// - Raw attributes are always within [3, 18]
/// - `magic_school` is set if and only if the profession is Mage
/// - `0 <= current_hp <= final CON` and `0 <= current_wp <= final WIL`
/// - Trained and marked skill names are catalogue names
/// - Marks only accumulate
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use sheetsmith_domain::aggregates::PlayerCharacter;
/// use sheetsmith_domain::value_objects::{
///     AgeCategory, Attribute, Attributes, CharacterName, Kin, Profession,
/// };
///
/// let raw = Attributes::uniform(10).with(Attribute::Str, 14);
/// let name = CharacterName::new("Bjarni").unwrap();
/// let pc = PlayerCharacter::new(
///     name,
///     Kin::Dwarf,
///     AgeCategory::Old,
///     Profession::Fighter,
///     None,
///     raw,
///     Utc::now(),
/// )
/// .unwrap();
///
/// assert_eq!(pc.derived().final_value(Attribute::Str), 12);
/// assert_eq!(pc.skill_value("Swords").unwrap(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCharacter {
    // Identity
    id: CharacterId,
    name: CharacterName,
    kin: Kin,
    age: AgeCategory,
    profession: Profession,
    magic_school: Option<MagicSchool>,

    // Sheet
    attributes: Attributes,
    trained_skills: BTreeSet<String>,
    heroic_abilities: Vec<Ability>,
    spells: Vec<Spell>,
    gear: Vec<GearEffect>,

    // Play state
    conditions: Conditions,
    hp: ResourcePool,
    wp: ResourcePool,
    marked_skills: BTreeSet<String>,
    advancements: AdvancementTracker,

    // Metadata
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlayerCharacter {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a new character with full HP and WP.
    ///
    /// A mage starts trained in their school's magic skill.
    ///
    /// # Errors
    ///
    /// - `DomainError::Validation` if a raw attribute is outside [3, 18]
    /// - `DomainError::Validation` if a mage has no school or a non-mage has one
    pub fn new(
        name: CharacterName,
        kin: Kin,
        age: AgeCategory,
        profession: Profession,
        magic_school: Option<MagicSchool>,
        attributes: Attributes,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        attributes.validate_raw()?;
        check_magic_school(profession, magic_school)?;

        let derived = rules::derive_unchecked(&attributes, age, kin);
        let mut trained_skills = BTreeSet::new();
        if let Some(school) = magic_school {
            trained_skills.insert(school.skill_name().to_string());
        }

        Ok(Self {
            id: CharacterId::new(),
            name,
            kin,
            age,
            profession,
            magic_school,
            attributes,
            trained_skills,
            heroic_abilities: Vec::new(),
            spells: Vec::new(),
            gear: Vec::new(),
            conditions: Conditions::none(),
            hp: ResourcePool::full(ResourceKind::HitPoints, derived.max_hp),
            wp: ResourcePool::full(ResourceKind::Willpower, derived.max_wp),
            marked_skills: BTreeSet::new(),
            advancements: AdvancementTracker::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    // =========================================================================
    // Identity Accessors (read-only)
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn kin(&self) -> Kin {
        self.kin
    }

    #[inline]
    pub fn age(&self) -> AgeCategory {
        self.age
    }

    #[inline]
    pub fn profession(&self) -> Profession {
        self.profession
    }

    #[inline]
    pub fn magic_school(&self) -> Option<MagicSchool> {
        self.magic_school
    }

    // =========================================================================
    // Sheet Accessors
    // =========================================================================

    /// Raw attribute scores.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn trained_skills(&self) -> impl Iterator<Item = &str> {
        self.trained_skills.iter().map(String::as_str)
    }

    #[inline]
    pub fn heroic_abilities(&self) -> &[Ability] {
        &self.heroic_abilities
    }

    #[inline]
    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    #[inline]
    pub fn gear(&self) -> &[GearEffect] {
        &self.gear
    }

    /// Kin abilities followed by heroic abilities.
    pub fn abilities(&self) -> Vec<Ability> {
        let mut abilities = self.kin.abilities();
        abilities.extend(self.heroic_abilities.iter().cloned());
        abilities
    }

    // =========================================================================
    // Play State Accessors
    // =========================================================================

    #[inline]
    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    #[inline]
    pub fn hp(&self) -> &ResourcePool {
        &self.hp
    }

    #[inline]
    pub fn wp(&self) -> &ResourcePool {
        &self.wp
    }

    pub fn marked_skills(&self) -> impl Iterator<Item = &str> {
        self.marked_skills.iter().map(String::as_str)
    }

    #[inline]
    pub fn advancements(&self) -> &AdvancementTracker {
        &self.advancements
    }

    // =========================================================================
    // Metadata Accessors
    // =========================================================================

    /// Optimistic-lock version; bumped by the engine on every save.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Builder Methods (for construction)
    // =========================================================================

    /// Set the character's ID (used when loading from storage).
    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    /// Rebase the sheet onto a stored version, e.g. when importing a copy
    /// over an existing character.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Train skills at creation time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for a name outside the skill catalogue.
    pub fn with_trained_skills<I, S>(mut self, skills: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in skills {
            let definition = skill(name.as_ref())?;
            self.trained_skills.insert(definition.name.to_string());
        }
        Ok(self)
    }

    pub fn with_heroic_ability(mut self, ability: Ability) -> Self {
        self.heroic_abilities.push(ability);
        self
    }

    pub fn with_spell(mut self, spell: Spell) -> Self {
        self.spells.push(spell);
        self
    }

    pub fn with_gear(mut self, gear: GearEffect) -> Self {
        self.gear.push(gear);
        self
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Final attributes, base chances, movement, damage bonuses and pool maxima.
    pub fn derived(&self) -> DerivedStats {
        rules::derive_unchecked(&self.attributes, self.age, self.kin)
    }

    /// Number of distinct marked skills.
    pub fn level(&self) -> u32 {
        rules::level_of(&self.marked_skills)
    }

    pub fn is_trained(&self, name: &str) -> bool {
        skill(name).is_ok_and(|definition| self.trained_skills.contains(definition.name))
    }

    /// Effective value of a skill.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for an unknown skill.
    pub fn skill_value(&self, name: &str) -> Result<u8, DomainError> {
        let definition = skill(name)?;
        let base = self.derived().base_chance(definition.attribute);
        Ok(rules::effective_skill_value(
            base,
            self.trained_skills.contains(definition.name),
        ))
    }

    /// Prepare a check: skill value, forced banes from conditions and gear,
    /// and the modifier to roll with.
    pub fn prepare_check(
        &self,
        name: &str,
        requested: RollModifier,
    ) -> Result<SkillCheck, DomainError> {
        let definition = skill(name)?;
        let trained = self.trained_skills.contains(definition.name);
        let value = rules::effective_skill_value(
            self.derived().base_chance(definition.attribute),
            trained,
        );
        let context = rules::roll_context(definition, &self.conditions, &self.gear);
        let modifier = context.resolve(requested);

        Ok(SkillCheck {
            skill: definition,
            trained,
            value,
            context,
            modifier,
        })
    }

    // =========================================================================
    // Play Mutations
    // =========================================================================

    /// Mark a skill after a Dragon or Demon. Marking twice changes nothing.
    pub fn mark_skill(
        &mut self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<SkillMarkOutcome, DomainError> {
        let definition = skill(name)?;
        if !self.marked_skills.insert(definition.name.to_string()) {
            return Ok(SkillMarkOutcome::AlreadyMarked {
                skill: definition.name.to_string(),
            });
        }
        self.touch(now);
        Ok(SkillMarkOutcome::Marked {
            skill: definition.name.to_string(),
            level: self.level(),
        })
    }

    pub fn toggle_condition(
        &mut self,
        condition: Condition,
        now: DateTime<Utc>,
    ) -> ConditionToggled {
        self.conditions = self.conditions.toggle(condition);
        self.touch(now);
        ConditionToggled {
            condition,
            active: self.conditions.is_active(condition),
        }
    }

    pub fn clear_conditions(&mut self, now: DateTime<Utc>) {
        self.conditions = self.conditions.cleared();
        self.touch(now);
    }

    pub fn apply_damage(&mut self, amount: i32, now: DateTime<Utc>) -> DamageOutcome {
        if self.hp.is_empty() {
            return DamageOutcome::AlreadyDown;
        }
        let damage_dealt = self.hp.debit(amount);
        self.touch(now);
        if self.hp.is_empty() {
            DamageOutcome::Downed { damage_dealt }
        } else {
            DamageOutcome::Wounded {
                damage_dealt,
                remaining_hp: self.hp.current(),
            }
        }
    }

    pub fn heal(&mut self, amount: i32, now: DateTime<Utc>) -> HealOutcome {
        if self.hp.is_full() {
            return HealOutcome::AlreadyFull;
        }
        let amount_healed = self.hp.credit(amount);
        self.touch(now);
        HealOutcome::Healed {
            amount_healed,
            new_hp: self.hp.current(),
        }
    }

    /// Activate a kin or heroic ability, paying its WP cost.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if the character lacks the ability
    /// - `DomainError::InsufficientResource` if WP cannot cover the cost
    pub fn use_ability(
        &mut self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<PowerUsed, DomainError> {
        let ability = self
            .abilities()
            .into_iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| DomainError::not_found("ability", name.trim()))?;

        let wp_spent = ability.cost();
        let remaining_wp = self.wp.spend(wp_spent)?;
        self.touch(now);
        Ok(PowerUsed {
            name: ability.name,
            wp_spent,
            remaining_wp,
        })
    }

    /// Cast a known spell at `power_level`.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidStateTransition` if the character is not a mage
    /// - `DomainError::NotFound` if the spell is not known
    /// - `DomainError::Validation` for a power level outside 1-3
    /// - `DomainError::InsufficientResource` if WP cannot cover the cost
    pub fn cast_spell(
        &mut self,
        name: &str,
        power_level: u8,
        now: DateTime<Utc>,
    ) -> Result<PowerUsed, DomainError> {
        if !self.profession.is_mage() {
            return Err(DomainError::invalid_state_transition(format!(
                "A {} cannot cast spells",
                self.profession
            )));
        }
        let spell = self
            .spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| DomainError::not_found("spell", name.trim()))?;

        let wp_spent = spell.casting_cost(power_level)?;
        let spell_name = spell.name.clone();
        let remaining_wp = self.wp.spend(wp_spent)?;
        self.touch(now);
        Ok(PowerUsed {
            name: spell_name,
            wp_spent,
            remaining_wp,
        })
    }

    /// Rest and recover. `roll` is given a die size and returns `1..=size`.
    pub fn rest<R>(
        &mut self,
        tier: RestTier,
        healer_present: bool,
        roll: &mut R,
        now: DateTime<Utc>,
    ) -> RestOutcome
    where
        R: FnMut(u8) -> u8,
    {
        let state = RestState {
            hp: self.hp,
            wp: self.wp,
            conditions: self.conditions,
        };
        let result = rules::apply_rest(state, tier, healer_present, roll);
        self.hp = result.state.hp;
        self.wp = result.state.wp;
        self.conditions = result.state.conditions;
        self.touch(now);

        RestOutcome {
            tier,
            rolled: result.rolled,
            hp_recovered: result.hp_recovered,
            wp_recovered: result.wp_recovered,
            conditions_cleared: tier == RestTier::Shift,
        }
    }

    // =========================================================================
    // Advancement
    // =========================================================================

    /// Milestone rewards still open at the current level.
    pub fn available_advancements(&self) -> BTreeSet<AdvancementKind> {
        self.advancements.available(self.level(), self.profession)
    }

    /// Take a milestone reward at the current level.
    ///
    /// The choice is checked before the milestone is claimed, so a rejected
    /// choice leaves the sheet unchanged.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidStateTransition` if the reward is not offered now
    /// - `DomainError::DuplicateSelection` if it was already taken at this
    ///   level, or the skill/spell/ability is already known
    /// - `DomainError::Validation` if an attribute would exceed 18
    pub fn apply_advancement(
        &mut self,
        choice: AdvancementChoice,
        now: DateTime<Utc>,
    ) -> Result<AdvancementOutcome, DomainError> {
        let level = self.level();
        let kind = choice.kind();

        let outcome = match choice {
            AdvancementChoice::Attribute { attribute } => {
                let from = self.attributes.get(attribute);
                let to = from + 1;
                if to > MAX_RAW_ATTRIBUTE {
                    return Err(DomainError::validation(format!(
                        "{} cannot be raised above {}",
                        attribute, MAX_RAW_ATTRIBUTE
                    )));
                }
                self.advancements.claim(level, kind, self.profession)?;
                self.attributes.set(attribute, to);
                AdvancementOutcome::AttributeIncreased {
                    attribute,
                    from,
                    to,
                    pool: self.resize_pool(attribute),
                }
            }
            AdvancementChoice::Skill { skill: name } => {
                let definition = skill(&name)?;
                if self.trained_skills.contains(definition.name) {
                    return Err(DomainError::duplicate(format!(
                        "{} is already trained",
                        definition.name
                    )));
                }
                self.advancements.claim(level, kind, self.profession)?;
                self.trained_skills.insert(definition.name.to_string());
                AdvancementOutcome::SkillTrained {
                    skill: definition.name.to_string(),
                }
            }
            AdvancementChoice::Spell { spell } => {
                if self
                    .spells
                    .iter()
                    .any(|s| s.name.eq_ignore_ascii_case(&spell.name))
                {
                    return Err(DomainError::duplicate(format!(
                        "{} is already known",
                        spell.name
                    )));
                }
                self.advancements.claim(level, kind, self.profession)?;
                let name = spell.name.clone();
                self.spells.push(spell);
                AdvancementOutcome::SpellLearned { spell: name }
            }
            AdvancementChoice::HeroicAbility { ability } => {
                if self
                    .abilities()
                    .iter()
                    .any(|a| a.name.eq_ignore_ascii_case(&ability.name))
                {
                    return Err(DomainError::duplicate(format!(
                        "{} is already known",
                        ability.name
                    )));
                }
                self.advancements.claim(level, kind, self.profession)?;
                let name = ability.name.clone();
                self.heroic_abilities.push(ability);
                AdvancementOutcome::HeroicAbilityGained { ability: name }
            }
        };

        self.touch(now);
        Ok(outcome)
    }

    /// Recompute the pool fed by `attribute`, clamping its current value.
    fn resize_pool(&mut self, attribute: Attribute) -> Option<PoolResized> {
        let derived = self.derived();
        let pool = match attribute {
            Attribute::Con => {
                self.hp.set_max(derived.max_hp);
                &self.hp
            }
            Attribute::Wil => {
                self.wp.set_max(derived.max_wp);
                &self.wp
            }
            _ => return None,
        };
        Some(PoolResized {
            kind: pool.kind(),
            max: pool.max(),
            current: pool.current(),
        })
    }

    // =========================================================================
    // Metadata Mutations
    // =========================================================================

    /// Record a modification time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Advance the version before a save; returns the version being replaced.
    pub fn bump_version(&mut self) -> u64 {
        let previous = self.version;
        self.version += 1;
        previous
    }
}

fn check_magic_school(
    profession: Profession,
    magic_school: Option<MagicSchool>,
) -> Result<(), DomainError> {
    match (profession.is_mage(), magic_school) {
        (true, None) => Err(DomainError::validation("A mage must choose a school of magic")),
        (false, Some(school)) => Err(DomainError::validation(format!(
            "A {} cannot study {}",
            profession, school
        ))),
        _ => Ok(()),
    }
}

fn canonical_skills(names: BTreeSet<String>) -> Result<BTreeSet<String>, DomainError> {
    names
        .iter()
        .map(|name| skill(name).map(|definition| definition.name.to_string()))
        .collect()
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format for serialization that matches the persisted schema
#[derive(Serialize, Deserialize)]
struct PlayerCharacterWireFormat {
    id: CharacterId,
    name: CharacterName,
    kin: Kin,
    age: AgeCategory,
    profession: Profession,
    #[serde(default)]
    magic_school: Option<MagicSchool>,
    attributes: Attributes,
    #[serde(default)]
    trained_skills: BTreeSet<String>,
    #[serde(default)]
    heroic_abilities: Vec<Ability>,
    #[serde(default)]
    spells: Vec<Spell>,
    #[serde(default)]
    gear: Vec<GearEffect>,
    #[serde(default)]
    conditions: Conditions,
    current_hp: i32,
    current_wp: i32,
    #[serde(default)]
    marked_skills: BTreeSet<String>,
    #[serde(default)]
    advancements: AdvancementTracker,
    #[serde(default)]
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for PlayerCharacter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = PlayerCharacterWireFormat {
            id: self.id,
            name: self.name.clone(),
            kin: self.kin,
            age: self.age,
            profession: self.profession,
            magic_school: self.magic_school,
            attributes: self.attributes,
            trained_skills: self.trained_skills.clone(),
            heroic_abilities: self.heroic_abilities.clone(),
            spells: self.spells.clone(),
            gear: self.gear.clone(),
            conditions: self.conditions,
            current_hp: self.hp.current(),
            current_wp: self.wp.current(),
            marked_skills: self.marked_skills.clone(),
            advancements: self.advancements.clone(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PlayerCharacter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = PlayerCharacterWireFormat::deserialize(deserializer)?;

        wire.attributes.validate_raw().map_err(de::Error::custom)?;
        check_magic_school(wire.profession, wire.magic_school).map_err(de::Error::custom)?;
        let trained_skills = canonical_skills(wire.trained_skills).map_err(de::Error::custom)?;
        let marked_skills = canonical_skills(wire.marked_skills).map_err(de::Error::custom)?;

        let derived = rules::derive_unchecked(&wire.attributes, wire.age, wire.kin);

        Ok(PlayerCharacter {
            id: wire.id,
            name: wire.name,
            kin: wire.kin,
            age: wire.age,
            profession: wire.profession,
            magic_school: wire.magic_school,
            attributes: wire.attributes,
            trained_skills,
            heroic_abilities: wire.heroic_abilities,
            spells: wire.spells,
            gear: wire.gear,
            conditions: wire.conditions,
            hp: ResourcePool::with_current(
                ResourceKind::HitPoints,
                wire.current_hp,
                derived.max_hp,
            ),
            wp: ResourcePool::with_current(
                ResourceKind::Willpower,
                wire.current_wp,
                derived.max_wp,
            ),
            marked_skills,
            advancements: wire.advancements,
            version: wire.version,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
