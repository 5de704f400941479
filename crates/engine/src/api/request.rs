//! Console request parsing.
//!
//! One request per line: a command word followed by its arguments. Skill,
//! spell and ability names may contain spaces, so they take the rest of the
//! line. Blank lines and lines starting with `#` are ignored.

use std::path::PathBuf;

use sheetsmith_domain::{
    Ability, AdvancementChoice, Attribute, Attributes, CharacterId, Condition, CreationField,
    MagicSchool, RestTier, RollModifier, Spell,
};

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Help,
    Quit,

    // Creation
    NewDraft,
    SetField(CreationField),
    RollAttributes,
    ShowDraft,
    Commit,
    Discard,

    // Roster
    List,
    Select(CharacterId),
    Show,
    Import(PathBuf),
    Export(Option<PathBuf>),
    Delete,

    // Dice
    Check {
        skill: String,
        modifier: RollModifier,
    },
    Roll {
        formula: String,
        target: Option<u8>,
        modifier: RollModifier,
    },
    Push,
    History,
    ClearHistory,

    // Play
    Mark(String),
    Condition(Condition),
    ClearConditions,
    Damage(i32),
    Heal(i32),
    UseAbility(String),
    Cast {
        spell: String,
        power_level: u8,
    },
    Rest {
        tier: RestTier,
        healer_present: bool,
    },

    // Advancement
    Advancements,
    Advance(AdvancementChoice),
}

/// Why a line could not be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Invalid {argument}: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },
}

impl RequestError {
    fn missing(command: &'static str, argument: &'static str) -> Self {
        Self::MissingArgument { command, argument }
    }

    fn invalid(argument: &'static str, message: impl ToString) -> Self {
        Self::InvalidArgument {
            argument,
            message: message.to_string(),
        }
    }
}

pub const HELP: &[&str] = &[
    "new | set <field> <value> | train <skill> | untrain <skill> | roll-attributes",
    "draft | commit | discard",
    "  fields: name, kin, age, profession, school, attributes <six numbers>, STR..CHA",
    "list | select <id> | show | import <path> | export [path] | delete",
    "check <skill> [boon|bane] | roll <formula> [vs N] [boon|bane]",
    "push | history | clear-history",
    "mark <skill> | condition <name> | clear-conditions | damage <n> | heal <n>",
    "ability <name> | cast <spell> [power] | rest round|stretch|shift [healer]",
    "advancements | advance attribute <ATTR> | advance skill <name>",
    "  advance spell <name> [rank] | advance ability <name> [wp]",
    "quit",
];

/// Parse one console line. `Ok(None)` for blank and comment lines.
pub fn parse_request(line: &str) -> Result<Option<Request>, RequestError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = split_word(line);
    let request = match command.to_ascii_lowercase().as_str() {
        "help" | "?" => Request::Help,
        "quit" | "exit" => Request::Quit,

        "new" => Request::NewDraft,
        "set" => Request::SetField(parse_field(rest)?),
        "train" => Request::SetField(CreationField::TrainSkill(
            required(rest, "train", "a skill name")?.to_string(),
        )),
        "untrain" => Request::SetField(CreationField::UntrainSkill(
            required(rest, "untrain", "a skill name")?.to_string(),
        )),
        "roll-attributes" => Request::RollAttributes,
        "draft" => Request::ShowDraft,
        "commit" => Request::Commit,
        "discard" => Request::Discard,

        "list" => Request::List,
        "select" => {
            let id = required(rest, "select", "a character id")?;
            Request::Select(id.parse().map_err(|e| RequestError::invalid("id", e))?)
        }
        "show" => Request::Show,
        "import" => Request::Import(PathBuf::from(required(rest, "import", "a file path")?)),
        "export" => Request::Export(non_empty(rest).map(PathBuf::from)),
        "delete" => Request::Delete,

        "check" => {
            let (skill, modifier) = split_modifier(rest);
            Request::Check {
                skill: required(skill, "check", "a skill name")?.to_string(),
                modifier,
            }
        }
        "roll" => parse_roll(rest)?,
        "push" => Request::Push,
        "history" => Request::History,
        "clear-history" => Request::ClearHistory,

        "mark" => Request::Mark(required(rest, "mark", "a skill name")?.to_string()),
        "condition" => Request::Condition(
            required(rest, "condition", "a condition name")?
                .parse()
                .map_err(|e| RequestError::invalid("condition", e))?,
        ),
        "clear-conditions" => Request::ClearConditions,
        "damage" => Request::Damage(parse_number(rest, "damage", "an amount")?),
        "heal" => Request::Heal(parse_number(rest, "heal", "an amount")?),
        "ability" => Request::UseAbility(required(rest, "ability", "an ability name")?.to_string()),
        "cast" => {
            let (spell, power_level) = split_trailing_number(rest);
            Request::Cast {
                spell: required(spell, "cast", "a spell name")?.to_string(),
                power_level: power_level.unwrap_or(1),
            }
        }
        "rest" => {
            let (tier, extra) = split_word(required(rest, "rest", "round, stretch or shift")?);
            Request::Rest {
                tier: tier.parse().map_err(|e| RequestError::invalid("rest tier", e))?,
                healer_present: extra.eq_ignore_ascii_case("healer"),
            }
        }

        "advancements" => Request::Advancements,
        "advance" => Request::Advance(parse_advancement(rest)?),

        other => return Err(RequestError::UnknownCommand(other.to_string())),
    };
    Ok(Some(request))
}

fn parse_field(rest: &str) -> Result<CreationField, RequestError> {
    let (field, value) = split_word(rest);
    let value_for = |argument: &'static str| required(value, "set", argument);

    let field = match field.to_ascii_lowercase().as_str() {
        "" => return Err(RequestError::missing("set", "a field and a value")),
        "name" => CreationField::Name(value_for("a name")?.to_string()),
        "kin" => CreationField::Kin(
            value_for("a kin")?
                .parse()
                .map_err(|e| RequestError::invalid("kin", e))?,
        ),
        "age" => CreationField::Age(
            value_for("an age")?
                .parse()
                .map_err(|e| RequestError::invalid("age", e))?,
        ),
        "profession" => CreationField::Profession(
            value_for("a profession")?
                .parse()
                .map_err(|e| RequestError::invalid("profession", e))?,
        ),
        "school" => {
            let value = value_for("a magic school or none")?;
            if value.eq_ignore_ascii_case("none") {
                CreationField::MagicSchool(None)
            } else {
                let school: MagicSchool = value
                    .parse()
                    .map_err(|e| RequestError::invalid("magic school", e))?;
                CreationField::MagicSchool(Some(school))
            }
        }
        "attributes" => {
            let scores = value_for("six scores")?
                .split_whitespace()
                .map(|s| s.parse::<i32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| RequestError::invalid("attribute score", e))?;
            match scores.as_slice() {
                &[strength, con, agl, int, wil, cha] => {
                    CreationField::Attributes(Attributes::new(strength, con, agl, int, wil, cha))
                }
                _ => {
                    return Err(RequestError::invalid(
                        "attributes",
                        format!("expected six scores, got {}", scores.len()),
                    ))
                }
            }
        }
        other => {
            let attribute: Attribute = other.parse().map_err(|_| {
                RequestError::invalid("field", format!("no field named {}", other))
            })?;
            CreationField::Attribute(attribute, parse_number(value, "set", "a score")?)
        }
    };
    Ok(field)
}

fn parse_roll(rest: &str) -> Result<Request, RequestError> {
    let (rest, modifier) = split_modifier(rest);
    let mut words = rest.split_whitespace();
    let formula = words
        .next()
        .ok_or_else(|| RequestError::missing("roll", "a dice formula"))?
        .to_string();

    let target = match (words.next(), words.next()) {
        (None, _) => None,
        (Some(vs), Some(value)) if vs.eq_ignore_ascii_case("vs") => Some(
            value
                .parse::<u8>()
                .map_err(|e| RequestError::invalid("target", e))?,
        ),
        (Some(vs), None) if vs.eq_ignore_ascii_case("vs") => {
            return Err(RequestError::missing("roll", "a target after vs"))
        }
        (Some(other), _) => {
            return Err(RequestError::invalid(
                "roll",
                format!("unexpected {}", other),
            ))
        }
    };

    Ok(Request::Roll {
        formula,
        target,
        modifier,
    })
}

fn parse_advancement(rest: &str) -> Result<AdvancementChoice, RequestError> {
    let (kind, value) = split_word(rest);
    let choice = match kind.to_ascii_lowercase().as_str() {
        "attribute" => AdvancementChoice::Attribute {
            attribute: required(value, "advance", "an attribute")?
                .parse()
                .map_err(|e| RequestError::invalid("attribute", e))?,
        },
        "skill" => AdvancementChoice::Skill {
            skill: required(value, "advance", "a skill name")?.to_string(),
        },
        "spell" => {
            let (name, rank) = split_trailing_number(value);
            AdvancementChoice::Spell {
                spell: Spell::new(required(name, "advance", "a spell name")?, rank.unwrap_or(1)),
            }
        }
        "ability" => {
            let (name, wp_cost) = split_trailing_number(value);
            AdvancementChoice::HeroicAbility {
                ability: Ability::new(required(name, "advance", "an ability name")?, wp_cost, ""),
            }
        }
        "" => return Err(RequestError::missing("advance", "a reward kind")),
        other => {
            return Err(RequestError::invalid(
                "reward",
                format!("{} is not attribute, skill, spell or ability", other),
            ))
        }
    };
    Ok(choice)
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (text, ""),
    }
}

/// Split a trailing `boon` or `bane` off the text.
fn split_modifier(text: &str) -> (&str, RollModifier) {
    let text = text.trim();
    let (head, last) = text.rsplit_once(char::is_whitespace).unwrap_or(("", text));
    match last.to_ascii_lowercase().as_str() {
        "boon" => (head.trim(), RollModifier::Boon),
        "bane" => (head.trim(), RollModifier::Bane),
        _ => (text, RollModifier::None),
    }
}

fn split_trailing_number(text: &str) -> (&str, Option<u8>) {
    let text = text.trim();
    match text.rsplit_once(char::is_whitespace) {
        Some((head, last)) => match last.parse::<u8>() {
            Ok(n) => (head.trim(), Some(n)),
            Err(_) => (text, None),
        },
        None => (text, None),
    }
}

fn non_empty(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

fn required<'a>(
    text: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, RequestError> {
    non_empty(text).ok_or_else(|| RequestError::missing(command, argument))
}

fn parse_number(
    text: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<i32, RequestError> {
    required(text, command, argument)?
        .parse()
        .map_err(|e| RequestError::invalid(argument, e))
}
