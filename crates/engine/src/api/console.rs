//! Console request handling.
//!
//! A console remembers the draft being built and the character being played,
//! so commands after `commit` or `select` need no ids.

use std::sync::Arc;

use serde_json::json;
use sheetsmith_domain::{CharacterId, DraftId};

use super::request::{Request, HELP};
use super::response::{ErrorCode, ResponseResult};
use crate::app::App;
use crate::infrastructure::persistence::encode_sheet;

pub struct Console {
    app: Arc<App>,
    draft: Option<DraftId>,
    character: Option<CharacterId>,
}

impl Console {
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            draft: None,
            character: None,
        }
    }

    pub fn selected(&self) -> Option<CharacterId> {
        self.character
    }

    pub async fn handle(&mut self, request: Request) -> ResponseResult {
        match request {
            Request::Help => ResponseResult::success(HELP),
            Request::Quit => ResponseResult::success_empty(),

            Request::NewDraft
            | Request::SetField(_)
            | Request::RollAttributes
            | Request::ShowDraft
            | Request::Commit
            | Request::Discard => self.handle_creation(request).await,

            Request::List | Request::Select(_) | Request::Import(_) => {
                self.handle_roster(request).await
            }

            request => match self.character {
                Some(id) => self.handle_character(id, request).await,
                None => ResponseResult::error(
                    ErrorCode::BadRequest,
                    "No character selected: commit a draft or `select <id>` first",
                ),
            },
        }
    }

    async fn handle_creation(&mut self, request: Request) -> ResponseResult {
        let creation = &self.app.use_cases.creation;

        if let Request::NewDraft = request {
            let view = creation.start();
            self.draft = Some(view.draft_id);
            return ResponseResult::success(view);
        }

        let Some(draft_id) = self.draft else {
            return ResponseResult::error(
                ErrorCode::BadRequest,
                "No draft open: start one with `new`",
            );
        };

        match request {
            Request::SetField(field) => match creation.update_field(draft_id, field) {
                Ok(view) => ResponseResult::success(view),
                Err(e) => (&e).into(),
            },
            Request::RollAttributes => match creation.roll_attributes(draft_id) {
                Ok((view, rolls)) => ResponseResult::success(json!({
                    "draft": view,
                    "rolls": rolls,
                })),
                Err(e) => (&e).into(),
            },
            Request::ShowDraft => match creation.get(draft_id) {
                Ok(view) => ResponseResult::success(view),
                Err(e) => (&e).into(),
            },
            Request::Commit => match creation.commit(draft_id).await {
                Ok(character) => {
                    self.draft = None;
                    self.character = Some(character.id());
                    ResponseResult::success(character)
                }
                Err(e) => (&e).into(),
            },
            Request::Discard => {
                self.draft = None;
                match creation.reset(draft_id) {
                    Ok(()) => ResponseResult::success_empty(),
                    Err(e) => (&e).into(),
                }
            }
            _ => ResponseResult::error(ErrorCode::InternalError, "Not a creation request"),
        }
    }

    async fn handle_roster(&mut self, request: Request) -> ResponseResult {
        let play = &self.app.use_cases.play;
        match request {
            Request::List => match play.list().await {
                Ok(characters) => ResponseResult::success(
                    characters
                        .iter()
                        .map(|c| {
                            json!({
                                "id": c.id(),
                                "name": c.name().as_str(),
                                "kin": c.kin(),
                                "profession": c.profession(),
                                "level": c.level(),
                            })
                        })
                        .collect::<Vec<_>>(),
                ),
                Err(e) => (&e).into(),
            },
            Request::Select(id) => match play.view(id).await {
                Ok(view) => {
                    self.character = Some(id);
                    ResponseResult::success(view)
                }
                Err(e) => (&e).into(),
            },
            Request::Import(path) => {
                let json = match tokio::fs::read_to_string(&path).await {
                    Ok(json) => json,
                    Err(e) => {
                        return ResponseResult::error(
                            ErrorCode::BadRequest,
                            format!("Could not read {}: {}", path.display(), e),
                        )
                    }
                };
                match play.import(&json).await {
                    Ok(character) => {
                        self.character = Some(character.id());
                        ResponseResult::success(character)
                    }
                    Err(e) => (&e).into(),
                }
            }
            _ => ResponseResult::error(ErrorCode::InternalError, "Not a roster request"),
        }
    }

    async fn handle_character(&mut self, id: CharacterId, request: Request) -> ResponseResult {
        let use_cases = &self.app.use_cases;
        match request {
            Request::Show => respond(use_cases.play.view(id).await),
            Request::Export(path) => {
                let view = match use_cases.play.view(id).await {
                    Ok(view) => view,
                    Err(e) => return (&e).into(),
                };
                let Some(path) = path else {
                    return ResponseResult::success(view.character);
                };
                let written = match encode_sheet(&view.character) {
                    Ok(json) => tokio::fs::write(&path, json).await,
                    Err(e) => return (&e).into(),
                };
                match written {
                    Ok(()) => ResponseResult::success(json!({ "written": path })),
                    Err(e) => ResponseResult::error(
                        ErrorCode::BadRequest,
                        format!("Could not write {}: {}", path.display(), e),
                    ),
                }
            }
            Request::Delete => match use_cases.play.delete(id).await {
                Ok(()) => {
                    self.character = None;
                    ResponseResult::success_empty()
                }
                Err(e) => (&e).into(),
            },

            Request::Check { skill, modifier } => {
                respond(use_cases.dice.roll_check(id, &skill, modifier).await)
            }
            Request::Roll {
                formula,
                target,
                modifier,
            } => respond(
                use_cases
                    .dice
                    .roll_formula(id, &formula, target, modifier)
                    .await,
            ),
            Request::Push => respond(use_cases.dice.push(id).await),
            Request::History => ResponseResult::success(use_cases.dice.history(id)),
            Request::ClearHistory => {
                use_cases.dice.clear(id);
                ResponseResult::success_empty()
            }

            Request::Mark(skill) => respond(use_cases.play.mark_skill(id, &skill).await),
            Request::Condition(condition) => {
                respond(use_cases.play.toggle_condition(id, condition).await)
            }
            Request::ClearConditions => respond(use_cases.play.clear_conditions(id).await),
            Request::Damage(amount) => respond(use_cases.play.apply_damage(id, amount).await),
            Request::Heal(amount) => respond(use_cases.play.heal(id, amount).await),
            Request::UseAbility(ability) => {
                respond(use_cases.play.use_ability(id, &ability).await)
            }
            Request::Cast { spell, power_level } => {
                respond(use_cases.play.cast_spell(id, &spell, power_level).await)
            }
            Request::Rest {
                tier,
                healer_present,
            } => respond(use_cases.play.rest(id, tier, healer_present).await),

            Request::Advancements => respond(use_cases.advancement.available(id).await),
            Request::Advance(choice) => respond(use_cases.advancement.apply(id, choice).await),

            _ => ResponseResult::error(ErrorCode::InternalError, "Not a character request"),
        }
    }
}

fn respond<T, E>(result: Result<T, E>) -> ResponseResult
where
    T: serde::Serialize,
    for<'a> &'a E: Into<ResponseResult>,
{
    match result {
        Ok(value) => ResponseResult::success(value),
        Err(e) => (&e).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::parse_request;
    use crate::infrastructure::clock::{FixedClock, ScriptedRandom};
    use crate::infrastructure::persistence::InMemoryCharacterRepo;
    use crate::infrastructure::settings::EngineSettings;
    use chrono::Utc;

    fn console(rolls: Vec<i32>) -> Console {
        let app = App::new(
            Arc::new(InMemoryCharacterRepo::new()),
            Arc::new(FixedClock(Utc::now())),
            Arc::new(ScriptedRandom::new(rolls)),
            EngineSettings::default(),
        );
        Console::new(Arc::new(app))
    }

    async fn run(console: &mut Console, line: &str) -> ResponseResult {
        let request = parse_request(line).unwrap().unwrap();
        console.handle(request).await
    }

    async fn create_hunter(console: &mut Console) {
        for line in [
            "new",
            "set name Sigrid",
            "set kin wolfkin",
            "set age young",
            "set profession hunter",
            "set attributes 12 13 15 10 9 8",
            "train Bows",
        ] {
            let response = run(console, line).await;
            assert!(response.is_success(), "{}: {:?}", line, response);
        }
        let committed = run(console, "commit").await;
        assert!(committed.is_success(), "{:?}", committed);
    }

    #[tokio::test]
    async fn commit_selects_the_new_character() {
        let mut console = console(vec![5]);
        create_hunter(&mut console).await;
        assert!(console.selected().is_some());

        let shown = run(&mut console, "show").await;
        let data = shown.data().unwrap();
        assert_eq!(data["level"], 0);
        assert_eq!(data["derived"]["max_hp"], 14);

        let listed = run(&mut console, "list").await;
        assert_eq!(listed.data().unwrap().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn character_commands_need_a_selection() {
        let mut console = console(vec![5]);
        let response = run(&mut console, "check Bows").await;
        assert_eq!(response.error_code(), Some(ErrorCode::BadRequest));

        let response = run(&mut console, "set kin elf").await;
        assert_eq!(response.error_code(), Some(ErrorCode::BadRequest));
    }

    #[tokio::test]
    async fn dragon_check_suggests_a_mark() {
        let mut console = console(vec![1]);
        create_hunter(&mut console).await;

        let response = run(&mut console, "check Bows").await;
        let data = response.data().unwrap();
        assert_eq!(data["roll"]["outcome"], "dragon");
        assert_eq!(data["mark_suggested"], true);

        let marked = run(&mut console, "mark bows").await;
        assert!(marked.is_success());
        let shown = run(&mut console, "show").await;
        assert_eq!(shown.data().unwrap()["level"], 1);
    }

    #[tokio::test]
    async fn second_push_is_a_conflict() {
        let mut console = console(vec![19, 20, 3]);
        create_hunter(&mut console).await;

        assert!(run(&mut console, "check Bows").await.is_success());
        assert!(run(&mut console, "push").await.is_success());
        let again = run(&mut console, "push").await;
        assert_eq!(again.error_code(), Some(ErrorCode::Conflict));
    }

    #[tokio::test]
    async fn unknown_skill_is_not_found() {
        let mut console = console(vec![5]);
        create_hunter(&mut console).await;
        let response = run(&mut console, "check Juggling").await;
        assert_eq!(response.error_code(), Some(ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn export_and_import_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sigrid.json");

        let mut console = console(vec![5]);
        create_hunter(&mut console).await;
        assert!(run(&mut console, "damage 4").await.is_success());
        let exported = run(&mut console, &format!("export {}", path.display())).await;
        assert!(exported.is_success(), "{:?}", exported);

        assert!(run(&mut console, "delete").await.is_success());
        assert!(console.selected().is_none());

        let imported = run(&mut console, &format!("import {}", path.display())).await;
        assert!(imported.is_success(), "{:?}", imported);
        let shown = run(&mut console, "show").await;
        assert_eq!(shown.data().unwrap()["character"]["current_hp"], 10);
    }

    #[tokio::test]
    async fn missing_import_file_is_reported() {
        let mut console = console(vec![5]);
        let response = run(&mut console, "import /definitely/not/here.json").await;
        assert_eq!(response.error_code(), Some(ErrorCode::BadRequest));
    }
}
