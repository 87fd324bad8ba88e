//! One JSON request per line in, one JSON response per line out.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::model::{CategoryId, Descriptions, CATEGORIES};
use crate::services::capability::{Answer, PresetPicker};
use crate::services::editor::{
    AddOutcome, CatalogEditor, FsOutcome, LoadOutcome, SaveOutcome, SaveReport,
};
use crate::services::storage::Stored;

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn get_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn get_bool(payload: &Value, key: &str) -> bool {
    payload.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

fn parse_category(payload: &Value) -> Result<CategoryId, String> {
    let raw = get_str(payload, "category");
    if raw.is_empty() {
        return Err("payload.category is required".into());
    }
    raw.parse::<CategoryId>().map_err(|e| e.to_string())
}

fn parse_index(payload: &Value) -> Result<usize, String> {
    payload
        .get("index")
        .and_then(|v| v.as_u64())
        .map(|i| i as usize)
        .ok_or_else(|| "payload.index must be a non-negative integer".to_string())
}

fn load_payload(outcome: &LoadOutcome, message: &str) -> Value {
    match outcome {
        LoadOutcome::Loaded(source) => json!({ "loaded": true, "source": source, "message": message }),
        LoadOutcome::HandleFailed(reason) => {
            json!({ "loaded": false, "source": "handle", "error": reason, "message": message })
        }
    }
}

fn save_payload(report: &SaveReport, message: &str) -> Value {
    let (outcome, path) = match &report.outcome {
        SaveOutcome::Saved(Stored::Handle(p)) => ("handle", Some(p.clone())),
        SaveOutcome::Saved(Stored::ProjectRoot(h)) => ("project_root", Some(h.path().to_path_buf())),
        SaveOutcome::Saved(Stored::Download(p)) => ("download", Some(p.clone())),
        SaveOutcome::Cancelled => ("cancelled", None),
        SaveOutcome::Failed(_) => ("failed", None),
    };

    json!({
        "outcome": outcome,
        "path": path,
        "removed": report.normalized.removed,
        "issues": report.issues,
        "message": message
    })
}

/// Command handler owning one editor for the lifetime of the process.
pub struct Session {
    editor: CatalogEditor,
    fs_access: bool,
}

impl Session {
    pub fn new(editor: CatalogEditor, fs_access: bool) -> Self {
        Self { editor, fs_access }
    }

    pub fn editor(&self) -> &CatalogEditor {
        &self.editor
    }

    pub fn handle(&mut self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd = Command::from(get_cmd(&req));
        let payload = get_payload(&req);

        log::debug!("command {cmd:?}");

        match cmd {
            Command::Ping => ok(id, json!({ "message": "catalog-core alive" })),

            Command::Load | Command::Reload => {
                let outcome = if cmd == Command::Load {
                    self.editor.load()
                } else {
                    self.editor.reload()
                };
                ok(id, load_payload(&outcome, self.editor.status()))
            }

            Command::Get => ok(
                id,
                json!({
                    "state": self.editor.state(),
                    "catalog": self.editor.catalog()
                }),
            ),

            Command::Categories => ok(id, json!({ "categories": CATEGORIES })),

            Command::Validate => ok(id, json!({ "issues": self.editor.validate() })),

            Command::Normalize => {
                let report = self.editor.normalize();
                ok(
                    id,
                    json!({ "report": report, "catalog": self.editor.catalog() }),
                )
            }

            Command::Save => {
                let force = get_bool(payload, "force");
                let report = self.editor.save(&mut Answer(force));
                let body = save_payload(&report, self.editor.status());
                match report.outcome {
                    SaveOutcome::Failed(reason) => err(id, reason),
                    _ => ok(id, body),
                }
            }

            Command::EnableFs => {
                let path = get_str(payload, "path");
                let mut picker = PresetPicker {
                    fs_access: self.fs_access,
                    path: Some(PathBuf::from(path)),
                };
                match self.editor.enable_fs(&mut picker) {
                    FsOutcome::Unavailable => err(id, self.editor.status()),
                    FsOutcome::Cancelled => ok(
                        id,
                        json!({ "selected": false, "message": self.editor.status() }),
                    ),
                    FsOutcome::Selected { root, loaded } => ok(
                        id,
                        json!({
                            "selected": true,
                            "root": root,
                            "loaded": loaded,
                            "message": self.editor.status()
                        }),
                    ),
                }
            }

            Command::AddEntry => {
                let category = match parse_category(payload) {
                    Ok(c) => c,
                    Err(e) => return err(id, e),
                };

                let file = get_str(payload, "file");
                if file.is_empty() {
                    return err(id, "payload.file is required");
                }
                let file = Path::new(file);

                let bytes = match fs::read(file) {
                    Ok(b) => b,
                    Err(e) => return err(id, format!("failed to read {}: {e}", file.display())),
                };

                let name = match get_str(payload, "name") {
                    "" => file
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    n => n.to_string(),
                };

                match self.editor.add_image(category, &bytes, &name) {
                    AddOutcome::Failed { reason, .. } => err(id, reason),
                    outcome => ok(
                        id,
                        json!({ "result": outcome, "message": self.editor.status() }),
                    ),
                }
            }

            Command::RemoveEntry => {
                let category = match parse_category(payload) {
                    Ok(c) => c,
                    Err(e) => return err(id, e),
                };
                let index = match parse_index(payload) {
                    Ok(i) => i,
                    Err(e) => return err(id, e),
                };

                let mut confirm = Answer(get_bool(payload, "confirm"));
                match self.editor.remove_entry(category, index, &mut confirm) {
                    Ok(Some(entry)) => ok(id, json!({ "removed": true, "entry": entry })),
                    Ok(None) => ok(id, json!({ "removed": false })),
                    Err(e) => err(id, e.to_string()),
                }
            }

            Command::EditEntry => {
                let category = match parse_category(payload) {
                    Ok(c) => c,
                    Err(e) => return err(id, e),
                };
                let index = match parse_index(payload) {
                    Ok(i) => i,
                    Err(e) => return err(id, e),
                };

                let descriptions_val = payload.get("descriptions").cloned().unwrap_or(Value::Null);
                if descriptions_val.is_null() {
                    return err(id, "payload.descriptions is required");
                }
                let descriptions: Descriptions = match serde_json::from_value(descriptions_val) {
                    Ok(d) => d,
                    Err(e) => return err(id, format!("invalid payload.descriptions: {e}")),
                };

                match self.editor.edit_descriptions(category, index, descriptions) {
                    Ok(()) => ok(
                        id,
                        json!({ "entry": self.editor.entries(category)[index] }),
                    ),
                    Err(e) => err(id, e.to_string()),
                }
            }

            Command::Unknown => err(id, "unknown command"),
        }
    }
}
