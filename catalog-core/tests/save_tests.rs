//! Persist fallback chain, project folder selection and end-to-end edits.

use std::fs;
use std::path::PathBuf;

use catalog_core::model::{Catalog, CategoryId, Descriptions, Entry};
use catalog_core::services::capability::{Answer, PresetPicker};
use catalog_core::services::editor::{
    AddOutcome, CatalogEditor, EditorState, FsOutcome, LoadOutcome, Placement, SaveOutcome,
};
use catalog_core::services::loader::LoadSource;
use catalog_core::services::normalize::normalize;
use catalog_core::services::storage::{FileHandle, Stored};
use tempfile::TempDir;

fn picker(path: &std::path::Path) -> PresetPicker {
    PresetPicker {
        fs_access: true,
        path: Some(path.to_path_buf()),
    }
}

fn data_file(root: &std::path::Path) -> PathBuf {
    root.join("data").join("projectsData.json")
}

#[test]
fn scenario_add_to_empty_skeleton() {
    let dir = TempDir::new().unwrap();
    let mut e = CatalogEditor::new(dir.path().join("downloads"));
    assert_eq!(e.load(), LoadOutcome::Loaded(LoadSource::Empty));

    let t: i64 = 1_717_171_717_171;
    let out = e.add_image_at(CategoryId::Construcoes, b"\x89PNG", "photo.png", t);

    let expected_src = format!("img/img_cm_fe/{t}_photo.png");
    assert!(matches!(&out, AddOutcome::Added { src, .. } if *src == expected_src));

    let list = e.entries(CategoryId::Construcoes);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].src(), Some(expected_src.as_str()));
    for lang in ["pt", "en", "es", "fr"] {
        assert_eq!(list[0].descriptions.get(lang), Some(""));
    }
}

#[test]
fn serialized_catalog_round_trips() {
    let mut original = Catalog::new();
    original.aluminio = vec![
        Entry::with_descriptions(
            "img/img_al/a.jpg",
            Descriptions::new("Porta", "Door", "Puerta", "Porte"),
        ),
        Entry::new("img/img_al/a.jpg"),
        Entry::default(),
    ];
    original.servicos = vec![Entry::with_descriptions(
        "img/img_ms/s.jpg",
        Descriptions {
            pt: Some("só pt".into()),
            ..Descriptions::default()
        },
    )];

    let text = original.to_pretty_json().unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(Catalog::is_current_shape(&doc));
    let mut parsed = Catalog::from_value(doc).unwrap();

    normalize(&mut original);
    normalize(&mut parsed);
    assert_eq!(parsed, original);
}

#[test]
fn enabling_fs_creates_and_loads_data_file() {
    let site = TempDir::new().unwrap();
    fs::create_dir_all(site.path().join("data")).unwrap();
    fs::write(
        data_file(site.path()),
        r#"{ "servicos": [ { "src": "img/img_ms/x.jpg", "descriptions": { "pt": "x" } } ] }"#,
    )
    .unwrap();

    let mut e = CatalogEditor::new(site.path().join("downloads"));
    let out = e.enable_fs(&mut picker(site.path()));

    assert_eq!(
        out,
        FsOutcome::Selected {
            root: site.path().to_path_buf(),
            loaded: true
        }
    );
    assert_eq!(e.entries(CategoryId::Servicos).len(), 1);
    assert_eq!(
        e.json_handle().map(|h| h.path().to_path_buf()),
        Some(data_file(site.path()))
    );
}

#[test]
fn enabling_fs_on_fresh_folder_starts_empty() {
    let site = TempDir::new().unwrap();
    let mut e = CatalogEditor::new(site.path().join("downloads"));

    let out = e.enable_fs(&mut picker(site.path()));
    assert!(matches!(out, FsOutcome::Selected { loaded: true, .. }));
    assert!(data_file(site.path()).exists());
    assert!(e.catalog().is_empty());
}

#[test]
fn picker_cancel_and_unavailable_change_nothing() {
    let site = TempDir::new().unwrap();
    let mut e = CatalogEditor::new(site.path().join("downloads"));

    let mut off = PresetPicker {
        fs_access: false,
        path: Some(site.path().to_path_buf()),
    };
    assert_eq!(e.enable_fs(&mut off), FsOutcome::Unavailable);

    let mut dismissed = PresetPicker {
        fs_access: true,
        path: None,
    };
    assert_eq!(e.enable_fs(&mut dismissed), FsOutcome::Cancelled);
    assert_eq!(e.status(), "Folder selection cancelled.");

    assert!(e.project_root().is_none());
    assert!(e.json_handle().is_none());
    assert_eq!(e.state(), EditorState::Unloaded);
}

#[test]
fn save_goes_to_handle_when_it_works() {
    let site = TempDir::new().unwrap();
    let mut e = CatalogEditor::new(site.path().join("downloads"));
    e.enable_fs(&mut picker(site.path()));
    e.add_image_at(CategoryId::Aluminio, b"img", "a b.jpg", 7);

    let report = e.save(&mut Answer(false));
    assert_eq!(
        report.outcome,
        SaveOutcome::Saved(Stored::Handle(data_file(site.path())))
    );
    assert_eq!(e.status(), "projectsData.json saved successfully.");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_file(site.path())).unwrap()).unwrap();
    assert_eq!(written["aluminio"][0]["src"], "img/img_al/7_a_b.jpg");
    assert_eq!(written["aluminio"][0]["descriptions"]["fr"], "");
    assert!(site
        .path()
        .join("img")
        .join("img_al")
        .join("7_a_b.jpg")
        .exists());
    assert!(!site.path().join("downloads").exists());
}

#[test]
fn broken_handle_falls_through_to_project_folder() {
    let site = TempDir::new().unwrap();
    let mut e = CatalogEditor::new(site.path().join("downloads"));
    e.enable_fs(&mut picker(site.path()));
    e.add_image_at(CategoryId::Servicos, b"img", "s.jpg", 9);

    // the cached handle now points into a directory that no longer exists
    fs::remove_dir_all(site.path().join("data")).unwrap();

    let report = e.save(&mut Answer(true));
    match &report.outcome {
        SaveOutcome::Saved(Stored::ProjectRoot(h)) => {
            assert_eq!(h.path(), data_file(site.path()))
        }
        other => panic!("expected project folder save, got {other:?}"),
    }
    assert!(data_file(site.path()).exists());
    assert_eq!(
        e.status(),
        "projectsData.json saved to data/projectsData.json"
    );

    // the recreated file is cached, so the next save uses it directly
    let again = e.save(&mut Answer(true));
    assert_eq!(
        again.outcome,
        SaveOutcome::Saved(Stored::Handle(data_file(site.path())))
    );
}

#[test]
fn without_handles_the_catalog_is_offered_for_download() {
    let dir = TempDir::new().unwrap();
    let mut e = CatalogEditor::new(dir.path().join("downloads"));
    e.load();
    let out = e.add_image_at(CategoryId::Aluminio, b"img", "a.jpg", 3);
    assert!(matches!(
        out,
        AddOutcome::Added {
            placement: Placement::Download(_),
            ..
        }
    ));

    let report = e.save(&mut Answer(false));
    let target = dir.path().join("downloads").join("projectsData.json");
    assert_eq!(report.outcome, SaveOutcome::Saved(Stored::Download(target.clone())));
    assert!(e.status().contains("replace data/projectsData.json manually"));

    let text = fs::read_to_string(target).unwrap();
    assert!(text.starts_with("{\n  \"aluminio\": ["));
    assert!(e.json_handle().is_none());
}

#[test]
fn save_normalizes_before_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projectsData.json");
    fs::write(
        &path,
        r#"{ "aluminio": [
            { "src": "img/img_al/a.jpg", "descriptions": { "pt": "primeira" } },
            { "src": "img/img_al/a.jpg", "descriptions": { "pt": "segunda" } },
            { "descriptions": { "pt": "sem src" } }
        ] }"#,
    )
    .unwrap();

    let mut e = CatalogEditor::new(dir.path().join("downloads"))
        .with_json_handle(FileHandle::new(&path));
    e.load();

    let report = e.save(&mut Answer(false));
    assert_eq!(report.normalized.removed, 2);
    assert!(report.issues.is_empty());

    let saved = Catalog::from_value(
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap(),
    )
    .unwrap();
    assert_eq!(
        saved.aluminio,
        [Entry::with_descriptions(
            "img/img_al/a.jpg",
            Descriptions::new("primeira", "", "", ""),
        )]
    );
}

#[test]
fn accepted_path_issues_still_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projectsData.json");
    fs::write(&path, r#"{ "construcoes": [ { "src": "img/img_al/x.jpg" } ] }"#).unwrap();

    let mut e = CatalogEditor::new(dir.path().join("downloads"))
        .with_json_handle(FileHandle::new(&path));
    e.load();

    let mut prompts = Vec::new();
    let mut confirm = |p: &str| {
        prompts.push(p.to_string());
        true
    };
    let report = e.save(&mut confirm);

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].expected_prefix, "img/img_cm_fe");
    assert!(matches!(report.outcome, SaveOutcome::Saved(Stored::Handle(_))));
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Found 1 images with unexpected paths."));
}

#[test]
fn edits_survive_a_save_and_reload() {
    let site = TempDir::new().unwrap();
    let mut e = CatalogEditor::new(site.path().join("downloads"));
    e.enable_fs(&mut picker(site.path()));

    e.add_image_at(CategoryId::Construcoes, b"1", "obra.jpg", 1);
    e.add_image_at(CategoryId::Construcoes, b"2", "obra2.jpg", 2);
    e.edit_descriptions(
        CategoryId::Construcoes,
        1,
        Descriptions::new("Obra", "Works", "Obra", "Ouvrage"),
    )
    .unwrap();
    e.remove_entry(CategoryId::Construcoes, 0, &mut Answer(true))
        .unwrap();
    e.save(&mut Answer(false));

    let mut fresh = CatalogEditor::new(site.path().join("downloads"));
    fresh.enable_fs(&mut picker(site.path()));
    let list = fresh.entries(CategoryId::Construcoes);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].src(), Some("img/img_cm_fe/2_obra2.jpg"));
    assert_eq!(list[0].descriptions.get("fr"), Some("Ouvrage"));
}

#[test]
fn entries_with_odd_fields_survive_a_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("projectsData.json");
    fs::write(
        &path,
        r#"{ "aluminio": [
            { "src": "img/img_al/a.jpg", "descriptions": { "pt": 2024, "en": "x" } },
            { "src": "img/img_al/b.jpg", "descriptions": "Janela" },
            { "src": "img/img_al/c.jpg", "title": "Porta", "descriptions": { "pt": "c" } }
        ] }"#,
    )
    .unwrap();

    let mut e = CatalogEditor::new(dir.path().join("downloads"))
        .with_json_handle(FileHandle::new(&path));
    e.load();

    let report = e.save(&mut Answer(true));
    assert_eq!(report.normalized.removed, 0);
    assert!(matches!(report.outcome, SaveOutcome::Saved(Stored::Handle(_))));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let srcs: Vec<_> = written["aluminio"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["src"].as_str().unwrap())
        .collect();
    assert_eq!(srcs, ["img/img_al/a.jpg", "img/img_al/b.jpg", "img/img_al/c.jpg"]);
    assert_eq!(written["aluminio"][0]["descriptions"]["pt"], "2024");
    assert_eq!(written["aluminio"][1]["descriptions"]["fr"], "");
    assert_eq!(written["aluminio"][2]["title"], "Porta");
}
