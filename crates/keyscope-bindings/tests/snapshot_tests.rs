use keyscope_bindings::*;
use tempfile::TempDir;
use uuid::Uuid;

const SNAPSHOT: &str = r#"{
  "scopes": [
    { "name": "Global", "guid": "{5EFC7975-14BC-11CF-9B2B-00AA00573819}" },
    { "name": "Text Editor", "guid": "8b382828-6202-11d1-8870-0000f87579d2", "allows_navigation_keys": true }
  ],
  "commands": [
    {
      "guid": "5efc7975-14bc-11cf-9b2b-00aa00573819",
      "id": 43,
      "display_name": "Undo",
      "canonical_name": "Edit.Undo",
      "bindings": ["Global::Ctrl+Z", "Global::Alt+Bkspce"]
    },
    {
      "guid": "5efc7975-14bc-11cf-9b2b-00aa00573819",
      "id": 99,
      "display_name": "Hidden"
    }
  ]
}"#;

#[test]
fn test_snapshot_from_json() {
    let snapshot = HostSnapshot::from_json(SNAPSHOT).unwrap();

    assert_eq!(snapshot.scopes().len(), 2);
    assert_eq!(snapshot.scopes()[0].name, "Global");
    assert!(!snapshot.scopes()[0].allows_navigation_keys);
    assert!(snapshot.scopes()[1].allows_navigation_keys);
    assert_eq!(
        snapshot.scopes()[0].guid,
        Uuid::parse_str("5efc7975-14bc-11cf-9b2b-00aa00573819").unwrap()
    );

    let commands = snapshot.host_commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].id.id, 43);
    assert_eq!(commands[0].bindings.len(), 2);
    // Optional fields default to empty
    assert!(commands[1].canonical_name.is_empty());
    assert!(commands[1].bindings.is_empty());
}

#[test]
fn test_snapshot_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("host.json");

    let original = HostSnapshot::from_json(SNAPSHOT).unwrap();
    original.save(&path).unwrap();

    let reloaded = HostSnapshot::from_file(&path).unwrap();
    assert_eq!(reloaded.scopes(), original.scopes());
    assert_eq!(reloaded.host_commands(), original.host_commands());
}

#[test]
fn test_snapshot_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = HostSnapshot::from_file(temp_dir.path().join("missing.json"));
    assert!(matches!(result, Err(SnapshotError::Io(_))));
}

#[test]
fn test_snapshot_rejects_bad_guid() {
    let json = r#"{ "scopes": [ { "name": "Global", "guid": "global" } ] }"#;
    match HostSnapshot::from_json(json) {
        Err(SnapshotError::InvalidGuid { value, .. }) => assert_eq!(value, "global"),
        other => panic!("expected InvalidGuid, got {:?}", other),
    }
}

#[test]
fn test_snapshot_rejects_duplicate_scope_names() {
    let json = r#"{ "scopes": [
        { "name": "Global", "guid": "00000000-0000-0000-0000-000000000001" },
        { "name": "Global", "guid": "00000000-0000-0000-0000-000000000002" }
    ] }"#;
    assert!(matches!(
        HostSnapshot::from_json(json),
        Err(SnapshotError::DuplicateScope(name)) if name == "Global"
    ));
}

#[tokio::test]
async fn test_snapshot_drives_engine() {
    let snapshot = std::sync::Arc::new(HostSnapshot::from_json(SNAPSHOT).unwrap());
    let mut engine = KeybindingEngine::new(
        std::sync::Arc::clone(&snapshot),
        snapshot,
        EngineConfig::default(),
    )
    .unwrap();

    assert_eq!(engine.display_commands().await.unwrap().len(), 1);

    let candidate = engine.parse_candidate("Text Editor::Ctrl+Z").unwrap();
    let conflicts = engine.find_conflicts(&candidate).await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::HidesGlobalBindings);
}
