//! Integration tests for Include handling, containers, and added-records mode

use std::fs;

use simcfg_foundation::ErrorKind;
use simcfg_runtime::{LoadConfig, Location, MemoryArchive, ModelLoader, standard_types};

fn loader() -> ModelLoader {
    ModelLoader::new(standard_types()).with_config(LoadConfig::in_memory())
}

// =============================================================================
// Filesystem Includes
// =============================================================================

#[test]
fn include_resolves_relative_to_including_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("parts")).unwrap();
    fs::write(
        dir.path().join("model.cfg"),
        "Include 'parts/queues.cfg'\nDefine Server { S1 }\nS1 WaitQueue { Q1 }\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("parts/queues.cfg"),
        "Define Queue { Q1 }\nInclude capacity.cfg\n",
    )
    .unwrap();
    fs::write(dir.path().join("parts/capacity.cfg"), "Q1 Capacity { 12 }\n").unwrap();

    let mut loader = loader();
    loader
        .load_root(Location::file(dir.path().join("model.cfg")))
        .unwrap();
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.value("Q1", "Capacity"), Some("12"));
    assert_eq!(loader.value("S1", "WaitQueue"), Some("Q1"));
}

#[test]
fn missing_include_is_logged_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("model.cfg");
    fs::write(&root, "Include nowhere.cfg\nDefine Queue { Q1 }\n").unwrap();

    let mut loader = loader();
    loader.load_root(Location::file(&root)).unwrap();
    assert_eq!(loader.errors(), 1);
    assert!(loader.entity("Q1").is_some());
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut loader = loader();
    let err = loader
        .load_root(Location::file(dir.path().join("absent.cfg")))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingRootFile(_)));
    assert!(err.is_fatal());
}

#[test]
fn self_include_stops_at_depth_limit() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("loop.cfg");
    fs::write(&root, "Include loop.cfg\n").unwrap();

    let mut loader = ModelLoader::new(standard_types())
        .with_config(LoadConfig::in_memory().with_max_include_depth(4));
    loader.load_root(Location::file(&root)).unwrap();
    assert_eq!(loader.errors(), 1);
}

// =============================================================================
// Containers
// =============================================================================

#[test]
fn includes_stay_inside_the_container() {
    let archive = MemoryArchive::new("bundle.zip")
        .with_file("cfg/model.cfg", "Include 'parts/a.cfg'\nInclude ../shared.cfg\n")
        .with_file("cfg/parts/a.cfg", "Define Queue { Q1 }\n")
        .with_file("shared.cfg", "Q1 Priority { 3 }\n");
    let root = archive.location("cfg/model.cfg");

    let mut loader = ModelLoader::new(standard_types())
        .with_config(LoadConfig::in_memory())
        .with_provider(archive);
    loader.load_root(root).unwrap();
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.value("Q1", "Priority"), Some("3"));
}

#[test]
fn container_paths_parse_from_strings() {
    let archive = MemoryArchive::new("bundle.zip").with_file("model.cfg", "Define Region { R }\n");
    let mut loader = ModelLoader::new(standard_types())
        .with_config(LoadConfig::in_memory())
        .with_provider(archive);
    loader.load_path("bundle.zip!/model.cfg").unwrap();
    assert!(loader.entity("R").is_some());
}

// =============================================================================
// Added-Records Mode
// =============================================================================

#[test]
fn marker_applies_to_later_includes() {
    let archive = MemoryArchive::new("m")
        .with_file(
            "model.cfg",
            "Define Queue { Q1 }\n\" *** Added Records ***\nInclude more.cfg\nQ1 Priority { 2 }\n",
        )
        .with_file("more.cfg", "Define Queue { Q2 }\n");
    let root = archive.location("model.cfg");

    let mut loader = loader().with_provider(archive);
    loader.load_root(root).unwrap();

    assert!(loader.session().added_records_seen);
    assert!(!loader.entity("Q1").unwrap().is_added());
    assert!(loader.entity("Q1").unwrap().is_edited());
    assert!(loader.entity("Q2").unwrap().is_added());
}

#[test]
fn marker_inside_include_carries_back_out() {
    let archive = MemoryArchive::new("m")
        .with_file("model.cfg", "Include base.cfg\nDefine Queue { Q2 }\n")
        .with_file("base.cfg", "Define Queue { Q1 }\n\" *** Added Records ***\n");
    let root = archive.location("model.cfg");

    let mut loader = loader().with_provider(archive);
    loader.load_root(root).unwrap();
    assert!(!loader.entity("Q1").unwrap().is_added());
    assert!(loader.entity("Q2").unwrap().is_added());
}

#[test]
fn marker_inside_open_record_is_a_comment() {
    let mut loader = loader();
    loader.load_text(
        Location::file("model.cfg"),
        "Define Queue {\n\" *** Added Records ***\nQ1 }\n",
    );
    assert!(!loader.session().added_records_seen);
    assert!(!loader.entity("Q1").unwrap().is_added());
}
