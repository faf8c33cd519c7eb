//! End-to-end linking test
//!
//! Exercises the complete flow: configuration loaded from disk -> full
//! synchronization of a multi-target solution -> remove phase cleanup.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use treelink_config::Configuration;
use treelink_core::Linker;
use treelink_provider::{MemoryProject, MemorySolution, ProjectTree, ProjectTreeExt};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A solution shaped like a real multi-targeted library: one base project
/// holding the sources and one empty project per additional platform.
fn setup_solution() -> MemorySolution {
    init_tracing();
    let root = MemoryProject::new("Catel.Core.NET35", "/sln/Catel.Core.NET35");
    root.seed_file(None, "GlobalInitialization.cs");
    root.seed_file(None, "Resources.resx");
    let helpers = root.seed_folder(None, "Helpers");
    root.seed_file(Some(helpers), "EnumHelper.cs");
    root.seed_file(Some(helpers), "StringHelper.cs");
    let views = root.seed_folder(None, "Views");
    root.seed_file(Some(views), "MainView.xaml");

    let mut solution = MemorySolution::new().with_project(root);
    for name in [
        "Catel.Core.NET40",
        "Catel.Core.NET45",
        "Catel.Core.WP7",
        "Catel.Core.WIN80",
    ] {
        solution.add_project(MemoryProject::new(name, format!("/sln/{name}")));
    }
    solution
}

fn setup_config_file(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("solution").join("treelink.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"
enable_auto_link = true

[[root_projects]]
name = "Catel.Core.NET35"

[[root_projects.rules]]
name = "GlobalInitialization.cs"
kind = "do-not-add"
platforms = ["WP7"]

[[root_projects.rules]]
name = "Helpers/StringHelper.cs"
kind = "do-not-remove"
platforms = ["NET40"]

[[project_mappings]]
source_project = "Catel.Core.NET35"
target_project = "Catel.Core.NET40"
"#,
    )
    .unwrap();
    path
}

#[test]
fn full_synchronization_of_a_multi_target_solution() {
    let temp = TempDir::new().unwrap();
    let config = Configuration::load(&setup_config_file(&temp)).unwrap();
    let solution = setup_solution();

    let root = solution.project("Catel.Core.NET35").unwrap();
    let target_names = [
        "Catel.Core.NET40",
        "Catel.Core.NET45",
        "Catel.Core.WP7",
        "Catel.Core.WIN80",
    ];
    let targets: Vec<&dyn ProjectTree> = target_names
        .iter()
        .map(|name| solution.project(name).unwrap() as &dyn ProjectTree)
        .collect();

    Linker::new(&solution, root, targets, &config)
        .remove_missing_files(true)
        .link_files()
        .unwrap();

    // Plain targets mirror the whole tree.
    let net40 = solution.project("Catel.Core.NET40").unwrap();
    assert_eq!(
        net40.relative_paths(),
        [
            "GlobalInitialization.cs",
            "Resources.resx",
            "Helpers/",
            "Helpers/EnumHelper.cs",
            "Helpers/StringHelper.cs",
            "Views/",
            "Views/MainView.xaml",
        ]
    );

    // Everything arrives as a link except the XAML copy below.
    let init = net40.node_at("GlobalInitialization.cs").unwrap().unwrap();
    assert!(net40.is_linked(init).unwrap());

    // The do-not-add rule holds back one file on WP7 only.
    let wp7 = solution.project("Catel.Core.WP7").unwrap();
    assert!(wp7.node_at("GlobalInitialization.cs").unwrap().is_none());
    assert!(wp7.node_at("Helpers/EnumHelper.cs").unwrap().is_some());

    // XAML is physically copied on NET40/NET45 and linked elsewhere.
    let xaml40 = net40.node_at("Views/MainView.xaml").unwrap().unwrap();
    assert!(!net40.is_linked(xaml40).unwrap());
    let win80 = solution.project("Catel.Core.WIN80").unwrap();
    let xaml80 = win80.node_at("Views/MainView.xaml").unwrap().unwrap();
    assert!(win80.is_linked(xaml80).unwrap());
}

#[test]
fn resynchronization_prunes_stale_links_but_honors_rules() {
    let temp = TempDir::new().unwrap();
    let config = Configuration::load(&setup_config_file(&temp)).unwrap();
    let solution = setup_solution();

    let root = solution.project("Catel.Core.NET35").unwrap();
    let net40 = solution.project("Catel.Core.NET40").unwrap();

    let sync = |targets: Vec<&dyn ProjectTree>| {
        Linker::new(&solution, root, targets, &config)
            .remove_missing_files(true)
            .link_files()
            .unwrap();
    };

    sync(vec![net40 as &dyn ProjectTree]);

    // Delete two source files, one of which is protected by a
    // do-not-remove rule on NET40.
    let stale = root.node_at("Helpers/EnumHelper.cs").unwrap().unwrap();
    root.remove(stale).unwrap();
    let protected = root.node_at("Helpers/StringHelper.cs").unwrap().unwrap();
    root.remove(protected).unwrap();

    sync(vec![net40 as &dyn ProjectTree]);

    assert!(net40.node_at("Helpers/EnumHelper.cs").unwrap().is_none());
    assert!(net40.node_at("Helpers/StringHelper.cs").unwrap().is_some());
    // The folder keeps its protected item, so it survives.
    assert!(net40.node_at("Helpers").unwrap().is_some());
}

#[test]
fn physical_files_in_targets_are_never_deleted() {
    let temp = TempDir::new().unwrap();
    let config = Configuration::load(&setup_config_file(&temp)).unwrap();
    let solution = setup_solution();

    let root = solution.project("Catel.Core.NET35").unwrap();
    let net45 = solution.project("Catel.Core.NET45").unwrap();
    net45.seed_file(None, "PlatformSpecific.cs");

    Linker::new(&solution, root, vec![net45 as &dyn ProjectTree], &config)
        .remove_missing_files(true)
        .link_files()
        .unwrap();

    assert!(net45.node_at("PlatformSpecific.cs").unwrap().is_some());
}

#[test]
fn corrupt_configuration_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("treelink.toml");
    fs::write(&path, "this is not toml [").unwrap();

    let config = Configuration::load_or_default(&path);
    assert!(config.enable_auto_link);
    assert!(config.root_projects.is_empty());
}
