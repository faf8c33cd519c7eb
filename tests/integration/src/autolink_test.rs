//! Auto-link flow test
//!
//! Drives the engine the way a host does: a configuration with project
//! mappings, then a stream of item change notifications.

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use treelink_config::{Configuration, ProjectMapping, RootProjectConfig, Rule, RuleKind};
use treelink_core::{AutoLinker, ProjectItemAction, ensure_root_projects};
use treelink_platform::ProjectPlatform;
use treelink_provider::{MemoryProject, MemorySolution, ProjectTree, ProjectTreeExt};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup_solution() -> MemorySolution {
    init_tracing();
    let root = MemoryProject::new("Catel.MVVM.NET35", "/sln/Catel.MVVM.NET35");
    root.seed_file(None, "ViewModelBase.cs");
    let services = root.seed_folder(None, "Services");
    root.seed_file(Some(services), "NavigationService.cs");

    MemorySolution::new()
        .with_project(root)
        .with_project(MemoryProject::new("Catel.MVVM.WP7", "/sln/Catel.MVVM.WP7"))
        .with_project(MemoryProject::new(
            "Catel.MVVM.WIN80",
            "/sln/Catel.MVVM.WIN80",
        ))
}

fn mapped_configuration() -> Configuration {
    let mut configuration = Configuration::default();
    for target in ["Catel.MVVM.WP7", "Catel.MVVM.WIN80"] {
        configuration
            .project_mappings
            .push(ProjectMapping::new("Catel.MVVM.NET35", target));
    }
    configuration
}

#[test]
fn add_notification_links_into_all_mapped_targets() {
    let solution = setup_solution();
    let configuration = mapped_configuration();

    let source = solution.project("Catel.MVVM.NET35").unwrap();
    let services = source.node_at("Services").unwrap().unwrap();
    let added = source.seed_file(Some(services), "MessageService.cs");

    AutoLinker::new(&solution, &configuration)
        .handle_project_item_change(source, added, ProjectItemAction::Add, None)
        .unwrap();

    for name in ["Catel.MVVM.WP7", "Catel.MVVM.WIN80"] {
        let target = solution.project(name).unwrap();
        let linked = target.node_at("Services/MessageService.cs").unwrap();
        assert!(linked.is_some(), "missing link in {name}");
        assert!(target.is_linked(linked.unwrap()).unwrap());
    }
}

#[test]
fn rename_notification_swaps_the_link() {
    let solution = setup_solution();
    let configuration = mapped_configuration();

    let source = solution.project("Catel.MVVM.NET35").unwrap();
    let item = source.node_at("ViewModelBase.cs").unwrap().unwrap();
    let auto_linker = AutoLinker::new(&solution, &configuration);

    auto_linker
        .handle_project_item_change(source, item, ProjectItemAction::Add, None)
        .unwrap();

    // The host renames the source file, then reports the change.
    source.remove(item).unwrap();
    let renamed = source.seed_file(None, "ViewModel.cs");
    auto_linker
        .handle_project_item_change(
            source,
            renamed,
            ProjectItemAction::Rename,
            Some("ViewModelBase.cs"),
        )
        .unwrap();

    let wp7 = solution.project("Catel.MVVM.WP7").unwrap();
    assert!(wp7.node_at("ViewModelBase.cs").unwrap().is_none());
    assert!(wp7.node_at("ViewModel.cs").unwrap().is_some());
}

#[test]
fn remove_notification_prunes_the_link() {
    let solution = setup_solution();
    let configuration = mapped_configuration();

    let source = solution.project("Catel.MVVM.NET35").unwrap();
    let item = source.node_at("ViewModelBase.cs").unwrap().unwrap();
    let auto_linker = AutoLinker::new(&solution, &configuration);

    auto_linker
        .handle_project_item_change(source, item, ProjectItemAction::Add, None)
        .unwrap();

    source.remove(item).unwrap();
    auto_linker
        .handle_project_item_change(source, item, ProjectItemAction::Remove, None)
        .unwrap();

    let wp7 = solution.project("Catel.MVVM.WP7").unwrap();
    assert!(wp7.node_at("ViewModelBase.cs").unwrap().is_none());
}

#[test]
fn rules_apply_during_auto_link() {
    let solution = setup_solution();
    let mut configuration = mapped_configuration();
    let mut root = RootProjectConfig::new("Catel.MVVM.NET35");
    root.rules.push(Rule::new(
        "ViewModelBase.cs",
        RuleKind::DoNotAdd,
        vec![ProjectPlatform::Wp7],
    ));
    configuration.root_projects.push(root);

    let source = solution.project("Catel.MVVM.NET35").unwrap();
    let item = source.node_at("ViewModelBase.cs").unwrap().unwrap();

    AutoLinker::new(&solution, &configuration)
        .handle_project_item_change(source, item, ProjectItemAction::Add, None)
        .unwrap();

    let wp7 = solution.project("Catel.MVVM.WP7").unwrap();
    assert!(wp7.node_at("ViewModelBase.cs").unwrap().is_none());
    let win80 = solution.project("Catel.MVVM.WIN80").unwrap();
    assert!(win80.node_at("ViewModelBase.cs").unwrap().is_some());
}

#[test]
fn seeded_configuration_round_trips_through_disk() {
    let solution = setup_solution();
    let mut configuration = mapped_configuration();

    // Opening a solution seeds a root project entry per base project and
    // persists the configuration when anything was added.
    let changed = ensure_root_projects(&mut configuration, &solution);
    assert!(changed);

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("treelink.toml");
    configuration.save(&path).unwrap();

    let loaded = Configuration::load(&path).unwrap();
    assert_eq!(loaded, configuration);
    assert_eq!(loaded.root_projects.len(), 1);
    assert_eq!(loaded.root_projects[0].name, "Catel.MVVM.NET35");
}
