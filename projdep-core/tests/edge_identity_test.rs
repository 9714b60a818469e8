// projdep-core/tests/edge_identity_test.rs
mod common;

use std::collections::HashSet;
use std::sync::Arc;

use projdep_common::model::{Capability, ExcludeRule};
use projdep_common::error::ProjdepError;
use projdep_core::{Configuration, ProjectDependency};

use crate::common::{project, tree};

#[test]
fn same_edge_through_different_handles() {
    let first_tree = tree();
    let reloaded_tree = tree();
    let a = ProjectDependency::with_configuration(&project(&first_tree, ":lib"), Some("api"), true);
    let mut b =
        ProjectDependency::with_configuration(&project(&reloaded_tree, ":lib"), Some("api"), true);
    b.set_transitive(false).exclude(ExcludeRule {
        group: Some("org.slf4j".into()),
        module: Some("slf4j-simple".into()),
    });

    assert_eq!(a, b);
    assert_eq!(a.content_hash(), b.content_hash());

    let deduplicated: HashSet<ProjectDependency> = [a.clone(), b, a.copy()].into_iter().collect();
    assert_eq!(deduplicated.len(), 1);
}

#[test]
fn absent_configuration_is_not_the_default_name() {
    let tree = tree();
    let lib = project(&tree, ":lib");
    let implicit = ProjectDependency::new(&lib, true);
    let explicit = ProjectDependency::with_configuration(&lib, Some("default"), true);
    assert_ne!(implicit, explicit);
    // same label, different identity
    assert_eq!(implicit.to_string(), explicit.to_string());
}

#[test]
fn copy_keeps_shared_state() {
    let tree = tree();
    let mut edge = ProjectDependency::with_configuration(&project(&tree, ":lib"), Some("api"), false);
    edge.attribute("usage", "java-api")
        .capability(Capability::new("org.example", "lib-fixtures"))
        .exclude(ExcludeRule {
            group: Some("junit".into()),
            module: None,
        })
        .set_transitive(false);

    let copied = edge.copy();
    assert_eq!(copied, edge);
    assert!(copied.content_equals(&edge));
    assert_eq!(copied.target_configuration(), Some("api"));
    assert!(!copied.build_project_dependencies());
    assert_eq!(copied.exclude_rules(), edge.exclude_rules());
    assert_eq!(copied.requested_capabilities(), edge.requested_capabilities());
    assert!(Arc::ptr_eq(
        &copied.dependency_project().unwrap(),
        &edge.dependency_project().unwrap()
    ));
}

#[test]
fn identity_survives_version_changes() {
    let tree = tree();
    let lib = project(&tree, ":lib");
    lib.set_version("1.0");
    let edge = ProjectDependency::new(&lib, true);
    let hash_before = edge.content_hash();

    lib.set_version("1.1");
    lib.set_group("org.example.renamed");
    assert_eq!(edge.version().unwrap(), "1.1");
    assert_eq!(edge.group().unwrap(), "org.example.renamed");
    assert_eq!(edge.content_hash(), hash_before);
}

#[test]
fn mutually_dependent_projects_are_freed_with_the_tree() {
    let tree = tree();
    let app = project(&tree, ":app");
    let lib = project(&tree, ":lib");
    lib.configurations()
        .register(Configuration::builder("default").dependency(ProjectDependency::new(&app, true)))
        .unwrap();
    app.configurations()
        .register(Configuration::builder("default").dependency(ProjectDependency::new(&lib, true)))
        .unwrap();
    let edge = ProjectDependency::new(&lib, true);
    let weak_lib = Arc::downgrade(&lib);
    let weak_app = Arc::downgrade(&app);

    drop(lib);
    drop(app);
    drop(tree);
    assert!(weak_lib.upgrade().is_none());
    assert!(weak_app.upgrade().is_none());
    assert!(matches!(
        edge.find_project_configuration(),
        Err(ProjdepError::UnknownProject(ref path)) if path == ":lib"
    ));
}
