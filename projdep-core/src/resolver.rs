// projdep-core/src/resolver.rs
use std::sync::Arc;

use projdep_common::config::DEFAULT_CONFIGURATION;
use projdep_common::error::{ProjdepError, Result};
use tracing::debug;

use crate::configuration::Configuration;
use crate::project_dependency::ProjectDependency;

/// Selects the configuration a project dependency points at.
///
/// Looks the name up fresh on every call, so a configuration renamed or replaced
/// between two calls is observed by the second one. A configuration that is not
/// consumable fails the lookup without emitting any deprecation; one that is
/// deprecated for consumption reports exactly one notice per call.
pub fn find_project_configuration(dependency: &ProjectDependency) -> Result<Arc<Configuration>> {
    let project = dependency.dependency_project()?;
    let name = dependency
        .target_configuration()
        .unwrap_or(DEFAULT_CONFIGURATION);
    debug!(
        "Selecting configuration '{}' of {}",
        name,
        project.display_name()
    );

    let selected = project.configurations().get_by_name(name)?;
    if !selected.is_can_be_consumed() {
        return Err(ProjdepError::ConfigurationNotConsumable {
            project: project.display_name(),
            configuration: selected.name().to_string(),
        });
    }

    selected.maybe_emit_consumption_deprecation(project.deprecations());
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use projdep_common::deprecation::DeprecationReporter;
    use projdep_common::model::ProjectPath;

    use super::*;
    use crate::project::{BuildTree, Project};

    fn setup() -> (BuildTree, Arc<Project>) {
        let tree = BuildTree::new("shop", Arc::new(DeprecationReporter::default()));
        let lib = tree.add_project(&ProjectPath::parse(":lib").unwrap()).unwrap();
        (tree, lib)
    }

    #[test]
    fn absent_name_selects_default() {
        let (_tree, lib) = setup();
        lib.configurations()
            .register(Configuration::builder("default"))
            .unwrap();
        let dep = ProjectDependency::new(&lib, true);
        assert_eq!(find_project_configuration(&dep).unwrap().name(), "default");
    }

    #[test]
    fn explicit_name_is_used() {
        let (_tree, lib) = setup();
        lib.configurations()
            .register(Configuration::builder("default"))
            .unwrap();
        lib.configurations()
            .register(Configuration::builder("apiElements").consumable())
            .unwrap();
        let dep = ProjectDependency::with_configuration(&lib, Some("apiElements"), true);
        assert_eq!(find_project_configuration(&dep).unwrap().name(), "apiElements");
    }

    #[test]
    fn missing_configuration() {
        let (_tree, lib) = setup();
        let dep = ProjectDependency::with_configuration(&lib, Some("nope"), true);
        let err = find_project_configuration(&dep).unwrap_err();
        assert!(matches!(
            err,
            ProjdepError::NoSuchConfiguration { ref project, ref name }
                if project == "project ':lib'" && name == "nope"
        ));
    }

    #[test]
    fn not_consumable_fails_without_deprecation() {
        let (tree, lib) = setup();
        lib.configurations()
            .register(
                Configuration::builder("compileClasspath")
                    .resolvable()
                    .deprecated_for_consumption(["apiElements"]),
            )
            .unwrap();
        let dep =
            ProjectDependency::with_configuration(&lib, Some("compileClasspath"), true);
        let err = find_project_configuration(&dep).unwrap_err();
        assert!(matches!(
            err,
            ProjdepError::ConfigurationNotConsumable { ref project, ref configuration }
                if project == "project ':lib'" && configuration == "compileClasspath"
        ));
        assert_eq!(tree.deprecations().count(), 0);
    }

    #[test]
    fn deprecated_consumption_reports_once_per_call() {
        let (tree, lib) = setup();
        lib.configurations()
            .register(Configuration::builder("compile").deprecated_for_consumption(["apiElements"]))
            .unwrap();
        let dep = ProjectDependency::with_configuration(&lib, Some("compile"), true);

        find_project_configuration(&dep).unwrap();
        assert_eq!(tree.deprecations().count(), 1);
        find_project_configuration(&dep).unwrap();
        assert_eq!(tree.deprecations().count(), 2);
    }
}
