// projdep-core/src/configuration.rs
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use bitflags::bitflags;
use projdep_common::deprecation::{DeprecationNotice, DeprecationReporter};
use projdep_common::error::{ProjdepError, Result};
use projdep_common::model::{DependencyConstraint, ProjectPath, PublishArtifact};
use tracing::debug;

use crate::dependency::Dependency;

bitflags! {
    /// What a configuration may be used for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConfigurationRole: u8 {
        /// Selectable as the target of a dependency from another project.
        const CONSUMABLE = 0b0000_0001;
        /// Resolvable into a dependency graph by its own project.
        const RESOLVABLE = 0b0000_0010;
        /// Dependencies may be declared on it.
        const DECLARABLE = 0b0000_0100;
    }
}

impl Default for ConfigurationRole {
    fn default() -> Self {
        Self::all()
    }
}

/// Named bucket of declared dependencies, constraints and published artifacts.
///
/// A registered configuration is an immutable snapshot; changes go through
/// [`ConfigurationContainer::configure`], which swaps in a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    owner: ProjectPath,
    name: String,
    roles: ConfigurationRole,
    consumption_deprecation: Option<Vec<String>>,
    extends_from: Vec<String>,
    dependencies: Vec<Dependency>,
    constraints: Vec<DependencyConstraint>,
    artifacts: Vec<PublishArtifact>,
}

impl Configuration {
    pub fn builder(name: impl Into<String>) -> ConfigurationBuilder {
        ConfigurationBuilder {
            name: name.into(),
            roles: ConfigurationRole::default(),
            consumption_deprecation: None,
            extends_from: Vec::new(),
            dependencies: Vec::new(),
            constraints: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    pub fn owner(&self) -> &ProjectPath {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_can_be_consumed(&self) -> bool {
        self.roles.contains(ConfigurationRole::CONSUMABLE)
    }

    pub fn is_can_be_resolved(&self) -> bool {
        self.roles.contains(ConfigurationRole::RESOLVABLE)
    }

    /// Reports one notice per call if this configuration is deprecated for consumption.
    pub fn maybe_emit_consumption_deprecation(&self, reporter: &DeprecationReporter) {
        if let Some(replacements) = &self.consumption_deprecation {
            debug!(
                "Configuration '{}' of {} is deprecated for consumption",
                self.name, self.owner
            );
            reporter.report(DeprecationNotice::configuration_consumption(
                &self.name,
                replacements,
            ));
        }
    }

    pub fn extends_from(&self) -> &[String] {
        &self.extends_from
    }

    /// Dependencies declared on this configuration itself, in declaration order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn dependency_constraints(&self) -> &[DependencyConstraint] {
        &self.constraints
    }

    pub fn artifacts(&self) -> &[PublishArtifact] {
        &self.artifacts
    }

    pub fn to_builder(&self) -> ConfigurationBuilder {
        ConfigurationBuilder {
            name: self.name.clone(),
            roles: self.roles,
            consumption_deprecation: self.consumption_deprecation.clone(),
            extends_from: self.extends_from.clone(),
            dependencies: self.dependencies.clone(),
            constraints: self.constraints.clone(),
            artifacts: self.artifacts.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    name: String,
    roles: ConfigurationRole,
    consumption_deprecation: Option<Vec<String>>,
    extends_from: Vec<String>,
    dependencies: Vec<Dependency>,
    constraints: Vec<DependencyConstraint>,
    artifacts: Vec<PublishArtifact>,
}

impl ConfigurationBuilder {
    pub fn roles(mut self, roles: ConfigurationRole) -> Self {
        self.roles = roles;
        self
    }

    /// Consumable only, the shape of an outgoing variant such as `apiElements`.
    pub fn consumable(self) -> Self {
        self.roles(ConfigurationRole::CONSUMABLE)
    }

    /// Resolvable only, for bookkeeping buckets like `compileClasspath`.
    pub fn resolvable(self) -> Self {
        self.roles(ConfigurationRole::RESOLVABLE)
    }

    pub fn deprecated_for_consumption<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumption_deprecation = Some(replacements.into_iter().map(Into::into).collect());
        self
    }

    pub fn extends_from(mut self, parent: impl Into<String>) -> Self {
        self.extends_from.push(parent.into());
        self
    }

    pub fn dependency(mut self, dependency: impl Into<Dependency>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn constraint(mut self, constraint: DependencyConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn artifact(mut self, artifact: PublishArtifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    fn build(self, owner: ProjectPath) -> Configuration {
        Configuration {
            owner,
            name: self.name,
            roles: self.roles,
            consumption_deprecation: self.consumption_deprecation,
            extends_from: self.extends_from,
            dependencies: self.dependencies,
            constraints: self.constraints,
            artifacts: self.artifacts,
        }
    }
}

/// The configurations of one project, looked up by name.
#[derive(Debug)]
pub struct ConfigurationContainer {
    owner: ProjectPath,
    owner_display_name: String,
    configurations: RwLock<BTreeMap<String, Arc<Configuration>>>,
}

impl ConfigurationContainer {
    pub(crate) fn new(owner: ProjectPath, owner_display_name: String) -> Self {
        Self {
            owner,
            owner_display_name,
            configurations: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn register(&self, builder: ConfigurationBuilder) -> Result<Arc<Configuration>> {
        let mut configurations = self
            .configurations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if configurations.contains_key(&builder.name) {
            return Err(ProjdepError::DuplicateConfiguration {
                project: self.owner_display_name.clone(),
                name: builder.name,
            });
        }
        let configuration = Arc::new(builder.build(self.owner.clone()));
        debug!(
            "Registered configuration '{}' in {}",
            configuration.name, self.owner_display_name
        );
        configurations.insert(configuration.name.clone(), Arc::clone(&configuration));
        Ok(configuration)
    }

    /// Rebuilds the named configuration through `action` and replaces the stored snapshot.
    /// Snapshots handed out earlier are left untouched. No lock is held while `action` runs.
    pub fn configure<F>(&self, name: &str, action: F) -> Result<Arc<Configuration>>
    where
        F: FnOnce(ConfigurationBuilder) -> ConfigurationBuilder,
    {
        let current = self.get_by_name(name)?;
        let mut builder = action(current.to_builder());
        // the name is the map key, renaming goes through `rename`
        builder.name = name.to_string();
        let updated = Arc::new(builder.build(self.owner.clone()));

        let mut configurations = self
            .configurations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if !configurations.contains_key(name) {
            return Err(self.no_such_configuration(name));
        }
        configurations.insert(name.to_string(), Arc::clone(&updated));
        Ok(updated)
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<Configuration>> {
        self.find_by_name(name)
            .ok_or_else(|| self.no_such_configuration(name))
    }

    pub fn find_by_name(&self, name: &str) -> Option<Arc<Configuration>> {
        self.configurations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn rename(&self, from: &str, to: &str) -> Result<Arc<Configuration>> {
        let mut configurations = self
            .configurations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if configurations.contains_key(to) {
            return Err(ProjdepError::DuplicateConfiguration {
                project: self.owner_display_name.clone(),
                name: to.to_string(),
            });
        }
        let current = configurations
            .remove(from)
            .ok_or_else(|| self.no_such_configuration(from))?;
        let mut renamed = current.as_ref().clone();
        renamed.name = to.to_string();
        let renamed = Arc::new(renamed);
        debug!(
            "Renamed configuration '{}' to '{}' in {}",
            from, to, self.owner_display_name
        );
        configurations.insert(to.to_string(), Arc::clone(&renamed));
        Ok(renamed)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Configuration>> {
        self.configurations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.configurations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// `configuration` followed by everything it extends, depth first, each once.
    pub fn hierarchy(&self, configuration: &Arc<Configuration>) -> Result<Vec<Arc<Configuration>>> {
        let mut ordered = Vec::new();
        let mut done = HashSet::new();
        let mut visiting = Vec::new();
        self.walk_hierarchy(configuration, &mut visiting, &mut done, &mut ordered)?;
        Ok(ordered)
    }

    fn walk_hierarchy(
        &self,
        configuration: &Arc<Configuration>,
        visiting: &mut Vec<String>,
        done: &mut HashSet<String>,
        ordered: &mut Vec<Arc<Configuration>>,
    ) -> Result<()> {
        if visiting.contains(&configuration.name) {
            return Err(ProjdepError::ConfigurationCycle {
                project: self.owner_display_name.clone(),
                name: configuration.name.clone(),
            });
        }
        if !done.insert(configuration.name.clone()) {
            return Ok(());
        }
        ordered.push(Arc::clone(configuration));
        visiting.push(configuration.name.clone());
        for parent in &configuration.extends_from {
            let parent = self.get_by_name(parent)?;
            self.walk_hierarchy(&parent, visiting, done, ordered)?;
        }
        visiting.pop();
        Ok(())
    }

    /// Declared dependencies of `configuration` and everything it extends, first occurrence wins.
    pub fn all_dependencies(&self, configuration: &Arc<Configuration>) -> Result<Vec<Dependency>> {
        Ok(collect_unique(
            self.hierarchy(configuration)?
                .iter()
                .flat_map(|c| c.dependencies.iter().cloned()),
        ))
    }

    pub fn all_dependency_constraints(
        &self,
        configuration: &Arc<Configuration>,
    ) -> Result<Vec<DependencyConstraint>> {
        Ok(collect_unique(
            self.hierarchy(configuration)?
                .iter()
                .flat_map(|c| c.constraints.iter().cloned()),
        ))
    }

    pub fn all_artifacts(&self, configuration: &Arc<Configuration>) -> Result<Vec<PublishArtifact>> {
        Ok(collect_unique(
            self.hierarchy(configuration)?
                .iter()
                .flat_map(|c| c.artifacts.iter().cloned()),
        ))
    }

    fn no_such_configuration(&self, name: &str) -> ProjdepError {
        ProjdepError::NoSuchConfiguration {
            project: self.owner_display_name.clone(),
            name: name.to_string(),
        }
    }
}

fn collect_unique<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}
