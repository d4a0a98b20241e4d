//! Shared fixtures for composite build specs

pub use braid_adapters::{FakeLauncherFactory, LauncherFactory};
pub use braid_core::{BuildFailure, BuildId, CompositeConfig, SourceLocation, TaskPath, TaskReference};
pub use braid_engine::{
    BuildTasks, CompositeBuild, RegistryError, ResolveError, Task, TaskContainer,
};
pub use std::sync::Arc;

use std::collections::HashMap;

pub fn path(p: &str) -> TaskPath {
    TaskPath::parse(p).unwrap()
}

pub fn paths(ps: &[&str]) -> Vec<TaskPath> {
    ps.iter().map(|p| path(p)).collect()
}

pub fn id(name: &str) -> BuildId {
    BuildId::new(name)
}

/// A composite session whose builds all run on fake launchers
pub struct Composite {
    pub session: CompositeBuild,
    fakes: HashMap<String, FakeLauncherFactory>,
}

impl Composite {
    /// One included build per name, rooted under `/work`
    pub fn with_builds(names: &[&str]) -> Self {
        let toml: String = names
            .iter()
            .map(|name| format!("[[build]]\nname = \"{name}\"\ndir = \"/work/{name}\"\n\n"))
            .collect();
        let config = CompositeConfig::parse(&toml).unwrap();

        let mut fakes = HashMap::new();
        let session = CompositeBuild::from_config(&config, |entry| {
            let fake = FakeLauncherFactory::new(&entry.name);
            fakes.insert(entry.name.clone(), fake.clone());
            Arc::new(fake) as Arc<dyn LauncherFactory>
        })
        .unwrap();
        Self { session, fakes }
    }

    pub fn fake(&self, name: &str) -> &FakeLauncherFactory {
        &self.fakes[name]
    }

    pub fn reference(&self, build: &str, task: &str) -> TaskReference {
        self.session.build(build).unwrap().task(task).unwrap()
    }

    /// Declare `source -> build:task` and resolve it into `tasks`
    pub fn depend(&self, tasks: &mut BuildTasks, build: &str, task: &str) -> Task {
        let reference = self.reference(build, task);
        self.session.add_task(tasks.owner(), &reference).unwrap();
        let delegate = self.session.resolver().resolve(&reference, tasks).unwrap();
        Task::Delegate(delegate)
    }
}
