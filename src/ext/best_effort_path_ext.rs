use std::path::{Component, Path, PathBuf};

/// Renders a path for messages: canonical when it exists, otherwise made
/// absolute against the working directory with `.` and `..` folded away.
pub fn best_effort_path_display(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| normalize_path(&absolutize(path)))
        .display()
        .to_string()
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}
