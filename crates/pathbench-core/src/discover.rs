use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const MAP_SUFFIX: &str = ".map";
pub const SCENARIO_SUFFIX: &str = ".map.scen";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("benchmark root {root} is not readable: {source}")]
    Root {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed walking benchmark root {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("no '*{suffix}' files found under {root}")]
    Empty { root: PathBuf, suffix: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredFile {
    pub relative: PathBuf,
    pub absolute: PathBuf,
}

pub struct InputEnumerator {
    root: PathBuf,
    suffix: &'static str,
    walker: walkdir::IntoIter,
}

impl InputEnumerator {
    pub fn new(root: &Path, suffix: &'static str) -> Result<Self, DiscoveryError> {
        let root = root.canonicalize().map_err(|source| DiscoveryError::Root {
            root: root.to_path_buf(),
            source,
        })?;
        let walker = walkdir::WalkDir::new(&root).into_iter();
        Ok(Self {
            root,
            suffix,
            walker,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for InputEnumerator {
    type Item = Result<DiscoveredFile, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    return Some(Err(DiscoveryError::Walk {
                        root: self.root.clone(),
                        source,
                    }))
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            let matches = entry
                .file_name()
                .to_str()
                .map(|name| name.len() > self.suffix.len() && name.ends_with(self.suffix))
                .unwrap_or(false);
            if !matches {
                continue;
            }
            let absolute = entry.path().to_path_buf();
            let relative = absolute
                .strip_prefix(&self.root)
                .unwrap_or(&absolute)
                .to_path_buf();
            return Some(Ok(DiscoveredFile { relative, absolute }));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BenchmarkInstance {
    file: DiscoveredFile,
}

impl BenchmarkInstance {
    pub fn new(file: DiscoveredFile) -> Self {
        Self { file }
    }

    pub fn relative(&self) -> &Path {
        &self.file.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.file.absolute
    }

    pub fn token(&self) -> String {
        file_token(&self.file.relative, MAP_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioInstance {
    file: DiscoveredFile,
}

impl ScenarioInstance {
    pub fn new(file: DiscoveredFile) -> Self {
        Self { file }
    }

    pub fn relative(&self) -> &Path {
        &self.file.relative
    }

    pub fn absolute(&self) -> &Path {
        &self.file.absolute
    }

    pub fn token(&self) -> String {
        file_token(&self.file.relative, SCENARIO_SUFFIX)
    }
}

pub fn discover_instances(root: &Path) -> Result<Vec<BenchmarkInstance>, DiscoveryError> {
    collect_non_empty(root, MAP_SUFFIX, BenchmarkInstance::new)
}

pub fn discover_scenarios(root: &Path) -> Result<Vec<ScenarioInstance>, DiscoveryError> {
    collect_non_empty(root, SCENARIO_SUFFIX, ScenarioInstance::new)
}

fn collect_non_empty<T>(
    root: &Path,
    suffix: &'static str,
    wrap: fn(DiscoveredFile) -> T,
) -> Result<Vec<T>, DiscoveryError> {
    let enumerator = InputEnumerator::new(root, suffix)?;
    let root = enumerator.root().to_path_buf();
    let found = enumerator
        .map(|item| item.map(wrap))
        .collect::<Result<Vec<_>, _>>()?;
    if found.is_empty() {
        return Err(DiscoveryError::Empty { root, suffix });
    }
    Ok(found)
}

pub fn file_token(relative: &Path, suffix: &str) -> String {
    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("_");
    match joined.strip_suffix(suffix) {
        Some(stem) => stem.to_string(),
        None => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeSet;
    use std::fs;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pathbench_{}_{}_{}",
            label,
            std::process::id(),
            Utc::now().timestamp_micros()
        ));
        fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).expect("parent");
        fs::write(path, b"").expect("touch");
    }

    #[test]
    fn file_token_flattens_directories_and_strips_suffix() {
        assert_eq!(
            file_token(Path::new("dao/arena.map.scen"), SCENARIO_SUFFIX),
            "dao_arena"
        );
        assert_eq!(file_token(Path::new("bg512/AR0011SR.map"), MAP_SUFFIX), "bg512_AR0011SR");
        assert_eq!(file_token(Path::new("top.map"), MAP_SUFFIX), "top");
    }

    #[test]
    fn enumerator_separates_maps_from_scenarios() {
        let root = scratch_dir("discover");
        touch(&root.join("dao/arena.map"));
        touch(&root.join("dao/arena.map.scen"));
        touch(&root.join("maze/m1.map"));
        touch(&root.join("maze/m1.map.scen"));
        touch(&root.join("maze/readme.txt"));

        let maps: BTreeSet<String> = discover_instances(&root)
            .expect("maps")
            .iter()
            .map(|m| m.token())
            .collect();
        let scens: BTreeSet<String> = discover_scenarios(&root)
            .expect("scenarios")
            .iter()
            .map(|s| s.token())
            .collect();
        assert_eq!(maps, BTreeSet::from(["dao_arena".to_string(), "maze_m1".to_string()]));
        assert_eq!(scens, maps);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn scenario_relative_and_absolute_paths_are_consistent() {
        let root = scratch_dir("scen_paths");
        touch(&root.join("street/berlin.map.scen"));
        let scens = discover_scenarios(&root).expect("scenarios");
        assert_eq!(scens.len(), 1);
        assert_eq!(scens[0].relative(), Path::new("street/berlin.map.scen"));
        assert!(scens[0].absolute().is_absolute());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn empty_root_is_a_discovery_failure() {
        let root = scratch_dir("discover_empty");
        touch(&root.join("notes.txt"));
        let err = discover_scenarios(&root).expect_err("no scenarios");
        assert!(matches!(err, DiscoveryError::Empty { .. }), "unexpected: {}", err);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_root_is_a_discovery_failure() {
        let root = std::env::temp_dir().join("pathbench_definitely_missing_root_dir");
        let err = discover_instances(&root).expect_err("missing root");
        assert!(matches!(err, DiscoveryError::Root { .. }), "unexpected: {}", err);
    }
}
