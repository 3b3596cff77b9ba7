//! Common test utilities for cco integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use httpmock::prelude::*;
use tempfile::TempDir;

pub const PRIMARY: &str = "rules/cco-rules.md";

pub const SKILLS: &[&str] = &[
    "cco-align",
    "cco-blueprint",
    "cco-commit",
    "cco-docs",
    "cco-optimize",
    "cco-pr",
    "cco-preflight",
    "cco-research",
    "cco-tune",
];

pub const AGENTS: &[&str] = &["cco-agent-analyze", "cco-agent-apply", "cco-agent-research"];

/// Every artifact path of the compiled-in manifest
pub fn manifest_paths() -> Vec<String> {
    let mut paths = vec![PRIMARY.to_string()];
    paths.extend(SKILLS.iter().map(|name| format!("skills/{name}/SKILL.md")));
    paths.extend(AGENTS.iter().map(|name| format!("agents/{name}.md")));
    paths
}

/// A temporary installation root
pub struct TestHome {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub root: PathBuf,
}

impl TestHome {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join(".claude");
        Self { temp, root }
    }

    /// Write a file under the root
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.root.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock release host: tag listing at `/tags`, raw files under `/raw`
pub struct RemoteFixture {
    pub server: MockServer,
}

#[allow(dead_code)]
impl RemoteFixture {
    pub fn new() -> Self {
        Self {
            server: MockServer::start(),
        }
    }

    /// Serve a complete release `v{version}`
    pub fn with_release(version: &str) -> Self {
        let fixture = Self::new();
        fixture.serve_tags(&[&format!("v{version}")]);
        fixture.serve_release(version, &[]);
        fixture
    }

    /// Serve every manifest artifact under `v{version}` except `missing`
    pub fn serve_release(&self, version: &str, missing: &[&str]) {
        let reference = format!("v{version}");
        for path in manifest_paths() {
            if missing.contains(&path.as_str()) {
                continue;
            }
            let body = if path == PRIMARY {
                primary_body(version)
            } else {
                artifact_body(&path)
            };
            self.serve_artifact(&reference, &path, &body);
        }
    }

    pub fn serve_tags(&self, tags: &[&str]) {
        let body = serde_json::to_string(
            &tags
                .iter()
                .map(|name| serde_json::json!({ "name": name }))
                .collect::<Vec<_>>(),
        )
        .expect("Failed to encode tags");
        self.server.mock(|when, then| {
            when.method(GET).path("/tags");
            then.status(200)
                .header("content-type", "application/json")
                .body(body);
        });
    }

    pub fn serve_artifact(&self, reference: &str, path: &str, body: &str) {
        let route = format!("/raw/{reference}/{path}");
        let body = body.to_string();
        self.server.mock(|when, then| {
            when.method(GET).path(route);
            then.status(200).body(body);
        });
    }

    pub fn base_url(&self) -> String {
        self.server.url("/raw")
    }

    pub fn tags_url(&self) -> String {
        self.server.url("/tags")
    }
}

pub fn primary_body(version: &str) -> String {
    format!("---\ncco_version: {version}\n---\n# Rules\n")
}

pub fn artifact_body(path: &str) -> String {
    format!("---\nname: {path}\n---\nbody of {path}\n")
}

/// The cco binary, isolated from the caller's environment
#[allow(deprecated)]
pub fn cco_cmd(home: &TestHome) -> Command {
    let mut cmd = Command::cargo_bin("cco").expect("Failed to find cco binary");
    cmd.env("CCO_HOME", &home.root)
        .env("CCO_NO_EXTERNAL_CLEANUP", "true")
        .env("CCO_BASE_URL", "http://127.0.0.1:9/raw")
        .env("CCO_TAGS_URL", "http://127.0.0.1:9/tags")
        .env("CCO_TIMEOUT", "5")
        .env_remove("CCO_BRANCH")
        .env_remove("CCO_LOG");
    cmd
}

/// [`cco_cmd`] pointed at `remote`
#[allow(dead_code)]
pub fn cco_cmd_with_remote(home: &TestHome, remote: &RemoteFixture) -> Command {
    let mut cmd = cco_cmd(home);
    cmd.env("CCO_BASE_URL", remote.base_url())
        .env("CCO_TAGS_URL", remote.tags_url());
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_paths_count() {
        assert_eq!(manifest_paths().len(), 13);
    }

    #[test]
    fn test_home_file_operations() {
        let home = TestHome::new();
        home.write_file("rules/team.md", "hello");
        assert!(home.file_exists("rules/team.md"));
        assert_eq!(home.read_file("rules/team.md"), "hello");
    }
}
