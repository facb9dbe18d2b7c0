#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use ope::config::{MemoryStore, Policy};
use ope::platform::Desktop;
use ope::resolver::Resolver;
use ope::security::ConfirmationResult;

/// Desktop that answers every confirmation with a preset result and records
/// what the workflow asked of it.
pub struct FakeDesktop {
    answer: ConfirmationResult,
    fail_open: bool,
    opened: Mutex<Vec<PathBuf>>,
    asked: Mutex<Vec<PathBuf>>,
    notices: Mutex<Vec<(String, String)>>,
}

impl FakeDesktop {
    pub fn answering(answer: ConfirmationResult) -> Self {
        Self {
            answer,
            fail_open: false,
            opened: Mutex::new(Vec::new()),
            asked: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Like [`FakeDesktop::answering`], but every `open` fails.
    pub fn failing_open(answer: ConfirmationResult) -> Self {
        Self {
            fail_open: true,
            ..Self::answering(answer)
        }
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().expect("opened lock").clone()
    }

    pub fn asked(&self) -> Vec<PathBuf> {
        self.asked.lock().expect("asked lock").clone()
    }

    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices.lock().expect("notices lock").clone()
    }

    pub fn notice_titles(&self) -> Vec<String> {
        self.notices().into_iter().map(|(title, _)| title).collect()
    }
}

impl Desktop for FakeDesktop {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn open(&self, path: &Path) -> anyhow::Result<()> {
        if self.fail_open {
            anyhow::bail!("launcher exited with status 3");
        }
        self.opened.lock().expect("opened lock").push(path.to_path_buf());
        Ok(())
    }

    fn confirm(&self, path: &Path) -> ConfirmationResult {
        self.asked.lock().expect("asked lock").push(path.to_path_buf());
        self.answer
    }

    fn notify(&self, title: &str, message: &str) {
        self.notices
            .lock()
            .expect("notices lock")
            .push((title.to_string(), message.to_string()));
    }
}

/// Temporary directory holding `files` (created empty) and a resolver whose
/// home is that directory.
pub fn sandbox(files: &[&str]) -> (TempDir, Resolver) {
    let tmp = TempDir::new().expect("tempdir");
    for name in files {
        let path = tmp.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, b"").expect("create file");
    }
    let resolver = Resolver::default().with_home(Some(tmp.path().to_path_buf()));
    (tmp, resolver)
}

/// `ope://` URL for an absolute path, with spaces escaped.
pub fn url_for(path: &Path) -> String {
    let text = path.display().to_string().replace('\\', "/").replace(' ', "%20");
    if text.starts_with('/') {
        format!("ope://{text}")
    } else {
        format!("ope:///{text}")
    }
}

/// Store whose persisted policy has both lists empty.
pub fn empty_store() -> MemoryStore {
    MemoryStore::with_policy(Policy::empty())
}
