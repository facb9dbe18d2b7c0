//! One resolution, start to finish.
//!
//! ```text
//! Resolving ─▶ Deciding ─┬─ Allow ──────────────────────────────▶ Opening
//!                        ├─ Block ──────────────────────────────▶ rejected
//!                        └─ Ask ─▶ AskingUser ─▶ Mutating ─┬────▶ Opening
//!                                                          └────▶ rejected
//! ```
//!
//! The policy is loaded fresh for every call and saved at most once, before
//! the open is attempted. A failed save is logged and otherwise ignored.

use crate::config::{Policy, PolicyStore};
use crate::error::{OpeError, Result};
use crate::platform::Desktop;
use crate::resolver::Resolver;
use crate::security::{
    ConfirmationResult, Decision, FollowUp, apply_confirmation, base_name, decide,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of a resolution that ended with the path being opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub path: PathBuf,
    pub decision: Decision,
    pub confirmation: Option<ConfirmationResult>,
}

pub struct Workflow<'a> {
    resolver: &'a Resolver,
    store: &'a dyn PolicyStore,
    desktop: &'a dyn Desktop,
}

impl<'a> Workflow<'a> {
    pub fn new(resolver: &'a Resolver, store: &'a dyn PolicyStore, desktop: &'a dyn Desktop) -> Self {
        Self {
            resolver,
            store,
            desktop,
        }
    }

    /// Resolve `raw`, apply the policy (asking if needed), and open the path.
    pub fn handle(&self, raw: &str) -> Result<Opened> {
        let path = self.resolve(raw).inspect_err(|e| self.report(e))?;
        let mut policy = self.store.load().map_err(OpeError::from).inspect_err(|e| self.report(e))?;

        let decision = decide(&path, &policy);
        debug!(path = %path.display(), %decision, "policy decision");

        let confirmation = match decision {
            Decision::Allow => None,
            Decision::Block => {
                let err = OpeError::PolicyBlocked {
                    name: base_name(&path),
                };
                self.report(&err);
                return Err(err);
            }
            Decision::Ask => Some(self.ask(&path, &mut policy)?),
        };

        self.open(&path)?;
        info!(path = %path.display(), %decision, "opened");
        Ok(Opened {
            path,
            decision,
            confirmation,
        })
    }

    fn resolve(&self, raw: &str) -> Result<PathBuf> {
        let path = self.resolver.resolve(raw)?;
        match fs::metadata(&path) {
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(OpeError::PathNotFound(path))
            }
            _ => Ok(path),
        }
    }

    /// Returns the answer when it leads to opening; every other answer ends
    /// the resolution with an error.
    fn ask(&self, path: &Path, policy: &mut Policy) -> Result<ConfirmationResult> {
        let answer = self.desktop.confirm(path);
        let base = base_name(path);
        debug!(path = %path.display(), %answer, "confirmation answered");

        match apply_confirmation(policy, &base, answer) {
            FollowUp::Open { persist } => {
                if persist {
                    self.persist(policy);
                }
                Ok(answer)
            }
            FollowUp::Reject { persist } => {
                if persist {
                    self.persist(policy);
                }
                Err(OpeError::PolicyBlocked { name: base })
            }
            FollowUp::Cancel => Err(OpeError::UserCancelled),
        }
    }

    fn persist(&self, policy: &Policy) {
        if let Err(error) = self.store.save(policy) {
            warn!(
                %error,
                location = %self.store.describe(),
                "could not save policy; this choice will not be remembered"
            );
        }
    }

    fn open(&self, path: &Path) -> Result<()> {
        self.desktop.open(path).map_err(|source| {
            let err = OpeError::OpenFailed {
                path: path.to_path_buf(),
                source,
            };
            self.report(&err);
            err
        })
    }

    fn report(&self, err: &OpeError) {
        self.desktop.notify(err.notice_title(), &err.chain_message());
    }
}
