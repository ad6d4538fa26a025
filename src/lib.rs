//! branch-sync: keep pull requests between matching branches in sync
//!
//! On every push, the pushed branch is matched against a source and a
//! target glob pattern. Pushes to a source branch create or refresh a PR
//! into each matching target; pushes to a target branch refresh the
//! intermediate `merge/...` branches of existing PRs. Merge conflicts are
//! surfaced on the PR as labels and a comment.

pub mod config;
pub mod error;
pub mod event;
pub mod output;
pub mod platform;
pub mod sync;
pub mod template;
pub mod types;
