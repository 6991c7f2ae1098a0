//! Embeds the commit the `vocab` binary was built from
//!
//! `VOCAB_COMMIT` is `git describe --always` and `VOCAB_COMMIT_DATE` the
//! commit time in UTC; both are `unknown` outside a git checkout.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string()).filter(|s| !s.is_empty())
}

fn main() {
    let commit = git(&["describe", "--always", "--abbrev=10"]).unwrap_or_else(|| "unknown".to_string());

    let commit_date = git(&["show", "-s", "--format=%ct", "HEAD"])
        .and_then(|secs| secs.parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|time| time.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=VOCAB_COMMIT={}", commit);
    println!("cargo:rustc-env=VOCAB_COMMIT_DATE={}", commit_date);

    // commits and checkouts move HEAD or the branch ref it points to
    println!("cargo:rerun-if-changed=build.rs");
    if let Some(git_dir) = git(&["rev-parse", "--git-dir"]) {
        println!("cargo:rerun-if-changed={}/HEAD", git_dir);
        if let Some(branch) = git(&["symbolic-ref", "-q", "HEAD"]) {
            println!("cargo:rerun-if-changed={}/{}", git_dir, branch);
        }
    }
}
