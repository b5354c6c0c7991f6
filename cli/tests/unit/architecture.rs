//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! `domain` is pure, `application` talks to the world only through ports,
//! and `infra` never renders output.

use std::path::Path;

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

fn src_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn relative(file: &Path) -> String {
    file.strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(file)
        .display()
        .to_string()
}

/// Lines outside `#[cfg(test)]` blocks and comments, with 1-based numbers.
fn production_lines(file: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(file) else {
        return Vec::new();
    };
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            (!in_test && !trimmed.starts_with("//")).then(|| (i + 1, line.to_string()))
        })
        .collect()
}

fn forbidden_in(dir: &Path, patterns: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = relative(&file);
        for (lineno, line) in production_lines(&file) {
            if let Some(p) = patterns.iter().find(|p| line.contains(**p)) {
                violations.push(format!("{rel}:{lineno}: `{p}`: {}", line.trim()));
            }
        }
    }
    violations
}

// ── Rendering goes through the renderer ───────────────────────────────────────

#[test]
fn no_inline_json_branching_in_commands() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir().join("commands")) {
        let rel = relative(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            let lineno = i + 1;
            if line.contains("json: bool") {
                violations.push(format!(
                    "{rel}:{lineno}: found `json: bool` parameter: {line}"
                ));
            }
            let trimmed = line.trim();
            if trimmed.starts_with("if json") || trimmed.starts_with("if !json") {
                violations.push(format!("{rel}:{lineno}: found inline JSON branch: {line}"));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found inline JSON branching in commands/ — use app.renderer() instead:\n{}",
        violations.join("\n")
    );
}

/// All confirmation prompts in `commands/` must go through `app.confirm()`.
#[test]
fn commands_use_standardized_confirmation() {
    let violations = forbidden_in(
        &src_dir().join("commands"),
        &["stdin().lock()", "Confirm::new()", "Password::new()"],
    );
    assert!(
        violations.is_empty(),
        "Commands must prompt through AppContext:\n{}",
        violations.join("\n")
    );
}

// ── Process spawning stays in infra ───────────────────────────────────────────

#[test]
fn command_runner_is_only_built_in_infra_and_app() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir()) {
        let rel = relative(&file).replace('\\', "/");
        if rel.contains("/infra/") || rel.ends_with("app.rs") {
            continue;
        }
        for (lineno, line) in production_lines(&file) {
            if line.contains("TokioCommandRunner") || line.contains("process::Command::new") {
                violations.push(format!("{rel}:{lineno}: {}", line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Processes must be spawned through infra/ adapters:\n{}",
        violations.join("\n")
    );
}

// ── Layer boundaries ──────────────────────────────────────────────────────────

#[test]
fn domain_is_free_of_io_and_outer_layers() {
    let violations = forbidden_in(
        &src_dir().join("domain"),
        &[
            "tokio::",
            "reqwest",
            "std::fs",
            "std::net",
            "process::Command",
            "crate::application",
            "crate::infra",
            "crate::output",
            "println!",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

/// application/ must not import from infra/ or output/ layers.
#[test]
fn application_has_no_infra_or_output_imports() {
    let violations = forbidden_in(
        &src_dir().join("application"),
        &["crate::infra::", "crate::output::", "crate::commands::", "std::fs", "reqwest"],
    );
    assert!(
        violations.is_empty(),
        "application/ must only reach the outside through ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = forbidden_in(&src_dir().join("infra"), &["crate::commands", "crate::output"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = forbidden_in(&src_dir().join("infra"), &["println!", "eprintln!"]);
    assert!(
        violations.is_empty(),
        "infra/ must not use println!/eprintln! outside #[cfg(test)]:\n{}",
        violations.join("\n")
    );
}

/// No module-level #![`allow(dead_code)`] in domain/, application/, or infra/ layers.
#[test]
fn no_module_level_dead_code_allows_in_layers() {
    let mut violations: Vec<String> = Vec::new();

    for layer in ["domain", "application", "infra"] {
        for file in collect_rs_files(&src_dir().join(layer)) {
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            let rel = relative(&file);
            for (i, line) in content.lines().enumerate() {
                if line.trim() == "#![allow(dead_code)]" {
                    violations.push(format!("{rel}:{}: module-level #![allow(dead_code)]", i + 1));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Module-level #![allow(dead_code)] found in architecture layers — use item-level suppression:\n{}",
        violations.join("\n")
    );
}

// ── Secrets ───────────────────────────────────────────────────────────────────

/// Passwords are read from files or the environment, never passed on a command line.
#[test]
fn no_password_flags_on_command_lines() {
    let violations = forbidden_in(&src_dir(), &["sshpass -p", "\"-p\".to_string(), pass", "--password="]);
    assert!(
        violations.is_empty(),
        "Secrets must not be passed as process arguments:\n{}",
        violations.join("\n")
    );
}
