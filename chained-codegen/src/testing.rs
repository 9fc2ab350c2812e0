//! Test utilities for generated Java sources.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
};

use chained_core::SourceFile;
use eyre::{Result, eyre};

/// Error from compile checking.
#[derive(Debug, thiserror::Error)]
#[error("{message}\n\nOutput:\n{output}")]
pub struct CompileError {
    pub message: String,
    pub output: String,
}

/// Trait for verifying generated code compiles.
pub trait CompileChecker {
    /// Check that the Java sources under `dir` compile.
    fn check(&self, dir: &Path) -> Result<(), CompileError>;
}

/// Java compile checker using `javac`.
///
/// Generated builders reference the chained runtime and the annotation
/// classes, so `classpath` must contain them.
pub struct JavacChecker {
    pub classpath: Option<String>,
}

impl JavacChecker {
    /// Whether a `javac` executable is on the `PATH`.
    pub fn is_available() -> bool {
        Command::new("javac")
            .arg("-version")
            .output()
            .is_ok_and(|output| output.status.success())
    }

    /// Compile `files` and run `main_class`, returning its standard output.
    pub fn run_main(&self, files: &[SourceFile], main_class: &str) -> Result<String> {
        let temp_dir = write_to_temp(files)?;
        self.check(temp_dir.path())?;

        let mut entries = vec![temp_dir.path().join("classes")];
        entries.extend(self.classpath.iter().flat_map(env::split_paths));
        let output = Command::new("java")
            .arg("-cp")
            .arg(env::join_paths(entries)?)
            .arg(main_class)
            .output()?;

        if !output.status.success() {
            return Err(eyre!(
                "{main_class} exited with {}:\n{}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl CompileChecker for JavacChecker {
    fn check(&self, dir: &Path) -> Result<(), CompileError> {
        let sources = java_files(dir).map_err(|e| CompileError {
            message: format!("Failed to list sources: {}", e),
            output: String::new(),
        })?;
        let classes = dir.join("classes");

        let mut command = Command::new("javac");
        command.arg("-d").arg(&classes);
        if let Some(classpath) = &self.classpath {
            command.args(["-cp", classpath]);
        }
        let output = command.args(&sources).output().map_err(|e| CompileError {
            message: format!("Failed to run javac: {}", e),
            output: String::new(),
        })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            Err(CompileError {
                message: "javac failed".to_string(),
                output: format!("stderr:\n{}\n\nstdout:\n{}", stderr, stdout),
            })
        }
    }
}

fn java_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(java_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "java") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_content_eq(expected: &str, actual: &str) {
    if expected != actual {
        let expected_lines: Vec<&str> = expected.lines().collect();
        let actual_lines: Vec<&str> = actual.lines().collect();

        let mut diff = String::new();
        let max_lines = expected_lines.len().max(actual_lines.len());

        for i in 0..max_lines {
            let exp = expected_lines.get(i).copied().unwrap_or("<missing>");
            let act = actual_lines.get(i).copied().unwrap_or("<missing>");

            if exp != act {
                diff.push_str(&format!("Line {}:\n", i + 1));
                diff.push_str(&format!("  expected: {}\n", exp));
                diff.push_str(&format!("  actual:   {}\n", act));
            }
        }

        panic!("Content mismatch:\n{}", diff);
    }
}

/// Write `files` under a temporary source root.
///
/// The directory will be cleaned up when the returned `TempDir` is dropped.
pub fn write_to_temp(files: &[SourceFile]) -> Result<tempfile::TempDir> {
    let temp_dir = tempfile::TempDir::new()?;
    for file in files {
        file.write(temp_dir.path())?;
    }
    Ok(temp_dir)
}

/// Write `files` to a temporary root and check that they compile.
pub fn assert_generates_valid_code<C>(files: &[SourceFile], checker: &C) -> Result<()>
where
    C: CompileChecker,
{
    let temp_dir = write_to_temp(files)?;

    checker.check(temp_dir.path()).map_err(|e| {
        eprintln!("Generated files in {}:", temp_dir.path().display());
        for file in files {
            eprintln!("  {}", file.relative_path().display());
        }
        eyre!("Compile check failed: {}", e)
    })?;

    Ok(())
}
