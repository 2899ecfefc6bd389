use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the record ingest workspace",
    long_about = "A unified CLI for CI checks and Lambda packaging in the\n\
                  record ingest workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and package the API Gateway handler as a Lambda zip
    ServerlessPackage {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
        /// Directory receiving the zip artifact
        #[arg(long, default_value = "dist")]
        dist_dir: String,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Unit tests for every workspace crate
    Test,
    /// Run lint + test
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

const LAMBDA_PACKAGE: &str = "record_ingest_lambda";
const LAMBDA_BINARY: &str = "apigw_handler";

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn package_serverless_lambda(target: &str, profile: BuildProfile, dist_dir: &Path) {
    let Some(architecture) = lambda_architecture(target) else {
        fail(&format!(
            "unsupported lambda target `{target}` (expected x86_64-unknown-linux-gnu or aarch64-unknown-linux-gnu)"
        ));
    };
    if let Err(message) = ensure_rust_target_installed(target) {
        fail(&message);
    }

    step("Build API Gateway handler binary");

    let mut cargo_args = vec![
        "build",
        "-p",
        LAMBDA_PACKAGE,
        "--target",
        target,
        "--bin",
        LAMBDA_BINARY,
    ];
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package lambda zip artifact");
    let binary_path = Path::new("target")
        .join(target)
        .join(profile.dir_name())
        .join(LAMBDA_BINARY);
    let zip_path = dist_dir.join(format!("{LAMBDA_BINARY}.zip"));

    if let Err(error) = fs::create_dir_all(dist_dir) {
        fail(&format!(
            "failed to create dist directory '{}': {error}",
            dist_dir.display()
        ));
    }
    if let Err(error) = package_lambda_zip(&binary_path, &zip_path) {
        fail(&format!(
            "failed to package '{}': {error}",
            binary_path.display()
        ));
    }

    eprintln!(
        "\nPackaged artifact:\n- {} (runtime provided.al2023, architecture {architecture})",
        zip_path.display()
    );
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    exit(1);
}

/// Lambda architecture name for a Rust target triple.
fn lambda_architecture(target: &str) -> Option<&'static str> {
    match target {
        "x86_64-unknown-linux-gnu" | "x86_64-unknown-linux-musl" => Some("x86_64"),
        "aarch64-unknown-linux-gnu" | "aarch64-unknown-linux-musl" => Some("arm64"),
        _ => None,
    }
}

fn ensure_rust_target_installed(target: &str) -> Result<(), String> {
    let output = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(value) => value,
        Err(error) => {
            eprintln!(
                "warning: failed to run `rustup target list --installed` ({error}); continuing without target preflight"
            );
            return Ok(());
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "failed to list installed rust targets. details: {}",
            stderr.trim()
        ));
    }

    let installed = String::from_utf8_lossy(&output.stdout);
    if target_listed(&installed, target) {
        Ok(())
    } else {
        Err(format!(
            "required rust target `{target}` is not installed. install it with `rustup target add {target}` and re-run `cargo run -p xtask -- serverless-package`"
        ))
    }
}

fn target_listed(installed: &str, target: &str) -> bool {
    installed.lines().any(|line| line.trim() == target)
}

/// Writes the binary as the single `bootstrap` entry the custom runtime expects.
fn package_lambda_zip(binary_path: &Path, zip_path: &Path) -> io::Result<()> {
    let binary = fs::read(binary_path)?;
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)?;
    zip.write_all(&binary)?;
    zip.finish()?;
    Ok(())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
}

fn ci_test() {
    step("Test record_ingest_core");
    run_cargo(&["test", "-p", "record_ingest_core"]);

    step("Test record_ingest_lambda");
    run_cargo(&["test", "-p", LAMBDA_PACKAGE]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Test => ci_test(),
                CiJob::Check => {
                    ci_lint();
                    ci_test();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::ServerlessPackage {
            target,
            profile,
            dist_dir,
        } => {
            package_serverless_lambda(&target, profile, Path::new(&dist_dir));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn maps_targets_to_lambda_architectures() {
        assert_eq!(lambda_architecture("x86_64-unknown-linux-gnu"), Some("x86_64"));
        assert_eq!(lambda_architecture("aarch64-unknown-linux-gnu"), Some("arm64"));
        assert_eq!(lambda_architecture("x86_64-pc-windows-msvc"), None);
    }

    #[test]
    fn finds_target_in_rustup_listing() {
        let listing = "aarch64-unknown-linux-gnu\nx86_64-unknown-linux-gnu\n";
        assert!(target_listed(listing, "x86_64-unknown-linux-gnu"));
        assert!(!target_listed(listing, "x86_64-unknown-linux-musl"));
    }

    #[test]
    fn zip_contains_single_executable_bootstrap() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let binary_path = dir.path().join(LAMBDA_BINARY);
        let zip_path = dir.path().join("handler.zip");
        fs::write(&binary_path, b"\x7fELF-stub").expect("binary should be written");

        package_lambda_zip(&binary_path, &zip_path).expect("zip should be written");

        let file = fs::File::open(&zip_path).expect("zip should open");
        let mut archive = zip::ZipArchive::new(file).expect("zip should parse");
        assert_eq!(archive.len(), 1);

        let mut entry = archive.by_name("bootstrap").expect("bootstrap entry should exist");
        assert_eq!(entry.unix_mode().map(|mode| mode & 0o777), Some(0o755));
        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .expect("entry should be readable");
        assert_eq!(contents, b"\x7fELF-stub");
    }

    #[test]
    fn missing_binary_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let error = package_lambda_zip(&dir.path().join("absent"), &dir.path().join("out.zip"))
            .expect_err("missing binary should fail");
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }
}
