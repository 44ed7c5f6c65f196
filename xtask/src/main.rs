use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use order_relay_core::config::RelaySettings;
use order_relay_core::topology::RelayTopology;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const RUNTIME_BIN: &str = "relay_runtime";

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the order relay workspace",
    long_about = "A unified CLI for CI checks, Lambda packaging, and deployment\n\
                  topology export in the order relay workspace."
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
    /// Build and package the relay runtime as a Lambda zip artifact
    Package {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
    /// Write the deployment topology (queue, table, stream, topic, roles) as JSON
    Topology {
        /// Output file path; prints to stdout when omitted
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Formatting, clippy, and tests
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

fn package_relay_runtime(target: &str, profile: BuildProfile) {
    ensure_rust_target_installed(target);

    step("Build relay runtime binary");

    let mut cargo_args = vec![
        "build",
        "-p",
        "order_relay_lambda",
        "--target",
        target,
        "--bin",
        RUNTIME_BIN,
    ];
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package lambda zip artifact");
    let target_dir = Path::new("target").join(target).join(profile.dir_name());
    let dist_dir = Path::new("dist");
    fs::create_dir_all(dist_dir).expect("failed to create lambda dist directory");

    let zip_path = dist_dir.join(format!("{RUNTIME_BIN}.zip"));
    package_lambda_zip(&target_dir.join(binary_name(RUNTIME_BIN, target)), &zip_path);

    eprintln!("\nPackaged artifact:\n- {}", zip_path.display());
}

fn ensure_rust_target_installed(target: &str) {
    let output = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output();

    let output = match output {
        Ok(value) => value,
        Err(error) => {
            eprintln!(
                "warning: failed to run `rustup target list --installed` ({error}); continuing without target preflight"
            );
            return;
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "failed to list installed rust targets; run `rustup target list --installed` manually. details: {}",
            stderr.trim()
        );
    }

    let installed = String::from_utf8_lossy(&output.stdout);
    if !installed.lines().any(|line| line.trim() == target) {
        panic!(
            "required rust target `{target}` is not installed. install it with `rustup target add {target}` and re-run `cargo run -p xtask -- package`"
        );
    }
}

fn binary_name(bin_name: &str, target: &str) -> String {
    if target.contains("windows") {
        format!("{bin_name}.exe")
    } else {
        bin_name.to_string()
    }
}

fn package_lambda_zip(binary_path: &Path, zip_path: &Path) {
    if !binary_path.exists() {
        panic!("expected lambda binary at '{}'", binary_path.display());
    }

    let binary = fs::read(binary_path).expect("failed to read lambda binary");
    let file = fs::File::create(zip_path).expect("failed to create lambda zip");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)
        .expect("failed to start bootstrap entry in lambda zip");
    zip.write_all(&binary)
        .expect("failed to write bootstrap entry");
    zip.finish().expect("failed to finish lambda zip");
}

fn export_topology(output: Option<&str>) {
    let settings = RelaySettings::from_env()
        .unwrap_or_else(|error| panic!("invalid relay settings: {error}"));
    let topology = RelayTopology::from_settings(&settings);
    let rendered =
        serde_json::to_string_pretty(&topology).expect("topology should serialize to json");

    match output {
        Some(path) => {
            fs::write(path, rendered + "\n").expect("failed to write topology file");
            eprintln!("Wrote topology to {path}");
        }
        None => println!("{rendered}"),
    }
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

fn ci_check() {
    ci_lint();

    step("Test order_relay_core");
    run_cargo(&["test", "-p", "order_relay_core"]);

    step("Test order_relay_lambda");
    run_cargo(&["test", "-p", "order_relay_lambda"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { job } => {
            match job {
                CiJob::Lint => ci_lint(),
                CiJob::Check => ci_check(),
            }
            eprintln!("\nCI job passed.");
        }
        Commands::Package { target, profile } => {
            package_relay_runtime(&target, profile);
        }
        Commands::Topology { output } => {
            export_topology(output.as_deref());
        }
    }
}
