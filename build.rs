// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: project directory
fn basedir_arg() -> Arg {
    Arg::new("basedir")
        .short('b')
        .long("basedir")
        .value_name("DIR")
        .help("Project directory containing the lockfiles")
}

fn build_cli() -> Command {
    Command::new("depsnap")
        .version(env!("CARGO_PKG_VERSION"))
        .author("depsnap Contributors")
        .about("Submit Cargo lockfile dependency snapshots to the GitHub dependency graph")
        .subcommand_required(true)
        .subcommand(
            Command::new("submit")
                .about("Resolve lockfiles and submit a dependency snapshot")
                .arg(
                    Arg::new("lockfiles")
                        .num_args(1..)
                        .default_value("Cargo.Bazel.toml.lock")
                        .help("Lockfile paths relative to the base directory"),
                )
                .arg(basedir_arg())
                .arg(Arg::new("api_url").long("api-url").help("API base URL"))
                .arg(
                    Arg::new("job_url")
                        .long("job-url")
                        .help("Link to the CI run, reported as the job's html_url"),
                )
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print the snapshot payload instead of submitting it"),
                ),
        )
        .subcommand(
            Command::new("manifest")
                .about("Resolve a single lockfile and print its manifest")
                .arg(
                    Arg::new("lockfile")
                        .default_value("Cargo.Bazel.toml.lock")
                        .help("Lockfile path relative to the base directory"),
                )
                .arg(basedir_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Man page is rendered into OUT_DIR/man
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=OUT_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = out_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    if let Err(e) = fs::write(man_dir.join("depsnap.1"), buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
