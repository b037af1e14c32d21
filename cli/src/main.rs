//! Command-line front-end for the OuDiaSecond to KDL converter.
//!
//! Reads a timetable from a file or stdin, converts it with
//! [`wasm_core::convert`] and writes the KDL document next to the input (or
//! wherever the second argument points).

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wasm_core::convert;

#[derive(Debug, Parser)]
#[command(version, about = "Convert OuDiaSecond (.oud2) timetables to KDL")]
struct Cli {
    /// Timetable to read. Pass '-' or nothing to read from stdin.
    file: Option<PathBuf>,
    /// Where to write the KDL document. Pass '-' for stdout. Defaults to the
    /// input path with a .kdl extension, or output.kdl when reading stdin.
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = read_input(cli.file.as_deref())?;
    tracing::debug!(bytes = input.len(), "read timetable");
    let kdl = convert(&input).context("input is not a valid OuDiaSecond timetable")?;

    match destination(cli.file.as_deref(), cli.output.as_deref()) {
        Destination::Stdout => print!("{kdl}"),
        Destination::File(path) => {
            std::fs::write(&path, &kdl)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote KDL document");
        }
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

fn destination(input: Option<&Path>, output: Option<&Path>) -> Destination {
    match output {
        Some(path) if path == Path::new("-") => Destination::Stdout,
        Some(path) => Destination::File(path.to_path_buf()),
        None => match input {
            Some(path) if path != Path::new("-") => {
                let mut path = path.to_path_buf();
                path.set_extension("kdl");
                Destination::File(path)
            }
            _ => Destination::File(PathBuf::from("output.kdl")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Option<&Path> {
        Some(Path::new(s))
    }

    #[test]
    fn explicit_dash_output_goes_to_stdout() {
        assert_eq!(destination(path("a.oud2"), path("-")), Destination::Stdout);
    }

    #[test]
    fn explicit_output_path_wins() {
        assert_eq!(
            destination(path("a.oud2"), path("b.kdl")),
            Destination::File(PathBuf::from("b.kdl"))
        );
    }

    #[test]
    fn default_output_swaps_the_extension() {
        assert_eq!(
            destination(path("dia/sample.oud2"), None),
            Destination::File(PathBuf::from("dia/sample.kdl"))
        );
    }

    #[test]
    fn stdin_defaults_to_output_kdl() {
        assert_eq!(
            destination(None, None),
            Destination::File(PathBuf::from("output.kdl"))
        );
        assert_eq!(
            destination(path("-"), None),
            Destination::File(PathBuf::from("output.kdl"))
        );
    }

    #[test]
    fn converts_a_file_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("loop.oud2");
        std::fs::write(&input, "Rosen.\nRosenmei=Loop Line\n.\n").expect("write fixture");

        let cli = Cli {
            file: Some(input.clone()),
            output: None,
        };
        run(&cli).expect("conversion succeeds");

        let kdl = std::fs::read_to_string(dir.path().join("loop.kdl")).expect("output exists");
        assert!(kdl.contains("Rosenmei"));
        assert!(kdl.contains("Loop Line"));
    }

    #[test]
    fn invalid_input_reports_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("broken.oud2");
        std::fs::write(&input, "Rosen.\nno closing dot\n").expect("write fixture");

        let cli = Cli {
            file: Some(input),
            output: None,
        };
        let err = run(&cli).expect_err("parse failure surfaces");
        assert!(format!("{err:#}").contains("OuDiaSecond"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let cli = Cli {
            file: Some(PathBuf::from("/no/such/file.oud2")),
            output: None,
        };
        let err = run(&cli).expect_err("read failure surfaces");
        assert!(format!("{err:#}").contains("file.oud2"));
    }
}
