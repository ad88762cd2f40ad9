//! BPKG command-line tool.
//!
//! Packs a source directory into a BPKG archive and reads resources back out.

use anyhow::{bail, Context};
use bpkg_rs::{ArchiveReader, ArchiveWriter, DEFAULT_CHUNK_SIZE};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// BPKG archive tool
#[derive(Parser, Debug)]
#[command(name = "bpkg")]
#[command(about = "Pack directories into BPKG archives and read resources from them")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a BPKG archive from a source directory
    Generate {
        /// Directory whose files are packed
        source: PathBuf,

        /// Output archive path
        output: PathBuf,

        /// Version tag stamped into the archive (defaults to the stock revision)
        #[arg(long)]
        version_tag: Option<u32>,

        /// Streaming chunk size in bytes
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Read a resource from a BPKG archive and write its bytes to stdout
    Read {
        /// Archive path
        archive: PathBuf,

        /// Logical path of the resource inside the archive
        resource: String,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();
    match args.command {
        Commands::Generate {
            source,
            output,
            version_tag,
            chunk_size,
        } => {
            let mut writer = ArchiveWriter::new().with_chunk_size(chunk_size);
            if let Some(version) = version_tag {
                writer = writer.with_version(version);
            }
            writer
                .generate(&source, &output)
                .with_context(|| format!("Failed to generate {}", output.display()))?;
        }
        Commands::Read { archive, resource } => {
            let mut reader = ArchiveReader::open(&archive)
                .with_context(|| format!("Failed to open {}", archive.display()))?;

            let Some(bytes) = reader.load(&resource)? else {
                bail!(
                    "Failed to read {:?} from {}: no such resource",
                    resource,
                    archive.display()
                );
            };

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;

            reader.clear();
        }
    }
    Ok(())
}
