/// Basic example demonstrating archive generation and reading
///
/// Run with: cargo run --example basic
use bpkg_rs::{ArchiveReader, ArchiveWriter};
use std::error::Error;
use std::fs;

fn main() -> Result<(), Box<dyn Error>> {
    // Stage a small source directory
    fs::create_dir_all("demo_assets")?;
    fs::write("demo_assets/readme.txt", b"This is a readme for the basic demo.")?;
    fs::write("demo_assets/data.bin", [0xABu8; 1000])?;

    // Pack it
    ArchiveWriter::new().generate("demo_assets", "demo.bpkg")?;
    println!("Archive created: demo.bpkg");

    // Read it back
    let mut reader = ArchiveReader::open("demo.bpkg")?;
    println!("Version tag: {:#010x}", reader.version());
    println!("Entries:");
    for path in reader.list_paths() {
        println!("  - {path}");
    }

    if let Some(bytes) = reader.load("demo_assets/readme.txt")? {
        println!("readme.txt: {}", String::from_utf8_lossy(bytes));
    }

    Ok(())
}
