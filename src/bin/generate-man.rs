// Writes pcq.1 (and one page per subcommand) into the given directory, default ./man

use clap::CommandFactory;
use pcq::cli::Cli;
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));
    std::fs::create_dir_all(&out_dir)?;

    let cmd = Cli::command();
    clap_mangen::generate_to(cmd, &out_dir)?;
    println!("Man pages written to {}", out_dir.display());
    Ok(())
}
