//! `archsync-profile` — import a stereotype taxonomy into a model file.
//!
//! Usage:
//!   archsync-profile <stereotypes.json> <model.json>
//!
//! The model file is created when it does not exist yet; an existing
//! one keeps its tree and gets the new profile.

use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    let (stereotypes, model) = match (args.get(1), args.get(2)) {
        (Some(stereotypes), Some(model)) => (stereotypes.clone(), model.clone()),
        _ => {
            eprintln!("Usage: archsync-profile <stereotypes.json> <model.json>");
            process::exit(1);
        }
    };

    if let Err(e) = run(Path::new(&stereotypes), Path::new(&model)) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(stereotypes: &Path, model: &Path) -> Result<(), archsync::SyncError> {
    let document = archsync::ops::read_document(stereotypes)?;
    let mut tree = archsync::ops::load_or_new(model)?;
    let count = archsync::ops::import_stereotypes(&mut tree, &document)?;
    tracing::info!("imported {} stereotypes", count);
    archsync::ops::save_model(model, &tree)
}
