//! `archsync-build` — build a model tree from an architecture document.
//!
//! Usage:
//!   archsync-build <architecture.json> <model.json>
//!
//! Components in the document become packaged blocks in the tree. When
//! the model file already holds an imported stereotype profile, the
//! matching stereotypes are applied along the way.

use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    let (architecture, model) = match (args.get(1), args.get(2)) {
        (Some(architecture), Some(model)) => (architecture.clone(), model.clone()),
        _ => {
            eprintln!("Usage: archsync-build <architecture.json> <model.json>");
            process::exit(1);
        }
    };

    if let Err(e) = run(Path::new(&architecture), Path::new(&model)) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(architecture: &Path, model: &Path) -> Result<(), archsync::SyncError> {
    let document = archsync::ops::read_document(architecture)?;
    let mut tree = archsync::ops::load_or_new(model)?;
    archsync::ops::build_model(&mut tree, &document)?;
    archsync::ops::save_model(model, &tree)
}
