//! `archsync-update` — patch a model tree from an edited document.
//!
//! Usage:
//!   archsync-update <model.json> <updated.json> [component]
//!
//! Compares the named component (default: the first one) against the
//! updated document, patches changed values and requirement texts in
//! the model file, prints one line per change, and writes the audit log
//! `<updated>-ModifiedValues.txt` beside the document.

use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    let (model, updated) = match (args.get(1), args.get(2)) {
        (Some(model), Some(updated)) => (model.clone(), updated.clone()),
        _ => {
            eprintln!("Usage: archsync-update <model.json> <updated.json> [component]");
            process::exit(1);
        }
    };
    let component = args.get(3).cloned();

    if let Err(e) = run(Path::new(&model), Path::new(&updated), component.as_deref()) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(model: &Path, updated: &Path, component: Option<&str>) -> Result<(), archsync::SyncError> {
    let document = archsync::ops::read_document(updated)?;
    let mut tree = archsync::ops::load_model(model)?;
    let target = archsync::ops::select_component(&tree, component)?;
    let records = archsync::ops::update_model(&mut tree, target, &document, updated)?;
    for record in &records {
        println!("{record}");
    }
    archsync::ops::save_model(model, &tree)
}
