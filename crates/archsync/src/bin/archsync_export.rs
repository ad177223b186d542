//! `archsync-export` — write a model tree back out as JSON.
//!
//! Usage:
//!   archsync-export <model.json> <out.json> [model|instance] [component]
//!
//! The default `model` view produces an architecture document for the
//! named component (default: the first one). The `instance` view keeps
//! only value properties and part property subtrees, parts nested under
//! their names.

use std::path::Path;
use std::process;

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().collect();
    let (model, out) = match (args.get(1), args.get(2)) {
        (Some(model), Some(out)) => (model.clone(), out.clone()),
        _ => {
            eprintln!("Usage: archsync-export <model.json> <out.json> [model|instance] [component]");
            process::exit(1);
        }
    };
    let view = args.get(3).map(String::as_str).unwrap_or("model");
    if view != "model" && view != "instance" {
        eprintln!("The view must be 'model' or 'instance', not '{view}'.");
        process::exit(1);
    }
    let component = args.get(4).cloned();

    if let Err(e) = run(Path::new(&model), Path::new(&out), view, component.as_deref()) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(
    model: &Path,
    out: &Path,
    view: &str,
    component: Option<&str>,
) -> Result<(), archsync::SyncError> {
    let tree = archsync::ops::load_model(model)?;
    let target = archsync::ops::select_component(&tree, component)?;
    if view == "instance" {
        archsync::ops::export_instance(&tree, target, out)
    } else {
        archsync::ops::export_model(&tree, target, out)
    }
}
