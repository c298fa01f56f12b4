//! `diff`: renders the line-level difference between a path's HEAD
//! content and its current working-tree content (§4.11).

use std::fs;

use clap::Parser;

use crate::errors::{KilnError, Result};
use crate::internal::object::Object;
use crate::internal::validator;
use crate::repository::Repository;
use crate::utils::diff;

#[derive(Debug, Parser)]
pub struct DiffArgs {
    /// Path to diff, relative to the repository root
    pub path: String,

    /// Render as a `---`/`+++` unified diff header instead of the plain
    /// grouped-ops view
    #[arg(long = "side-by-side")]
    pub side_by_side: bool,
}

pub fn execute(args: DiffArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    let head_tree = repo.head_tree()?;
    let store = repo.store();
    let old = match head_tree.get(&args.path) {
        Some(hash) => match store.read(hash)? {
            Object::Blob { content } => String::from_utf8_lossy(&content).into_owned(),
            _ => String::new(),
        },
        None => String::new(),
    };
    let abs = repo.workdir.join(&args.path);
    let new = if abs.exists() {
        let bytes = fs::read(&abs)?;
        String::from_utf8(bytes).map_err(|_| KilnError::Utf8Error(abs.clone()))?
    } else {
        String::new()
    };

    if args.side_by_side {
        print!("{}", diff::render_side_by_side(&args.path, &old, &new));
    } else {
        print!("{}", diff::render(&old, &new));
    }
    Ok(())
}
