//! `config`: thin CLI surface over the sectioned INI config store (§4.9).
//! `kiln config user.name Ada` sets `[user] name = Ada`; `kiln config
//! user.name` prints the current value (falling back to the global
//! config).

use clap::Parser;

use crate::errors::{KilnError, Result};
use crate::internal::validator;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Dotted key, e.g. `user.name` or `core.bare`
    pub key: String,

    /// Value to set. Omit to read the current value instead.
    pub value: Option<String>,
}

/// Splits `section.key` (or `section.subsection.key`) into its parts.
fn split_key(key: &str) -> Result<(String, Option<String>, String)> {
    let mut parts: Vec<&str> = key.splitn(3, '.').collect();
    if parts.len() < 2 {
        return Err(KilnError::InvalidArgument(format!(
            "config key '{key}' must be of the form 'section.key'"
        )));
    }
    let field = parts.pop().unwrap().to_string();
    let section = parts.remove(0).to_string();
    let subsection = parts.pop().map(|s| s.to_string());
    Ok((section, subsection, field))
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let repo = Repository::discover()?;
    validator::validate_file_operations(&repo.workdir)?;

    let (section, subsection, field) = split_key(&args.key)?;
    let mut cfg = repo.config();

    match args.value {
        Some(value) => {
            cfg.set(&section, subsection.as_deref(), &field, &value);
            cfg.save()?;
        }
        None => match cfg.get(&section, subsection.as_deref(), &field) {
            Some(value) => println!("{value}"),
            None => return Err(KilnError::MissingRef(args.key)),
        },
    }
    Ok(())
}
