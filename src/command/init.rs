//! `init`: creates an empty repository in the current directory (§6).
//! Fails if `.kiln` already exists.

use std::env;

use clap::Parser;

use crate::errors::Result;
use crate::repository::Repository;

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Name of the branch HEAD is made symbolic to (default: master)
    #[arg(long, default_value = "master")]
    pub initial_branch: String,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let cwd = env::current_dir()?;
    Repository::init(&cwd, &args.initial_branch)?;
    println!(
        "Initialized empty kiln repository in {}/.kiln",
        cwd.display()
    );
    Ok(())
}
