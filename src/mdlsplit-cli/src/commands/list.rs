//! Non-interactive model listing

use anyhow::Result;
use std::io::{self, StdinLock};
use std::path::Path;

use super::{Outcome, Pack, Settings};
use crate::prompt::print_models;

pub fn handle(root: &Path, settings: &Settings) -> Result<Outcome> {
    let pack = Pack::open(root, &settings.prefix)?;
    let mut out = io::stdout().lock();
    print_models::<_, StdinLock<'static>>(&mut out, &pack.models, None)?;
    Ok(Outcome::Completed)
}
