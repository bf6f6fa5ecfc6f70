//! Community commands.

use std::io::Write;

use campusevents_core::{CommunityDirectory, CommunityTab};

use super::Context;
use crate::error::ClientResult;

/// Lists communities matching `query`, optionally only joined ones.
pub fn list(
    ctx: &Context<'_>,
    directory: &CommunityDirectory,
    query: &str,
    tab: CommunityTab,
    out: &mut dyn Write,
) -> ClientResult<()> {
    let found = directory.search(query, tab);
    ctx.emit(
        out,
        || ctx.formatter.format_communities(&found, directory),
        &found,
    )
}
