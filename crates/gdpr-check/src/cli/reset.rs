use anyhow::Result;

use crate::state::StateFile;

pub fn run(store: &StateFile) -> Result<()> {
    if store.clear()? {
        eprintln!("Cleared saved progress");
    } else {
        eprintln!("Nothing to reset");
    }
    Ok(())
}
