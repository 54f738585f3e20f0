// Skill record maintenance: manual edits, deletes and the dedup rule shared by importers.

pub mod dedup;
pub mod handlers;
