// GitHub import: fetch public profile data, let the AI gateway infer skills,
// replace the user's github-sourced skill rows.

pub mod client;
pub mod handlers;
pub mod importer;
pub mod prompts;
