// Job matching: compares the user's stored skills against a pasted job description.

pub mod handlers;
pub mod matcher;
pub mod prompts;
