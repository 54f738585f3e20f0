// CV skill extraction: pasted or uploaded CV text in, filtered skill rows out.

pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod upload;
