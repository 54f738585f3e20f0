// Profile read model: the authenticated user's profile plus grouped skills.

pub mod handlers;
pub mod summary;
