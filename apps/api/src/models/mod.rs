pub mod category;
pub mod link;
pub mod resume;
pub mod tag;
pub mod template;
pub mod usage;
