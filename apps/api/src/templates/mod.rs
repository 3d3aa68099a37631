// Message templates: CRUD, duplication, favorites and composition.
// Variables are always derived from content through `draft::TemplateDraft`.

pub mod compose;
pub mod draft;
pub mod handlers;
pub mod store;
