// Resume metadata. Files are hosted elsewhere; a resume is a named link.
// Each user has at most one default resume, which fills resume variables at compose time.

pub mod handlers;
pub mod store;
