// Short links: issued and resolved locally under `/s/:code`.
// Resolution goes through a `LinkCache` so hot links skip the database lookup.

pub mod cache;
pub mod code;
pub mod handlers;
pub mod store;
