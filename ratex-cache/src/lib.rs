pub mod cache;

pub use cache::{Atom, intern_label, label_count, lookup_label};
