use lazy_static::lazy_static;
use std::sync::RwLock;

pub use string_cache::DefaultAtom as Atom;

lazy_static! {
    static ref LABEL_INTERNER: RwLock<Vec<Atom>> = RwLock::new(Vec::new());
}

/// Intern a label (prompt, caption, readout text) and return its ID. The
/// renderer keys its rasterized-text cache by this ID so repeated readout
/// values reuse their pixmaps.
pub fn intern_label(s: &str) -> usize {
    let atom = Atom::from(s);
    let mut v = LABEL_INTERNER.write().unwrap();
    match v.iter().position(|a| *a == atom) {
        Some(idx) => idx,
        None => {
            v.push(atom);
            v.len() - 1
        }
    }
}

/// Current count of unique labels
pub fn label_count() -> usize {
    LABEL_INTERNER.read().unwrap().len()
}

/// Resolve an intern ID back to its text. Returns None for unknown IDs.
pub fn lookup_label(id: usize) -> Option<String> {
    LABEL_INTERNER
        .read()
        .unwrap()
        .get(id)
        .map(|a| a.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let a = intern_label("Not at all");
        let b = intern_label("Not at all");
        assert_eq!(a, b);
        assert_eq!(lookup_label(a).as_deref(), Some("Not at all"));
    }

    #[test]
    fn distinct_labels_get_distinct_ids() {
        let a = intern_label("readout:42");
        let b = intern_label("readout:43");
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_id_resolves_to_none() {
        assert_eq!(lookup_label(usize::MAX), None);
    }
}
