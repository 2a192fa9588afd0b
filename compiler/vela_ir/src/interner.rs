//! String interner.
//!
//! Interned strings are leaked to obtain `'static` references, so a `Name`
//! can be resolved without holding a lock-guard across the caller. The
//! interner is append-only; nothing is ever removed.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

struct Inner {
    map: FxHashMap<&'static str, super::Name>,
    strings: Vec<&'static str>,
}

/// Append-only string interner with interior mutability.
///
/// Shared by reference within a parse; wrap in [`SharedInterner`] when a
/// parse result must outlive its creator or cross threads.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl StringInterner {
    /// Create an interner with the empty string and the Vela keywords
    /// pre-interned.
    pub fn new() -> Self {
        let mut inner = Inner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        let empty: &'static str = "";
        inner.map.insert(empty, super::Name::EMPTY);
        inner.strings.push(empty);

        let interner = StringInterner {
            inner: RwLock::new(inner),
        };
        for kw in KEYWORDS {
            interner.intern(kw);
        }
        interner
    }

    /// Intern a string, returning its handle.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, s: &str) -> super::Name {
        {
            let guard = self.inner.read();
            if let Some(&name) = guard.map.get(s) {
                return name;
            }
        }
        self.insert(s.to_owned())
    }

    /// Intern an owned string without re-allocating it.
    pub fn intern_owned(&self, s: String) -> super::Name {
        {
            let guard = self.inner.read();
            if let Some(&name) = guard.map.get(s.as_str()) {
                return name;
            }
        }
        self.insert(s)
    }

    fn insert(&self, s: String) -> super::Name {
        let mut guard = self.inner.write();
        // Re-check: another caller may have interned between the read and
        // write lock.
        if let Some(&name) = guard.map.get(s.as_str()) {
            return name;
        }
        let leaked: &'static str = Box::leak(s.into_boxed_str());
        let raw = u32::try_from(guard.strings.len()).expect("interner exceeded u32::MAX strings");
        let name = super::Name::from_raw(raw);
        guard.strings.push(leaked);
        guard.map.insert(leaked, name);
        name
    }

    /// Resolve a handle to its string.
    pub fn lookup(&self, name: super::Name) -> &'static str {
        let guard = self.inner.read();
        guard.strings[name.raw() as usize]
    }

    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        // The empty string is always present.
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Keywords and the names the parser synthesises, interned up front so the
/// lexer's keyword checks and the parser's `apply`/`create` handles are
/// allocation-free.
const KEYWORDS: &[&str] = &[
    "when",
    "try",
    "catch",
    "match",
    "new",
    "throw",
    "let",
    "var",
    "type",
    "class",
    "interface",
    "using",
    "module",
    "iso",
    "mut",
    "imm",
    "Self",
    "true",
    "false",
    "apply",
    "create",
];

/// Thread-safe owned handle to an interner.
#[derive(Clone)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl Default for SharedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_lookup() {
        let interner = StringInterner::new();
        let hello = interner.intern("hello");
        let world = interner.intern("world");
        assert_eq!(interner.intern("hello"), hello);
        assert_ne!(hello, world);
        assert_eq!(interner.lookup(hello), "hello");
        assert_eq!(interner.lookup(world), "world");
    }

    #[test]
    fn test_empty_string() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), super::super::Name::EMPTY);
        assert_eq!(interner.lookup(super::super::Name::EMPTY), "");
    }

    #[test]
    fn test_keywords_pre_interned() {
        let interner = StringInterner::new();
        let before = interner.len();
        interner.intern("class");
        interner.intern("apply");
        interner.intern("create");
        assert_eq!(interner.len(), before);
    }

    #[test]
    fn test_intern_owned() {
        let interner = StringInterner::new();
        let a = interner.intern_owned(String::from("$module-0"));
        let b = interner.intern("$module-0");
        assert_eq!(a, b);
    }

    #[test]
    fn test_shared_interner() {
        let interner = SharedInterner::new();
        let other = interner.clone();
        assert_eq!(interner.intern("shared"), other.intern("shared"));
    }
}
