//! Three-way parse outcome.
//!
//! Every grammar function returns [`Parsed`]:
//!
//! | Variant      | Meaning |
//! |--------------|---------|
//! | `Skip`       | Not this alternative; no tokens consumed |
//! | `Success`    | Parsed the construct |
//! | `Error`      | Diagnostics were emitted; tokens may be consumed |
//!
//! `Error` carries the best-effort node when one was built, so callers can
//! keep partial trees while the diagnostic queue's sticky flag marks the
//! overall parse failed. Alternative combinators branch only on `Skip`; an
//! `Error` outcome never re-tries another alternative.

/// Outcome of one grammar function.
#[derive(Debug)]
pub enum Parsed<T> {
    /// Not this alternative. The stream is where it was.
    Skip,
    /// Parsed successfully.
    Success(T),
    /// Failed after committing; carries the partial result when one exists.
    Error(Option<T>),
}

impl<T> Parsed<T> {
    /// Success when `ok`, error carrying the value otherwise.
    pub fn from(ok: bool, value: T) -> Self {
        if ok {
            Parsed::Success(value)
        } else {
            Parsed::Error(Some(value))
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Parsed::Skip)
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Parsed::Error(_))
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Parsed::Success(_))
    }

    /// The parsed value, complete or partial.
    pub fn node(self) -> Option<T> {
        match self {
            Parsed::Success(value) => Some(value),
            Parsed::Error(value) => value,
            Parsed::Skip => None,
        }
    }
}

/// Try alternatives in order, returning the first that does not skip.
macro_rules! one_of {
    ($first:expr $(, $rest:expr)* $(,)?) => {{
        let outcome = $first;
        if !outcome.is_skip() {
            outcome
        } else {
            one_of!($($rest),*)
        }
    }};
    () => {
        $crate::outcome::Parsed::Skip
    };
}

pub(crate) use one_of;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from() {
        assert!(matches!(Parsed::from(true, 1), Parsed::Success(1)));
        assert!(matches!(Parsed::from(false, 1), Parsed::Error(Some(1))));
    }

    #[test]
    fn test_node() {
        assert_eq!(Parsed::Success(3).node(), Some(3));
        assert_eq!(Parsed::Error(Some(3)).node(), Some(3));
        assert_eq!(Parsed::<i32>::Error(None).node(), None);
        assert_eq!(Parsed::<i32>::Skip.node(), None);
    }

    #[test]
    fn test_one_of_stops_at_first_non_skip() {
        fn skip() -> Parsed<i32> {
            Parsed::Skip
        }
        fn success() -> Parsed<i32> {
            Parsed::Success(7)
        }
        fn unreachable_alt() -> Parsed<i32> {
            panic!("alternative after a match must not run")
        }

        let out: Parsed<i32> = one_of!(skip(), success(), unreachable_alt());
        assert!(matches!(out, Parsed::Success(7)));

        let out: Parsed<i32> = one_of!(skip(), skip());
        assert!(out.is_skip());
    }
}
