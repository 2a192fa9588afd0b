//! The grammar, split by syntactic category.
//!
//! Each `opt_*` function is one alternative: it returns `Skip` without
//! consuming anything when the input is not its construct, and otherwise
//! commits, making best-effort progress through errors.

mod expr;
mod item;
mod ty;
