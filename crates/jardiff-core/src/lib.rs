//! Jardiff Core
//!
//! Typed, addressable structural diffs with multi-pass refinement.
//!
//! # Core Concepts
//!
//! - [`Name`]: Hierarchical, bracket-escaping address of a comparable unit
//! - [`Kind`]: Dotted category tag with cheap sub-kind tests
//! - [`Diff`]: One finding, identified by `(name, kind, verb)`
//! - [`Emitter`]: The `(kind, name)` context that mints diffs
//! - [`Differ<T>`]: Shareable comparison function over [`Element<T>`]
//! - [`differs`]: Combinators over equality, optionals, results, sets and maps
//! - [`Diffs`]: Deduplicated result with merge and refinement
//! - [`Plan`]: Ordered [`RefinementStrategy`] passes over an initial result
//!
//! # Example
//!
//! ```rust,ignore
//! use jardiff_core::{differs, Element, Emitter, Kind, Pair, Plan};
//!
//! let differ = differs::of_map_values::<String, String, BTreeMap<_, _>>();
//! let emitter = Emitter::new(Kind::parse("attribute")?);
//! let subject = Element::root(Pair::new(left_attributes, right_attributes));
//!
//! let outcome = Plan::<_, ()>::new().run(&(), &differ, &emitter, &subject);
//! println!("{}", outcome.result);
//! ```

#![warn(unreachable_pub)]

mod composite;
mod diff;
mod differ;
pub mod differs;
mod diffs;
mod element;
mod emitter;
mod failure;
mod kind;
mod name;
mod pair;
mod refinement;
mod set_differ;

pub use composite::CompositeDiffer;
pub use diff::{Diff, Verb};
pub use differ::Differ;
pub use differs::{Hinter, MapLike};
pub use diffs::{Diffs, DiffsView};
pub use element::Element;
pub use emitter::Emitter;
pub use failure::Failure;
pub use kind::{Kind, KindError};
pub use name::{Name, NameError, SEPARATOR};
pub use pair::Pair;
pub use refinement::{AppliedRefinement, Plan, PlanOutcome, Refinement, RefinementStrategy};
pub use set_differ::{
    child_by_display, insertion_ordered_union, sorted_union, Intersection, Member, Projection,
    SetDiffer, UnionSet, UnionSupplier,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
