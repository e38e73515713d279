//! Member normalization for JVM classes.
//!
//! A class is analysed in five stages over one immutable [`Snapshot`]:
//!
//! 1. [`collect`] loads the class, its ancestors, enclosing and nested types
//!    from a [`canon_model::MetadataSupplier`].
//! 2. [`synthesize_properties`] pairs getters and setters into properties.
//! 3. [`resolve_overloads`] groups methods under canonical signatures.
//! 4. [`walk`] builds the nesting tree and resolves inherited and overridden
//!    methods.
//! 5. [`resolve_conflicts`] merges 2-4 into a [`canon_model::CanonicalModel`]
//!    with its diagnostics.
//!
//! Stages 2-4 only read the snapshot and run concurrently; 5 waits for all
//! three. [`analyze_class`] and [`analyze_classes`] drive the whole thing.

pub mod accessors;
pub mod collect;
pub mod conflicts;
mod error;
pub mod overloads;
mod pipeline;
pub mod type_graph;

pub use accessors::{classify, synthesize_properties, AccessorShape, GetterPrefix};
pub use collect::{collect, Snapshot};
pub use conflicts::resolve_conflicts;
pub use error::StructuralError;
pub use overloads::{detect_ambiguity, resolve_overloads, signature_of, Overloads};
pub use pipeline::{analyze_class, analyze_classes, analyze_snapshot, ClassOutcome};
pub use type_graph::{walk, InheritedMethod, Override, TypeGraph};
