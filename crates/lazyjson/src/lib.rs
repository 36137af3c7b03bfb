//! Incremental, pull-based parsing of JSON documents of arbitrary size.
//!
//! The entry points are [`load`] (one document) and [`load_many`] (a
//! sequence of whitespace-separated documents, e.g. NDJSON). Both hand back
//! a [`Loaded`]: a scalar is already fully decoded, while an object or array
//! root comes back as a [`Container`], a handle that pulls tokens from the
//! underlying source lazily, on demand, rather than buffering the whole
//! document up front.
//!
//! Call [`to_standard_types`] on a [`Loaded`] to eagerly materialise it into
//! an ordinary, fully-owned [`Value`] tree, or use [`visitor::visit`] to walk
//! it depth-first without ever holding more than one path's worth of
//! ancestry in memory.

mod container;
mod cursor;
mod error;
mod loader;
mod materialize;
mod parser;
pub mod source;
mod token;
mod value;
pub mod visitor;

pub use container::{ArrayIter, Container, Element, KeysIter, Kind, ObjectIter, Persistence, ValuesIter};
pub use error::{Error, SyntaxErrorKind};
pub use loader::{LoadMany, LoadOptions, Loaded, load, load_many};
pub use materialize::to_standard_types;
pub use parser::{Buffering, StringReader, TokenizerOptions};
pub use value::{Array, Map, Number, ParseNumberError, Value};
