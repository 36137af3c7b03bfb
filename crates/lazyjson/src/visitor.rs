//! Depth-first visitor: walks a loaded document without ever building more
//! than one path's worth of ancestry in memory.
//!
//! An empty array or object produces no elements to recurse into, so it
//! would otherwise be invisible to a caller that only sees leaves; the
//! visitor calls back once for such a container, at its own path, with
//! [`Visited::EmptyArray`]/[`Visited::EmptyObject`], so structure is never
//! silently dropped.

use crate::container::{Container, Element};
use crate::error::Error;
use crate::loader::Loaded;
use crate::value::Value;

/// One step of the path leading to a visited value.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// An array index.
    Index(usize),
    /// An object key.
    Key(String),
}

/// What [`visit`] is reporting at a given path.
pub enum Visited {
    /// A leaf scalar value.
    Scalar(Value),
    /// An array with no elements.
    EmptyArray,
    /// An object with no entries.
    EmptyObject,
}

/// Visits every leaf value (and every empty container) in `loaded`,
/// depth-first, calling `callback` with the path from the root and the
/// value found there.
///
/// # Examples
///
/// ```
/// use lazyjson::{load, LoadOptions};
/// use lazyjson::visitor::{visit, Visited};
///
/// let loaded = load(&br#"{"a": [1, 2]}"#[..], LoadOptions::default()).unwrap();
/// let mut leaves = 0;
/// visit(loaded, |_path, visited| {
///     if matches!(visited, Visited::Scalar(_)) {
///         leaves += 1;
///     }
///     Ok(())
/// }).unwrap();
/// assert_eq!(leaves, 2);
/// ```
pub fn visit<F>(loaded: Loaded, mut callback: F) -> Result<(), Error>
where
    F: FnMut(&[PathSegment], Visited) -> Result<(), Error>,
{
    let mut path = Vec::new();
    match loaded {
        Loaded::Scalar(v) => callback(&path, Visited::Scalar(v)),
        Loaded::Array(c) => visit_array(&c, &mut path, &mut callback),
        Loaded::Object(c) => visit_object(&c, &mut path, &mut callback),
    }
}

fn visit_element<F>(element: Element, path: &mut Vec<PathSegment>, callback: &mut F) -> Result<(), Error>
where
    F: FnMut(&[PathSegment], Visited) -> Result<(), Error>,
{
    match element {
        Element::Scalar(v) => callback(path, Visited::Scalar(v)),
        Element::Reader(mut r) => {
            let s = r.read_to_string()?;
            callback(path, Visited::Scalar(Value::String(s)))
        }
        Element::Array(c) => visit_array(&c, path, callback),
        Element::Object(c) => visit_object(&c, path, callback),
    }
}

fn visit_array<F>(container: &Container, path: &mut Vec<PathSegment>, callback: &mut F) -> Result<(), Error>
where
    F: FnMut(&[PathSegment], Visited) -> Result<(), Error>,
{
    let mut iter = container.iter()?;
    let mut index = 0;
    let mut any = false;
    while let Some(element) = iter.next().transpose()? {
        any = true;
        path.push(PathSegment::Index(index));
        visit_element(element, path, callback)?;
        path.pop();
        index += 1;
    }
    if !any {
        callback(path, Visited::EmptyArray)?;
    }
    Ok(())
}

fn visit_object<F>(container: &Container, path: &mut Vec<PathSegment>, callback: &mut F) -> Result<(), Error>
where
    F: FnMut(&[PathSegment], Visited) -> Result<(), Error>,
{
    let mut iter = container.entries()?;
    let mut any = false;
    while let Some((key, element)) = iter.next().transpose()? {
        any = true;
        path.push(PathSegment::Key(key));
        visit_element(element, path, callback)?;
        path.pop();
    }
    if !any {
        callback(path, Visited::EmptyObject)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOptions, load};

    #[test]
    fn visits_every_leaf_with_its_path() {
        let loaded = load(&br#"{"a": [1, {"b": 2}], "c": []}"#[..], LoadOptions::default()).unwrap();
        let mut seen = Vec::new();
        visit(loaded, |path, visited| {
            let value = match visited {
                Visited::Scalar(v) => Some(v),
                Visited::EmptyArray | Visited::EmptyObject => None,
            };
            seen.push((path.to_vec(), value.map(|v| format!("{v:?}"))));
            Ok(())
        })
        .unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].0, vec![PathSegment::Key("a".into()), PathSegment::Index(0)]);
        assert_eq!(
            seen[1].0,
            vec![PathSegment::Key("a".into()), PathSegment::Index(1), PathSegment::Key("b".into())]
        );
        assert_eq!(seen[2].0, vec![PathSegment::Key("c".into())]);
        assert!(seen[2].1.is_none());
    }
}
