//! Eager materialisation into [`Value`]: `to_standard_types` walks a loaded
//! document and builds an ordinary, fully-owned value tree.
//!
//! Uses an explicit work stack rather than recursion, so a deeply nested
//! document (say, a few hundred thousand levels of `[[[...]]]`) cannot blow
//! the call stack the way a naive recursive descent would.

use indexmap::IndexMap;

use crate::container::{ArrayIter, Element, ObjectIter};
use crate::error::Error;
use crate::loader::Loaded;
use crate::value::{Map, Value};

enum Frame {
    Array { acc: Vec<Value>, iter: ArrayIter },
    Object { acc: Map, iter: ObjectIter, pending_key: Option<String> },
}

/// Fully materialises `loaded` into an ordinary [`Value`] tree, draining
/// every container it touches regardless of the container's own
/// [`crate::container::Persistence`].
///
/// # Examples
///
/// ```
/// use lazyjson::{load, LoadOptions};
/// use lazyjson::to_standard_types;
///
/// let loaded = load(&br#"[1, [2, 3]]"#[..], LoadOptions::default()).unwrap();
/// let value = to_standard_types(loaded).unwrap();
/// assert!(value.is_array());
/// ```
pub fn to_standard_types(loaded: Loaded) -> Result<Value, Error> {
    let mut stack = match loaded {
        Loaded::Scalar(v) => return Ok(v),
        Loaded::Array(c) => vec![Frame::Array { acc: Vec::new(), iter: c.iter()? }],
        Loaded::Object(c) => vec![Frame::Object { acc: IndexMap::new(), iter: c.entries()?, pending_key: None }],
    };

    loop {
        let top = stack.last_mut().expect("stack is never empty while looping");
        let step = match top {
            Frame::Array { iter, .. } => iter.next().transpose()?.map(Step::Array),
            Frame::Object { iter, .. } => iter.next().transpose()?.map(|(k, e)| Step::Object(k, e)),
        };

        match step {
            Some(Step::Array(element)) => push_element(&mut stack, element, None)?,
            Some(Step::Object(key, element)) => push_element(&mut stack, element, Some(key))?,
            None => {
                let finished = stack.pop().expect("just matched on stack.last_mut()");
                let value = match finished {
                    Frame::Array { acc, .. } => Value::Array(acc),
                    Frame::Object { acc, .. } => Value::Object(acc),
                };
                match stack.last_mut() {
                    None => return Ok(value),
                    Some(Frame::Array { acc, .. }) => acc.push(value),
                    Some(Frame::Object { acc, pending_key, .. }) => {
                        let key = pending_key.take().expect("key was set before descending into the child frame");
                        acc.insert(key, value);
                    }
                }
            }
        }
    }
}

enum Step {
    Array(Element),
    Object(String, Element),
}

fn push_element(stack: &mut Vec<Frame>, element: Element, key: Option<String>) -> Result<(), Error> {
    match element {
        Element::Scalar(v) => attach(stack, v, key),
        Element::Reader(mut r) => attach(stack, Value::String(r.read_to_string()?), key),
        Element::Array(c) => descend(stack, key, Frame::Array { acc: Vec::new(), iter: c.iter()? }),
        Element::Object(c) => descend(stack, key, Frame::Object { acc: IndexMap::new(), iter: c.entries()?, pending_key: None }),
    }
}

fn attach(stack: &mut [Frame], value: Value, key: Option<String>) -> Result<(), Error> {
    match stack.last_mut().expect("attach always runs with a frame on top") {
        Frame::Array { acc, .. } => acc.push(value),
        Frame::Object { acc, .. } => {
            acc.insert(key.expect("object frame always supplies a key"), value);
        }
    }
    Ok(())
}

fn descend(stack: &mut Vec<Frame>, key: Option<String>, child: Frame) -> Result<(), Error> {
    if let Some(key) = key {
        if let Frame::Object { pending_key, .. } = stack.last_mut().expect("descend always runs with a frame on top") {
            *pending_key = Some(key);
        }
    }
    stack.push(child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadOptions, load};

    #[test]
    fn materializes_nested_structure() {
        let loaded = load(&br#"{"a": [1, 2, {"b": null}], "c": "x"}"#[..], LoadOptions::default()).unwrap();
        let value = to_standard_types(loaded).unwrap();
        let obj = value.as_object().unwrap();
        let arr = obj["a"].as_array().unwrap();
        assert_eq!(arr.len(), 3);
        assert!(arr[2].as_object().unwrap()["b"].is_null());
        assert_eq!(obj["c"].as_str(), Some("x"));
    }

    #[test]
    fn materializes_scalar_root() {
        let loaded = load(&b"42"[..], LoadOptions::default()).unwrap();
        let value = to_standard_types(loaded).unwrap();
        assert!(value.is_number());
    }
}
