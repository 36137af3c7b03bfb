//! The lazy container tree: [`Container`] is a handle onto one object or
//! array within a document, backed by the shared [`TokenCursor`].
//!
//! A container never buffers more of the document than [`Persistence`]
//! demands: [`Persistence::Transient`] containers discard each element once
//! the cursor moves past it, while [`Persistence::Persistent`] containers
//! retain everything they've yielded so that [`Container::iter`],
//! [`Container::entries`], [`Container::get`], and [`Container::get_key`]
//! can be called more than once.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::cursor::{KeyOrEnd, TokenCursor};
use crate::error::{Error, SyntaxErrorKind};
use crate::parser::StringReader;
use crate::token::Token;
use crate::value::Value;

/// Whether a container is a JSON object or array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A JSON array `[...]`.
    Array,
    /// A JSON object `{...}`.
    Object,
}

/// How much of a container's contents are retained for replay.
///
/// # Default
///
/// [`Persistence::Transient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persistence {
    /// Each element is discarded once the cursor advances past it. Memory
    /// use is bounded by the depth of the tree, not its breadth; iteration
    /// and lookups can only move forward and only once.
    #[default]
    Transient,
    /// Every element is retained as it's produced, so the container can be
    /// iterated, indexed, or looked up by key more than once. Memory use is
    /// proportional to the retained structure.
    Persistent,
}

enum Retained {
    Array(Vec<Element>),
    Object(IndexMap<String, Element>),
}

struct Inner {
    kind: Kind,
    cursor: TokenCursor,
    persistence: Persistence,
    child_persistence: Persistence,
    retained: Retained,
    seen_keys: HashSet<String>,
    position: usize,
    done: bool,
    iterated: bool,
    pending: Option<Container>,
}

/// A handle onto one JSON object or array in the lazily-parsed document.
///
/// `Container` does not implement [`Clone`]: duplicating a handle would let
/// two independent callers race over the same single-pass cursor. Asking
/// for the same element twice (via [`Container::get`]/[`Container::get_key`]
/// on a [`Persistence::Persistent`] container, or via a second
/// [`Container::iter`]/[`Container::entries`] call) goes through the
/// container's own bookkeeping instead, which is how retained elements are
/// handed out more than once without ever duplicating the handle itself.
///
/// ```compile_fail
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<lazyjson::Container>();
/// ```
pub struct Container(Rc<RefCell<Inner>>);

/// One element of a container: a scalar value, an incremental string
/// reader, or a nested container.
pub enum Element {
    /// A fully decoded `null`, boolean, number, or string.
    Scalar(Value),
    /// An incremental string value, produced only for [`Persistence::Transient`]
    /// containers when `strings_as_streams` is enabled; a [`Persistence::Persistent`]
    /// container eagerly reads the string instead so it can be retained.
    Reader(StringReader),
    /// A nested JSON array.
    Array(Container),
    /// A nested JSON object.
    Object(Container),
}

impl Element {
    /// Retained elements are re-handed-out by reference identity for
    /// containers (so a replayed iteration sees the same live handle the
    /// first pass left off at) and by value for scalars. Never called on a
    /// [`Element::Reader`]: those are never stored in a retained buffer.
    fn reshare(&self) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(v.clone()),
            Self::Array(c) => Self::Array(c.share()),
            Self::Object(c) => Self::Object(c.share()),
            Self::Reader(_) => unreachable!("a stream reader is never retained"),
        }
    }

    /// `true` if draining this element (because the caller abandoned it
    /// without reading it to completion) requires further work.
    fn needs_drain(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }
}

impl Container {
    pub(crate) fn new(cursor: TokenCursor, kind: Kind, persistence: Persistence) -> Self {
        let retained = match kind {
            Kind::Array => Retained::Array(Vec::new()),
            Kind::Object => Retained::Object(IndexMap::new()),
        };
        Self(Rc::new(RefCell::new(Inner {
            kind,
            cursor,
            persistence,
            child_persistence: persistence,
            retained,
            seen_keys: HashSet::new(),
            position: 0,
            done: false,
            iterated: false,
            pending: None,
        })))
    }

    /// A second handle onto the same container state. Not public: the only
    /// legitimate reason to hold two handles to one container is retained
    /// replay, which this type manages internally.
    pub(crate) fn share(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    /// Whether this is a JSON object or array.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.0.borrow().kind
    }

    /// `true` if this is a [`Kind::Array`].
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    /// `true` if this is a [`Kind::Object`].
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    /// Sets the persistence mode that containers nested inside this one
    /// will be constructed with from this point forward. Does not affect
    /// children already yielded, nor this container's own persistence.
    pub fn set_child_persistence(&self, persistence: Persistence) {
        self.0.borrow_mut().child_persistence = persistence;
    }

    fn cursor(&self) -> TokenCursor {
        self.0.borrow().cursor.clone()
    }

    fn grammar_err(&self, kind: SyntaxErrorKind) -> Error {
        let (index, line, column) = self.cursor().position();
        Error::Syntax { kind, index, line, column }
    }

    fn drain_pending(&self) -> Result<(), Error> {
        if let Some(child) = self.0.borrow_mut().pending.take() {
            child.drain_remaining()?;
        }
        self.cursor().drain_stream_string()
    }

    pub(crate) fn drain_remaining(&self) -> Result<(), Error> {
        match self.kind() {
            Kind::Array => while self.next_array_element()?.is_some() {},
            Kind::Object => while self.next_object_entry()?.is_some() {},
        }
        Ok(())
    }

    fn make_child(&self, kind: Kind) -> Element {
        let persistence = self.0.borrow().child_persistence;
        let child = Container::new(self.cursor(), kind, persistence);
        match kind {
            Kind::Array => Element::Array(child),
            Kind::Object => Element::Object(child),
        }
    }

    fn element_from_token(&self, tok: Token) -> Result<Element, Error> {
        match tok {
            Token::Operator(b'{') => Ok(self.make_child(Kind::Object)),
            Token::Operator(b'[') => Ok(self.make_child(Kind::Array)),
            Token::Operator(c) => Err(self.grammar_err(SyntaxErrorKind::InvalidCharacter(c as char))),
            Token::String(s) => Ok(Element::Scalar(Value::String(s))),
            Token::StringStream(mut reader) => {
                if self.0.borrow().persistence == Persistence::Persistent {
                    Ok(Element::Scalar(Value::String(reader.read_to_string()?)))
                } else {
                    Ok(Element::Reader(reader))
                }
            }
            Token::Number(n) => Ok(Element::Scalar(Value::Number(n))),
            Token::Boolean(b) => Ok(Element::Scalar(Value::Boolean(b))),
            Token::Null => Ok(Element::Scalar(Value::Null)),
        }
    }

    fn remember_pending(&self, element: &Element) {
        if element.needs_drain() {
            let share = match element {
                Element::Array(c) | Element::Object(c) => c.share(),
                _ => unreachable!(),
            };
            self.0.borrow_mut().pending = Some(share);
        }
    }

    fn next_array_element(&self) -> Result<Option<Element>, Error> {
        self.drain_pending()?;
        if self.0.borrow().done {
            return Ok(None);
        }
        let cursor = self.cursor();
        let position = self.0.borrow().position;
        if position > 0 {
            match cursor.next_token()? {
                Some(Token::Operator(b']')) => {
                    self.0.borrow_mut().done = true;
                    return Ok(None);
                }
                Some(Token::Operator(b',')) => {}
                Some(_) => return Err(self.grammar_err(SyntaxErrorKind::ExpectedContainerDelimiter)),
                None => return Err(Error::UnterminatedList),
            }
        }
        match cursor.next_token()? {
            Some(Token::Operator(b']')) if position == 0 => {
                self.0.borrow_mut().done = true;
                Ok(None)
            }
            Some(tok) => {
                let element = self.element_from_token(tok)?;
                self.remember_pending(&element);
                let mut inner = self.0.borrow_mut();
                inner.position += 1;
                if inner.persistence == Persistence::Persistent {
                    let Retained::Array(v) = &mut inner.retained else {
                        unreachable!("array container always holds Retained::Array")
                    };
                    v.push(element.reshare());
                }
                drop(inner);
                Ok(Some(element))
            }
            None => Err(Error::UnterminatedList),
        }
    }

    fn next_object_entry(&self) -> Result<Option<(String, Element)>, Error> {
        self.drain_pending()?;
        if self.0.borrow().done {
            return Ok(None);
        }
        let cursor = self.cursor();
        let position = self.0.borrow().position;
        if position > 0 {
            match cursor.next_token()? {
                Some(Token::Operator(b'}')) => {
                    self.0.borrow_mut().done = true;
                    return Ok(None);
                }
                Some(Token::Operator(b',')) => {}
                Some(_) => return Err(self.grammar_err(SyntaxErrorKind::ExpectedContainerDelimiter)),
                None => return Err(Error::UnterminatedObject),
            }
        }
        let key = match cursor.next_key()? {
            KeyOrEnd::End => {
                self.0.borrow_mut().done = true;
                return Ok(None);
            }
            KeyOrEnd::Key(k) => k,
        };
        match cursor.next_token()? {
            Some(Token::Operator(b':')) => {}
            Some(_) => return Err(self.grammar_err(SyntaxErrorKind::ExpectedColon)),
            None => return Err(Error::UnterminatedObject),
        }
        match cursor.next_token()? {
            Some(tok) => {
                let element = self.element_from_token(tok)?;
                self.remember_pending(&element);
                let mut inner = self.0.borrow_mut();
                inner.position += 1;
                inner.seen_keys.insert(key.clone());
                if inner.persistence == Persistence::Persistent {
                    let Retained::Object(m) = &mut inner.retained else {
                        unreachable!("object container always holds Retained::Object")
                    };
                    m.insert(key.clone(), element.reshare());
                }
                drop(inner);
                Ok(Some((key, element)))
            }
            None => Err(Error::UnterminatedObject),
        }
    }

    fn element_at(&self, index: usize) -> Result<Option<Element>, Error> {
        {
            let inner = self.0.borrow();
            let Retained::Array(v) = &inner.retained else {
                panic!("element_at called on an object container")
            };
            if index < v.len() {
                return Ok(Some(v[index].reshare()));
            }
            if index < inner.position {
                return Err(Error::AlreadyPassed(format!("index {index} already passed")));
            }
        }
        loop {
            match self.next_array_element()? {
                None => return Ok(None),
                Some(element) => {
                    let produced = self.0.borrow().position - 1;
                    if produced == index {
                        return Ok(Some(element));
                    }
                }
            }
        }
    }

    fn entry_at(&self, index: usize) -> Result<Option<(String, Element)>, Error> {
        {
            let inner = self.0.borrow();
            let Retained::Object(m) = &inner.retained else {
                panic!("entry_at called on an array container")
            };
            if let Some((k, v)) = m.get_index(index) {
                return Ok(Some((k.clone(), v.reshare())));
            }
            if index < inner.position {
                return Err(Error::AlreadyPassed(format!("entry {index} already passed")));
            }
        }
        loop {
            match self.next_object_entry()? {
                None => return Ok(None),
                Some((k, element)) => {
                    let produced = self.0.borrow().position - 1;
                    if produced == index {
                        return Ok(Some((k, element)));
                    }
                }
            }
        }
    }

    /// Returns the element at `index`, scanning forward (and, on a
    /// [`Persistence::Persistent`] container, retaining) as needed.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if the array ends before `index`.
    /// [`Error::AlreadyPassed`] if this is a [`Persistence::Transient`]
    /// container and `index` was already consumed by a previous call.
    pub fn get(&self, index: usize) -> Result<Element, Error> {
        assert!(self.is_array(), "get() is only valid on an array container");
        self.mark_started();
        self.element_at(index)?.ok_or(Error::IndexOutOfRange(index))
    }

    /// Returns the value of `key`, scanning forward (and, on a
    /// [`Persistence::Persistent`] container, retaining) as needed.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if the object ends without ever containing
    /// `key`. [`Error::AlreadyPassed`] if this is a [`Persistence::Transient`]
    /// container and `key` was already consumed by a previous call.
    pub fn get_key(&self, key: &str) -> Result<Element, Error> {
        assert!(self.is_object(), "get_key() is only valid on an object container");
        self.mark_started();
        {
            let inner = self.0.borrow();
            let Retained::Object(m) = &inner.retained else {
                unreachable!()
            };
            if let Some(v) = m.get(key) {
                return Ok(v.reshare());
            }
            if inner.seen_keys.contains(key) {
                return Err(Error::AlreadyPassed(format!("key {key:?} already passed")));
            }
        }
        loop {
            match self.next_object_entry()? {
                None => return Err(Error::MissingKey(key.to_string())),
                Some((k, element)) => {
                    if k == key {
                        return Ok(element);
                    }
                }
            }
        }
    }

    fn begin_iteration(&self) -> Result<(), Error> {
        let mut inner = self.0.borrow_mut();
        if inner.persistence == Persistence::Transient {
            if inner.iterated {
                return Err(Error::AlreadyStarted);
            }
            inner.iterated = true;
        }
        Ok(())
    }

    /// Marks this transient container as having had a key/index lookup
    /// performed on it, without itself erroring. A later `iter`/`entries`
    /// call still needs to go through `begin_iteration`'s check, so a
    /// lookup followed by a full iteration correctly signals
    /// [`Error::AlreadyStarted`].
    fn mark_started(&self) {
        self.0.borrow_mut().iterated = true;
    }

    /// Iterates this array's elements from the beginning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] immediately if this is a
    /// [`Persistence::Transient`] container and iteration was already
    /// started once before.
    pub fn iter(&self) -> Result<ArrayIter, Error> {
        assert!(self.is_array(), "iter() is only valid on an array container");
        self.begin_iteration()?;
        Ok(ArrayIter { container: self.share(), next_index: 0 })
    }

    /// Iterates this object's `(key, value)` entries from the beginning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] immediately if this is a
    /// [`Persistence::Transient`] container and iteration was already
    /// started once before.
    pub fn entries(&self) -> Result<ObjectIter, Error> {
        assert!(self.is_object(), "entries() is only valid on an object container");
        self.begin_iteration()?;
        Ok(ObjectIter { container: self.share(), next_index: 0 })
    }

    /// Iterates this object's keys from the beginning.
    ///
    /// # Errors
    ///
    /// Same as [`Container::entries`].
    pub fn keys(&self) -> Result<KeysIter, Error> {
        Ok(KeysIter(self.entries()?))
    }

    /// Iterates this object's values from the beginning.
    ///
    /// # Errors
    ///
    /// Same as [`Container::entries`].
    pub fn values(&self) -> Result<ValuesIter, Error> {
        Ok(ValuesIter(self.entries()?))
    }
}

/// Iterator over an array's elements, produced by [`Container::iter`].
pub struct ArrayIter {
    container: Container,
    next_index: usize,
}

impl Iterator for ArrayIter {
    type Item = Result<Element, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        match self.container.element_at(index) {
            Ok(Some(element)) => {
                self.next_index += 1;
                Some(Ok(element))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Iterator over an object's `(key, value)` entries, produced by
/// [`Container::entries`].
pub struct ObjectIter {
    container: Container,
    next_index: usize,
}

impl Iterator for ObjectIter {
    type Item = Result<(String, Element), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        match self.container.entry_at(index) {
            Ok(Some(entry)) => {
                self.next_index += 1;
                Some(Ok(entry))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Iterator over an object's keys, produced by [`Container::keys`].
pub struct KeysIter(ObjectIter);

impl Iterator for KeysIter {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|r| r.map(|(k, _)| k))
    }
}

/// Iterator over an object's values, produced by [`Container::values`].
pub struct ValuesIter(ObjectIter);

impl Iterator for ValuesIter {
    type Item = Result<Element, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|r| r.map(|(_, v)| v))
    }
}
