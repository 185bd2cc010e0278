// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::borrow::Cow;

use crate::any::Any;
use crate::error::BadAnyAccess;
use crate::node::{StringKind, TypeNode};

/// `String`, `&'static str` or `char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringType {
    node: &'static TypeNode,
    kind: StringKind,
}

impl StringType {
    pub(crate) fn new(node: &'static TypeNode, kind: StringKind) -> Self {
        Self { node, kind }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn is_owned(&self) -> bool {
        self.kind == StringKind::Owned
    }

    pub fn is_view(&self) -> bool {
        self.kind == StringKind::View
    }

    pub fn is_char(&self) -> bool {
        self.kind == StringKind::Char
    }

    /// Text held by `value`.
    pub fn get_str<'v>(&self, value: &'v Any<'_>) -> Option<Cow<'v, str>> {
        if let Some(s) = value.try_cast_const::<String>() {
            return Some(Cow::Borrowed(s.as_str()));
        }
        if let Some(s) = value.try_cast_const::<&'static str>() {
            return Some(Cow::Borrowed(*s));
        }
        value
            .try_cast_const::<char>()
            .map(|c| Cow::Owned(c.to_string()))
    }

    /// Replace the text. Views only accept `'static` text through
    /// [`set_static`](Self::set_static); a `char` needs exactly one character.
    pub fn set_value(&self, value: &mut Any<'_>, text: &str) -> Result<bool, BadAnyAccess> {
        if let Some(s) = value.try_cast::<String>()? {
            text.clone_into(s);
            return Ok(true);
        }
        if let Some(c) = value.try_cast::<char>()? {
            let mut chars = text.chars();
            if let (Some(first), None) = (chars.next(), chars.next()) {
                *c = first;
                return Ok(true);
            }
            log::warn!("[{}] set_value: '{}' is not a single character", self.node.name(), text);
            return Ok(false);
        }
        log::warn!("[{}] set_value: can't assign to {}", self.node.name(), value.type_info());
        Ok(false)
    }

    /// Point a `&'static str` view at `text`.
    pub fn set_static(&self, value: &mut Any<'_>, text: &'static str) -> Result<bool, BadAnyAccess> {
        match value.try_cast::<&'static str>()? {
            Some(view) => {
                *view = text;
                Ok(true)
            }
            None => self.set_value(value, text),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{typeinfo, Any, StringKind};

    #[test]
    fn test_owned_string() {
        let string = typeinfo::<String>().as_string().expect("string");
        assert!(string.is_owned());
        let mut text = String::from("abc");
        let mut any = Any::make_ref(&mut text);
        assert!(string.set_value(&mut any, "VisualGMQ").expect("mutable"));
        assert_eq!(string.get_str(&any).as_deref(), Some("VisualGMQ"));
        drop(any);
        assert_eq!(text, "VisualGMQ");
    }

    #[test]
    fn test_char_and_view() {
        let c = typeinfo::<char>().as_string().expect("char");
        assert_eq!(c.kind(), StringKind::Char);
        let mut value = Any::new('a');
        assert!(!c.set_value(&mut value, "xy").expect("mutable"));
        assert!(c.set_value(&mut value, "z").expect("mutable"));
        assert_eq!(c.get_str(&value).as_deref(), Some("z"));

        let view = typeinfo::<&'static str>().as_string().expect("view");
        let mut value = Any::new("old");
        assert!(view.set_static(&mut value, "new").expect("mutable"));
        assert_eq!(view.get_str(&value).as_deref(), Some("new"));
    }
}
