// Copyright 2025 the Dragline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channels link drag sources to the drop zones that should react to them.
//!
//! A channel is unset, a single tag, or a list of tags. Two channels are
//! linked when:
//!
//! - both are unset;
//! - both are single tags and equal;
//! - one is a single tag contained in the other's list;
//! - both are lists sharing at least one tag.
//!
//! An unset channel never matches a set one. Tags compare strictly: the
//! number `1` and the string `"1"` are different tags.

use alloc::string::String;

use smallvec::SmallVec;

/// One channel identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChannelTag {
    /// Numeric tag.
    Num(i64),
    /// String tag.
    Str(String),
}

impl From<i64> for ChannelTag {
    fn from(value: i64) -> Self {
        Self::Num(value)
    }
}

impl From<&str> for ChannelTag {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for ChannelTag {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// The channel of a drag source or drop zone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Channel {
    /// No channel configured.
    #[default]
    Unset,
    /// A single tag.
    One(ChannelTag),
    /// A list of tags.
    Many(SmallVec<[ChannelTag; 2]>),
}

impl Channel {
    /// Builds a list channel.
    pub fn many<T: Into<ChannelTag>>(tags: impl IntoIterator<Item = T>) -> Self {
        Self::Many(tags.into_iter().map(Into::into).collect())
    }

    fn contains(&self, tag: &ChannelTag) -> bool {
        match self {
            Self::Unset => false,
            Self::One(t) => t == tag,
            Self::Many(tags) => tags.contains(tag),
        }
    }
}

impl From<ChannelTag> for Channel {
    fn from(value: ChannelTag) -> Self {
        Self::One(value)
    }
}

impl From<i64> for Channel {
    fn from(value: i64) -> Self {
        Self::One(value.into())
    }
}

impl From<&str> for Channel {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Self {
        Self::One(value.into())
    }
}

impl<T: Into<ChannelTag>, const N: usize> From<[T; N]> for Channel {
    fn from(value: [T; N]) -> Self {
        Self::many(value)
    }
}

/// Returns `true` if a drag on channel `drag` should be seen by a zone on channel `drop`.
pub fn is_linked(drag: &Channel, drop: &Channel) -> bool {
    match (drag, drop) {
        (Channel::Unset, Channel::Unset) => true,
        (Channel::Unset, _) | (_, Channel::Unset) => false,
        (Channel::One(tag), other) | (other, Channel::One(tag)) => other.contains(tag),
        (Channel::Many(a), Channel::Many(b)) => a.iter().any(|t| b.contains(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_to_scalar() {
        assert!(is_linked(&Channel::from("a"), &Channel::from("a")));
        assert!(!is_linked(&Channel::from("a"), &Channel::from("b")));
        assert!(is_linked(&Channel::from(3_i64), &Channel::from(3_i64)));
        assert!(!is_linked(&Channel::from(1_i64), &Channel::from("1")));
    }

    #[test]
    fn scalar_in_list_either_side() {
        let list = Channel::from(["odd", "irrational"]);
        assert!(is_linked(&Channel::from("odd"), &list));
        assert!(is_linked(&list, &Channel::from("irrational")));
        assert!(!is_linked(&Channel::from("even"), &list));
        assert!(!is_linked(&list, &Channel::from("even")));
    }

    #[test]
    fn list_to_list_any_pair() {
        let a = Channel::many([1_i64, 2, 3]);
        let b = Channel::many([9_i64, 3]);
        let c = Channel::many([7_i64, 8]);
        assert!(is_linked(&a, &b));
        assert!(!is_linked(&a, &c));
        assert!(!is_linked(&Channel::Many(SmallVec::new()), &Channel::Many(SmallVec::new())));
    }

    #[test]
    fn unset_only_matches_unset() {
        assert!(is_linked(&Channel::Unset, &Channel::Unset));
        assert!(!is_linked(&Channel::Unset, &Channel::from("a")));
        assert!(!is_linked(&Channel::from(["a"]), &Channel::Unset));
    }
}
