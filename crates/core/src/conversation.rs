//! Conversation-related types.

use std::slice;

/// Who sent a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person typing into the widget.
    User,
    /// The completion endpoint, or a fallback standing in for it.
    Assistant,
}

/// A message in the transcript. Messages can't be changed once created.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    /// Creates a message sent by the user.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Creates a message sent by the assistant.
    #[inline]
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    /// Returns the sender of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this message.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The ordered messages exchanged in one widget.
///
/// Only the widget appends to a transcript, everyone else reads it.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Transcript {
    items: Vec<Message>,
}

impl Transcript {
    #[inline]
    pub(crate) fn push(&mut self, msg: Message) {
        self.items.push(msg);
    }

    /// Returns an iterator over the messages, oldest first.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Message> {
        self.items.iter()
    }

    /// Returns the messages as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Message] {
        &self.items
    }

    /// Returns the message at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Message> {
        self.items.get(idx)
    }

    /// Returns the latest message.
    #[inline]
    pub fn last(&self) -> Option<&Message> {
        self.items.last()
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been exchanged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
