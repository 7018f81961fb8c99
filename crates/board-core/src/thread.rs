//! Reply threading: a derived relation, never stored.
//!
//! Given a flat, already-fetched message list, split it into top-level
//! messages and per-parent reply groups. Nothing here is cached: callers
//! re-partition the freshest list they have every time they render.

use std::collections::HashMap;

use uuid::Uuid;

use crate::message::Message;

/// A partitioned view over a borrowed message list.
#[derive(Debug, Clone, Default)]
pub struct Threads<'a> {
  top_level: Vec<&'a Message>,
  replies:   HashMap<Uuid, Vec<&'a Message>>,
}

impl<'a> Threads<'a> {
  /// Partition `messages`, preserving input order within every group.
  pub fn partition(messages: &'a [Message]) -> Self {
    let mut top_level = Vec::new();
    let mut replies: HashMap<Uuid, Vec<&'a Message>> = HashMap::new();

    for message in messages {
      match message.reply_to {
        Some(parent) => replies.entry(parent).or_default().push(message),
        None => top_level.push(message),
      }
    }

    Self { top_level, replies }
  }

  /// Messages without a `reply_to`, in input order.
  pub fn top_level(&self) -> &[&'a Message] { &self.top_level }

  /// Direct replies to `parent`, in input order; empty if there are none.
  pub fn replies_of(&self, parent: Uuid) -> &[&'a Message] {
    self.replies.get(&parent).map(Vec::as_slice).unwrap_or_default()
  }

  /// Parent ids that have replies in the list but no visible top-level
  /// message. Those replies render under no card.
  pub fn unresolved(&self) -> impl Iterator<Item = Uuid> + '_ {
    self
      .replies
      .keys()
      .copied()
      .filter(|id| !self.top_level.iter().any(|m| m.id == *id))
  }

  /// Number of replies that belong to an unresolved parent.
  pub fn unresolved_reply_count(&self) -> usize {
    self.unresolved().map(|id| self.replies_of(id).len()).sum()
  }
}

/// Free-function form of [`Threads::partition`].
pub fn partition(
  messages: &[Message],
) -> (Vec<&Message>, HashMap<Uuid, Vec<&Message>>) {
  let threads = Threads::partition(messages);
  (threads.top_level, threads.replies)
}

/// Direct replies to `parent` in `messages`, in input order.
pub fn replies_of(messages: &[Message], parent: Uuid) -> Vec<&Message> {
  messages
    .iter()
    .filter(|m| m.reply_to == Some(parent))
    .collect()
}
