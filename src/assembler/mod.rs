//! Grouping of bubble fragments into ordered conversations

use std::collections::HashMap;

use tracing::debug;

use crate::models::{Message, MessageFragment, Session};

#[derive(Debug, Clone, Default)]
pub struct AssembledSessions {
    pub sessions: Vec<Session>,
    /// Conversations dropped because none of their fragments had content
    pub discarded: usize,
}

/// Group fragments by conversation id and rebuild each conversation
///
/// Within a conversation fragments are stably sorted by timestamp, missing timestamps counting
/// as the epoch. Empty-content fragments are dropped and conversations left without messages
/// are discarded. Sessions come out ordered by message count, largest first, ties keeping the
/// order in which conversations were first seen.
pub fn assemble_sessions(fragments: Vec<MessageFragment>) -> AssembledSessions {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<MessageFragment>)> = Vec::new();

    for fragment in fragments {
        match index.get(&fragment.conversation_id) {
            Some(&i) => groups[i].1.push(fragment),
            None => {
                index.insert(fragment.conversation_id.clone(), groups.len());
                groups.push((fragment.conversation_id.clone(), vec![fragment]));
            }
        }
    }

    let mut assembled = AssembledSessions::default();
    for (session_id, mut group) in groups {
        match build_session(session_id, &mut group) {
            Some(session) => assembled.sessions.push(session),
            None => assembled.discarded += 1,
        }
    }

    assembled.sessions.sort_by(|a, b| b.messages.len().cmp(&a.messages.len()));

    debug!(
        "Assembled {} sessions ({} without content discarded)",
        assembled.sessions.len(),
        assembled.discarded
    );
    assembled
}

fn build_session(session_id: String, fragments: &mut [MessageFragment]) -> Option<Session> {
    fragments.sort_by_key(MessageFragment::sort_key);

    let messages: Vec<Message> = fragments
        .iter_mut()
        .filter(|f| !f.content.is_empty())
        .map(|f| Message {
            role: f.role,
            content: std::mem::take(&mut f.content),
            timestamp: f.timestamp,
        })
        .collect();

    if messages.is_empty() {
        return None;
    }

    let timestamp = messages.iter().find_map(|m| m.timestamp);
    Some(Session { session_id, messages, timestamp })
}
