use crate::constants::MAX_CHAT_MESSAGE_CHARS;
use crate::error::{CommandError, CommandResult};
use crate::rows::{ChatMessageEvent, PlayerId};
use crate::settings::ChatSettings;
use crate::store::WorldStore;

/// Posts a chat line under the caller's current display name.
/// The text is trimmed; length is counted in characters.
pub fn send_chat_message<S: WorldStore + ?Sized>(
    store: &mut S,
    caller: &PlayerId,
    text: &str,
    settings: &ChatSettings,
    now_ms: i64,
) -> CommandResult<ChatMessageEvent> {
    let player = store.find_player(caller).ok_or(CommandError::PlayerMissing)?;

    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::MessageEmpty);
    }
    if text.chars().count() > MAX_CHAT_MESSAGE_CHARS {
        return Err(CommandError::MessageTooLong);
    }

    Ok(store.insert_chat_message(ChatMessageEvent {
        message_id: 0,
        owner_identity: *caller,
        display_name: player.display_name,
        text: text.to_string(),
        created_at_ms: now_ms,
        expires_at_ms: now_ms + settings.ttl_ms,
    }))
}
