// Formatting and parsing utilities

use poise::serenity_prelude as serenity;

/// Truncate string to max length (in characters) with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a message link or a bare message id.
///
/// Links (`https://discord.com/channels/GUILD_ID/CHANNEL_ID/MESSAGE_ID`) also
/// yield the channel they point into.
pub fn parse_message_ref(input: &str) -> Option<(Option<serenity::ChannelId>, serenity::MessageId)> {
    let input = input.trim();

    if input.contains("/channels/") {
        let parts: Vec<&str> = input.trim_end_matches('/').split('/').collect();
        if parts.len() >= 3 {
            let message_id = parse_id(parts[parts.len() - 1])?;
            let channel_id = parse_id(parts[parts.len() - 2])?;
            return Some((
                Some(serenity::ChannelId::new(channel_id)),
                serenity::MessageId::new(message_id),
            ));
        }
        return None;
    }

    parse_id(input).map(|id| (None, serenity::MessageId::new(id)))
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Jump link to a message
pub fn message_link(
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, channel_id, message_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World!", 8), "Hello...");
        assert_eq!(truncate("ようこそ皆さん", 5), "よう...");
    }

    #[test]
    fn test_parse_message_ref() {
        assert_eq!(
            parse_message_ref("1234567890"),
            Some((None, serenity::MessageId::new(1234567890)))
        );
        assert_eq!(
            parse_message_ref("https://discord.com/channels/1/22/333"),
            Some((
                Some(serenity::ChannelId::new(22)),
                serenity::MessageId::new(333)
            ))
        );
        assert_eq!(parse_message_ref("not a message"), None);
        assert_eq!(parse_message_ref("0"), None);
        assert_eq!(parse_message_ref("https://discord.com/channels/1/22/abc"), None);
    }

    #[test]
    fn test_message_link_round_trip() {
        let link = message_link(
            serenity::GuildId::new(1),
            serenity::ChannelId::new(22),
            serenity::MessageId::new(333),
        );
        assert_eq!(link, "https://discord.com/channels/1/22/333");
        assert_eq!(
            parse_message_ref(&link),
            Some((
                Some(serenity::ChannelId::new(22)),
                serenity::MessageId::new(333)
            ))
        );
    }
}
