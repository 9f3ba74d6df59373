use crate::error::RelayError;

/// Longest topic name the topic-management API accepts.
pub const MAX_TOPIC_LEN: usize = 900;

/// Check a channel name for use, verbatim, as a push topic.
///
/// Topics are restricted to `[a-zA-Z0-9-_.~%]`. A `/topics/` prefix is not
/// accepted; the relay adds it itself.
pub fn validate_topic(topic: &str) -> Result<&str, RelayError> {
    let valid = !topic.is_empty()
        && topic.len() <= MAX_TOPIC_LEN
        && topic
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%'));

    if valid {
        Ok(topic)
    } else {
        Err(RelayError::InvalidTopic(topic.to_string()))
    }
}

pub fn validate_token(token: &str) -> Result<&str, RelayError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(RelayError::InvalidToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_channel_names() {
        for topic in ["news", "general", "team-42", "a.b_c~d%20"] {
            assert_eq!(validate_topic(topic).unwrap(), topic);
        }
    }

    #[test]
    fn rejects_names_outside_the_alphabet() {
        for topic in ["", "my channel", "/topics/news", "café", "a/b"] {
            assert!(matches!(validate_topic(topic), Err(RelayError::InvalidTopic(_))), "{topic}");
        }
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "x".repeat(MAX_TOPIC_LEN + 1);
        assert!(validate_topic(&long).is_err());
        assert!(validate_topic(&long[..MAX_TOPIC_LEN]).is_ok());
    }

    #[test]
    fn blank_token_is_invalid() {
        assert!(matches!(validate_token("  "), Err(RelayError::InvalidToken)));
        assert_eq!(validate_token(" t1 ").unwrap(), "t1");
    }
}
