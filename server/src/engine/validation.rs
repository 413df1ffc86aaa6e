use serde::{Deserialize, Serialize};

/// Maximum message content length (bytes).
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Maximum channel title length.
pub const MAX_TITLE_LENGTH: usize = 80;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A single field validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw channel input as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelInput {
    pub title: String,
    #[serde(default)]
    pub is_private: bool,
}

/// A channel input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidChannel {
    pub title: String,
    pub is_private: bool,
}

/// Validate a channel create/edit input. Title must be non-empty after
/// trimming and within the length limit.
pub fn validate_channel(input: ChannelInput) -> Result<ValidChannel, Vec<FieldError>> {
    let mut errors = Vec::new();
    let title = input.title.trim().to_string();

    if title.is_empty() {
        errors.push(FieldError::new("title", "Title cannot be empty"));
    }
    if title.len() > MAX_TITLE_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!("Title too long (max {} characters)", MAX_TITLE_LENGTH),
        ));
    }

    if errors.is_empty() {
        Ok(ValidChannel {
            title,
            is_private: input.is_private,
        })
    } else {
        Err(errors)
    }
}

/// Raw message input as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageInput {
    pub content: String,
}

/// A message input that passed validation.
#[derive(Debug, Clone)]
pub struct ValidMessage {
    pub content: String,
}

/// Validate message content. Must be non-empty and under the length limit.
pub fn validate_message(input: MessageInput) -> Result<ValidMessage, Vec<FieldError>> {
    let mut errors = Vec::new();

    if input.content.trim().is_empty() {
        errors.push(FieldError::new("content", "Message cannot be empty"));
    }
    if input.content.len() > MAX_MESSAGE_LENGTH {
        errors.push(FieldError::new(
            "content",
            format!("Message too long (max {} characters)", MAX_MESSAGE_LENGTH),
        ));
    }

    if errors.is_empty() {
        Ok(ValidMessage {
            content: input.content,
        })
    } else {
        Err(errors)
    }
}

/// Raw registration/login credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsInput {
    pub username: String,
    pub password: String,
}

/// Credentials that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCredentials {
    pub username: String,
    pub password: String,
}

/// Validate credentials. Username must be 1-32 chars, alphanumeric plus
/// underscore/hyphen; password must meet the minimum length.
pub fn validate_credentials(input: CredentialsInput) -> Result<ValidCredentials, Vec<FieldError>> {
    let mut errors = Vec::new();
    let username = input.username.trim().to_string();

    if username.is_empty() {
        errors.push(FieldError::new("username", "Username cannot be empty"));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        errors.push(FieldError::new(
            "username",
            format!("Username too long (max {} characters)", MAX_USERNAME_LENGTH),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(FieldError::new(
            "username",
            "Username can only contain letters, numbers, underscores, and hyphens",
        ));
    }
    if input.password.len() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            format!("Password too short (min {} characters)", MIN_PASSWORD_LENGTH),
        ));
    }

    if errors.is_empty() {
        Ok(ValidCredentials {
            username,
            password: input.password,
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_channel_input() {
        let valid = validate_channel(ChannelInput {
            title: "  design  ".into(),
            is_private: true,
        })
        .unwrap();
        assert_eq!(valid.title, "design");
        assert!(valid.is_private);
    }

    #[test]
    fn test_empty_title_rejected() {
        let errors = validate_channel(ChannelInput {
            title: "   ".into(),
            is_private: false,
        })
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn test_oversized_title_rejected() {
        let errors = validate_channel(ChannelInput {
            title: "a".repeat(81),
            is_private: false,
        })
        .unwrap_err();
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn test_message_validation() {
        assert!(validate_message(MessageInput { content: "hi".into() }).is_ok());
        assert!(validate_message(MessageInput { content: "   ".into() }).is_err());
        assert!(
            validate_message(MessageInput {
                content: "a".repeat(MAX_MESSAGE_LENGTH + 1),
            })
            .is_err()
        );
    }

    #[test]
    fn test_valid_usernames() {
        for name in ["alice", "bob_123", "user-name"] {
            assert!(
                validate_credentials(CredentialsInput {
                    username: name.into(),
                    password: "longenough".into(),
                })
                .is_ok()
            );
        }
    }

    #[test]
    fn test_invalid_credentials_collect_all_errors() {
        let errors = validate_credentials(CredentialsInput {
            username: "has space".into(),
            password: "short".into(),
        })
        .unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"password"));
    }
}
