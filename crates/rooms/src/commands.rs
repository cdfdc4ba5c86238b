//! Chat command parsing.

/// The four owner commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Reject,
    Lock,
    Permit,
    Transfer,
}

impl CommandKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Lock => "lock",
            Self::Permit => "permit",
            Self::Transfer => "transfer",
        }
    }

    /// Reply when the handler hits a platform failure.
    #[must_use]
    pub fn failure_reply(self) -> &'static str {
        match self {
            Self::Reject => "❌ An error occurred while rejecting the user.",
            Self::Lock => "❌ An error occurred while toggling the lock.",
            Self::Permit => "❌ An error occurred while permitting the user.",
            Self::Transfer => "❌ An error occurred while transferring ownership.",
        }
    }

    /// Completes "Please specify a user to ..." in the usage reply.
    #[must_use]
    pub fn target_purpose(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Lock => "lock",
            Self::Permit => "permit",
            Self::Transfer => "transfer ownership to",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "lock" => Some(Self::Lock),
            "permit" => Some(Self::Permit),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed room command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Reject { target: Option<&'a str> },
    Lock,
    Permit { target: Option<&'a str> },
    Transfer { target: Option<&'a str> },
    /// Prefix present but the first word is not a known command.
    Unknown { token: &'a str },
}

impl Command<'_> {
    #[must_use]
    pub fn kind(&self) -> Option<CommandKind> {
        match self {
            Self::Reject { .. } => Some(CommandKind::Reject),
            Self::Lock => Some(CommandKind::Lock),
            Self::Permit { .. } => Some(CommandKind::Permit),
            Self::Transfer { .. } => Some(CommandKind::Transfer),
            Self::Unknown { .. } => None,
        }
    }
}

/// Parse `content` if it starts with `prefix`.
///
/// The text after the prefix is split on whitespace; the first word picks
/// the command (case-insensitive) and the second, if any, is the target.
/// Extra words are ignored.
#[must_use]
pub fn parse<'a>(content: &'a str, prefix: &str) -> Option<Command<'a>> {
    let rest = content.strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let token = words.next().unwrap_or("");
    let target = words.next();

    let command = match CommandKind::from_token(token) {
        Some(CommandKind::Reject) => Command::Reject { target },
        Some(CommandKind::Lock) => Command::Lock,
        Some(CommandKind::Permit) => Command::Permit { target },
        Some(CommandKind::Transfer) => Command::Transfer { target },
        None => Command::Unknown { token },
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    const PREFIX: &str = ",vc";

    #[rstest]
    #[case(",vc lock", Command::Lock)]
    #[case(",vc LOCK", Command::Lock)]
    #[case(",vc   lock   extra", Command::Lock)]
    #[case(",vc reject <@42>", Command::Reject { target: Some("<@42>") })]
    #[case(",vc reject", Command::Reject { target: None })]
    #[case(",vc Permit bob", Command::Permit { target: Some("bob") })]
    #[case(",vc transfer\t123  456", Command::Transfer { target: Some("123") })]
    #[case(",vc", Command::Unknown { token: "" })]
    #[case(",vc kick bob", Command::Unknown { token: "kick" })]
    #[case(",vclock", Command::Lock)]
    fn parses_commands(#[case] input: &str, #[case] expected: Command<'static>) {
        assert_eq!(parse(input, PREFIX), Some(expected));
    }

    #[rstest]
    #[case("hello")]
    #[case(" ,vc lock")]
    #[case(",v lock")]
    #[case("")]
    fn ignores_non_commands(#[case] input: &str) {
        assert_eq!(parse(input, PREFIX), None);
    }

    #[test]
    fn custom_prefix() {
        assert_eq!(parse("!room lock", "!room"), Some(Command::Lock));
        assert_eq!(parse(",vc lock", "!room"), None);
    }

    #[test]
    fn kinds_and_names() {
        assert_eq!(Command::Lock.kind(), Some(CommandKind::Lock));
        assert_eq!(Command::Unknown { token: "x" }.kind(), None);
        assert_eq!(CommandKind::Transfer.to_string(), "transfer");
    }
}
