// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command parsing.

/// A `/command[@bot] args` message split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub command: &'a str,
    /// Bot username after `@`, present in group chats.
    pub mention: Option<&'a str>,
    pub args: &'a str,
}

/// Parses `text` as a slash command. Returns `None` for plain messages.
pub fn parse_command(text: &str) -> Option<ParsedCommand<'_>> {
    let rest = text.trim_start().strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let (command, mention) = match head.split_once('@') {
        Some((command, mention)) => (command, Some(mention)),
        None => (head, None),
    };

    if command.is_empty() {
        return None;
    }
    Some(ParsedCommand {
        command,
        mention,
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_command() {
        let parsed = parse_command("/status").unwrap();
        assert_eq!(parsed.command, "status");
        assert_eq!(parsed.mention, None);
        assert_eq!(parsed.args, "");
    }

    #[test]
    fn parses_mention_and_args() {
        let parsed = parse_command("/dev_maroid_foo_park@maroid_bot  lot 7 ").unwrap();
        assert_eq!(parsed.command, "dev_maroid_foo_park");
        assert_eq!(parsed.mention, Some("maroid_bot"));
        assert_eq!(parsed.args, "lot 7");
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert!(parse_command("hello").is_none());
        assert!(parse_command("").is_none());
        assert!(parse_command("/").is_none());
        assert!(parse_command("/@bot").is_none());
    }
}
