#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    NewChat,
    Forget,
    History,
    Ask(String),
    Health,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP_TEXT: &str = "\
commands:
  /new          start a new chat session
  /forget       delete the current session on the server and start over
  /history      show the server-side history of the current session
  /ask <text>   one-off question outside the conversation
  /health       check the assistant service
  /help         show this help
  /quit         exit
anything else is sent to the assistant";

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if !line.starts_with('/') {
        return Command::Send(line.to_string());
    }

    let (name, argument) = match line.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (line, ""),
    };

    match name {
        "/new" => Command::NewChat,
        "/forget" => Command::Forget,
        "/history" => Command::History,
        "/ask" => Command::Ask(argument.to_string()),
        "/health" => Command::Health,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, parse_command};

    #[test]
    fn plain_text_is_sent_trimmed() {
        assert_eq!(
            parse_command("  Plan my day \n"),
            Command::Send("Plan my day".to_string())
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   \t"), Command::Empty);
    }

    #[test]
    fn ask_keeps_the_rest_of_the_line() {
        assert_eq!(
            parse_command("/ask   help me organize my day"),
            Command::Ask("help me organize my day".to_string())
        );
        assert_eq!(parse_command("/ask"), Command::Ask(String::new()));
    }

    #[test]
    fn recognizes_session_commands() {
        assert_eq!(parse_command("/new"), Command::NewChat);
        assert_eq!(parse_command("/forget"), Command::Forget);
        assert_eq!(parse_command("/history"), Command::History);
        assert_eq!(parse_command("/health"), Command::Health);
        assert_eq!(parse_command("/exit"), Command::Quit);
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(
            parse_command("/nope now"),
            Command::Unknown("/nope".to_string())
        );
    }
}
