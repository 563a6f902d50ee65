use crate::action::Action;
use crate::catalog::VisualizationId;

pub struct CommandParser;

impl CommandParser {
    pub fn parse(input: &str) -> Result<Action, String> {
        let input = input.trim();
        if !input.starts_with('/') {
            return Err("Not a command".to_string());
        }

        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        let args = args.trim();

        match cmd {
            "/help" => Ok(Action::Help),
            "/tour" => Ok(Action::RestartTour),
            "/open" => {
                if args.is_empty() {
                    Err("Usage: /open <panel>  e.g. /open flight-risk".to_string())
                } else {
                    args.parse::<VisualizationId>().map(Action::OpenPanel)
                }
            }
            "/close" => Ok(Action::ClosePanel),
            "/quit" | "/exit" => Ok(Action::Quit),
            _ => Err(format!("Unknown command: {}. Type /help for available commands.", cmd)),
        }
    }

    pub fn is_command(input: &str) -> bool {
        input.trim_start().starts_with('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(CommandParser::parse("/help"), Ok(Action::Help));
        assert_eq!(CommandParser::parse("  /tour "), Ok(Action::RestartTour));
        assert_eq!(CommandParser::parse("/close"), Ok(Action::ClosePanel));
        assert_eq!(CommandParser::parse("/quit"), Ok(Action::Quit));
    }

    #[test]
    fn test_open_takes_panel_id() {
        assert_eq!(
            CommandParser::parse("/open team-health"),
            Ok(Action::OpenPanel(VisualizationId::TeamHealth))
        );
        assert!(CommandParser::parse("/open").unwrap_err().starts_with("Usage"));
        assert!(CommandParser::parse("/open nowhere").unwrap_err().contains("nowhere"));
    }

    #[test]
    fn test_unknown_and_non_commands() {
        assert!(CommandParser::parse("/dance").unwrap_err().contains("/dance"));
        assert!(CommandParser::parse("who is at flight risk?").is_err());
        assert!(!CommandParser::is_command("hello /help"));
        assert!(CommandParser::is_command(" /help"));
    }
}
