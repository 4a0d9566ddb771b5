use chord_matcher::{parse_raw_key, Key, KeyState, ParseError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: expected `down <key>`, `up <key>` or `repeat <n> down <key>`, got '{text}'")]
    Malformed { line: usize, text: String },
    #[error("line {line}: invalid key")]
    Key {
        line: usize,
        #[source]
        source: ParseError,
    },
    #[error("line {line}: invalid repeat count '{count}'")]
    RepeatCount { line: usize, count: String },
}

/// One raw key transition of a replay script, sent `times` times in a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptCommand {
    pub state: KeyState,
    pub key: Key,
    pub times: u32,
}

impl ScriptCommand {
    pub fn down(key: Key) -> Self {
        Self {
            state: KeyState::Pressed,
            key,
            times: 1,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            state: KeyState::Released,
            key,
            times: 1,
        }
    }
}

/// Parses one script line. Blank lines and comments (`#` to end of line) yield `None`.
pub fn parse_line(line: usize, text: &str) -> Result<Option<ScriptCommand>, ScriptError> {
    let content = text.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = content.split_whitespace().collect();
    let key = |name: &str| parse_raw_key(name).map_err(|source| ScriptError::Key { line, source });

    let command = match tokens.as_slice() {
        [verb, name] if verb.eq_ignore_ascii_case("down") => ScriptCommand::down(key(*name)?),
        [verb, name] if verb.eq_ignore_ascii_case("up") => ScriptCommand::up(key(*name)?),
        [repeat, count, verb, name]
            if repeat.eq_ignore_ascii_case("repeat") && verb.eq_ignore_ascii_case("down") =>
        {
            let times = count.parse().map_err(|_| ScriptError::RepeatCount {
                line,
                count: count.to_string(),
            })?;
            ScriptCommand {
                times,
                ..ScriptCommand::down(key(*name)?)
            }
        }
        _ => {
            return Err(ScriptError::Malformed {
                line,
                text: content.to_string(),
            })
        }
    };

    Ok(Some(command))
}

/// Parses a whole script, numbering lines from 1.
pub fn parse_script(script: &str) -> Result<Vec<ScriptCommand>, ScriptError> {
    script
        .lines()
        .enumerate()
        .filter_map(|(index, text)| parse_line(index + 1, text).transpose())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_down_and_up() {
        assert_eq!(
            parse_line(1, "down ControlLeft").unwrap(),
            Some(ScriptCommand::down(Key::ControlLeft))
        );
        assert_eq!(
            parse_line(1, "  UP   KeyA  ").unwrap(),
            Some(ScriptCommand::up(Key::KeyA))
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        assert_eq!(parse_line(1, ""), Ok(None));
        assert_eq!(parse_line(2, "   # hold ctrl"), Ok(None));
        assert_eq!(
            parse_line(3, "down F5 # refresh"),
            Ok(Some(ScriptCommand::down(Key::F5)))
        );
    }

    #[test]
    fn test_parse_repeat() {
        let command = parse_line(4, "repeat 25 down KeyA").unwrap().unwrap();
        assert_eq!(command.times, 25);
        assert_eq!(command.state, KeyState::Pressed);
        assert_eq!(command.key, Key::KeyA);

        assert_eq!(
            parse_line(5, "repeat many down KeyA"),
            Err(ScriptError::RepeatCount {
                line: 5,
                count: "many".to_string()
            })
        );
    }

    #[test]
    fn test_errors_carry_line_number() {
        assert_eq!(
            parse_line(7, "press KeyA"),
            Err(ScriptError::Malformed {
                line: 7,
                text: "press KeyA".to_string()
            })
        );
        assert_eq!(
            parse_line(8, "repeat 3 up KeyA"),
            Err(ScriptError::Malformed {
                line: 8,
                text: "repeat 3 up KeyA".to_string()
            })
        );

        let error = parse_line(9, "down Banana").unwrap_err();
        assert_eq!(error.to_string(), "line 9: invalid key");
        assert_eq!(
            error,
            ScriptError::Key {
                line: 9,
                source: ParseError::UnknownKey("Banana".to_string())
            }
        );
    }

    #[test]
    fn test_parse_script() {
        let script = "# copy\ndown ControlLeft\n\ndown KeyK\nup KeyK\nup ControlLeft\n";
        let commands = parse_script(script).unwrap();
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[1], ScriptCommand::down(Key::KeyK));

        assert!(matches!(
            parse_script("down KeyA\n\nwiggle"),
            Err(ScriptError::Malformed { line: 3, .. })
        ));
    }
}
