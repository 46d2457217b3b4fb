use crate::relight::common::error::{RelightError, Result};
use crate::relight::scene::Chromaticity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Next,
    Previous,
    Reset,
    Quit,
}

impl Key {
    /// `n`, `p`, `r`, and `q` or Esc.
    pub fn from_char(c: char) -> Option<Key> {
        match c {
            'n' => Some(Key::Next),
            'p' => Some(Key::Previous),
            'r' => Some(Key::Reset),
            'q' | '\u{1b}' => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Input in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    PointerDown { x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp { x: i32, y: i32 },
}

/// One line of the headless command stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Input(InputEvent),
    SetChromaticity { illuminant: usize, value: Chromaticity },
    Save,
}

/// Parse a command line. Blank lines and `#` comments yield `None`.
///
/// ```text
/// n | p | r | q | esc
/// down X Y | move X Y | up X Y
/// set I R B
/// save
/// ```
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let invalid = || RelightError::InvalidCommand(line.to_string());
    let mut parts = line.split_whitespace();
    let verb = parts.next().ok_or_else(invalid)?;
    let args: Vec<&str> = parts.collect();

    let point = |args: &[&str]| -> Result<(i32, i32)> {
        match args {
            [x, y] => Ok((
                x.parse().map_err(|_| invalid())?,
                y.parse().map_err(|_| invalid())?,
            )),
            _ => Err(invalid()),
        }
    };

    let command = match verb {
        "esc" if args.is_empty() => Command::Input(InputEvent::Key(Key::Quit)),
        key if key.chars().count() == 1 && args.is_empty() => {
            let c = key.chars().next().ok_or_else(invalid)?;
            Command::Input(InputEvent::Key(Key::from_char(c).ok_or_else(invalid)?))
        }
        "down" => {
            let (x, y) = point(&args)?;
            Command::Input(InputEvent::PointerDown { x, y })
        }
        "move" => {
            let (x, y) = point(&args)?;
            Command::Input(InputEvent::PointerMove { x, y })
        }
        "up" => {
            let (x, y) = point(&args)?;
            Command::Input(InputEvent::PointerUp { x, y })
        }
        "set" => match args.as_slice() {
            [i, r, b] => Command::SetChromaticity {
                illuminant: i.parse().map_err(|_| invalid())?,
                value: Chromaticity::new(
                    r.parse().map_err(|_| invalid())?,
                    b.parse().map_err(|_| invalid())?,
                ),
            },
            _ => return Err(invalid()),
        },
        "save" if args.is_empty() => Command::Save,
        _ => return Err(invalid()),
    };
    Ok(Some(command))
}
