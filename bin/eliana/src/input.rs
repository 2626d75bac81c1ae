use std::str::FromStr;

use log::{info, warn};
use panel::{ControlId, Event};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

use crate::{Error, Result};

/// Parses one line of touch input: `press <control>`, `release <control>` or
/// `goto <screen>`. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Event>> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let invalid = || Error::InvalidInput(line.to_string());

    let (verb, arg) = line.split_once(char::is_whitespace).ok_or_else(invalid)?;
    let arg = arg.trim();
    let control = || ControlId::from_str(arg).map_err(|_| invalid());

    let event = match verb {
        "press" => Event::Press(control()?),
        "release" => Event::Release(control()?),
        "goto" => Event::Navigate(arg.to_string()),
        _ => return Err(invalid()),
    };

    Ok(Some(event))
}

/// Feeds parsed lines into the event loop until the reader is exhausted.
pub async fn read_input<R>(reader: R, events: UnboundedSender<Event>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(event)) => {
                if events.send(event).is_err() {
                    break;
                }
            }
            Ok(None) => (),
            Err(err) => warn!("{err}"),
        }
    }

    info!("input closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use panel::Room;
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("press hot_zone/kitchen").unwrap(),
            Some(Event::Press(ControlId::HotZone(Room::Kitchen)))
        );
        assert_eq!(
            parse_line("  release   master_light ").unwrap(),
            Some(Event::Release(ControlId::MasterLight))
        );
        assert_eq!(
            parse_line("goto bedroom").unwrap(),
            Some(Event::Navigate("bedroom".to_string()))
        );
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("# hold the kitchen").unwrap(), None);
    }

    #[test]
    fn test_parse_line_rejects_garbage() {
        assert!(parse_line("press").is_err());
        assert!(parse_line("press hot_zone/garage").is_err());
        assert!(parse_line("swipe back").is_err());
    }

    #[tokio::test]
    async fn test_read_input_skips_bad_lines() {
        let input: &[u8] = b"press back\n\nwiggle back\n# comment\nrelease back\n";
        let (tx, mut rx) = mpsc::unbounded_channel();

        read_input(input, tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(Event::Press(ControlId::Back)));
        assert_eq!(rx.recv().await, Some(Event::Release(ControlId::Back)));
        assert_eq!(rx.recv().await, None);
    }
}
