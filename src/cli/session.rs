//! Session command handler
//!
//! Drives a `LocationSession` from stdin, one line per interaction. Plain
//! lines are typed text; lines starting with `:` are commands.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::ProviderChain;
use crate::geolocation::source_from_config;
use crate::location::{Coordinates, LocationType};
use crate::map::MapSnapshot;
use crate::session::{Key, LocationSession, NoticeLevel, SessionEvent, SessionOptions};
use clap::Args;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Session command arguments
#[derive(Args)]
pub struct SessionArgs {
    /// Location type: physical, online or hybrid
    #[arg(long = "type", short = 't')]
    pub location_type: Option<String>,
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Text(String),
    Pick(usize),
    Key(Key),
    Here,
    Pin(Coordinates),
    Pan(Coordinates),
    Zoom(u8),
    ShowMap,
    SetType(LocationType),
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Input::Text(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        let usage = |text: &str| Error::Config(format!("usage: {}", text));

        match (name, args.as_slice()) {
            ("pick", [n]) => {
                let n: usize = n.parse().map_err(|_| usage(":pick N"))?;
                if n == 0 {
                    return Err(usage(":pick N (1-based)"));
                }
                Ok(Input::Pick(n - 1))
            }
            ("pick", _) => Err(usage(":pick N")),
            ("enter", []) => Ok(Input::Key(Key::Enter)),
            ("esc", []) => Ok(Input::Key(Key::Escape)),
            ("down", []) => Ok(Input::Key(Key::ArrowDown)),
            ("up", []) => Ok(Input::Key(Key::ArrowUp)),
            ("here", []) => Ok(Input::Here),
            ("pin", [lat, lng]) => Ok(Input::Pin(Coordinates::parse(lat, lng)?)),
            ("pin", _) => Err(usage(":pin LAT LNG")),
            ("pan", [lat, lng]) => Ok(Input::Pan(Coordinates::parse(lat, lng)?)),
            ("pan", _) => Err(usage(":pan LAT LNG")),
            ("zoom", [z]) => Ok(Input::Zoom(z.parse().map_err(|_| usage(":zoom 0-19"))?)),
            ("zoom", _) => Err(usage(":zoom 0-19")),
            ("map", []) => Ok(Input::ShowMap),
            ("type", [t]) => Ok(Input::SetType(LocationType::from_str(t).map_err(Error::Config)?)),
            ("type", _) => Err(usage(":type physical|online|hybrid")),
            ("help", _) => Ok(Input::Help),
            ("quit", _) | ("q", _) => Ok(Input::Quit),
            _ => Err(Error::Config(format!("unknown command ':{}' (try :help)", name))),
        }
    }
}

/// Run the session command
pub async fn run(args: SessionArgs) -> Result<()> {
    let config = Config::load()?;
    let chain = Arc::new(ProviderChain::from_config(&config)?);
    let position = source_from_config(&config.geolocation);

    let mut options = SessionOptions::from_config(&config);
    if let Some(t) = &args.location_type {
        options.location_type = LocationType::from_str(t).map_err(Error::Config)?;
    }

    let (mut session, rx) = LocationSession::new(chain, position, options);
    let printer = tokio::spawn(print_events(rx));

    eprintln!(
        "wayfind session ({}). Type to search, :help for commands.",
        session.location_type()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match line.parse::<Input>() {
            Ok(input) => input,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        if let Err(e) = apply(&mut session, &config, input.clone()).await {
            eprintln!("Error: {}", e);
        }
        if input == Input::Quit {
            break;
        }
    }

    println!("{}", serde_json::to_string_pretty(session.location())?);
    drop(session);
    let _ = printer.await;
    Ok(())
}

async fn apply(session: &mut LocationSession, config: &Config, input: Input) -> Result<()> {
    match input {
        Input::Text(text) => session.input(text).await,
        Input::Pick(index) => {
            session.select(index).await?;
        }
        Input::Key(key) => {
            session.key(key).await?;
        }
        Input::Here => {
            session.use_current_location().await;
        }
        Input::Pin(coords) => session.drag_marker(coords).await?,
        Input::Pan(center) => session.pan_map(center)?,
        Input::Zoom(zoom) => session.zoom_map(zoom)?,
        Input::ShowMap => match session.map() {
            Some(map) => print_map(&map.snapshot(config)?),
            None => eprintln!("No map in this session"),
        },
        Input::SetType(t) => session.set_location_type(t).await,
        Input::Help => print_help(),
        Input::Quit => {}
    }
    Ok(())
}

async fn print_events(mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::Changed(location) => match location.coords {
                Some(coords) => println!("= {} ({})", location.address, coords),
                None => println!("= {}", location.address),
            },
            SessionEvent::Suggestions(records) => {
                for (i, record) in records.iter().enumerate() {
                    println!("  {}. {}", i + 1, record.display_name);
                }
            }
            SessionEvent::DropdownHidden => {}
            SessionEvent::Notice(notice) => match notice.level() {
                NoticeLevel::Success => println!("ok: {}", notice.message()),
                NoticeLevel::Error => println!("!! {}", notice.message()),
            },
        }
    }
}

fn print_map(snapshot: &MapSnapshot) {
    let pin = if snapshot.pinned { "pinned" } else { "not pinned" };
    println!("map: center {} zoom {}", snapshot.center, snapshot.zoom);
    println!("  marker {} ({})", snapshot.marker, pin);
    println!("  tile   {}", snapshot.tile_url);
    println!("  open   {}", snapshot.open_url);
}

fn print_help() {
    eprintln!("Commands:");
    eprintln!("  <text>         type into the search box");
    eprintln!("  :pick N        choose suggestion N");
    eprintln!("  :enter         press Enter (highlighted suggestion or raw text)");
    eprintln!("  :esc           close the suggestions");
    eprintln!("  :down / :up    move the highlight");
    eprintln!("  :here          use current location");
    eprintln!("  :pin LAT LNG   drop the map pin");
    eprintln!("  :pan LAT LNG   move the map view");
    eprintln!("  :zoom N        zoom the map (0-19)");
    eprintln!("  :map           show the map view");
    eprintln!("  :type T        physical, online or hybrid");
    eprintln!("  :quit          print the final location and exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_typed() {
        assert_eq!(
            "Eiffel Tower".parse::<Input>().unwrap(),
            Input::Text("Eiffel Tower".to_string())
        );
        assert_eq!("".parse::<Input>().unwrap(), Input::Text(String::new()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(":pick 2".parse::<Input>().unwrap(), Input::Pick(1));
        assert_eq!(":enter".parse::<Input>().unwrap(), Input::Key(Key::Enter));
        assert_eq!(":esc".parse::<Input>().unwrap(), Input::Key(Key::Escape));
        assert_eq!(":down".parse::<Input>().unwrap(), Input::Key(Key::ArrowDown));
        assert_eq!(":here".parse::<Input>().unwrap(), Input::Here);
        assert_eq!(
            ":pin -6.1754 106.8272".parse::<Input>().unwrap(),
            Input::Pin(Coordinates::new(-6.1754, 106.8272))
        );
        assert_eq!(
            ":type online".parse::<Input>().unwrap(),
            Input::SetType(LocationType::Online)
        );
        assert_eq!(":quit".parse::<Input>().unwrap(), Input::Quit);
        assert_eq!(":zoom 9".parse::<Input>().unwrap(), Input::Zoom(9));
        assert_eq!(":map".parse::<Input>().unwrap(), Input::ShowMap);
        assert_eq!(
            ":pan 48.8584 2.2945".parse::<Input>().unwrap(),
            Input::Pan(Coordinates::new(48.8584, 2.2945))
        );
    }

    #[tokio::test]
    async fn test_map_commands_drive_the_view() {
        let config = Config::default();
        let (mut session, _rx) = LocationSession::new(
            Arc::new(ProviderChain::new(Vec::new())),
            source_from_config(&config.geolocation),
            SessionOptions::from_config(&config),
        );

        apply(&mut session, &config, Input::Zoom(9)).await.unwrap();
        apply(&mut session, &config, Input::Pan(Coordinates::new(1.0, 2.0))).await.unwrap();
        apply(&mut session, &config, Input::ShowMap).await.unwrap();

        let snapshot = session.map().unwrap().snapshot(&config).unwrap();
        assert_eq!(snapshot.zoom, 9);
        assert_eq!(snapshot.center, Coordinates::new(1.0, 2.0));
        assert!(snapshot.tile_url.starts_with("https://"));

        apply(&mut session, &config, Input::SetType(LocationType::Online)).await.unwrap();
        assert!(apply(&mut session, &config, Input::Zoom(3)).await.is_err());
    }

    #[test]
    fn test_bad_commands() {
        assert!(":pick 0".parse::<Input>().is_err());
        assert!(":pick x".parse::<Input>().is_err());
        assert!(":pin 95 0".parse::<Input>().is_err());
        assert!(":pin 1".parse::<Input>().is_err());
        assert!(":zoom far".parse::<Input>().is_err());
        assert!(":pan 0 200".parse::<Input>().is_err());
        assert!(":type space".parse::<Input>().is_err());
        assert!(":dance".parse::<Input>().is_err());
    }
}
