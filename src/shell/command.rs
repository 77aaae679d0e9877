use anyhow::{anyhow, bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cities,
    Toggle(String),
    SelectAll,
    SelectNone,
    Threads(usize),
    Start,
    Stop,
    Status,
    Log,
    Snapshot,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  cities                 list cities and whether they are selected
  toggle <name|number>   select or deselect a city
  select all|none        select or deselect every city
  threads <1-10>         set the thread count
  start                  start collection
  stop                   stop collection
  status                 show the status line
  log                    reprint collected readings
  snapshot               print the session as JSON
  help                   show this message
  quit                   stop collection and exit";

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match (verb.to_ascii_lowercase().as_str(), rest) {
            ("cities", "") => Command::Cities,
            ("toggle", "") => bail!("toggle needs a city name or number"),
            ("toggle", city) => Command::Toggle(city.to_string()),
            ("select", arg) if arg.eq_ignore_ascii_case("all") => Command::SelectAll,
            ("select", arg) if arg.eq_ignore_ascii_case("none") => Command::SelectNone,
            ("select", _) => bail!("select expects 'all' or 'none'"),
            ("threads", arg) => Command::Threads(
                arg.parse()
                    .map_err(|_| anyhow!("threads expects a number, got '{arg}'"))?,
            ),
            ("start", "") => Command::Start,
            ("stop", "") => Command::Stop,
            ("status", "") => Command::Status,
            ("log", "") => Command::Log,
            ("snapshot", "") => Command::Snapshot,
            ("help" | "?", "") => Command::Help,
            ("quit" | "exit", "") => Command::Quit,
            _ => bail!("Unknown command '{line}' (type 'help')"),
        };

        Ok(Some(command))
    }
}
