//! Line -> command parsing, shared by the interactive loop and `dbw -c`.

/// Where a line came from. Only the interactive loop knows `bye`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Interactive,
    OneShot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Help,
    Quit,
    Address,
    Balance,
    Transfer,
    Bridge,
    Mode,
    /// Verb as typed.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub args: Vec<String>,
}

impl Command {
    /// `None` for blank lines. Only the verb is case-insensitive.
    pub fn parse(line: &str, entry: Entry) -> Option<Command> {
        let mut words = line.split_whitespace();
        let word = words.next()?;

        let verb = match word.to_lowercase().as_str() {
            "help" | "?" => Verb::Help,
            "quit" | "exit" | "q" => Verb::Quit,
            "bye" if entry == Entry::Interactive => Verb::Quit,
            "address" => Verb::Address,
            "balance" => Verb::Balance,
            "transfer" => Verb::Transfer,
            "bridge" => Verb::Bridge,
            "mode" => Verb::Mode,
            _ => Verb::Unknown(word.to_string()),
        };

        Some(Command {
            verb,
            args: words.map(str::to_string).collect(),
        })
    }
}

pub const HELP: &str = "\
Commands:
  help                                     show this summary
  address                                  show the wallet receive address
  balance                                  refresh the token registry and show balances
  transfer <TOKEN> <ADDRESS> <AMOUNT>      send AMOUNT of TOKEN to a DERO address
  bridge <TOKEN> <ETH_ADDRESS> <AMOUNT>    bridge AMOUNT of TOKEN to an Ethereum address
  mode <vi|emacs>                          select key bindings
  quit | exit | q | bye                    leave the console";

pub const TRANSFER_USAGE: &str = "Transfer requires 3 arguments: transfer <TOKEN> <ADDRESS> <AMOUNT>";
pub const BRIDGE_USAGE: &str = "Bridge requires 3 arguments: bridge <TOKEN> <ETH_ADDRESS> <AMOUNT>";
pub const MODE_USAGE: &str = "Mode requires 1 argument: mode <vi|emacs>";
