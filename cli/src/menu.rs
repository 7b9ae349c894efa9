//! Interactive numbered menu over a catalog.

use crate::config::Settings;
use crate::display::{format_bid, write_bids, write_elapsed, write_lookup};
use crate::loader;
use bidtree::Catalog;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::warn;

const MENU: &str = "\
Menu:
  1. Load Bids
  2. Display All Bids
  3. Find Bid
  4. Find Bids by Amount
  5. Remove Bid
  6. Display All Bids by Amount
  9. Exit
";

pub struct Menu<'s, R, W> {
    input: R,
    out: W,
    settings: &'s Settings,
}

impl<'s, R: BufRead, W: Write> Menu<'s, R, W> {
    pub fn new(input: R, out: W, settings: &'s Settings) -> Self {
        Self {
            input,
            out,
            settings,
        }
    }

    /// Runs until the user picks 9 or input runs out.
    pub fn run(&mut self, catalog: &mut Catalog) -> anyhow::Result<()> {
        loop {
            write!(self.out, "{MENU}Enter choice: ")?;
            self.out.flush()?;
            let Some(choice) = self.read_choice()? else {
                break;
            };
            match choice {
                1 => self.load(catalog)?,
                2 => {
                    write_bids(&mut self.out, catalog.list_by_key(), self.settings.json)?;
                }
                3 => self.find(catalog)?,
                4 => self.range(catalog)?,
                5 => self.remove(catalog)?,
                6 => {
                    write_bids(&mut self.out, catalog.list_by_amount(), self.settings.json)?;
                }
                9 => break,
                other => writeln!(self.out, "Unknown choice {other}.")?,
            }
        }
        writeln!(self.out, "Good bye.")?;
        Ok(())
    }

    fn load(&mut self, catalog: &mut Catalog) -> anyhow::Result<()> {
        let settings = self.settings;
        writeln!(self.out, "Loading CSV file {}", settings.file.display())?;
        match loader::load_file(&settings.file, &settings.loader, catalog) {
            Ok(summary) => {
                writeln!(
                    self.out,
                    "{} bids read, {} loaded, {} skipped",
                    summary.read, summary.loaded, summary.skipped
                )?;
                write_elapsed(&mut self.out, summary.elapsed)?;
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                writeln!(self.out, "Error: {e:#}")?;
            }
        }
        Ok(())
    }

    fn find(&mut self, catalog: &Catalog) -> anyhow::Result<()> {
        let Some(id) = self.prompt("Enter bid id: ")? else {
            return Ok(());
        };
        let start = Instant::now();
        let found = catalog.lookup(&id);
        let elapsed = start.elapsed();
        write_lookup(&mut self.out, &id, found, self.settings.json)?;
        write_elapsed(&mut self.out, elapsed)?;
        Ok(())
    }

    fn range(&mut self, catalog: &Catalog) -> anyhow::Result<()> {
        let Some(low) = self.prompt_amount("Enter low amount: ")? else {
            return Ok(());
        };
        let Some(high) = self.prompt_amount("Enter high amount: ")? else {
            return Ok(());
        };
        match catalog.range_by_amount(low, high) {
            Ok(hits) => {
                if write_bids(&mut self.out, hits, self.settings.json)? == 0 && !self.settings.json {
                    writeln!(self.out, "No bids between {low} and {high}.")?;
                }
            }
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(())
    }

    fn remove(&mut self, catalog: &mut Catalog) -> anyhow::Result<()> {
        let Some(id) = self.prompt("Enter bid id: ")? else {
            return Ok(());
        };
        match catalog.remove(&id) {
            Ok(bid) => writeln!(self.out, "Removed {}", format_bid(&bid))?,
            Err(e) => writeln!(self.out, "Error: {e}")?,
        }
        Ok(())
    }

    /// Next non-blank line, trimmed. `None` at end of input.
    fn read_token(&mut self) -> io::Result<Option<String>> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let token = line.trim();
            if !token.is_empty() {
                return Ok(Some(token.to_string()));
            }
        }
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.out, "{message}")?;
        self.out.flush()?;
        self.read_token()
    }

    /// Re-prompts until the input parses as a number.
    fn prompt_amount(&mut self, message: &str) -> io::Result<Option<f64>> {
        let mut message = message;
        loop {
            let Some(token) = self.prompt(message)? else {
                return Ok(None);
            };
            match loader::parse_amount(&token, self.settings.loader.currency) {
                Some(amount) => return Ok(Some(amount)),
                None => message = "Invalid amount, please re-enter: ",
            }
        }
    }

    fn read_choice(&mut self) -> io::Result<Option<u32>> {
        loop {
            let Some(token) = self.read_token()? else {
                return Ok(None);
            };
            match token.parse() {
                Ok(choice) => return Ok(Some(choice)),
                Err(_) => {
                    write!(self.out, "Invalid input, please re-enter a valid choice: ")?;
                    self.out.flush()?;
                }
            }
        }
    }
}
