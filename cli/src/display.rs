//! Text and JSON rendering for bids.

use bidtree::Bid;
use std::io::{self, Write};
use std::time::Duration;

/// `id: title | amount | fund`
pub fn format_bid(bid: &Bid) -> String {
    format!("{}: {} | {} | {}", bid.id, bid.title, bid.amount, bid.fund)
}

/// Writes bids one per line (or as a JSON array), returns how many.
pub fn write_bids<'a, W, I>(out: &mut W, bids: I, json: bool) -> anyhow::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Bid>,
{
    if json {
        let bids: Vec<&Bid> = bids.into_iter().collect();
        serde_json::to_writer_pretty(&mut *out, &bids)?;
        writeln!(out)?;
        return Ok(bids.len());
    }

    let mut count = 0;
    for bid in bids {
        writeln!(out, "{}", format_bid(bid))?;
        count += 1;
    }
    Ok(count)
}

pub fn write_lookup<W: Write>(out: &mut W, id: &str, found: Option<&Bid>, json: bool) -> anyhow::Result<()> {
    match (found, json) {
        (Some(bid), true) => {
            serde_json::to_writer_pretty(&mut *out, bid)?;
            writeln!(out)?;
        }
        (Some(bid), false) => writeln!(out, "{}", format_bid(bid))?,
        (None, _) => writeln!(out, "Bid Id {} not found.", id)?,
    }
    Ok(())
}

/// Elapsed time in microseconds and seconds.
pub fn write_elapsed<W: Write>(out: &mut W, elapsed: Duration) -> io::Result<()> {
    writeln!(out, "time: {} microseconds", elapsed.as_micros())?;
    writeln!(out, "time: {:.6} seconds", elapsed.as_secs_f64())
}
