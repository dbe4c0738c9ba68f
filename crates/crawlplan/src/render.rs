//! Plain-text output.

use std::io::{self, Write};

use crawlrate_core::{CrawlPlan, Pulse};

/// One line per assignment: `[<secs>s]\t<worker>\t<slot>\t<item>`.
pub fn table(out: &mut impl Write, plan: &CrawlPlan) -> io::Result<()> {
    for assignment in plan {
        writeln!(out, "{assignment}")?;
    }
    Ok(())
}

/// Input sizes and the computed pulse, printed ahead of the table with `--debug`.
pub fn debug_summary(
    out: &mut impl Write,
    keywords: &[String],
    proxies: &[String],
    pulse: &Pulse,
) -> io::Result<()> {
    writeln!(out, "Keywords: {}, {:?}", keywords.len(), keywords)?;
    writeln!(out, "Proxies: {}, {:?}", proxies.len(), proxies)?;
    writeln!(out, "Pulse: {pulse}")?;
    writeln!(
        out,
        "Number of connections required for each proxy: {}",
        pulse.volume
    )?;
    writeln!(
        out,
        "Maximum runtime per keyword: {}s ({})",
        pulse.frequency.as_secs(),
        humantime::format_duration(pulse.frequency)
    )?;
    writeln!(
        out,
        "Total duration required to process all keywords: {}s ({})",
        pulse.duration.as_secs(),
        humantime::format_duration(pulse.duration)
    )?;
    Ok(())
}
