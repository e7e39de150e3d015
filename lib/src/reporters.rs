use std::io::Write;

use humantime_serde::re::humantime;
use tabwriter::TabWriter;

use crate::{Extent, Report, Result};

fn extent(e: Option<Extent>) -> String {
    match e {
        Some(e) => format!("{}, {}", e.min, e.max),
        None => "-, -".to_string(),
    }
}

pub fn report_text(r: &Report, w: &mut dyn Write) -> Result<()> {
    let mut tw = TabWriter::new(w);

    write!(
        tw,
        "Points\t[input, output, ratio]\t{}, {}, {:.2}%\n\
         X Range\t[input min, max]\t{}\n\
         X Range\t[output min, max]\t{}\n\
         Y Range\t[input min, max]\t{}\n\
         Y Range\t[output min, max]\t{}\n\
         Sorted\t[input]\t{}\n\
         Elapsed\t[reduce]\t{}\n",
        r.input.points,
        r.output.points,
        r.ratio() * 100.0,
        extent(r.input.x),
        extent(r.output.x),
        extent(r.input.y),
        extent(r.output.y),
        r.input.sorted,
        humantime::format_duration(r.reduction.elapsed),
    )?;

    tw.flush()?;
    Ok(())
}

pub fn report_json(r: &Report, w: &mut dyn Write) -> Result<()> {
    serde_json::to_writer(&mut *w, r)?;
    w.write_all(b"\n")?;
    Ok(())
}
