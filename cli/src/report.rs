use clap::Args;
use eyre::Result;
use skimline::{Report, Traced};
use tokio::io::AsyncWriteExt;

use crate::io::Output;
use crate::source::SourceOpts;

#[derive(Args, Debug)]
pub struct Opts {
    #[command(flatten)]
    pub source: SourceOpts,

    /// Report type (text, json)
    #[clap(long = "type", default_value = "text")]
    pub report_type: String,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    pub output: String,
}

pub async fn report(opts: &Opts) -> Result<()> {
    let gate = Traced::new(opts.source.gate().await?);
    let series = opts.source.read().await?;

    let (reduced, reduction) = gate.measure(&series);
    let report = Report::new(&series, &reduced, reduction);

    let mut buf = Vec::new();
    match opts.report_type.as_str() {
        "text" => skimline::report_text(&report, &mut buf)?,
        "json" => skimline::report_json(&report, &mut buf)?,
        other => eyre::bail!("unknown report type: {}", other),
    }

    let mut output = Output::from_filename(&opts.output).await?;
    output.write_all(&buf).await?;
    output.flush().await?;
    Ok(())
}
