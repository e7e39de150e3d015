use clap::Args;
use eyre::Result;
use skimline::{read_series, sort_by_x, Format, Gate, GateConfig, Point, Threshold};
use tracing::debug;

use crate::io::Input;

/// Input and gate flags shared by every command that reads a series.
#[derive(Args, Debug, Default)]
pub struct SourceOpts {
    /// Input encoding (auto, json, csv)
    #[clap(long, default_value = "auto")]
    pub from: String,

    /// Sort points by x before downsampling
    #[clap(long)]
    pub sort: bool,

    /// Downsampling threshold: series longer than this are reduced to it [default: 1000]
    #[clap(long, env = "SKIMLINE_THRESHOLD", allow_negative_numbers = true)]
    pub threshold: Option<i64>,

    /// Pass series through unchanged
    #[clap(long)]
    pub no_downsample: bool,

    /// JSON gate config file, e.g. {"enabled": true, "limit": 1000}
    #[clap(long, env = "SKIMLINE_CONFIG")]
    pub config: Option<String>,

    /// Input files [default: stdin]
    pub files: Vec<String>,
}

impl SourceOpts {
    /// Builds the gate from the config file, then applies flag overrides.
    pub async fn gate(&self) -> Result<Gate> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = tokio::fs::read(path)
                    .await
                    .map_err(|e| eyre::eyre!("read config {}: {}", path, e))?;
                serde_json::from_slice::<GateConfig>(&raw)
                    .map_err(|e| eyre::eyre!("bad config {}: {}", path, e))?
            }
            None => GateConfig::default(),
        };

        if let Some(n) = self.threshold {
            config.limit = Threshold::try_from(n)?.get();
        }
        if self.no_downsample {
            config.enabled = false;
        }

        let gate = Gate::from(config);
        debug!(%gate, "configured gate");
        Ok(gate)
    }

    fn format(&self) -> Result<Option<Format>> {
        match self.from.as_str() {
            "" | "auto" => Ok(None),
            other => Ok(Some(other.parse()?)),
        }
    }

    /// Reads every input in order into one series.
    pub async fn read(&self) -> Result<Vec<Point>> {
        let sources: Vec<String> = if self.files.is_empty() {
            vec!["stdin".to_string()]
        } else {
            self.files.clone()
        };
        let forced = self.format()?;

        let mut series = Vec::new();
        for source in &sources {
            let mut input = Input::from_filename(source).await?;
            let Some(detected) = input.detect_format().await? else {
                continue;
            };
            let format = forced.unwrap_or(detected);
            let points = read_series(&mut input, format)
                .await
                .map_err(|e| eyre::eyre!("{}: {}", source, e))?;
            debug!(source = %source, ?format, points = points.len(), "read series");
            series.extend(points);
        }

        if self.sort {
            sort_by_x(&mut series);
        }
        Ok(series)
    }
}
