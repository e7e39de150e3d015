use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};

use crate::{Error, Point, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
}

impl Format {
    /// Guesses the encoding from the first non-blank byte of the input.
    pub fn detect(first: u8) -> Self {
        match first {
            b'[' | b'{' => Format::Json,
            _ => Format::Csv,
        }
    }

    pub fn codec(self) -> &'static (dyn Codec + Send + Sync) {
        match self {
            Format::Json => &JsonCodec,
            Format::Csv => &CsvCodec,
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// Where a decoder is in its input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    // 1-based number of the last line read.
    pub line: usize,
    // Non-blank lines read so far, headers included.
    pub rows: usize,
}

// A Codec reads and writes points, one line at a time.
#[async_trait]
pub trait Codec {
    async fn encode(&self, writer: &mut (dyn AsyncWrite + Unpin + Send), point: &Point) -> Result<()>;

    // Decode_line parses the points on a single line, without its terminator.
    fn decode_line(&self, line: &str) -> std::result::Result<Vec<Point>, String>;

    // Is_header reports whether a leading line names columns instead of
    // holding data.
    fn is_header(&self, _line: &str) -> bool {
        false
    }

    // Decode returns the points on the next data line, or None once the
    // input is exhausted. Blank lines and a leading header are skipped.
    async fn decode(
        &self,
        reader: &mut (dyn AsyncBufRead + Unpin + Send),
        cursor: &mut Cursor,
    ) -> Result<Option<Vec<Point>>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if reader.read_line(&mut buf).await? == 0 {
                return Ok(None);
            }
            cursor.line += 1;
            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            cursor.rows += 1;
            if cursor.rows == 1 && self.is_header(trimmed) {
                continue;
            }
            return self
                .decode_line(trimmed)
                .map(Some)
                .map_err(|reason| Error::Decode {
                    line: cursor.line,
                    reason,
                });
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPoint {
    Pair(f64, f64),
    Object { x: f64, y: f64 },
}

impl From<JsonPoint> for Point {
    fn from(p: JsonPoint) -> Self {
        match p {
            JsonPoint::Pair(x, y) | JsonPoint::Object { x, y } => Point::new(x, y),
        }
    }
}

pub struct JsonCodec;

#[async_trait]
impl Codec for JsonCodec {
    async fn encode(&self, writer: &mut (dyn AsyncWrite + Unpin + Send), point: &Point) -> Result<()> {
        writer.write_all(&serde_json::to_vec(point)?).await?;
        writer.write_all(b"\n").await?;
        Ok(())
    }

    // A line is either one point or a whole [[x, y], ...] array.
    fn decode_line(&self, line: &str) -> std::result::Result<Vec<Point>, String> {
        if line.starts_with("[[") || line.starts_with("[{") || line == "[]" {
            return serde_json::from_str::<Vec<JsonPoint>>(line)
                .map(|points| points.into_iter().map(Point::from).collect())
                .map_err(|e| format!("bad point array: {}", e));
        }
        serde_json::from_str::<JsonPoint>(line)
            .map(|p| vec![Point::from(p)])
            .map_err(|_| format!("expected [x, y] or {{\"x\": .., \"y\": ..}}, got {:?}", line))
    }
}

pub struct CsvCodec;

impl CsvCodec {
    fn record(line: &str) -> std::result::Result<csv::StringRecord, String> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(line.as_bytes());
        match rdr.records().next() {
            Some(Ok(record)) => Ok(record),
            Some(Err(e)) => Err(e.to_string()),
            None => Err("no CSV record".to_string()),
        }
    }
}

#[async_trait]
impl Codec for CsvCodec {
    async fn encode(&self, writer: &mut (dyn AsyncWrite + Unpin + Send), point: &Point) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::with_capacity(48));
        wtr.serialize((point.x, point.y))?;
        let buf = wtr
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        writer.write_all(&buf).await?;
        Ok(())
    }

    fn decode_line(&self, line: &str) -> std::result::Result<Vec<Point>, String> {
        let record = CsvCodec::record(line)?;
        record
            .deserialize::<(f64, f64)>(None)
            .map(|pair| vec![Point::from(pair)])
            .map_err(|e| e.to_string())
    }

    // Only a line without a single numeric field counts as a header.
    fn is_header(&self, line: &str) -> bool {
        match CsvCodec::record(line) {
            Ok(record) => record.iter().all(|field| field.parse::<f64>().is_err()),
            Err(_) => false,
        }
    }
}

/// Reads a whole series.
pub async fn read_series<R>(reader: &mut R, format: Format) -> Result<Vec<Point>>
where
    R: AsyncBufRead + Unpin + Send,
{
    let codec = format.codec();
    let mut series = Vec::new();
    let mut cursor = Cursor::default();

    while let Some(points) = codec.decode(&mut *reader, &mut cursor).await? {
        series.extend(points);
    }

    Ok(series)
}

pub async fn write_series<W>(writer: &mut W, format: Format, series: &[Point]) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let codec = format.codec();
    for point in series {
        codec.encode(&mut *writer, point).await?;
    }
    writer.flush().await?;
    Ok(())
}
