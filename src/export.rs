//! CSV and JSON dumps of the channel map.

use serde::Serialize;
use std::io::Write;

use crate::assembly::{ChannelInfo, PmtMap};
use crate::error::LayoutResult;
use crate::geometry::GeometryConfig;

pub const CSV_HEADER: &str = "channel,array,generation,group,within,x_cm,y_cm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: &[ExportFormat] = &[ExportFormat::Csv, ExportFormat::Json];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// JSON document: the geometry used plus every channel.
#[derive(Debug, Serialize)]
pub struct LayoutExport<'a> {
    pub config: &'a GeometryConfig,
    pub channels: &'a [ChannelInfo],
}

pub fn csv_row(info: &ChannelInfo) -> String {
    format!(
        "{},{},{},{},{},{:.6},{:.6}",
        info.channel,
        info.array.name(),
        info.generation,
        info.group,
        info.within,
        info.position.x,
        info.position.y,
    )
}

pub fn write_csv<W: Write>(map: &PmtMap, mut out: W) -> LayoutResult<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for info in map.channels() {
        writeln!(out, "{}", csv_row(info))?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(map: &PmtMap, mut out: W) -> LayoutResult<()> {
    let doc = LayoutExport {
        config: map.config(),
        channels: map.channels(),
    };
    serde_json::to_writer_pretty(&mut out, &doc)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn write<W: Write>(map: &PmtMap, format: ExportFormat, out: W) -> LayoutResult<()> {
    match format {
        ExportFormat::Csv => write_csv(map, out),
        ExportFormat::Json => write_json(map, out),
    }
}
