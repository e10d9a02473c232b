use std::io::{IsTerminal, Write};

use byframe::frame_len;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Debug, Serialize)]
struct FrameOutput {
    index: usize,
    payload_size: usize,
    wire_size: usize,
    payload: String,
}

pub fn print_frame(index: usize, payload: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                index,
                payload_size: payload.len(),
                wire_size: frame_len(payload.len()),
                payload: payload_preview(payload),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "SIZE", "WIRE", "PAYLOAD"])
                .add_row(vec![
                    index.to_string(),
                    payload.len().to_string(),
                    frame_len(payload.len()).to_string(),
                    payload_preview(payload),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "frame={} size={} wire={} payload={}",
                index,
                payload.len(),
                frame_len(payload.len()),
                payload_preview(payload)
            );
        }
        OutputFormat::Raw => {
            print_raw(payload);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HeaderOutput {
    pub data_len: usize,
    pub header_len: usize,
    pub hex: String,
}

pub fn print_header(out: &HeaderOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["LENGTH", "HEADER BYTES", "HEX"])
                .add_row(vec![
                    out.data_len.to_string(),
                    out.header_len.to_string(),
                    out.hex.clone(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "length={} header_len={} hex={}",
                out.data_len, out.header_len, out.hex
            );
        }
        OutputFormat::Raw => {
            println!("{}", out.hex);
        }
    }
}

#[derive(Debug, Serialize)]
struct SpanOutput {
    index: usize,
    size: usize,
    payload: String,
}

pub fn print_spans(spans: &[&[u8]], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<SpanOutput> = spans
                .iter()
                .enumerate()
                .map(|(index, span)| SpanOutput {
                    index,
                    size: span.len(),
                    payload: payload_preview(span),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SPAN", "SIZE", "PAYLOAD"]);
            for (index, span) in spans.iter().enumerate() {
                table.add_row(vec![
                    index.to_string(),
                    span.len().to_string(),
                    payload_preview(span),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (index, span) in spans.iter().enumerate() {
                println!(
                    "span={} size={} payload={}",
                    index,
                    span.len(),
                    payload_preview(span)
                );
            }
        }
        OutputFormat::Raw => {
            for span in spans {
                print_raw(span);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_text_and_binary() {
        assert_eq!(payload_preview(b"hello"), "hello");
        assert_eq!(payload_preview(&[0xFF, 0xFE]), "<binary 2 bytes>");
    }
}
