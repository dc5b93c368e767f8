//! Dump - print every document of a BSON stream as one JSON line.
//!
//! This example demonstrates:
//! - Wiring a file (or stdin) into a `DocumentReader`
//! - Loading framer options from a JSON string
//! - Skipping over non-fatal framing errors
//!
//! # Running
//!
//! ```sh
//! cargo run --example dump -- dump.bson
//! cat dump.bson | cargo run --example dump -- - '{"max_record_length": 1048576}'
//! ```

use bson::Bson;
use bson_framer::{DocumentReader, FramerConfig, Record};
use tokio::io::AsyncRead;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "-".to_string());
    let config = match args.next() {
        Some(json) => FramerConfig::from_json_str(&json)?,
        None => FramerConfig::default(),
    };

    let source: Box<dyn AsyncRead + Unpin> = if path == "-" {
        Box::new(tokio::io::stdin())
    } else {
        Box::new(tokio::fs::File::open(&path).await?)
    };

    let mut reader = DocumentReader::documents(source, config)?;
    let mut count = 0usize;

    while let Some(result) = reader.next_record().await {
        match result {
            Ok(Record::Decoded(document)) => {
                count += 1;
                println!("{}", Bson::Document(document).into_relaxed_extjson());
            }
            Ok(Record::Raw(bytes)) => {
                count += 1;
                println!("{{\"raw_length\": {}}}", bytes.len());
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => eprintln!("skipping corrupt data: {}", e),
        }
    }

    eprintln!("{} documents", count);
    Ok(())
}
