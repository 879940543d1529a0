use flate2::read::GzDecoder;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, LineWriter, stdin};
use std::path::Path;

#[path = "utils_test.rs"]
mod utils_test;

/// Open a file for buffered reading; `-` reads stdin.
pub fn xopen<'a>(path: &'a Path) -> Result<Box<dyn BufRead + 'a>, io::Error> {
    if path.to_str() == Some("-") {
        return Ok(Box::new(BufReader::new(stdin())));
    }

    let file = OpenOptions::new().read(true).open(path)?;
    Ok(Box::new(BufReader::new(file)))
}

/// Like `xopen`, transparently decompressing `.gz` files.
pub fn xzopen<'a>(path: &'a Path) -> Result<Box<dyn BufRead + 'a>, io::Error> {
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        xopen(path)
    }
}

/// Create (truncate) an output file whose lines reach the OS as soon as
/// they are complete.
pub fn create_line_sink(path: &Path) -> Result<LineWriter<File>, io::Error> {
    Ok(LineWriter::new(File::create(path)?))
}
