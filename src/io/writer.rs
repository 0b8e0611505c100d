//! Output writer (C14): serializes committed rows as tab-separated integers,
//! to a file when one is given or to stdout otherwise.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::error::Result;
use crate::model::Row;

pub fn write_rows(output_file: Option<&str>, rows: &[Row]) -> Result<()> {
    match output_file {
        Some(path) => {
            let file = File::create(path)?;
            write_to(BufWriter::new(file), rows)
        }
        None => write_to(BufWriter::new(io::stdout()), rows),
    }
}

fn write_to<W: Write>(mut out: W, rows: &[Row]) -> Result<()> {
    for row in rows {
        let line = row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("\t");
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_tab_separated_rows() {
        let mut buf = Vec::new();
        write_to(&mut buf, &[vec![0, 1, 2], vec![1, 0, 2]]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0\t1\t2\n1\t0\t2\n");
    }

    #[test]
    fn writes_to_a_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_rows(Some(path.to_str().unwrap()), &[vec![0, 0]]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "0\t0\n");
    }
}
