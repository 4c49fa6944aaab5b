use std::{
    fmt,
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

const STDIO_ARG: &str = "-";

/// Where a subtitle document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Stdin,
    File(PathBuf),
}

/// Where a subtitle document is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSink {
    Stdout,
    File(PathBuf),
}

fn is_stdio(p: &Path) -> bool {
    p.as_os_str() == STDIO_ARG
}

impl DocumentSource {
    /// `None` or `-` mean stdin.
    pub fn from_arg(path: Option<&Path>) -> DocumentSource {
        match path {
            Some(p) if !is_stdio(p) => DocumentSource::File(p.to_path_buf()),
            _ => DocumentSource::Stdin,
        }
    }

    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        let mut v = Vec::new();
        match self {
            DocumentSource::Stdin => {
                io::stdin().lock().read_to_end(&mut v)?;
            }
            DocumentSource::File(p) => {
                let mut f = std::fs::File::open(p)?;
                f.read_to_end(&mut v)?;
            }
        }
        Ok(v)
    }

    /// Read the whole document as text.
    pub fn read_to_string(&self) -> io::Result<String> {
        let bytes = self.read_bytes()?;
        Ok(decode_document(bytes, self))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Stdin => f.write_str("<stdin>"),
            DocumentSource::File(p) => write!(f, "{:?}", p),
        }
    }
}

impl DocumentSink {
    /// `None` or `-` mean stdout.
    pub fn from_arg(path: Option<&Path>) -> DocumentSink {
        match path {
            Some(p) if !is_stdio(p) => DocumentSink::File(p.to_path_buf()),
            _ => DocumentSink::Stdout,
        }
    }

    pub fn open(&self) -> io::Result<Box<dyn Write>> {
        Ok(match self {
            DocumentSink::Stdout => Box::new(BufWriter::new(io::stdout().lock())),
            DocumentSink::File(p) => Box::new(BufWriter::new(std::fs::File::create(p)?)),
        })
    }
}

impl fmt::Display for DocumentSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSink::Stdout => f.write_str("<stdout>"),
            DocumentSink::File(p) => write!(f, "{:?}", p),
        }
    }
}

/// Decode as UTF-8, falling back to Windows-1252.
pub fn decode_document(bytes: Vec<u8>, source: &DocumentSource) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let v = e.into_bytes();
            // SRT files are WINDOWS_1252 by default, but there is no requirement, so who knows
            let (text, encoding, replacements) = encoding_rs::WINDOWS_1252.decode(v.as_slice());
            if replacements {
                log::warn!(
                    "could not decode {} accurately with {}",
                    source,
                    encoding.name()
                );
            }
            text.to_string()
        }
    }
}
