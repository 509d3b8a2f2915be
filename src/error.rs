use std::fmt;

/// Which field of a comment submission was left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Text,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Text => write!(f, "text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(Field),
    InvalidRating(u8),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "Please enter a {}", field),
            ValidationError::InvalidRating(rating) => {
                write!(f, "Please select a rating between 1 and 5 (got {})", rating)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    QuotaExceeded { key: String, needed: usize, quota: usize },
    Malformed { key: String, value: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "Storage unavailable: {}", err),
            StoreError::Json(err) => write!(f, "Storage encoding error: {}", err),
            StoreError::QuotaExceeded { key, needed, quota } => write!(
                f,
                "Storage quota exceeded writing '{}': {} bytes (quota: {} bytes)",
                key, needed, quota
            ),
            StoreError::Malformed { key, value } => {
                write!(f, "Malformed persisted value for '{}': {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Json(err)
    }
}

#[derive(Debug)]
pub enum ContentError {
    Io(std::io::Error),
    Zip(zip::result::ZipError),
    Xml(quick_xml::Error),
    Utf8(std::str::Utf8Error),
    Pattern(regex::Error),
    UnsupportedFormat(String),
    ContainerNotFound,
    OpfNotFound,
    InvalidOpfStructure,
    ChapterNotFound(String),
    NoChapters,
    FileTooLarge { size: u64, max: u64 },
    ChapterTooLarge { size: usize, max: usize },
    DecompressionBomb { compressed: u64, decompressed: u64, ratio: usize },
    InvalidChapterIndex(usize),
    CacheLockError,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Io(err) => write!(f, "IO error: {}", err),
            ContentError::Zip(err) => write!(f, "ZIP error: {}", err),
            ContentError::Xml(err) => write!(f, "XML parsing error: {}", err),
            ContentError::Utf8(err) => write!(f, "UTF-8 encoding error: {}", err),
            ContentError::Pattern(err) => write!(f, "Content pattern error: {}", err),
            ContentError::UnsupportedFormat(ext) => {
                write!(f, "Unsupported book format: '{}' (expected .epub or .html)", ext)
            }
            ContentError::ContainerNotFound => write!(f, "container.xml not found in EPUB"),
            ContentError::OpfNotFound => write!(f, "OPF file not found"),
            ContentError::InvalidOpfStructure => write!(f, "Invalid OPF file structure"),
            ContentError::ChapterNotFound(path) => write!(f, "Chapter file not found: {}", path),
            ContentError::NoChapters => write!(f, "Book contains no readable chapters"),
            ContentError::FileTooLarge { size, max } => {
                write!(f, "Book file too large: {} bytes (max: {} bytes)", size, max)
            }
            ContentError::ChapterTooLarge { size, max } => {
                write!(f, "Chapter too large: {} bytes (max: {} bytes)", size, max)
            }
            ContentError::DecompressionBomb { compressed, decompressed, ratio } => {
                write!(
                    f,
                    "Potential decompression bomb detected: {}x ratio (compressed: {}, decompressed: {})",
                    ratio, compressed, decompressed
                )
            }
            ContentError::InvalidChapterIndex(idx) => {
                write!(f, "Invalid chapter index: {}", idx)
            }
            ContentError::CacheLockError => {
                write!(f, "Failed to acquire cache lock")
            }
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Io(err) => Some(err),
            ContentError::Zip(err) => Some(err),
            ContentError::Xml(err) => Some(err),
            ContentError::Utf8(err) => Some(err),
            ContentError::Pattern(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ContentError {
    fn from(err: std::io::Error) -> Self {
        ContentError::Io(err)
    }
}

impl From<zip::result::ZipError> for ContentError {
    fn from(err: zip::result::ZipError) -> Self {
        ContentError::Zip(err)
    }
}

impl From<quick_xml::Error> for ContentError {
    fn from(err: quick_xml::Error) -> Self {
        ContentError::Xml(err)
    }
}

impl From<regex::Error> for ContentError {
    fn from(err: regex::Error) -> Self {
        ContentError::Pattern(err)
    }
}

impl From<std::string::FromUtf8Error> for ContentError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ContentError::Utf8(err.utf8_error())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ContentError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ContentError::Xml(quick_xml::Error::InvalidAttr(err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    NoChapters,
    ChapterOutOfRange { index: usize, count: usize },
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::NoChapters => write!(f, "A reading session needs at least one chapter"),
            ReaderError::ChapterOutOfRange { index, count } => {
                write!(f, "Chapter {} out of range (book has {} chapters)", index, count)
            }
        }
    }
}

impl std::error::Error for ReaderError {}

#[derive(Debug)]
pub enum UiError {
    Terminal(Box<dyn std::error::Error + Send + Sync>),
    Content(ContentError),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::Terminal(err) => write!(f, "Terminal error: {}", err),
            UiError::Content(err) => write!(f, "Content error: {}", err),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::Terminal(err) => Some(err.as_ref()),
            UiError::Content(err) => Some(err),
        }
    }
}

impl From<ContentError> for UiError {
    fn from(err: ContentError) -> Self {
        UiError::Content(err)
    }
}

impl From<std::io::Error> for UiError {
    fn from(err: std::io::Error) -> Self {
        UiError::Terminal(Box::new(err))
    }
}
