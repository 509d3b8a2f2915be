use crate::{
    constants::{
        CHAPTER_CACHE_SIZE, HTML_TEXT_WIDTH, MAX_BOOK_SIZE, MAX_CHAPTER_SIZE,
        MAX_DECOMPRESSED_RATIO, MIN_CONTENT_LENGTH,
    },
    error::ContentError,
};
use lru::LruCache;
use quick_xml::{Reader, events::Event};
use regex::Regex;
use std::{
    collections::HashMap,
    fs::File,
    io::Read,
    num::NonZeroUsize,
    path::Path,
    sync::Mutex,
};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// One addressable unit of the book. Immutable once the book is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub index: usize,
    pub title: String,
}

enum Source {
    Epub {
        archive: Mutex<ZipArchive<File>>,
        opf_path: String,
        hrefs: Vec<String>,
    },
    Html {
        bodies: Vec<String>,
    },
}

pub struct Book {
    pub title: String,
    pub author: String,
    chapters: Vec<Chapter>,
    source: Source,
    text_cache: Mutex<LruCache<usize, String>>,
}

impl std::fmt::Debug for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Book")
            .field("title", &self.title)
            .field("author", &self.author)
            .field("chapters", &self.chapters.len())
            .finish_non_exhaustive()
    }
}

impl Book {
    pub fn open(path: &Path) -> Result<Self, ContentError> {
        info!("Opening book: {:?}", path);

        let file_size = std::fs::metadata(path)?.len();
        if file_size > MAX_BOOK_SIZE {
            return Err(ContentError::FileTooLarge {
                size: file_size,
                max: MAX_BOOK_SIZE,
            });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let book = match extension.as_str() {
            "epub" => Self::open_epub(path)?,
            "html" | "htm" | "xhtml" => Self::open_html(path)?,
            _ => return Err(ContentError::UnsupportedFormat(extension)),
        };

        if book.chapters.is_empty() {
            return Err(ContentError::NoChapters);
        }

        info!("Loaded '{}' with {} chapters", book.title, book.chapters.len());
        Ok(book)
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter_text(&self, index: usize) -> Result<String, ContentError> {
        if index >= self.chapters.len() {
            return Err(ContentError::InvalidChapterIndex(index));
        }

        {
            let mut cache = self
                .text_cache
                .lock()
                .map_err(|_| ContentError::CacheLockError)?;
            if let Some(text) = cache.get(&index) {
                return Ok(text.clone());
            }
        }

        debug!("Rendering chapter {} text", index);
        let html = match &self.source {
            Source::Epub {
                archive,
                opf_path,
                hrefs,
            } => {
                let mut archive = archive.lock().map_err(|_| ContentError::CacheLockError)?;
                read_archive_file(&mut archive, &hrefs[index], opf_path)?
            }
            Source::Html { bodies } => bodies[index].clone(),
        };

        let text = html2text::from_read(html.as_bytes(), HTML_TEXT_WIDTH);
        if text.len() > MAX_CHAPTER_SIZE {
            warn!("Chapter {} exceeds size limit: {} bytes", index, text.len());
            return Err(ContentError::ChapterTooLarge {
                size: text.len(),
                max: MAX_CHAPTER_SIZE,
            });
        }

        self.text_cache
            .lock()
            .map_err(|_| ContentError::CacheLockError)?
            .put(index, text.clone());
        Ok(text)
    }

    fn new_cache() -> Mutex<LruCache<usize, String>> {
        let size = NonZeroUsize::new(CHAPTER_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Mutex::new(LruCache::new(size))
    }

    fn open_epub(path: &Path) -> Result<Self, ContentError> {
        let mut archive = ZipArchive::new(File::open(path)?)?;

        let opf_path = find_opf_path(&mut archive)?;
        let (metadata, spine) = parse_opf(&mut archive, &opf_path)?;

        let mut chapters = Vec::new();
        let mut hrefs = Vec::new();
        for href in spine {
            let content = match read_archive_file(&mut archive, &href, &opf_path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Could not load chapter {}: {}", href, e);
                    continue;
                }
            };
            validate_decompression_ratio(&mut archive, &href)?;

            let text = html2text::from_read(content.as_bytes(), HTML_TEXT_WIDTH);
            if text.trim().len() < MIN_CONTENT_LENGTH {
                debug!("Skipping spine item (too short): {}", href);
                continue;
            }

            let index = chapters.len();
            chapters.push(Chapter {
                index,
                title: chapter_title(&content, &text, index + 1),
            });
            hrefs.push(href);
        }

        Ok(Book {
            title: metadata
                .get("title")
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            author: metadata
                .get("creator")
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            chapters,
            source: Source::Epub {
                archive: Mutex::new(archive),
                opf_path,
                hrefs,
            },
            text_cache: Self::new_cache(),
        })
    }

    /// A single page whose chapters are elements carrying the `chapter`
    /// class, titled by their `data-title` attribute.
    fn open_html(path: &Path) -> Result<Self, ContentError> {
        let html = std::fs::read_to_string(path)?;

        let open_tag = Regex::new(r"(?is)<(?:section|div|article)\b([^>]*)>")?;
        let class_attr = Regex::new(r#"(?i)\bclass\s*=\s*["']([^"']*)["']"#)?;
        let title_attr = Regex::new(r#"(?i)\bdata-title\s*=\s*["']([^"']*)["']"#)?;

        let mut starts = Vec::new();
        for captures in open_tag.captures_iter(&html) {
            let (Some(tag), Some(attrs)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let is_chapter = class_attr
                .captures(attrs.as_str())
                .and_then(|c| c.get(1))
                .is_some_and(|classes| classes.as_str().split_whitespace().any(|c| c == "chapter"));
            if is_chapter {
                let title = title_attr
                    .captures(attrs.as_str())
                    .and_then(|c| c.get(1))
                    .map(|t| decode_inline(t.as_str()));
                starts.push((tag.start(), tag.end(), title));
            }
        }

        let document_end = html
            .to_ascii_lowercase()
            .rfind("</body>")
            .unwrap_or(html.len());

        let mut chapters = Vec::new();
        let mut bodies = Vec::new();
        for (position, (_, body_start, title)) in starts.iter().enumerate() {
            let body_end = starts
                .get(position + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(document_end)
                .max(*body_start);
            let body = html[*body_start..body_end].to_string();

            let title = match title {
                Some(title) if !title.is_empty() => title.clone(),
                _ => {
                    let text = html2text::from_read(body.as_bytes(), HTML_TEXT_WIDTH);
                    chapter_title(&body, &text, position + 1)
                }
            };

            chapters.push(Chapter {
                index: position,
                title,
            });
            bodies.push(body);
        }

        let page_title = Regex::new(r"(?is)<title[^>]*>([^<]+)</title>")?
            .captures(&html)
            .and_then(|c| c.get(1))
            .map(|t| decode_inline(t.as_str()))
            .filter(|t| !t.is_empty());
        let author = Regex::new(r#"(?i)<meta\s+name\s*=\s*["']author["']\s+content\s*=\s*["']([^"']*)["']"#)?
            .captures(&html)
            .and_then(|c| c.get(1))
            .map(|a| decode_inline(a.as_str()))
            .filter(|a| !a.is_empty());

        Ok(Book {
            title: page_title.unwrap_or_else(|| "Unknown".to_string()),
            author: author.unwrap_or_else(|| "Unknown".to_string()),
            chapters,
            source: Source::Html { bodies },
            text_cache: Self::new_cache(),
        })
    }
}

fn decode_inline(raw: &str) -> String {
    html2text::from_read(raw.trim().as_bytes(), 200)
        .trim()
        .to_string()
}

fn find_opf_path(archive: &mut ZipArchive<File>) -> Result<String, ContentError> {
    let mut container_file = match archive.by_name("META-INF/container.xml") {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Err(ContentError::ContainerNotFound),
        Err(e) => return Err(ContentError::Zip(e)),
    };

    let mut container_content = String::new();
    container_file.read_to_string(&mut container_content)?;

    let mut reader = Reader::from_str(&container_content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"rootfile" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.as_ref() == b"full-path" {
                        return Ok(String::from_utf8(attr.value.to_vec())?);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Err(ContentError::OpfNotFound)
}

/// Reads the OPF package: `dc:title`/`dc:creator` metadata and the spine as
/// manifest hrefs in reading order.
fn parse_opf(
    archive: &mut ZipArchive<File>,
    opf_path: &str,
) -> Result<(HashMap<String, String>, Vec<String>), ContentError> {
    let mut opf_file = match archive.by_name(opf_path) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Err(ContentError::OpfNotFound),
        Err(e) => return Err(ContentError::Zip(e)),
    };
    let mut opf_content = String::new();
    opf_file.read_to_string(&mut opf_content)?;

    let mut reader = Reader::from_str(&opf_content);
    reader.config_mut().trim_text(true);

    let mut metadata = HashMap::new();
    let mut manifest = HashMap::new();
    let mut spine = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                let metadata_key = match e.name().as_ref() {
                    b"item" => {
                        let mut id = String::new();
                        let mut href = String::new();
                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"id" => id = String::from_utf8(attr.value.to_vec())?,
                                b"href" => href = String::from_utf8(attr.value.to_vec())?,
                                _ => {}
                            }
                        }
                        if !id.is_empty() && !href.is_empty() {
                            manifest.insert(id, href);
                        }
                        None
                    }
                    b"itemref" => {
                        for attr in e.attributes() {
                            let attr = attr?;
                            if attr.key.as_ref() == b"idref" {
                                let idref = String::from_utf8(attr.value.to_vec())?;
                                if let Some(href) = manifest.get(&idref) {
                                    spine.push(href.clone());
                                }
                            }
                        }
                        None
                    }
                    b"dc:title" => Some("title"),
                    b"dc:creator" => Some("creator"),
                    _ => None,
                };
                // The start tag borrows `buf`; release it before reading on.
                drop(e);

                if let Some(key) = metadata_key {
                    if let Ok(Event::Text(text)) = reader.read_event_into(&mut buf) {
                        metadata.insert(key.to_string(), text.unescape()?.to_string());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if spine.is_empty() {
        return Err(ContentError::InvalidOpfStructure);
    }

    Ok((metadata, spine))
}

fn validate_decompression_ratio(
    archive: &mut ZipArchive<File>,
    filename: &str,
) -> Result<(), ContentError> {
    if let Ok(file) = archive.by_name(filename) {
        let compressed = file.compressed_size();
        let decompressed = file.size();

        if compressed > 0 {
            let ratio = (decompressed / compressed) as usize;
            if ratio > MAX_DECOMPRESSED_RATIO {
                return Err(ContentError::DecompressionBomb {
                    compressed,
                    decompressed,
                    ratio,
                });
            }
        }
    }
    Ok(())
}

/// Resolves `href` against the OPF directory, then as given, then under the
/// usual content folders of books that ignore the OPF location.
fn read_archive_file(
    archive: &mut ZipArchive<File>,
    href: &str,
    opf_path: &str,
) -> Result<String, ContentError> {
    let opf_dir = Path::new(opf_path).parent().unwrap_or(Path::new(""));
    let resolved = opf_dir.join(href).to_string_lossy().to_string();

    let candidates = [
        resolved,
        href.to_string(),
        format!("OEBPS/{}", href),
        format!("OPS/{}", href),
        format!("EPUB/{}", href),
    ];

    for candidate in &candidates {
        if let Ok(mut file) = archive.by_name(candidate) {
            let mut content = String::new();
            file.read_to_string(&mut content)?;
            return Ok(content);
        }
    }

    Err(ContentError::ChapterNotFound(href.to_string()))
}

fn chapter_title(html: &str, text: &str, fallback_number: usize) -> String {
    let heading_patterns = [
        r"<title[^>]*>([^<]+)</title>",
        r"<h1[^>]*>([^<]+)</h1>",
        r"<h2[^>]*>([^<]+)</h2>",
    ];

    for pattern in &heading_patterns {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        if let Some(title) = re.captures(html).and_then(|c| c.get(1)) {
            let title = title.as_str().trim();
            if !title.is_empty() && title.len() < 100 {
                return decode_inline(title);
            }
        }
    }

    if let Some(first_line) = text.lines().next().map(str::trim) {
        if first_line.len() > 3
            && first_line.len() < 100
            && !first_line.ends_with('.')
            && first_line.chars().any(|c| c.is_alphabetic())
        {
            return first_line.to_string();
        }
    }

    format!("Chapter {}", fallback_number)
}
