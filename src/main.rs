use clap::Parser;
use novella::{
    App, Book, FileStore, Store,
    constants::{DATA_DIR_NAME, LOG_FILE_NAME, STORE_FILE_EXTENSION},
};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{Level, info};

#[derive(Parser)]
#[command(name = "novella")]
#[command(about = "A chapter-based terminal reader with comments and star reviews")]
struct Cli {
    /// Book to open (.epub or an .html page with `chapter` sections)
    book: PathBuf,

    /// Where reading state, comments and reviews are kept
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Open at this chapter (1-based) instead of the last one read
    #[arg(long)]
    chapter: Option<usize>,

    /// Log debug output to the log file
    #[arg(short, long)]
    verbose: bool,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

fn store_path(data_dir: &Path, book: &Path) -> PathBuf {
    let stem = book
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "book".to_string());
    data_dir.join(format!("{}.{}", stem, STORE_FILE_EXTENSION))
}

fn init_logging(data_dir: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE_NAME))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    fs::create_dir_all(&data_dir)?;
    init_logging(&data_dir, cli.verbose)?;

    let book = Book::open(&cli.book).map_err(|e| format!("Failed to open book: {}", e))?;
    let store_path = store_path(&data_dir, &cli.book);
    info!("Using store {:?}", store_path);

    let store = Store::new(FileStore::open(&store_path));
    if let Some(chapter) = cli.chapter {
        store.set_display(
            novella::constants::CHAPTER_KEY,
            &chapter.saturating_sub(1).min(book.chapter_count() - 1),
        );
    }

    let mut app = App::new(book, store)?;

    app.run()
        .map_err(|e| -> Box<dyn std::error::Error> { Box::new(e) })?;

    Ok(())
}
