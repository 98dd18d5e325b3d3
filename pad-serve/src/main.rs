//! Static HTTP server for the digit pad
//!
//! Serves the page and its wasm bundle from a directory, and the model asset
//! from wherever it lives on disk, with MIME types browsers accept for wasm.

use clap::Parser;
use mime_guess::MimeGuess;
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tiny_http::{Header, Response, Server, StatusCode};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pad-serve")]
#[command(about = "Serve the digit pad page, its wasm bundle and the model")]
struct Args {
    /// Directory holding index.html and pkg/
    #[arg(default_value = "digit-pad/www")]
    directory: PathBuf,

    /// Model file, served at /<file name> even when outside the directory
    #[arg(short, long, env = "PAD_SERVE_MODEL")]
    model: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PAD_SERVE_PORT", default_value_t = 8080)]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "PAD_SERVE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Send COOP/COEP headers so the page can use SharedArrayBuffer
    /// (multi-threaded wasm). Blocks scripts from CDNs without CORP headers.
    #[arg(long)]
    isolate: bool,
}

/// Outcome of mapping a request path onto the filesystem
#[derive(Debug, PartialEq)]
enum Route {
    File(PathBuf),
    NotFound,
    Forbidden,
}

struct Site {
    root: PathBuf,
    model: Option<(String, PathBuf)>,
}

impl Site {
    fn new(root: &Path, model: Option<&Path>) -> io::Result<Self> {
        let root = root.canonicalize()?;
        let model = match model {
            Some(path) => {
                let file = path.canonicalize()?;
                let name = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "model has no file name"))?;
                Some((format!("/{}", name), file))
            }
            None => None,
        };
        Ok(Self { root, model })
    }

    fn resolve(&self, url: &str) -> Route {
        let url_path = url.split('?').next().unwrap_or(url);
        let decoded_path = urlencoded_decode(url_path);

        if let Some((route, file)) = &self.model {
            if decoded_path == *route {
                return Route::File(file.clone());
            }
        }

        let relative_path = decoded_path.trim_start_matches('/');
        let file_path = if relative_path.is_empty() {
            self.root.join("index.html")
        } else {
            self.root.join(relative_path)
        };

        // Resolve symlinks and `..` before the containment check
        let canonical = match file_path.canonicalize() {
            Ok(p) => p,
            Err(_) => return Route::NotFound,
        };
        if !canonical.starts_with(&self.root) {
            return Route::Forbidden;
        }

        if canonical.is_dir() {
            Route::File(canonical.join("index.html"))
        } else {
            Route::File(canonical)
        }
    }
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    init_logging();
    let args = Args::parse();

    let site = Site::new(&args.directory, args.model.as_deref()).map_err(|e| {
        error!("Cannot serve '{}': {}", args.directory.display(), e);
        e
    })?;
    if site.model.is_none() {
        warn!("No --model given; the page will fail to load mnist_model.onnx unless it is in the directory");
    }

    let addr = format!("{}:{}", args.host, args.port);
    let server = Server::http(&addr)?;

    info!("Serving '{}' at http://{}", site.root.display(), addr);
    if let Some((route, file)) = &site.model {
        info!("Model {} -> {}", route, file.display());
    }

    for request in server.incoming_requests() {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let (status, response) = match site.resolve(&url) {
            Route::File(path) => match serve_file(&path, args.isolate) {
                Ok(response) => (200, response),
                Err(_) => (404, not_found()),
            },
            Route::NotFound => (404, not_found()),
            Route::Forbidden => (403, forbidden()),
        };

        info!("{} {} -> {}", method, url, status);
        if let Err(e) = request.respond(response) {
            warn!("Failed to respond to {} {}: {}", method, url, e);
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn serve_file(path: &Path, isolate: bool) -> io::Result<Response<io::Cursor<Vec<u8>>>> {
    let contents = fs::read(path)?;

    let mut response = Response::from_data(contents)
        .with_header(header("Content-Type", get_mime_type(path))?)
        .with_header(header("Access-Control-Allow-Origin", "*")?);

    if isolate {
        response = response
            .with_header(header("Cross-Origin-Opener-Policy", "same-origin")?)
            .with_header(header("Cross-Origin-Embedder-Policy", "require-corp")?);
    }

    Ok(response)
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name, value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid header {}: {}", name, value),
        )
    })
}

fn get_mime_type(path: &Path) -> &'static str {
    // Types mime_guess gets wrong or does not know
    if let Some(ext) = path.extension() {
        match ext.to_str() {
            Some("wasm") => return "application/wasm",
            Some("js") | Some("mjs") => return "application/javascript",
            Some("onnx") => return "application/octet-stream",
            _ => {}
        }
    }

    MimeGuess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

fn not_found() -> Response<io::Cursor<Vec<u8>>> {
    Response::from_string("404 Not Found").with_status_code(StatusCode(404))
}

fn forbidden() -> Response<io::Cursor<Vec<u8>>> {
    Response::from_string("403 Forbidden").with_status_code(StatusCode(403))
}

/// Percent-decode a URL path; `+` is taken as a space
fn urlencoded_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
