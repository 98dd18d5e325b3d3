use recognizer::{downsample, CanvasSurface, DrawingSurface, DIGIT_SIZE};
use std::error::Error;
use std::path::Path;
use tracing::debug;

/// Decode an image file into a surface the preprocessor accepts
pub fn load_surface(path: &Path, invert: bool) -> Result<CanvasSurface, Box<dyn Error>> {
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    debug!("Loaded {} ({}x{})", path.display(), width, height);

    let mut data = image.into_raw();
    if invert {
        invert_rgb(&mut data);
    }
    Ok(CanvasSurface::from_rgba(width, height, data)?)
}

pub fn print_preprocessed(path: &Path, invert: bool, json: bool) -> Result<(), Box<dyn Error>> {
    let surface = load_surface(path, invert)?;

    if json {
        let tensor = surface.to_input_tensor()?;
        println!("{}", serde_json::to_string(&tensor)?);
    } else {
        let gray = downsample(surface.rgba(), surface.width(), surface.height())?;
        print!("{}", render_ascii(&gray));
    }

    Ok(())
}

/// 28x28 intensities (0..=255) as block characters, one row per line
pub fn render_ascii(gray: &[f32]) -> String {
    const CHARS: [char; 5] = [' ', '░', '▒', '▓', '█'];

    let mut result = String::with_capacity(DIGIT_SIZE * (DIGIT_SIZE + 1) * 3);
    for row in gray.chunks(DIGIT_SIZE) {
        for &g in row {
            let char_idx = (g.clamp(0.0, 255.0) as usize * (CHARS.len() - 1)) / 255;
            result.push(CHARS[char_idx]);
        }
        result.push('\n');
    }
    result
}

/// Flip dark-on-light scans to the light-on-dark the model expects
fn invert_rgb(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}
