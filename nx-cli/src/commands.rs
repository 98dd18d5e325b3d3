use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nx")]
#[command(about = "Neural network tools for digit recognition")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show an image the way the model sees it, after the 28x28 preprocessing
    Preprocess {
        /// PNG, JPEG or BMP image of a single digit
        image: PathBuf,

        /// Treat the image as dark ink on a light background
        #[arg(long)]
        invert: bool,

        /// Print the normalized input tensor as JSON instead of ASCII art
        #[arg(long)]
        json: bool,
    },
    /// Classify a digit image with an ONNX model
    Predict {
        /// PNG, JPEG or BMP image of a single digit
        image: PathBuf,

        /// ONNX model taking a [1, 1, 28, 28] float input
        #[arg(short, long, default_value = "mnist_model.onnx")]
        model: PathBuf,

        /// Treat the image as dark ink on a light background
        #[arg(long)]
        invert: bool,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,
    },
}
