//! # phash CLI
//!
//! Command-line interface for the perceptual hasher.
//!
//! ## Usage
//! ```bash
//! phash hash ~/Photos/cat.jpg ~/Photos/dogs
//! phash hash ~/Photos --output json
//! phash distance cat.jpg cat-small.jpg
//! ```

mod cli;

use dct_phash::Result;

fn main() -> Result<()> {
    dct_phash::init_tracing();
    cli::run()
}
