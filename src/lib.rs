//! Client for the [Tinify](https://tinypng.com/developers) image compression API.
//!
//! Upload an image, optionally attach a resize, and download the compressed
//! result.
//!
//! ```no_run
//! use tinify::{Client, ClientOptions, ResizeMethod, ResizeOption};
//!
//! # async fn example() -> tinify::Result<()> {
//! let client = Client::new("YOUR_API_KEY", ClientOptions::default())?;
//!
//! let mut source = client.from_file("sunflower.jpg").await?;
//! client.resize(
//!     Some(&mut source),
//!     Some(ResizeOption::new(ResizeMethod::Fit, 128, 128)),
//! )?;
//! client.to_file(&source, "sunflower-small.jpg").await?;
//!
//! println!("Compressions this month: {}", client.compression_count());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod http;
mod meta;
mod options;
mod output;
mod source;

pub use client::Client;
pub use error::{Error, ErrorData, Result};
pub use meta::Meta;
pub use options::{API_URL, ClientOptions, VERSION};
pub use output::Output;
pub use source::{Commands, ResizeMethod, ResizeOption, Source};
