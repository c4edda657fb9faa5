//! Events published to observers of the downloader.

pub mod downloader;

pub use downloader::{DownloaderEvent, UiMessage};
