pub mod config;
pub mod cookies;
pub mod date;
pub mod dropbox;
pub mod error;
pub mod extractor;
pub mod hls;
pub mod http;
pub mod logging;
pub mod model;
pub mod url_model;

pub use error::ExtractError;
pub use extractor::{find_extractor, ExtractContext, ExtractRequest, Extractor};
pub use model::{Format, MediaInfo, SubtitleTrack, Thumbnail};
