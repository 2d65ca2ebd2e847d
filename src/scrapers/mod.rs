pub mod browser;
pub mod catalog;
pub mod extract;
pub mod normalize;
pub mod traits;

pub use browser::ChromeRenderer;
pub use catalog::HttpPageFetcher;
pub use traits::{PageFetcher, PageRenderer};
