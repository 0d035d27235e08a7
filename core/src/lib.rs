pub mod config;
pub mod log_file_iter;
pub mod log_line;
pub mod page_views;
pub mod recovery;
pub mod utils;

pub use log_line::PageView;
pub use page_views::{LineOutcome, PageViewTable, aggregate_file};
pub use recovery::{
    HttpPageClient, PageClient, PageReply, RecCount, RecoveryInput, RecoverySummary, Recoverer,
    rec_url,
};
