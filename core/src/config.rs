/// default json file holding the `page_id -> count` pairs to replay
pub const DEFAULT_REC_INPUT: &str = "rec.json";

/// default log dump scanned for `page=`/`views=` pairs
pub const DEFAULT_LOG_INPUT: &str = "filtered.dump";

/// host of the badge service exposing the recovery endpoint
pub const DEFAULT_BASE_URL: &str = "https://vbr.wocr.tk";

/// path of the recovery endpoint on the badge service
pub const REC_PATH: &str = "/rec";

pub const PAGE_PREFIX: &str = "page=";
pub const VIEWS_PREFIX: &str = "views=";

/// indentation used for the aggregated json dump
pub const JSON_INDENT: &[u8] = b"    ";
