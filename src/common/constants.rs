/// Issue categories the classifier may assign, in prompt order.
pub const ISSUE_TYPES: [&str; 7] = [
    "pothole",
    "accident",
    "detour",
    "closure",
    "construction",
    "traffic",
    "other",
];

/// Sentiment categories the classifier may assign, in prompt order.
pub const SENTIMENTS: [&str; 5] = ["angry", "frustrated", "neutral", "helpful", "other"];

/// Reserved category for a failed enrichment outcome.
pub const ERROR_SENTINEL: &str = "error";

/// Literal the extraction model answers when no location is mentioned.
pub const NULL_LITERAL: &str = "null";

// Default stage-boundary files, relative to the working directory.
pub const RAW_FILE: &str = "output/salt_lake_reports.csv";
pub const CLASSIFIED_FILE: &str = "output/salt_lake_reports_classified.csv";
pub const MAP_FILE: &str = "output/salt_lake_map.html";

/// Qualifier appended to every geocode query to pin results to the metro area.
pub const GEOCODE_QUALIFIER: &str = "Salt Lake City, Utah";

/// Map center for rendering, Salt Lake City.
pub const MAP_CENTER: (f64, f64) = (40.7608, -111.8910);

pub const DEFAULT_SUBREDDITS: [&str; 5] = ["SaltLakeCity", "Utah", "UtahDrivers", "utahcounty", "slc"];
