pub const APP_NAME: &str = "slicedep";

/// Environment variable naming the directory that holds the generator executables.
pub const TOOLS_PATH_ENV: &str = "SLICEDEP_TOOLS_PATH";

/// Default file name of a build manifest.
pub const MANIFEST_FILENAME: &str = "slicedep.json";

/// Extension of dependency record files.
pub const RECORD_EXTENSION: &str = "d";

/// Format version written into every dependency record.
pub const RECORD_VERSION: u32 = 1;

/// Output directory used when a source does not name one.
pub const DEFAULT_OUTPUT_DIR: &str = "generated";
