pub mod access;
pub mod catalog;
pub mod config;
pub mod dump;
pub mod import;
pub mod playlist;
pub mod resolver;
pub mod testing;

pub use access::{Access, AccessGrant};
pub use catalog::{
    CatalogClient, CatalogError, CatalogItem, CreateOutcome, ItemId, NewMembership, Playlist,
    PlaylistId, PlaylistMembership, SqliteCatalog,
};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, DatabaseConfig, DumpConfig, ImportConfig,
};
pub use dump::{CatalogDumper, DumpError};
pub use import::{
    playlist_name_from_path, ImportError, ImportOutcome, ImportPipeline, ImportStatus,
};
pub use playlist::PlaylistRepository;
pub use resolver::{parse_lines, LookupStrategy, PathResolver};
