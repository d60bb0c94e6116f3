//! Layered configuration.
//!
//! Tiers, lowest to highest priority, merged field by field:
//! 1. **Defaults** - `Config::default()`
//! 2. **Project** - `$CWD/todo-tree/config.yaml`
//! 3. **User** - `~/.todo-tree/config.yaml`
//! 4. **Environment** - individual overrides
//!
//! ## Environment Variables
//! - `TODO_TREE_CONFIG_PATH` - Explicit config file (replaces tier merging)
//! - `TODO_TREE_DB_PATH` - Database path
//! - `TODO_TREE_HOST` - HTTP bind address
//! - `TODO_TREE_PORT` - HTTP port
//! - `TODO_TREE_ALLOWED_ORIGIN` - CORS origin allowed with credentials
//! - `TODO_TREE_USER_DIR` - User config dir (default: `~/.todo-tree`)
//! - `TODO_TREE_PROJECT_DIR` - Project config dir (default: `./todo-tree`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
