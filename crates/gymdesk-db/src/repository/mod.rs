//! # Repository Module
//!
//! Database repositories for GymDesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller                                                                 │
//! │       │  db.tax_settings().list_all()                                   │
//! │       ▼                                                                 │
//! │  TaxSettingRepository                                                   │
//! │  ├── list_all / list_active / get_by_id / count                        │
//! │  ├── create / insert / update        (sanitised writes)                │
//! │  ├── deactivate / delete                                               │
//! │  └── quote(base, selection)          (fresh catalog → tax engine)      │
//! │       │                                                                 │
//! │       ▼  SQL                                                            │
//! │  SQLite (tax_settings)                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod tax_setting;
