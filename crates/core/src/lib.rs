//! Bracket Core Library
//!
//! Models, validation, permissions, storage and the domain services for the
//! Bracket tournament booking service.

pub mod banners;
pub mod error;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod services;
pub mod storage;
pub mod validation;

pub use banners::{BannerStore, BannerUpload, DiskBannerStore};
pub use error::{Error, FieldError, Result, ValidationErrors};
pub use models::*;
pub use permissions::*;
pub use services::*;
pub use storage::{
    BookingRepository, CommentRepository, Database, EventRepository, Storage, UserRepository,
};
