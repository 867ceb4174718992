//! Client core for the e-report admin front end: configuration, the REST
//! gateway, and the per-page controllers the UI drives.

pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod navigation;
pub mod notifications;
pub mod resources;
pub mod schema;

pub use config::{load_settings, ClientSettings, ConfigError, RawSettings};
pub use controller::{
    ActionOutcome, Blocked, FetchOutcome, FetchTicket, PageController, PageStatus,
};
pub use error::{ErrorKind, GatewayError, ValidationErrors};
pub use forms::{EditorMode, FormDraft, FormEditor, SaveRequest};
pub use gateway::{ResourceGateway, RestGateway};
pub use navigation::{Layout, Navigator, Route};
pub use notifications::{Level, Notification, NotificationCenter};
pub use resources::Resource;
