pub mod bundle;
pub mod config;
pub mod error;
pub mod escape;
pub mod generator;
pub mod models;
pub mod provider;
pub mod request;
pub mod server;
pub mod telemetry;
pub mod template;
pub mod validate;

pub use error::{BundleError, GenerateError};
pub use generator::{generate, GeneratedModule};
pub use models::{FewShot, GenerationOptions};
pub use provider::ProviderKind;

/**
 * \brief SDK 预导入集合，方便外部引用常用模块。
 */
pub mod prelude {
    pub use crate::bundle;
    pub use crate::config;
    pub use crate::generator;
    pub use crate::models;
    pub use crate::provider;
    pub use crate::server;
    pub use crate::telemetry;
    pub use crate::validate;
}
