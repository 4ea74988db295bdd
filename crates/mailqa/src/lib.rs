pub mod providers;
pub mod traits;
pub mod types;

pub use traits::QaProvider;
pub use types::{CorpusInfo, History};

// Re-export providers
pub use providers::http::HttpQaProvider;
pub use providers::mock::MockQaProvider;
