use thiserror::Error;

/**
 * \brief 生成阶段的错误。
 */
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid function name '{name}': {message}")]
    InvalidFunctionName { name: String, message: String },

    #[error("serialize request failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("serialized request does not contain the prompt placeholder")]
    MissingPlaceholder,
}

/**
 * \brief 打包下载阶段的错误。
 */
#[derive(Error, Debug)]
pub enum BundleError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("fetch {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("write bundle failed: {0}")]
    Io(#[from] std::io::Error),
}
