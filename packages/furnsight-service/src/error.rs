pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	InvalidRequest { message: String },
	#[error("{message}")]
	Analysis { message: String },
	#[error("Vision provider error: {message}")]
	Provider { status: Option<u16>, message: String },
	#[error("Catalog error: {message}")]
	Retrieval { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}
}

impl From<furnsight_storage::Error> for Error {
	fn from(err: furnsight_storage::Error) -> Self {
		match err {
			furnsight_storage::Error::Sqlx(inner) => Self::Retrieval { message: inner.to_string() },
			furnsight_storage::Error::InvalidArgument(message) => Self::Retrieval { message },
		}
	}
}

impl From<furnsight_providers::Error> for Error {
	fn from(err: furnsight_providers::Error) -> Self {
		Self::Provider { status: err.upstream_status(), message: err.to_string() }
	}
}
