use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStage {
    #[error("request")]
    Request,
    #[error("response parse")]
    ResponseParse,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Network error fetching releases for {repo} ({stage}): {details}")]
    Network {
        repo: String,
        stage: NetworkStage,
        details: String,
    },

    #[error("Release feed for {repo} returned HTTP {status}{body_snippet}")]
    HttpStatus {
        repo: String,
        status: u16,
        body_snippet: String,
    },
}

impl FeedError {
    pub fn request<E>(repo: impl Into<String>, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Network {
            repo: repo.into(),
            stage: NetworkStage::Request,
            details: error.to_string(),
        }
    }

    pub fn parse<E>(repo: impl Into<String>, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Network {
            repo: repo.into(),
            stage: NetworkStage::ResponseParse,
            details: error.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstallError {
    #[error("{context}: {details}")]
    Io {
        context: &'static str,
        kind: std::io::ErrorKind,
        details: String,
    },

    #[error("{context}: {details}")]
    Download {
        context: &'static str,
        details: String,
    },

    #[error("{context}: {details}")]
    Archive {
        context: &'static str,
        details: String,
    },

    #[error("{0}")]
    Invalid(String),
}

impl InstallError {
    pub fn io(context: &'static str, source: &std::io::Error) -> Self {
        Self::Io {
            context,
            kind: source.kind(),
            details: source.to_string(),
        }
    }

    pub fn io_with_path(
        context: &'static str,
        path: &std::path::Path,
        source: &std::io::Error,
    ) -> Self {
        Self::Io {
            context,
            kind: source.kind(),
            details: format!("{}: {source}", path.display()),
        }
    }

    pub fn download<E>(context: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Download {
            context,
            details: error.to_string(),
        }
    }

    pub fn archive<E>(context: &'static str, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Archive {
            context,
            details: error.to_string(),
        }
    }
}
